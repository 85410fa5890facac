//! Heatmap data transformation and caching.
//!
//! The heatmap renderer needs a dense per-day series: every date in the
//! requested range mapped to a count, with gaps filled by 0. Building that
//! series costs a storage query per habit per view, so results are cached by
//! (habit, view, reference date). Every completion write for a habit
//! invalidates that habit's entries; serving a stale heatmap after a log or
//! undo is a correctness bug, not a performance detail.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::{
    entities::completion,
    errors::Result,
};

/// Which analytics view a cached heatmap belongs to. Part of the cache key
/// only; the date range itself is supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeatmapView {
    /// Seven-day week view
    Week,
    /// Calendar month view
    Month,
    /// Full year view
    Year,
}

impl HeatmapView {
    /// The lowercase string form used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// Dense per-day completion counts, ordered by date.
pub type HeatmapData = BTreeMap<NaiveDate, i32>;

type CacheKey = (i64, HeatmapView, NaiveDate);

/// Cache for heatmap data keyed by (habit, view, reference date).
///
/// An explicit object owned by the caller and passed by reference - there is
/// no process-wide singleton. Invalidation is an explicit call made from the
/// completion write path. The interior `RwLock` keeps the invalidation
/// contract intact even when a host drives reads and writes from multiple
/// tasks.
#[derive(Debug, Default)]
pub struct HeatmapCache {
    entries: tokio::sync::RwLock<HashMap<CacheKey, HeatmapData>>,
}

impl HeatmapCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached series for (habit, view, reference date), if any.
    pub async fn get(
        &self,
        habit_id: i64,
        view: HeatmapView,
        reference_date: NaiveDate,
    ) -> Option<HeatmapData> {
        let entries = self.entries.read().await;
        let data = entries.get(&(habit_id, view, reference_date)).cloned();
        if data.is_some() {
            debug!(
                "Heatmap cache HIT for habit {habit_id}, {}, {reference_date}",
                view.as_str()
            );
        } else {
            debug!(
                "Heatmap cache MISS for habit {habit_id}, {}, {reference_date}",
                view.as_str()
            );
        }
        data
    }

    /// Stores a series for (habit, view, reference date).
    pub async fn set(
        &self,
        habit_id: i64,
        view: HeatmapView,
        reference_date: NaiveDate,
        data: HeatmapData,
    ) {
        let mut entries = self.entries.write().await;
        entries.insert((habit_id, view, reference_date), data);
    }

    /// Drops every cached series for one habit. Called after each completion
    /// write so analytics never serve pre-write data.
    pub async fn invalidate_habit(&self, habit_id: i64) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|(cached_habit_id, _, _), _| *cached_habit_id != habit_id);
        let removed = before - entries.len();
        if removed > 0 {
            debug!("Invalidated {removed} heatmap cache entries for habit {habit_id}");
        }
    }

    /// Drops everything. Used by bulk operations (import, delete-all).
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
        debug!("Cleared entire heatmap cache");
    }

    /// Number of cached series, for diagnostics.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Transforms a completion list into a dense date-to-count map covering every
/// date in `[start, end]`, defaulting unseen dates to 0.
///
/// The gap filling is mandatory: renderers iterate the full range and expect
/// a value for each day. Completions outside the range are ignored.
#[must_use]
pub fn transform_completions_to_heatmap(
    completions: &[completion::Model],
    start: NaiveDate,
    end: NaiveDate,
) -> HeatmapData {
    let counts: HashMap<NaiveDate, i32> =
        completions.iter().map(|c| (c.date, c.count)).collect();

    let mut data = HeatmapData::new();
    let mut current = start;
    while current <= end {
        data.insert(current, counts.get(&current).copied().unwrap_or(0));
        current += Duration::days(1);
    }
    data
}

/// Gets heatmap data for a habit and date range, consulting the cache first.
///
/// The cache key is (habit, view, reference date) - not the range - so
/// callers must pass the range that view/reference pair implies. A hit
/// returns without touching storage; a miss queries, transforms, stores and
/// returns. `use_cache = false` bypasses both lookup and store.
#[allow(clippy::too_many_arguments)]
pub async fn get_heatmap_data(
    db: &DatabaseConnection,
    cache: &HeatmapCache,
    habit_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    view: HeatmapView,
    reference_date: NaiveDate,
    use_cache: bool,
) -> Result<HeatmapData> {
    if use_cache {
        if let Some(cached) = cache.get(habit_id, view, reference_date).await {
            return Ok(cached);
        }
    }

    debug!("Fetching completions for habit {habit_id} from {start} to {end}");
    let completions =
        crate::core::completion::get_completions_for_habit(db, habit_id, Some(start), Some(end))
            .await?;
    let data = transform_completions_to_heatmap(&completions, start, end);

    if use_cache {
        cache.set(habit_id, view, reference_date, data.clone()).await;
    }
    Ok(data)
}

/// Overall completion percentage across a date range:
/// `total / (days x goal_count)`, clamped to 100, one decimal. Returns 0.0
/// when the goal count is 0 or the range is degenerate.
#[must_use]
pub fn calculate_overall_percentage(
    completion_data: &HeatmapData,
    goal_count: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> f64 {
    let total: i64 = completion_data.values().map(|&c| i64::from(c)).sum();
    let total_days = (end - start).num_days() + 1;
    let max_possible = total_days * i64::from(goal_count);

    if max_possible <= 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let percentage = (total as f64 / max_possible as f64 * 100.0).min(100.0);
    (percentage * 10.0).round() / 10.0
}
