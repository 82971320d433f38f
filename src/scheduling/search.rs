//! Search and filter engine over class availability views.
//!
//! All filters are independently optional and AND-combined; exactly one sort
//! key is active per query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::InstructorId;
use crate::models::instance::ClassAvailability;
use crate::models::time::TimeOfDay;

/// Compound filter set. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassFilters {
    /// Inclusive start of the date range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Inclusive end of the date range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<InstructorId>,
    /// Keep only classes with at least one open seat.
    #[serde(default)]
    pub available_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,
    /// Any-match against the instance tag set; empty means no tag filter.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Sort order for search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Ascending start time.
    #[default]
    Date,
    /// Descending booked count.
    Popularity,
    /// Descending available spots.
    Availability,
    /// Ascending price.
    Price,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "popularity" => Ok(SortKey::Popularity),
            "availability" => Ok(SortKey::Availability),
            "price" => Ok(SortKey::Price),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

fn matches(class: &ClassAvailability, filters: &ClassFilters) -> bool {
    let instance = &class.instance;
    let date = instance.start_time.date_naive();

    if filters.date_from.is_some_and(|from| date < from) {
        return false;
    }
    if filters.date_to.is_some_and(|to| date > to) {
        return false;
    }
    if filters
        .category
        .as_deref()
        .is_some_and(|c| instance.category != c)
    {
        return false;
    }
    if filters.level.as_deref().is_some_and(|l| instance.level != l) {
        return false;
    }
    if filters
        .instructor_id
        .is_some_and(|id| instance.instructor_id != Some(id))
    {
        return false;
    }
    if filters.available_only && class.available_spots == 0 {
        return false;
    }
    if filters
        .time_of_day
        .is_some_and(|bucket| TimeOfDay::bucket_of(instance.start_time) != Some(bucket))
    {
        return false;
    }
    if !filters.tags.is_empty() && !filters.tags.iter().any(|t| instance.tags.contains(t)) {
        return false;
    }
    true
}

/// Apply the filter set, then order by the sort key.
pub fn search(
    classes: Vec<ClassAvailability>,
    filters: &ClassFilters,
    sort: SortKey,
) -> Vec<ClassAvailability> {
    let mut results: Vec<ClassAvailability> = classes
        .into_iter()
        .filter(|c| matches(c, filters))
        .collect();

    match sort {
        SortKey::Date => results.sort_by_key(|c| c.instance.start_time),
        SortKey::Popularity => results.sort_by(|a, b| b.booked_count.cmp(&a.booked_count)),
        SortKey::Availability => results.sort_by(|a, b| b.available_spots.cmp(&a.available_spots)),
        SortKey::Price => {
            results.sort_by(|a, b| a.instance.price.total_cmp(&b.instance.price));
        }
    }
    results
}
