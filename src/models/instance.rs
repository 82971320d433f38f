//! Concrete class instances and their derived availability view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{InstanceId, InstructorId, TemplateId};
use crate::models::time::TimeRange;

/// Lifecycle state of a class instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    Scheduled,
    Cancelled,
}

/// One concrete, dated, bookable occurrence generated from a template.
///
/// Capacity and price are copied from the template at generation time; later
/// template edits do not retroactively change an already-generated instance.
/// Seat counts are deliberately absent here: availability is always derived
/// from the booking records, never stored (see
/// [`crate::scheduling::availability`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInstance {
    pub id: InstanceId,
    pub template_id: TemplateId,
    pub name: String,
    pub category: String,
    pub level: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<InstructorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
    pub capacity: u32,
    pub price: f64,
    #[serde(default)]
    pub member_plus_only: bool,
    #[serde(default)]
    pub x_pass_eligible: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: InstanceStatus,
}

impl ClassInstance {
    /// The occupied time slot, `[start, end)`.
    pub fn time_range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == InstanceStatus::Cancelled
    }

    /// Whether the class has already started at `now`.
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now
    }
}

/// A class instance together with its live, derived seat counts.
///
/// `available_spots` is `max(0, capacity - booked_count)`, recomputed on every
/// read. This view is advisory for display and search; booking admission
/// re-checks the count inside the repository's guarded insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassAvailability {
    #[serde(flatten)]
    pub instance: ClassInstance,
    pub booked_count: u32,
    pub waitlist_count: u32,
    pub available_spots: u32,
    pub is_full: bool,
}

impl ClassAvailability {
    pub fn is_available(&self) -> bool {
        !self.is_full
    }
}
