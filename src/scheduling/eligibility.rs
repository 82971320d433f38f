//! Booking eligibility and instructor conflict checks.
//!
//! Both checks are pure and advisory: they never touch storage. The booking
//! processor consults them before attempting the repository's guarded insert,
//! which re-verifies capacity and uniqueness atomically.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::InstructorId;
use crate::models::instance::ClassAvailability;
use crate::models::template::{Membership, MembershipType};
use crate::models::time::TimeRange;

/// Typed rejection reasons for a booking attempt.
///
/// Business-rule failures are returned as values, never raised; only genuine
/// infrastructure failures travel as errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingRejection {
    /// The class has already started; terminal, not retryable.
    #[error("Class has already started")]
    ClassStarted,
    /// Capacity exhausted; recoverable by joining the waitlist.
    #[error("Class is full")]
    ClassFull,
    /// The instance is restricted to the Member+ tier.
    #[error("Class requires a Member+ membership")]
    MemberPlusRequired,
    /// The user already holds a confirmed booking for this instance.
    #[error("User already has a confirmed booking for this class")]
    AlreadyBooked,
}

impl BookingRejection {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            BookingRejection::ClassStarted => "CLASS_STARTED",
            BookingRejection::ClassFull => "CLASS_FULL",
            BookingRejection::MemberPlusRequired => "MEMBER_PLUS_REQUIRED",
            BookingRejection::AlreadyBooked => "ALREADY_BOOKED",
        }
    }

    /// Recovery hint surfaced to the caller, when one exists.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            BookingRejection::ClassFull => Some("waitlist"),
            _ => None,
        }
    }
}

/// Ordered precondition checks for a booking attempt; the first failing check
/// wins.
///
/// 1. Class already started.
/// 2. No seats available (recoverable via waitlist).
/// 3. Member+ restriction.
///
/// Per-user booking-limit rules are a business-configurable extension point
/// and intentionally not hardcoded here.
pub fn check_booking_eligibility(
    class: &ClassAvailability,
    membership: &Membership,
    now: DateTime<Utc>,
) -> Result<(), BookingRejection> {
    if class.instance.has_started(now) {
        return Err(BookingRejection::ClassStarted);
    }
    if class.available_spots == 0 {
        return Err(BookingRejection::ClassFull);
    }
    if class.instance.member_plus_only && membership.membership_type != MembershipType::MemberPlus {
        return Err(BookingRejection::MemberPlusRequired);
    }
    Ok(())
}

/// One existing claim on an instructor's time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorAssignment {
    pub instructor_id: InstructorId,
    pub class_name: String,
    pub range: TimeRange,
}

/// Find existing assignments that overlap a proposed slot for the same
/// instructor.
///
/// Overlap uses half-open `[start, end)` semantics: an assignment ending
/// exactly when the proposal starts does not conflict. An empty result means
/// the slot is free.
pub fn instructor_conflicts(
    instructor_id: InstructorId,
    proposed: &TimeRange,
    existing: &[InstructorAssignment],
) -> Vec<InstructorAssignment> {
    existing
        .iter()
        .filter(|a| a.instructor_id == instructor_id && a.range.overlaps(proposed))
        .cloned()
        .collect()
}
