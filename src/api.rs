//! Public API surface for the scheduling backend.
//!
//! This file consolidates the identifier newtypes and re-exports the domain
//! types used across the crate boundary. All types derive
//! Serialize/Deserialize for JSON serialization.

use serde::{Deserialize, Serialize};

/// Class template identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub i64);

/// Studio identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudioId(pub i64);

/// Instructor identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstructorId(pub i64);

impl TemplateId {
    pub fn new(value: i64) -> Self {
        TemplateId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl StudioId {
    pub fn new(value: i64) -> Self {
        StudioId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl InstructorId {
    pub fn new(value: i64) -> Self {
        InstructorId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for StudioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::fmt::Display for InstructorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TemplateId> for i64 {
    fn from(id: TemplateId) -> Self {
        id.0
    }
}

/// Class instance identifier.
///
/// Deterministic: derived from the template id, the instance date and the
/// start time of day, so re-expanding an overlapping window regenerates the
/// same ids and the store can upsert instead of duplicating. See
/// [`crate::scheduling::expansion::instance_id`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub String);

impl InstanceId {
    pub fn new(value: impl Into<String>) -> Self {
        InstanceId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Booking identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(pub uuid::Uuid);

impl BookingId {
    pub fn generate() -> Self {
        BookingId(uuid::Uuid::new_v4())
    }

    pub fn value(&self) -> uuid::Uuid {
        self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Waitlist entry identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WaitlistEntryId(pub uuid::Uuid);

impl WaitlistEntryId {
    pub fn generate() -> Self {
        WaitlistEntryId(uuid::Uuid::new_v4())
    }

    pub fn value(&self) -> uuid::Uuid {
        self.0
    }
}

impl std::fmt::Display for WaitlistEntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Member identifier, as issued by the external identity provider.
///
/// Opaque to this core; never parsed or generated here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        UserId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub use crate::models::booking::{
    Booking, BookingStatus, BookingType, NotificationPreferences, PaymentStatus, WaitlistEntry,
    WaitlistStatus,
};
pub use crate::models::instance::{ClassAvailability, ClassInstance, InstanceStatus};
pub use crate::models::template::{
    ClassTemplate, Membership, MembershipType, RecurrencePattern, TemplateProposal,
};
pub use crate::models::time::{TimeOfDay, TimeRange};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_id_roundtrip() {
        let id = TemplateId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_instance_id_display() {
        let id = InstanceId::new("ab12cd34");
        assert_eq!(id.value(), "ab12cd34");
        assert_eq!(id.to_string(), "ab12cd34");
    }

    #[test]
    fn test_booking_ids_unique() {
        let a = BookingId::generate();
        let b = BookingId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_user_id_opaque() {
        let id = UserId::new("auth0|5f2d");
        assert_eq!(id.value(), "auth0|5f2d");
    }
}
