//! Domain model types for the scheduling core.
//!
//! The records here are plain data: no seat counters, no ambient store
//! handles. Derived quantities (availability, waitlist depth) live in view
//! types computed by [`crate::scheduling`].

pub mod booking;
pub mod instance;
pub mod template;
pub mod time;

pub use booking::{
    Booking, BookingStatus, BookingType, NotificationPreferences, PaymentStatus, WaitlistEntry,
    WaitlistStatus,
};
pub use instance::{ClassAvailability, ClassInstance, InstanceStatus};
pub use template::{ClassTemplate, Membership, MembershipType, RecurrencePattern, TemplateProposal};
pub use time::{TimeOfDay, TimeRange};
