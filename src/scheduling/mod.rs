//! The scheduling and booking core.
//!
//! Every function in this module is pure: inputs in, values out, no storage
//! access. The service layer wires these into the persistence port, and the
//! in-memory repository reuses the same functions inside its write lock so
//! that admission and promotion decisions are made exactly once, atomically.
//!
//! Data flow: [`expansion`] → [`availability`] → {[`eligibility`],
//! [`search`]} → [`booking`] / [`waitlist`]. The [`validator`] gates template
//! creation before expansion.

pub mod availability;
pub mod booking;
pub mod eligibility;
pub mod expansion;
pub mod search;
pub mod validator;
pub mod waitlist;

pub use availability::{availability_for, compute_availability};
pub use booking::{booking_type_for, compute_price, create_booking};
pub use eligibility::{
    check_booking_eligibility, instructor_conflicts, BookingRejection, InstructorAssignment,
};
pub use expansion::{generate_instances, instance_id};
pub use search::{search, ClassFilters, SortKey};
pub use validator::{validate_template, TemplateValidation};
pub use waitlist::{
    enroll, lapsed_promotions, promote_from_waitlist, Promotion, WaitlistPolicy,
};
