//! High-level service layer.
//!
//! Repository-agnostic orchestration over the persistence port: these
//! functions sequence the pure scheduling core against storage and the
//! notification collaborator, and are what the HTTP handlers (and tests)
//! call.

pub mod booking_service;
pub mod notifier;
pub mod schedule_service;

pub use booking_service::{
    book_class, cancel_booking, class_availability, expire_lapsed_promotions, join_waitlist,
    leave_waitlist, BookingOutcome, BookingRequest, CancellationOutcome, WaitlistRequest,
};
pub use notifier::{LogNotifier, Notifier};
pub use schedule_service::{
    assignments_for_instructor, cancel_instance, create_template, delete_template,
    expand_template, search_classes, TemplateDeletion, TemplateOutcome,
};
