//! Availability calculator: live seat counts derived from booking records.
//!
//! Availability is never stored. Every read recomputes the counts from the
//! current bookings and waitlist entries, so a cached `available_spots` can
//! never be mistaken for ground truth. Admission decisions additionally
//! re-check the count inside the repository's guarded insert (the advisory
//! value computed here is not sufficient on its own).

use crate::models::booking::{Booking, WaitlistEntry};
use crate::models::instance::{ClassAvailability, ClassInstance};

/// Derive the availability view for a single instance.
pub fn availability_for(
    instance: &ClassInstance,
    bookings: &[Booking],
    waitlist: &[WaitlistEntry],
) -> ClassAvailability {
    let booked_count = bookings
        .iter()
        .filter(|b| b.instance_id == instance.id && b.is_confirmed())
        .count() as u32;
    let waitlist_count = waitlist
        .iter()
        .filter(|w| w.instance_id == instance.id && w.is_active())
        .count() as u32;
    let available_spots = instance.capacity.saturating_sub(booked_count);

    ClassAvailability {
        instance: instance.clone(),
        booked_count,
        waitlist_count,
        available_spots,
        is_full: available_spots == 0,
    }
}

/// Derive availability views for a set of instances against the same booking
/// and waitlist records.
pub fn compute_availability(
    instances: &[ClassInstance],
    bookings: &[Booking],
    waitlist: &[WaitlistEntry],
) -> Vec<ClassAvailability> {
    instances
        .iter()
        .map(|instance| availability_for(instance, bookings, waitlist))
        .collect()
}
