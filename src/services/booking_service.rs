//! Booking orchestration over the persistence port.
//!
//! These functions contain the cross-cutting sequencing the pure scheduling
//! core cannot do itself: advisory eligibility, the guarded admission insert,
//! and the cancellation → promotion chain. They are repository-agnostic and
//! work with any implementation of the port traits.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::api::{BookingId, InstanceId, UserId, WaitlistEntryId};
use crate::db::error::{RepositoryError, RepositoryResult};
use crate::db::repository::{BookingAdmission, FullRepository};
use crate::models::booking::{Booking, NotificationPreferences, WaitlistEntry};
use crate::models::instance::ClassAvailability;
use crate::models::template::Membership;
use crate::scheduling::availability::availability_for;
use crate::scheduling::booking::create_booking;
use crate::scheduling::eligibility::BookingRejection;
use crate::scheduling::waitlist::{enroll, Promotion, WaitlistPolicy};
use crate::services::notifier::Notifier;

/// A booking attempt, as assembled by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub instance_id: InstanceId,
    pub user_id: UserId,
    pub membership: Membership,
}

/// Result of a booking attempt: either a confirmed booking or a typed
/// rejection. Rejections are expected business outcomes, not errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingOutcome {
    Confirmed(Booking),
    Rejected(BookingRejection),
}

/// A waitlist enrollment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistRequest {
    pub instance_id: InstanceId,
    pub user_id: UserId,
    #[serde(default)]
    pub auto_book: bool,
    #[serde(default)]
    pub notify: NotificationPreferences,
}

/// Result of cancelling a booking: the cancelled record plus any waitlist
/// promotions triggered by the freed seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationOutcome {
    pub booking: Booking,
    pub promotions: Vec<Promotion>,
}

/// Derive the live availability view for one instance.
pub async fn class_availability<R: FullRepository + ?Sized>(
    repo: &R,
    instance_id: &InstanceId,
) -> RepositoryResult<ClassAvailability> {
    let instance = repo.get_instance(instance_id).await?;
    let bookings = repo.bookings_for_instance(instance_id).await?;
    let waitlist = repo.waitlist_for_instance(instance_id).await?;
    Ok(availability_for(&instance, &bookings, &waitlist))
}

/// Attempt to book one seat.
///
/// Runs the advisory eligibility checks against live availability, then
/// submits the booking through the repository's guarded insert, which
/// re-verifies capacity and per-user uniqueness atomically. A full class or a
/// duplicate detected at insert time surfaces as the corresponding typed
/// rejection, exactly as if the advisory check had caught it.
///
/// Booking a cancelled instance is refused with a conflict error: it is a
/// staff-visible state, not a member-facing rejection.
pub async fn book_class<R: FullRepository + ?Sized>(
    repo: &R,
    notifier: &dyn Notifier,
    request: BookingRequest,
    now: DateTime<Utc>,
) -> RepositoryResult<BookingOutcome> {
    let view = class_availability(repo, &request.instance_id).await?;
    if view.instance.is_cancelled() {
        return Err(RepositoryError::conflict(format!(
            "Class instance {} is cancelled",
            request.instance_id
        )));
    }

    let booking = match create_booking(&view, request.user_id, &request.membership, now) {
        Ok(booking) => booking,
        Err(rejection) => {
            info!(
                "Booking rejected for class instance {}: {}",
                request.instance_id,
                rejection.code()
            );
            return Ok(BookingOutcome::Rejected(rejection));
        }
    };

    match repo
        .insert_booking_guarded(&booking, view.instance.capacity)
        .await?
    {
        BookingAdmission::Admitted(stored) => {
            info!(
                "Booking {} confirmed for class instance {} (price {})",
                stored.id, stored.instance_id, stored.price
            );
            notifier.booking_confirmed(&stored).await;
            Ok(BookingOutcome::Confirmed(stored))
        }
        BookingAdmission::Full => {
            // Lost the race for the last seat between the advisory check and
            // the guarded insert.
            info!(
                "Booking lost admission race for class instance {}",
                request.instance_id
            );
            Ok(BookingOutcome::Rejected(BookingRejection::ClassFull))
        }
        BookingAdmission::Duplicate => {
            Ok(BookingOutcome::Rejected(BookingRejection::AlreadyBooked))
        }
    }
}

/// Cancel a confirmed booking and promote from the waitlist for the freed
/// seat.
///
/// Cancellation is the only capacity-freeing event; promotion runs exactly
/// once per cancellation, with one freed seat. Promotion failures are logged
/// but do not roll back the cancellation.
pub async fn cancel_booking<R: FullRepository + ?Sized>(
    repo: &R,
    notifier: &dyn Notifier,
    booking_id: BookingId,
    policy: &WaitlistPolicy,
    now: DateTime<Utc>,
) -> RepositoryResult<CancellationOutcome> {
    let booking = repo.cancel_booking(booking_id).await?;
    notifier.booking_cancelled(&booking).await;

    let promotions = match repo
        .promote_waitlist(&booking.instance_id, 1, policy, now)
        .await
    {
        Ok(promotions) => promotions,
        Err(e) => {
            warn!(
                "Waitlist promotion failed after cancelling booking {}: {}",
                booking_id, e
            );
            Vec::new()
        }
    };

    for promotion in &promotions {
        notifier.waitlist_promoted(promotion).await;
    }

    Ok(CancellationOutcome {
        booking,
        promotions,
    })
}

/// Enroll a user on the waitlist for an instance.
///
/// Always succeeds when the instance exists; there is no cap on waitlist
/// depth. The assigned position is advisory display data.
pub async fn join_waitlist<R: FullRepository + ?Sized>(
    repo: &R,
    notifier: &dyn Notifier,
    request: WaitlistRequest,
    now: DateTime<Utc>,
) -> RepositoryResult<WaitlistEntry> {
    // Existence check doubles as the NotFound path before enrollment.
    repo.get_instance(&request.instance_id).await?;

    let active = repo.active_waitlist_count(&request.instance_id).await?;
    let entry = enroll(
        request.instance_id,
        request.user_id,
        request.auto_book,
        request.notify,
        active,
        now,
    );
    repo.add_waitlist_entry(&entry).await?;

    info!(
        "Waitlist entry {} created for class instance {} at position {}",
        entry.id, entry.instance_id, entry.position
    );
    notifier.waitlist_enrolled(&entry).await;
    Ok(entry)
}

/// Remove an active waitlist entry.
pub async fn leave_waitlist<R: FullRepository + ?Sized>(
    repo: &R,
    entry_id: WaitlistEntryId,
) -> RepositoryResult<WaitlistEntry> {
    repo.cancel_waitlist_entry(entry_id).await
}

/// Expire promoted-but-unconfirmed entries whose confirmation window lapsed.
///
/// Request-triggered: there is no background timer in the core.
pub async fn expire_lapsed_promotions<R: FullRepository + ?Sized>(
    repo: &R,
    instance_id: &InstanceId,
    now: DateTime<Utc>,
) -> RepositoryResult<Vec<WaitlistEntry>> {
    let expired = repo.expire_lapsed_promotions(instance_id, now).await?;
    if !expired.is_empty() {
        info!(
            "Expired {} lapsed waitlist promotions for class instance {}",
            expired.len(),
            instance_id
        );
    }
    Ok(expired)
}
