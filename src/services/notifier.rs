//! Notification port.
//!
//! The scheduling core informs the notification collaborator about booking
//! confirmations, waitlist enrollments and promotions. Delivery is
//! fire-and-forget: implementations must never block meaningfully or fail the
//! calling operation, which is why the trait methods return nothing.

use async_trait::async_trait;
use log::info;

use crate::models::booking::{Booking, WaitlistEntry};
use crate::scheduling::waitlist::Promotion;

/// Outbound notification events emitted by the scheduling core.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn booking_confirmed(&self, booking: &Booking);

    async fn booking_cancelled(&self, booking: &Booking);

    async fn waitlist_enrolled(&self, entry: &WaitlistEntry);

    async fn waitlist_promoted(&self, promotion: &Promotion);
}

/// Notifier that records events in the application log.
///
/// The default wiring for local development and tests; a real delivery
/// backend (email/SMS/push gateway) implements the same trait.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn booking_confirmed(&self, booking: &Booking) {
        info!(
            "Booking {} confirmed for user {} in class instance {}",
            booking.id, booking.user_id, booking.instance_id
        );
    }

    async fn booking_cancelled(&self, booking: &Booking) {
        info!(
            "Booking {} cancelled for user {} in class instance {}",
            booking.id, booking.user_id, booking.instance_id
        );
    }

    async fn waitlist_enrolled(&self, entry: &WaitlistEntry) {
        info!(
            "User {} joined the waitlist for class instance {} at position {}",
            entry.user_id, entry.instance_id, entry.position
        );
    }

    async fn waitlist_promoted(&self, promotion: &Promotion) {
        info!(
            "User {} promoted from the waitlist for class instance {} (auto_book={})",
            promotion.entry.user_id,
            promotion.entry.instance_id,
            promotion.booking.is_some()
        );
    }
}
