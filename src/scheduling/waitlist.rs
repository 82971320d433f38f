//! Waitlist manager: enrollment and strict-FIFO promotion.
//!
//! Promotion order is governed by `created_at` alone. The stored `position`
//! field is assigned at enrollment for display and is never renumbered when
//! earlier entries cancel, so it can drift out of sync with the true queue
//! order and must not be trusted for promotion.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{BookingId, InstanceId, UserId, WaitlistEntryId};
use crate::models::booking::{
    Booking, BookingStatus, BookingType, NotificationPreferences, PaymentStatus, WaitlistEntry,
    WaitlistStatus,
};
use crate::models::instance::ClassInstance;

/// Policy knobs for waitlist promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistPolicy {
    /// How long a manually-confirmed promotion stays claimable before it
    /// lapses to `expired`.
    pub confirmation_window_minutes: i64,
}

impl Default for WaitlistPolicy {
    fn default() -> Self {
        Self {
            confirmation_window_minutes: 60,
        }
    }
}

impl WaitlistPolicy {
    pub fn confirmation_window(&self) -> Duration {
        Duration::minutes(self.confirmation_window_minutes)
    }
}

/// Build a new waitlist entry for a full instance.
///
/// `active_count` is the number of currently-active entries for the instance;
/// the assigned position is `active_count + 1` and is advisory display data
/// only. Enrollment always succeeds; there is no cap on waitlist depth.
pub fn enroll(
    instance_id: InstanceId,
    user_id: UserId,
    auto_book: bool,
    notify: NotificationPreferences,
    active_count: u32,
    now: DateTime<Utc>,
) -> WaitlistEntry {
    WaitlistEntry {
        id: WaitlistEntryId::generate(),
        instance_id,
        user_id,
        position: active_count + 1,
        status: WaitlistStatus::Active,
        auto_book,
        notify,
        created_at: now,
        confirm_by: None,
    }
}

/// Outcome of promoting one waitlist entry.
///
/// `booking` is present only when the entry had `auto_book = true`; otherwise
/// the user must confirm before `entry.confirm_by`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub entry: WaitlistEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
}

/// Promote up to `available_spots` entries in strict arrival order.
///
/// Filters to active entries, orders ascending by `created_at` (ignoring the
/// stored `position`), and takes the first `available_spots`. Auto-book
/// entries get a confirmed booking with `booking_type = waitlist_promotion`;
/// the rest receive a `confirm_by` deadline from the policy.
///
/// Must be invoked exactly once per capacity-freeing event and must not run
/// concurrently with itself for the same instance; the repository serializes
/// it together with booking admission.
pub fn promote_from_waitlist(
    instance: &ClassInstance,
    entries: &[WaitlistEntry],
    available_spots: u32,
    policy: &WaitlistPolicy,
    now: DateTime<Utc>,
) -> Vec<Promotion> {
    let mut active: Vec<&WaitlistEntry> = entries
        .iter()
        .filter(|e| e.instance_id == instance.id && e.is_active())
        .collect();
    active.sort_by_key(|e| e.created_at);

    active
        .into_iter()
        .take(available_spots as usize)
        .map(|entry| {
            let mut promoted = entry.clone();
            promoted.status = WaitlistStatus::Promoted;

            let booking = if promoted.auto_book {
                Some(Booking {
                    id: BookingId::generate(),
                    instance_id: instance.id.clone(),
                    template_id: instance.template_id,
                    user_id: promoted.user_id.clone(),
                    start_time: instance.start_time,
                    end_time: instance.end_time,
                    price: instance.price,
                    status: BookingStatus::Confirmed,
                    payment_status: PaymentStatus::Pending,
                    booking_type: BookingType::WaitlistPromotion,
                    created_at: now,
                })
            } else {
                promoted.confirm_by = Some(now + policy.confirmation_window());
                None
            };

            Promotion {
                entry: promoted,
                booking,
            }
        })
        .collect()
}

/// Ids of promoted-but-unconfirmed entries whose confirmation window has
/// lapsed at `now`.
pub fn lapsed_promotions(entries: &[WaitlistEntry], now: DateTime<Utc>) -> Vec<WaitlistEntryId> {
    entries
        .iter()
        .filter(|e| e.status == WaitlistStatus::Promoted)
        .filter(|e| e.confirm_by.is_some_and(|deadline| deadline <= now))
        .map(|e| e.id)
        .collect()
}
