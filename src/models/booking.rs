//! Booking and waitlist records.
//!
//! Statuses are tagged enums rather than loose strings so that invalid
//! combinations are unrepresentable; the only transitions are the ones the
//! service layer performs explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{BookingId, InstanceId, TemplateId, UserId, WaitlistEntryId};

/// Booking lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// Payment state, owned by the external payment collaborator after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

/// How the seat was paid for, derived from the membership tier at booking
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    DropIn,
    UnlimitedMembership,
    ClassPack,
    MemberPlus,
    WaitlistPromotion,
}

/// A confirmed reservation of one seat in one class instance.
///
/// Start and end times are copied from the instance at creation so the record
/// stays meaningful even if the instance is later changed or cancelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub instance_id: InstanceId,
    pub template_id: TemplateId,
    pub user_id: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Price computed at booking time; zero for covered memberships.
    pub price: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub booking_type: BookingType,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// Waitlist entry lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    Active,
    Promoted,
    Expired,
    Cancelled,
}

/// Channels to use when notifying a waitlisted user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default = "default_true")]
    pub email: bool,
    #[serde(default)]
    pub sms: bool,
    #[serde(default)]
    pub push: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            push: false,
        }
    }
}

/// A pending request for a seat in a full class instance.
///
/// `position` is assigned at enrollment (active count + 1) and is display
/// data only: it is never renumbered when earlier entries cancel. Promotion
/// order is governed by `created_at` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: WaitlistEntryId,
    pub instance_id: InstanceId,
    pub user_id: UserId,
    pub position: u32,
    pub status: WaitlistStatus,
    pub auto_book: bool,
    #[serde(default)]
    pub notify: NotificationPreferences,
    pub created_at: DateTime<Utc>,
    /// Deadline to confirm a promotion manually; set only when the entry was
    /// promoted with `auto_book = false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_by: Option<DateTime<Utc>>,
}

impl WaitlistEntry {
    pub fn is_active(&self) -> bool {
        self.status == WaitlistStatus::Active
    }
}
