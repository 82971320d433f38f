//! Booking processor: price and booking-type computation.
//!
//! Produces a booking record from a validated request. The processor never
//! mutates instance seat counts (those are always derived); its only durable
//! effect is the booking record the caller inserts through the repository's
//! guarded insert. Payment capture is an external collaborator invoked after
//! a successful return, which is why every new booking starts with
//! `payment_status = pending`.

use chrono::{DateTime, Utc};

use crate::api::{BookingId, UserId};
use crate::models::booking::{Booking, BookingStatus, BookingType, PaymentStatus};
use crate::models::instance::ClassAvailability;
use crate::models::template::{Membership, MembershipType};
use crate::scheduling::eligibility::{check_booking_eligibility, BookingRejection};

/// Price owed for one seat given the membership tier.
///
/// Unlimited and Member+ tiers are covered; class packs are charged against
/// an external pack balance, not here. Everyone else pays the instance's
/// drop-in price.
pub fn compute_price(membership_type: MembershipType, instance_price: f64) -> f64 {
    match membership_type {
        MembershipType::Unlimited | MembershipType::MemberPlus | MembershipType::ClassPack => 0.0,
        MembershipType::DropIn | MembershipType::None => instance_price,
    }
}

/// Booking-type classification for a membership tier.
pub fn booking_type_for(membership_type: MembershipType) -> BookingType {
    match membership_type {
        MembershipType::Unlimited => BookingType::UnlimitedMembership,
        MembershipType::MemberPlus => BookingType::MemberPlus,
        MembershipType::ClassPack => BookingType::ClassPack,
        MembershipType::DropIn | MembershipType::None => BookingType::DropIn,
    }
}

/// Build a booking for a validated request, or reject with a typed reason.
///
/// Delegates precondition checks to the eligibility checker; on success the
/// booking carries the computed price, the tier-derived booking type,
/// `status = confirmed` and `payment_status = pending`. Times are copied from
/// the instance for durability against later instance changes.
pub fn create_booking(
    class: &ClassAvailability,
    user_id: UserId,
    membership: &Membership,
    now: DateTime<Utc>,
) -> Result<Booking, BookingRejection> {
    check_booking_eligibility(class, membership, now)?;

    Ok(Booking {
        id: BookingId::generate(),
        instance_id: class.instance.id.clone(),
        template_id: class.instance.template_id,
        user_id,
        start_time: class.instance.start_time,
        end_time: class.instance.end_time,
        price: compute_price(membership.membership_type, class.instance.price),
        status: BookingStatus::Confirmed,
        payment_status: PaymentStatus::Pending,
        booking_type: booking_type_for(membership.membership_type),
        created_at: now,
    })
}
