//! Repository traits for abstracting storage operations.
//!
//! These traits define the persistence port for the scheduling core, allowing
//! different backends (document store, in-memory, etc.) to be swapped via
//! dependency injection. There is deliberately no ambient/global repository:
//! every core function receives its port explicitly.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust and allow
//! sharing across threads.
//!
//! # Concurrency contract
//! Two methods carry the core's correctness burden and MUST be atomic per
//! implementation:
//!
//! - [`BookingRepository::insert_booking_guarded`] — the confirmed-seat count,
//!   the per-user uniqueness check and the insert happen in one serializable
//!   unit of work, so concurrent requests can never oversubscribe the last
//!   seat.
//! - [`WaitlistRepository::promote_waitlist`] — selection and state
//!   transitions for one instance happen in the same unit, so two
//!   cancellations can never promote more users than seats freed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;
use crate::api::{
    BookingId, InstanceId, InstructorId, TemplateId, UserId, WaitlistEntryId,
};
use crate::models::booking::{Booking, WaitlistEntry};
use crate::models::instance::{ClassInstance, InstanceStatus};
use crate::models::template::ClassTemplate;
use crate::models::time::TimeRange;
use crate::scheduling::waitlist::{Promotion, WaitlistPolicy};

/// Outcome of a guarded booking insert.
///
/// `Full` and `Duplicate` are expected business outcomes, not errors; the
/// service layer maps them to typed rejections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAdmission {
    /// The booking was inserted; the seat is taken.
    Admitted(Booking),
    /// Capacity was exhausted at insert time.
    Full,
    /// The user already holds a confirmed booking for this instance.
    Duplicate,
}

/// Class template storage.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// Store a new template, assigning its id.
    ///
    /// # Returns
    /// * `Ok(ClassTemplate)` - The stored template with `id` populated
    /// * `Err(RepositoryError)` - If the operation fails
    async fn store_template(&self, template: &ClassTemplate) -> RepositoryResult<ClassTemplate>;

    /// Retrieve a template by id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the template doesn't exist
    async fn get_template(&self, template_id: TemplateId) -> RepositoryResult<ClassTemplate>;

    /// List all templates.
    async fn list_templates(&self) -> RepositoryResult<Vec<ClassTemplate>>;

    /// Replace an existing template.
    ///
    /// Edits affect only instances generated after the update; instances
    /// already materialized keep their copied capacity and price.
    async fn update_template(&self, template: &ClassTemplate) -> RepositoryResult<()>;

    /// Delete a template record.
    ///
    /// Callers are responsible for the cascade policy (refuse or
    /// cascade-cancel future instances) before invoking this.
    async fn delete_template(&self, template_id: TemplateId) -> RepositoryResult<()>;
}

/// Class instance storage.
#[async_trait]
pub trait InstanceRepository: Send + Sync {
    /// Upsert instances by their deterministic id.
    ///
    /// Required for idempotent expansion: re-expanding an overlapping window
    /// regenerates the same ids and must not create duplicates.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of instances written (inserted or replaced)
    async fn upsert_instances(&self, instances: &[ClassInstance]) -> RepositoryResult<usize>;

    /// Retrieve an instance by id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the instance doesn't exist
    async fn get_instance(&self, instance_id: &InstanceId) -> RepositoryResult<ClassInstance>;

    /// List instances, optionally restricted to a time range (instances whose
    /// start time falls inside it).
    async fn list_instances(&self, range: Option<TimeRange>) -> RepositoryResult<Vec<ClassInstance>>;

    /// List instances generated from one template.
    async fn list_instances_for_template(
        &self,
        template_id: TemplateId,
    ) -> RepositoryResult<Vec<ClassInstance>>;

    /// List instances assigned to one instructor.
    async fn list_instances_for_instructor(
        &self,
        instructor_id: InstructorId,
    ) -> RepositoryResult<Vec<ClassInstance>>;

    /// Set the lifecycle status of an instance.
    async fn set_instance_status(
        &self,
        instance_id: &InstanceId,
        status: InstanceStatus,
    ) -> RepositoryResult<()>;
}

/// Booking storage.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Conditionally insert a booking, re-checking capacity and per-user
    /// uniqueness inside the same atomic unit of work.
    ///
    /// This is the storage-level guarantee that closes the check-then-act gap:
    /// the advisory availability computed before this call may be stale, but
    /// the count taken here cannot be.
    ///
    /// # Arguments
    /// * `booking` - The booking to insert (status must be confirmed)
    /// * `capacity` - The instance capacity to enforce
    ///
    /// # Returns
    /// * `Ok(BookingAdmission)` - Admitted, Full, or Duplicate
    /// * `Err(RepositoryError::NotFound)` - If the instance doesn't exist
    async fn insert_booking_guarded(
        &self,
        booking: &Booking,
        capacity: u32,
    ) -> RepositoryResult<BookingAdmission>;

    /// Retrieve a booking by id.
    async fn get_booking(&self, booking_id: BookingId) -> RepositoryResult<Booking>;

    /// All bookings referencing one instance (any status).
    async fn bookings_for_instance(
        &self,
        instance_id: &InstanceId,
    ) -> RepositoryResult<Vec<Booking>>;

    /// All bookings held by one user (any status).
    async fn bookings_for_user(&self, user_id: &UserId) -> RepositoryResult<Vec<Booking>>;

    /// Cancel a confirmed booking.
    ///
    /// Cancellation is the only event that frees a seat; callers must follow
    /// up with [`WaitlistRepository::promote_waitlist`] for the freed seat.
    ///
    /// # Returns
    /// * `Ok(Booking)` - The booking with status set to cancelled
    /// * `Err(RepositoryError::Conflict)` - If it was already cancelled
    async fn cancel_booking(&self, booking_id: BookingId) -> RepositoryResult<Booking>;
}

/// Waitlist storage and promotion.
#[async_trait]
pub trait WaitlistRepository: Send + Sync {
    /// Store a new waitlist entry.
    async fn add_waitlist_entry(&self, entry: &WaitlistEntry) -> RepositoryResult<()>;

    /// All waitlist entries for one instance (any status).
    async fn waitlist_for_instance(
        &self,
        instance_id: &InstanceId,
    ) -> RepositoryResult<Vec<WaitlistEntry>>;

    /// Number of active entries for one instance.
    async fn active_waitlist_count(&self, instance_id: &InstanceId) -> RepositoryResult<u32>;

    /// Cancel an active waitlist entry.
    async fn cancel_waitlist_entry(
        &self,
        entry_id: WaitlistEntryId,
    ) -> RepositoryResult<WaitlistEntry>;

    /// Promote waitlisted users for freed seats, in strict `created_at`
    /// order, atomically with respect to booking admission for the same
    /// instance.
    ///
    /// Implementations must re-derive live availability inside the unit of
    /// work and promote at most `min(freed_seats, live available seats)`
    /// users, so a seat admitted between the cancellation and this call is
    /// never double-filled.
    ///
    /// # Returns
    /// * `Ok(Vec<Promotion>)` - Applied promotions (entries updated; auto-book
    ///   bookings inserted)
    async fn promote_waitlist(
        &self,
        instance_id: &InstanceId,
        freed_seats: u32,
        policy: &WaitlistPolicy,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Promotion>>;

    /// Transition promoted-but-unconfirmed entries whose confirmation window
    /// has lapsed to `expired`.
    ///
    /// # Returns
    /// * `Ok(Vec<WaitlistEntry>)` - The entries that were expired
    async fn expire_lapsed_promotions(
        &self,
        instance_id: &InstanceId,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Vec<WaitlistEntry>>;
}

/// Complete persistence port for the scheduling core.
#[async_trait]
pub trait FullRepository:
    TemplateRepository + InstanceRepository + BookingRepository + WaitlistRepository
{
    /// Check if the storage backend is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is reachable
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;
}
