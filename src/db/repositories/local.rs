//! In-memory local repository implementation.
//!
//! Stores all data in HashMaps behind a single `RwLock`, providing fast,
//! deterministic, and isolated execution for unit tests and local
//! development. The coarse write lock doubles as the serialization mechanism
//! the port contract requires: booking admission and waitlist promotion each
//! run entirely inside one write-lock scope, so the capacity check and the
//! insert can never interleave with another admission for the same instance.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::{
    BookingId, InstanceId, InstructorId, TemplateId, UserId, WaitlistEntryId,
};
use crate::db::error::{ErrorContext, RepositoryError, RepositoryResult};
use crate::db::repository::{
    BookingAdmission, BookingRepository, FullRepository, InstanceRepository, TemplateRepository,
    WaitlistRepository,
};
use crate::models::booking::{Booking, BookingStatus, WaitlistEntry, WaitlistStatus};
use crate::models::instance::{ClassInstance, InstanceStatus};
use crate::models::template::ClassTemplate;
use crate::models::time::TimeRange;
use crate::scheduling::waitlist::{self, Promotion, WaitlistPolicy};

/// In-memory local repository.
///
/// # Example
/// ```ignore
/// let repo = LocalRepository::new();
/// let stored = repo.store_template(&template).await?;
/// assert!(stored.id.is_some());
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    templates: HashMap<TemplateId, ClassTemplate>,
    instances: HashMap<InstanceId, ClassInstance>,
    bookings: HashMap<BookingId, Booking>,
    waitlist: HashMap<WaitlistEntryId, WaitlistEntry>,

    // ID counter
    next_template_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            templates: HashMap::new(),
            instances: HashMap::new(),
            bookings: HashMap::new(),
            waitlist: HashMap::new(),
            next_template_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn confirmed_count(&self, instance_id: &InstanceId) -> u32 {
        self.bookings
            .values()
            .filter(|b| &b.instance_id == instance_id && b.is_confirmed())
            .count() as u32
    }

    fn instance(&self, instance_id: &InstanceId) -> RepositoryResult<&ClassInstance> {
        self.instances.get(instance_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Instance {} not found", instance_id),
                ErrorContext::default()
                    .with_entity("instance")
                    .with_entity_id(instance_id),
            )
        })
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let healthy = data.is_healthy;
        *data = LocalData {
            is_healthy: healthy,
            ..Default::default()
        };
    }

    /// Number of templates stored.
    pub fn template_count(&self) -> usize {
        self.data.read().templates.len()
    }

    /// Number of instances stored.
    pub fn instance_count(&self) -> usize {
        self.data.read().instances.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Repository is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateRepository for LocalRepository {
    async fn store_template(&self, template: &ClassTemplate) -> RepositoryResult<ClassTemplate> {
        self.check_health()?;

        let mut data = self.data.write();
        let id = TemplateId::new(data.next_template_id);
        data.next_template_id += 1;

        let mut stored = template.clone();
        stored.id = Some(id);
        data.templates.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_template(&self, template_id: TemplateId) -> RepositoryResult<ClassTemplate> {
        self.check_health()?;

        self.data
            .read()
            .templates
            .get(&template_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Template {} not found", template_id),
                    ErrorContext::default()
                        .with_entity("template")
                        .with_entity_id(template_id),
                )
            })
    }

    async fn list_templates(&self) -> RepositoryResult<Vec<ClassTemplate>> {
        self.check_health()?;

        let data = self.data.read();
        let mut templates: Vec<ClassTemplate> = data.templates.values().cloned().collect();
        templates.sort_by_key(|t| t.id);
        Ok(templates)
    }

    async fn update_template(&self, template: &ClassTemplate) -> RepositoryResult<()> {
        self.check_health()?;

        let id = template.id.ok_or_else(|| {
            RepositoryError::validation("Cannot update a template without an id")
        })?;

        let mut data = self.data.write();
        if !data.templates.contains_key(&id) {
            return Err(RepositoryError::not_found(format!(
                "Template {} not found",
                id
            )));
        }
        data.templates.insert(id, template.clone());
        Ok(())
    }

    async fn delete_template(&self, template_id: TemplateId) -> RepositoryResult<()> {
        self.check_health()?;

        let mut data = self.data.write();
        if data.templates.remove(&template_id).is_none() {
            return Err(RepositoryError::not_found(format!(
                "Template {} not found",
                template_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl InstanceRepository for LocalRepository {
    async fn upsert_instances(&self, instances: &[ClassInstance]) -> RepositoryResult<usize> {
        self.check_health()?;

        let mut data = self.data.write();
        for instance in instances {
            data.instances.insert(instance.id.clone(), instance.clone());
        }
        Ok(instances.len())
    }

    async fn get_instance(&self, instance_id: &InstanceId) -> RepositoryResult<ClassInstance> {
        self.check_health()?;
        self.data.read().instance(instance_id).cloned()
    }

    async fn list_instances(
        &self,
        range: Option<TimeRange>,
    ) -> RepositoryResult<Vec<ClassInstance>> {
        self.check_health()?;

        let data = self.data.read();
        let mut instances: Vec<ClassInstance> = data
            .instances
            .values()
            .filter(|i| range.as_ref().is_none_or(|r| r.contains(i.start_time)))
            .cloned()
            .collect();
        instances.sort_by_key(|i| i.start_time);
        Ok(instances)
    }

    async fn list_instances_for_template(
        &self,
        template_id: TemplateId,
    ) -> RepositoryResult<Vec<ClassInstance>> {
        self.check_health()?;

        let data = self.data.read();
        let mut instances: Vec<ClassInstance> = data
            .instances
            .values()
            .filter(|i| i.template_id == template_id)
            .cloned()
            .collect();
        instances.sort_by_key(|i| i.start_time);
        Ok(instances)
    }

    async fn list_instances_for_instructor(
        &self,
        instructor_id: InstructorId,
    ) -> RepositoryResult<Vec<ClassInstance>> {
        self.check_health()?;

        let data = self.data.read();
        let mut instances: Vec<ClassInstance> = data
            .instances
            .values()
            .filter(|i| i.instructor_id == Some(instructor_id))
            .cloned()
            .collect();
        instances.sort_by_key(|i| i.start_time);
        Ok(instances)
    }

    async fn set_instance_status(
        &self,
        instance_id: &InstanceId,
        status: InstanceStatus,
    ) -> RepositoryResult<()> {
        self.check_health()?;

        let mut data = self.data.write();
        match data.instances.get_mut(instance_id) {
            Some(instance) => {
                instance.status = status;
                Ok(())
            }
            None => Err(RepositoryError::not_found(format!(
                "Instance {} not found",
                instance_id
            ))),
        }
    }
}

#[async_trait]
impl BookingRepository for LocalRepository {
    async fn insert_booking_guarded(
        &self,
        booking: &Booking,
        capacity: u32,
    ) -> RepositoryResult<BookingAdmission> {
        self.check_health()?;

        // Single write-lock scope: the count, the uniqueness check and the
        // insert cannot interleave with another admission.
        let mut data = self.data.write();
        data.instance(&booking.instance_id)?;

        let duplicate = data.bookings.values().any(|b| {
            b.instance_id == booking.instance_id
                && b.user_id == booking.user_id
                && b.is_confirmed()
        });
        if duplicate {
            return Ok(BookingAdmission::Duplicate);
        }

        if data.confirmed_count(&booking.instance_id) >= capacity {
            return Ok(BookingAdmission::Full);
        }

        data.bookings.insert(booking.id, booking.clone());
        Ok(BookingAdmission::Admitted(booking.clone()))
    }

    async fn get_booking(&self, booking_id: BookingId) -> RepositoryResult<Booking> {
        self.check_health()?;

        self.data
            .read()
            .bookings
            .get(&booking_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(format!("Booking {} not found", booking_id))
            })
    }

    async fn bookings_for_instance(
        &self,
        instance_id: &InstanceId,
    ) -> RepositoryResult<Vec<Booking>> {
        self.check_health()?;

        let data = self.data.read();
        let mut bookings: Vec<Booking> = data
            .bookings
            .values()
            .filter(|b| &b.instance_id == instance_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.created_at);
        Ok(bookings)
    }

    async fn bookings_for_user(&self, user_id: &UserId) -> RepositoryResult<Vec<Booking>> {
        self.check_health()?;

        let data = self.data.read();
        let mut bookings: Vec<Booking> = data
            .bookings
            .values()
            .filter(|b| &b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.created_at);
        Ok(bookings)
    }

    async fn cancel_booking(&self, booking_id: BookingId) -> RepositoryResult<Booking> {
        self.check_health()?;

        let mut data = self.data.write();
        let booking = data.bookings.get_mut(&booking_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Booking {} not found", booking_id))
        })?;

        if booking.status == BookingStatus::Cancelled {
            return Err(RepositoryError::conflict_with_context(
                format!("Booking {} is already cancelled", booking_id),
                ErrorContext::new("cancel_booking")
                    .with_entity("booking")
                    .with_entity_id(booking_id),
            ));
        }

        booking.status = BookingStatus::Cancelled;
        Ok(booking.clone())
    }
}

#[async_trait]
impl WaitlistRepository for LocalRepository {
    async fn add_waitlist_entry(&self, entry: &WaitlistEntry) -> RepositoryResult<()> {
        self.check_health()?;

        let mut data = self.data.write();
        data.instance(&entry.instance_id)?;
        data.waitlist.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn waitlist_for_instance(
        &self,
        instance_id: &InstanceId,
    ) -> RepositoryResult<Vec<WaitlistEntry>> {
        self.check_health()?;

        let data = self.data.read();
        let mut entries: Vec<WaitlistEntry> = data
            .waitlist
            .values()
            .filter(|w| &w.instance_id == instance_id)
            .cloned()
            .collect();
        entries.sort_by_key(|w| w.created_at);
        Ok(entries)
    }

    async fn active_waitlist_count(&self, instance_id: &InstanceId) -> RepositoryResult<u32> {
        self.check_health()?;

        let data = self.data.read();
        Ok(data
            .waitlist
            .values()
            .filter(|w| &w.instance_id == instance_id && w.is_active())
            .count() as u32)
    }

    async fn cancel_waitlist_entry(
        &self,
        entry_id: WaitlistEntryId,
    ) -> RepositoryResult<WaitlistEntry> {
        self.check_health()?;

        let mut data = self.data.write();
        let entry = data.waitlist.get_mut(&entry_id).ok_or_else(|| {
            RepositoryError::not_found(format!("Waitlist entry {} not found", entry_id))
        })?;

        if entry.status != WaitlistStatus::Active {
            return Err(RepositoryError::conflict(format!(
                "Waitlist entry {} is not active",
                entry_id
            )));
        }

        entry.status = WaitlistStatus::Cancelled;
        Ok(entry.clone())
    }

    async fn promote_waitlist(
        &self,
        instance_id: &InstanceId,
        freed_seats: u32,
        policy: &WaitlistPolicy,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Promotion>> {
        self.check_health()?;

        // Selection, entry transitions and auto-book inserts all happen
        // inside one write-lock scope, serialized against admissions.
        let mut data = self.data.write();
        let instance = data.instance(instance_id)?.clone();

        // Re-derive live availability: a booking admitted after the
        // cancellation may have taken the freed seat already.
        let live_available = instance
            .capacity
            .saturating_sub(data.confirmed_count(instance_id));
        let spots = freed_seats.min(live_available);

        let entries: Vec<WaitlistEntry> = data
            .waitlist
            .values()
            .filter(|w| &w.instance_id == instance_id)
            .cloned()
            .collect();

        let promotions = waitlist::promote_from_waitlist(&instance, &entries, spots, policy, now);

        for promotion in &promotions {
            data.waitlist
                .insert(promotion.entry.id, promotion.entry.clone());
            if let Some(booking) = &promotion.booking {
                data.bookings.insert(booking.id, booking.clone());
            }
        }

        Ok(promotions)
    }

    async fn expire_lapsed_promotions(
        &self,
        instance_id: &InstanceId,
        now: DateTime<Utc>,
    ) -> RepositoryResult<Vec<WaitlistEntry>> {
        self.check_health()?;

        let mut data = self.data.write();
        let entries: Vec<WaitlistEntry> = data
            .waitlist
            .values()
            .filter(|w| &w.instance_id == instance_id)
            .cloned()
            .collect();

        let mut expired = Vec::new();
        for id in waitlist::lapsed_promotions(&entries, now) {
            if let Some(entry) = data.waitlist.get_mut(&id) {
                entry.status = WaitlistStatus::Expired;
                expired.push(entry.clone());
            }
        }
        Ok(expired)
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StudioId;
    use crate::models::booking::{BookingType, NotificationPreferences, PaymentStatus};
    use crate::models::template::RecurrencePattern;
    use chrono::{NaiveTime, TimeZone};

    fn template() -> ClassTemplate {
        ClassTemplate {
            id: None,
            name: "Boxfit".to_string(),
            description: String::new(),
            category: "boxing".to_string(),
            level: "all".to_string(),
            duration_minutes: 60,
            capacity: 2,
            price: 19.0,
            start_time_of_day: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            schedule_days: vec![],
            recurrence: RecurrencePattern::Weekly,
            default_instructor_id: None,
            default_instructor_name: None,
            studio_id: StudioId::new(1),
            member_plus_only: false,
            x_pass_eligible: false,
            tags: vec![],
            requirements: None,
        }
    }

    fn instance(id: &str, capacity: u32) -> ClassInstance {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 18, 0, 0).unwrap();
        ClassInstance {
            id: InstanceId::new(id),
            template_id: TemplateId::new(1),
            name: "Boxfit".to_string(),
            category: "boxing".to_string(),
            level: "all".to_string(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(60),
            instructor_id: None,
            instructor_name: None,
            capacity,
            price: 19.0,
            member_plus_only: false,
            x_pass_eligible: false,
            tags: vec![],
            status: InstanceStatus::Scheduled,
        }
    }

    fn booking(instance_id: &str, user: &str) -> Booking {
        let start = Utc.with_ymd_and_hms(2024, 5, 6, 18, 0, 0).unwrap();
        Booking {
            id: BookingId::generate(),
            instance_id: InstanceId::new(instance_id),
            template_id: TemplateId::new(1),
            user_id: UserId::new(user),
            start_time: start,
            end_time: start + chrono::Duration::minutes(60),
            price: 19.0,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Pending,
            booking_type: BookingType::DropIn,
            created_at: Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_store_template_assigns_sequential_ids() {
        let repo = LocalRepository::new();
        let first = repo.store_template(&template()).await.unwrap();
        let second = repo.store_template(&template()).await.unwrap();
        assert_eq!(first.id, Some(TemplateId::new(1)));
        assert_eq!(second.id, Some(TemplateId::new(2)));
        assert_eq!(repo.template_count(), 2);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_by_id() {
        let repo = LocalRepository::new();
        let batch = vec![instance("a", 2), instance("b", 2)];
        repo.upsert_instances(&batch).await.unwrap();
        repo.upsert_instances(&batch).await.unwrap();
        assert_eq!(repo.instance_count(), 2);
    }

    #[tokio::test]
    async fn test_guarded_insert_enforces_capacity() {
        let repo = LocalRepository::new();
        repo.upsert_instances(&[instance("a", 1)]).await.unwrap();

        let first = repo
            .insert_booking_guarded(&booking("a", "u1"), 1)
            .await
            .unwrap();
        assert!(matches!(first, BookingAdmission::Admitted(_)));

        let second = repo
            .insert_booking_guarded(&booking("a", "u2"), 1)
            .await
            .unwrap();
        assert_eq!(second, BookingAdmission::Full);
    }

    #[tokio::test]
    async fn test_guarded_insert_rejects_duplicate_user() {
        let repo = LocalRepository::new();
        repo.upsert_instances(&[instance("a", 5)]).await.unwrap();

        repo.insert_booking_guarded(&booking("a", "u1"), 5)
            .await
            .unwrap();
        let again = repo
            .insert_booking_guarded(&booking("a", "u1"), 5)
            .await
            .unwrap();
        assert_eq!(again, BookingAdmission::Duplicate);
    }

    #[tokio::test]
    async fn test_guarded_insert_missing_instance_is_not_found() {
        let repo = LocalRepository::new();
        let result = repo.insert_booking_guarded(&booking("ghost", "u1"), 1).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_cancel_booking_twice_conflicts() {
        let repo = LocalRepository::new();
        repo.upsert_instances(&[instance("a", 1)]).await.unwrap();
        let b = booking("a", "u1");
        repo.insert_booking_guarded(&b, 1).await.unwrap();

        let cancelled = repo.cancel_booking(b.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let again = repo.cancel_booking(b.id).await;
        assert!(matches!(again, Err(RepositoryError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_promotion_clamped_to_live_availability() {
        let repo = LocalRepository::new();
        repo.upsert_instances(&[instance("a", 1)]).await.unwrap();
        // Seat already taken: a freed seat reported by a stale caller must
        // not promote anybody.
        repo.insert_booking_guarded(&booking("a", "u1"), 1)
            .await
            .unwrap();

        let entry = waitlist::enroll(
            InstanceId::new("a"),
            UserId::new("w1"),
            true,
            NotificationPreferences::default(),
            0,
            Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap(),
        );
        repo.add_waitlist_entry(&entry).await.unwrap();

        let promotions = repo
            .promote_waitlist(
                &InstanceId::new("a"),
                1,
                &WaitlistPolicy::default(),
                Utc.with_ymd_and_hms(2024, 5, 6, 11, 0, 0).unwrap(),
            )
            .await
            .unwrap();
        assert!(promotions.is_empty());
    }

    #[tokio::test]
    async fn test_unhealthy_repository_refuses_operations() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        let result = repo.list_templates().await;
        assert!(matches!(result, Err(RepositoryError::ConnectionError { .. })));
        assert!(!repo.health_check().await.unwrap());
    }
}
