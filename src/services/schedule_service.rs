//! Template and instance orchestration: validation, expansion, search.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::api::{InstanceId, InstructorId, TemplateId};
use crate::db::error::{ErrorContext, RepositoryError, RepositoryResult};
use crate::db::repository::FullRepository;
use crate::models::instance::{ClassAvailability, ClassInstance, InstanceStatus};
use crate::models::template::{ClassTemplate, TemplateProposal};
use crate::scheduling::availability::availability_for;
use crate::scheduling::eligibility::{instructor_conflicts, InstructorAssignment};
use crate::scheduling::expansion::generate_instances;
use crate::scheduling::search::{search, ClassFilters, SortKey};
use crate::scheduling::validator::{validate_template, TemplateValidation};

/// Result of a template creation attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TemplateOutcome {
    /// Stored; warnings are advisory and did not block.
    Created {
        template: ClassTemplate,
        warnings: Vec<String>,
    },
    /// Rejected by the validator; nothing was stored.
    Invalid(TemplateValidation),
}

/// Result of deleting a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDeletion {
    pub template_id: TemplateId,
    /// Future instances cascade-cancelled as part of the deletion.
    pub cancelled_instances: usize,
}

/// Existing time claims for one instructor, built from their scheduled
/// instances.
pub async fn assignments_for_instructor<R: FullRepository + ?Sized>(
    repo: &R,
    instructor_id: InstructorId,
) -> RepositoryResult<Vec<InstructorAssignment>> {
    let instances = repo.list_instances_for_instructor(instructor_id).await?;
    Ok(instances
        .iter()
        .filter(|i| i.status == InstanceStatus::Scheduled)
        .map(|i| InstructorAssignment {
            instructor_id,
            class_name: i.name.clone(),
            range: i.time_range(),
        })
        .collect())
}

/// Validate a proposed template and store it when clean.
///
/// When the proposal names an instructor, its occurrences are projected over
/// `[today, today + lookahead_days]` and checked against the instructor's
/// existing scheduled instances; any overlap is a blocking error. Warnings
/// (capacity, duration) never prevent persistence and are returned alongside
/// the stored template.
pub async fn create_template<R: FullRepository + ?Sized>(
    repo: &R,
    proposal: TemplateProposal,
    lookahead_days: i64,
    today: NaiveDate,
) -> RepositoryResult<TemplateOutcome> {
    let conflicts = projected_conflicts(repo, &proposal, lookahead_days, today).await?;
    let validation = validate_template(&proposal, &conflicts);
    if !validation.is_valid {
        return Ok(TemplateOutcome::Invalid(validation));
    }

    let template = proposal.into_template().ok_or_else(|| {
        RepositoryError::internal("Validated proposal unexpectedly missing start time")
    })?;
    let stored = repo.store_template(&template).await?;

    info!(
        "Template {} '{}' created",
        stored.id.map(|id| id.value()).unwrap_or_default(),
        stored.name
    );
    Ok(TemplateOutcome::Created {
        template: stored,
        warnings: validation.warnings,
    })
}

/// Project a proposal's occurrences and collect instructor overlaps.
async fn projected_conflicts<R: FullRepository + ?Sized>(
    repo: &R,
    proposal: &TemplateProposal,
    lookahead_days: i64,
    today: NaiveDate,
) -> RepositoryResult<Vec<InstructorAssignment>> {
    let Some(instructor_id) = proposal.default_instructor_id else {
        return Ok(Vec::new());
    };
    let Some(candidate) = proposal.clone().into_template() else {
        // No start time; the validator reports that as its own error.
        return Ok(Vec::new());
    };

    let existing = assignments_for_instructor(repo, instructor_id).await?;
    if existing.is_empty() {
        return Ok(Vec::new());
    }

    let horizon = today + Duration::days(lookahead_days);
    // Placeholder id: only the projected time ranges matter here.
    let projected = generate_instances(TemplateId::new(0), &candidate, today, horizon);

    let mut conflicts = Vec::new();
    for instance in &projected {
        for conflict in instructor_conflicts(instructor_id, &instance.time_range(), &existing) {
            if !conflicts.contains(&conflict) {
                conflicts.push(conflict);
            }
        }
    }
    Ok(conflicts)
}

/// Expand a stored template over a date window and upsert the result.
///
/// Safe to repeat over overlapping windows: instance ids are deterministic
/// and the store upserts by id.
pub async fn expand_template<R: FullRepository + ?Sized>(
    repo: &R,
    template_id: TemplateId,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> RepositoryResult<Vec<ClassInstance>> {
    let template = repo.get_template(template_id).await?;
    let instances = generate_instances(template_id, &template, start_date, end_date);
    repo.upsert_instances(&instances).await?;

    info!(
        "Expanded template {} into {} instances ({} to {})",
        template_id,
        instances.len(),
        start_date,
        end_date
    );
    Ok(instances)
}

/// Search scheduled classes with live availability.
///
/// Cancelled instances never appear in search results.
pub async fn search_classes<R: FullRepository + ?Sized>(
    repo: &R,
    filters: &ClassFilters,
    sort: SortKey,
) -> RepositoryResult<Vec<ClassAvailability>> {
    let instances = repo.list_instances(None).await?;

    let mut views = Vec::with_capacity(instances.len());
    for instance in instances
        .iter()
        .filter(|i| i.status == InstanceStatus::Scheduled)
    {
        let bookings = repo.bookings_for_instance(&instance.id).await?;
        let waitlist = repo.waitlist_for_instance(&instance.id).await?;
        views.push(availability_for(instance, &bookings, &waitlist));
    }

    Ok(search(views, filters, sort))
}

/// Cancel a class instance (staff operation).
///
/// Separate from expansion by design; notifying or refunding affected
/// bookings is the cancellation flow's responsibility, not the core's.
pub async fn cancel_instance<R: FullRepository + ?Sized>(
    repo: &R,
    instance_id: &InstanceId,
) -> RepositoryResult<()> {
    repo.set_instance_status(instance_id, InstanceStatus::Cancelled)
        .await?;
    info!("Class instance {} cancelled", instance_id);
    Ok(())
}

/// Delete a template.
///
/// Refused with a conflict while future scheduled instances reference it,
/// unless `cascade` is set, in which case those instances are cancelled
/// first. Past instances are never touched.
pub async fn delete_template<R: FullRepository + ?Sized>(
    repo: &R,
    template_id: TemplateId,
    cascade: bool,
    now: DateTime<Utc>,
) -> RepositoryResult<TemplateDeletion> {
    let instances = repo.list_instances_for_template(template_id).await?;
    let future: Vec<&ClassInstance> = instances
        .iter()
        .filter(|i| i.status == InstanceStatus::Scheduled && i.start_time > now)
        .collect();

    if !future.is_empty() && !cascade {
        return Err(RepositoryError::conflict_with_context(
            format!(
                "Template {} still has {} future instances; pass cascade to cancel them",
                template_id,
                future.len()
            ),
            ErrorContext::new("delete_template")
                .with_entity("template")
                .with_entity_id(template_id),
        ));
    }

    let mut cancelled = 0;
    for instance in future {
        repo.set_instance_status(&instance.id, InstanceStatus::Cancelled)
            .await?;
        cancelled += 1;
    }

    repo.delete_template(template_id).await?;
    info!(
        "Template {} deleted ({} future instances cancelled)",
        template_id, cancelled
    );
    Ok(TemplateDeletion {
        template_id,
        cancelled_instances: cancelled,
    })
}
