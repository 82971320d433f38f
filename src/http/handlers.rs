//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to one endpoint and delegates to the service
//! layer for business logic; no scheduling decisions are made here.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::dto::{
    CancellationResponse, ClassListResponse, CreateBookingRequest, CreateTemplateRequest,
    DeleteTemplateQuery, ExpandRequest, ExpandResponse, HealthResponse, JoinWaitlistRequest,
    SearchQuery, TemplateCreatedResponse, TemplateListResponse,
};
use super::error::{rejection_response, AppError};
use super::state::AppState;
use crate::api::{BookingId, InstanceId, TemplateId, UserId, WaitlistEntryId};
use crate::services::{booking_service, schedule_service};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is
/// reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Templates
// =============================================================================

/// POST /v1/templates
///
/// Validate and create a class template. Blocking validation errors return
/// 422 with the full error list; warnings ride along in the 201 body.
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<Response, AppError> {
    let proposal = request.into_proposal().map_err(AppError::BadRequest)?;

    let outcome = schedule_service::create_template(
        state.repository.as_ref(),
        proposal,
        state.config.scheduling.validation_lookahead_days,
        Utc::now().date_naive(),
    )
    .await?;

    match outcome {
        schedule_service::TemplateOutcome::Created { template, warnings } => Ok((
            StatusCode::CREATED,
            Json(TemplateCreatedResponse { template, warnings }),
        )
            .into_response()),
        schedule_service::TemplateOutcome::Invalid(validation) => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(validation)).into_response())
        }
    }
}

/// GET /v1/templates
pub async fn list_templates(State(state): State<AppState>) -> HandlerResult<TemplateListResponse> {
    let templates = state.repository.list_templates().await?;
    let total = templates.len();
    Ok(Json(TemplateListResponse { templates, total }))
}

/// GET /v1/templates/{template_id}
pub async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<i64>,
) -> HandlerResult<crate::models::template::ClassTemplate> {
    let template = state
        .repository
        .get_template(TemplateId::new(template_id))
        .await?;
    Ok(Json(template))
}

/// DELETE /v1/templates/{template_id}?cascade=bool
///
/// Refused with 409 while future instances reference the template, unless
/// `cascade` is set, which cancels them first.
pub async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<i64>,
    Query(query): Query<DeleteTemplateQuery>,
) -> HandlerResult<schedule_service::TemplateDeletion> {
    let deletion = schedule_service::delete_template(
        state.repository.as_ref(),
        TemplateId::new(template_id),
        query.cascade,
        Utc::now(),
    )
    .await?;
    Ok(Json(deletion))
}

/// POST /v1/templates/{template_id}/expand
///
/// Expand the template over a date window and upsert the generated
/// instances. Idempotent over overlapping windows.
pub async fn expand_template(
    State(state): State<AppState>,
    Path(template_id): Path<i64>,
    Json(request): Json<ExpandRequest>,
) -> HandlerResult<ExpandResponse> {
    let instances = schedule_service::expand_template(
        state.repository.as_ref(),
        TemplateId::new(template_id),
        request.start_date,
        request.end_date,
    )
    .await?;
    let total = instances.len();
    Ok(Json(ExpandResponse { instances, total }))
}

// =============================================================================
// Classes (instances)
// =============================================================================

/// GET /v1/classes
///
/// Search scheduled classes with live availability.
pub async fn search_classes(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> HandlerResult<ClassListResponse> {
    let (filters, sort) = query.into_filters().map_err(AppError::BadRequest)?;
    let classes =
        schedule_service::search_classes(state.repository.as_ref(), &filters, sort).await?;
    let total = classes.len();
    Ok(Json(ClassListResponse { classes, total }))
}

/// GET /v1/classes/{instance_id}/availability
pub async fn get_availability(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
) -> HandlerResult<crate::models::instance::ClassAvailability> {
    let view = booking_service::class_availability(
        state.repository.as_ref(),
        &InstanceId::new(instance_id),
    )
    .await?;
    Ok(Json(view))
}

/// POST /v1/classes/{instance_id}/cancel
///
/// Staff operation: mark the instance cancelled. Downstream booking refunds
/// and notifications are owned by the cancellation flow, not this core.
pub async fn cancel_instance(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
) -> Result<StatusCode, AppError> {
    schedule_service::cancel_instance(state.repository.as_ref(), &InstanceId::new(instance_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Bookings
// =============================================================================

/// POST /v1/bookings
///
/// Attempt to book a seat. Typed rejections return 409 with the rejection
/// code; CLASS_FULL carries an explicit waitlist suggestion.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Response, AppError> {
    let outcome = booking_service::book_class(
        state.repository.as_ref(),
        state.notifier.as_ref(),
        booking_service::BookingRequest {
            instance_id: InstanceId::new(request.instance_id),
            user_id: UserId::new(request.user_id),
            membership: request.membership,
        },
        Utc::now(),
    )
    .await?;

    match outcome {
        booking_service::BookingOutcome::Confirmed(booking) => {
            Ok((StatusCode::CREATED, Json(booking)).into_response())
        }
        booking_service::BookingOutcome::Rejected(rejection) => {
            Ok(rejection_response(&rejection))
        }
    }
}

/// DELETE /v1/bookings/{booking_id}
///
/// Cancel a booking; the freed seat immediately triggers waitlist promotion.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<uuid::Uuid>,
) -> HandlerResult<CancellationResponse> {
    let outcome = booking_service::cancel_booking(
        state.repository.as_ref(),
        state.notifier.as_ref(),
        BookingId(booking_id),
        &state.config.waitlist_policy(),
        Utc::now(),
    )
    .await?;

    Ok(Json(CancellationResponse {
        booking: outcome.booking,
        promotions: outcome.promotions,
    }))
}

// =============================================================================
// Waitlist
// =============================================================================

/// POST /v1/classes/{instance_id}/waitlist
pub async fn join_waitlist(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Json(request): Json<JoinWaitlistRequest>,
) -> Result<Response, AppError> {
    let entry = booking_service::join_waitlist(
        state.repository.as_ref(),
        state.notifier.as_ref(),
        booking_service::WaitlistRequest {
            instance_id: InstanceId::new(instance_id),
            user_id: UserId::new(request.user_id),
            auto_book: request.auto_book,
            notify: request.notify,
        },
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(entry)).into_response())
}

/// DELETE /v1/waitlist/{entry_id}
pub async fn leave_waitlist(
    State(state): State<AppState>,
    Path(entry_id): Path<uuid::Uuid>,
) -> HandlerResult<crate::models::booking::WaitlistEntry> {
    let entry =
        booking_service::leave_waitlist(state.repository.as_ref(), WaitlistEntryId(entry_id))
            .await?;
    Ok(Json(entry))
}
