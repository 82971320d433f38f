//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies and query structs for the REST surface. Domain types
//! (instances, bookings, waitlist entries) already derive
//! Serialize/Deserialize and are re-exported directly.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::api::{InstructorId, StudioId};
use crate::models::booking::NotificationPreferences;
use crate::models::instance::ClassAvailability;
use crate::models::template::{
    ClassTemplate, Membership, RecurrencePattern, TemplateProposal,
};
use crate::scheduling::search::{ClassFilters, SortKey};
use crate::scheduling::waitlist::Promotion;

pub use crate::models::booking::Booking;
pub use crate::models::instance::ClassInstance;
pub use crate::models::booking::WaitlistEntry;

/// Request body for creating a class template.
///
/// `start_time` and `schedule_days` arrive as strings; a missing or
/// unparseable start time becomes a validation error (not a transport
/// failure), while an unknown weekday is malformed input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub level: String,
    pub duration_minutes: i64,
    pub capacity: u32,
    pub price: f64,
    /// "HH:MM" or "HH:MM:SS"
    #[serde(default)]
    pub start_time: Option<String>,
    /// Weekday names ("mon", "tuesday", ...)
    #[serde(default)]
    pub schedule_days: Vec<String>,
    pub recurrence: RecurrencePattern,
    #[serde(default)]
    pub default_instructor_id: Option<i64>,
    #[serde(default)]
    pub default_instructor_name: Option<String>,
    pub studio_id: i64,
    #[serde(default)]
    pub member_plus_only: bool,
    #[serde(default)]
    pub x_pass_eligible: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub requirements: Option<String>,
}

impl CreateTemplateRequest {
    /// Convert into a domain proposal.
    ///
    /// # Errors
    /// Returns a message when `schedule_days` contains an unknown weekday.
    pub fn into_proposal(self) -> Result<TemplateProposal, String> {
        let start_time = self.start_time.as_deref().and_then(parse_time_of_day);

        let mut schedule_days: Vec<Weekday> = Vec::with_capacity(self.schedule_days.len());
        for day in &self.schedule_days {
            let parsed = day
                .parse::<Weekday>()
                .map_err(|_| format!("Unknown weekday: {}", day))?;
            schedule_days.push(parsed);
        }

        Ok(TemplateProposal {
            name: self.name,
            description: self.description,
            category: self.category,
            level: self.level,
            duration_minutes: self.duration_minutes,
            capacity: self.capacity,
            price: self.price,
            start_time,
            schedule_days,
            recurrence: self.recurrence,
            default_instructor_id: self.default_instructor_id.map(InstructorId::new),
            default_instructor_name: self.default_instructor_name,
            studio_id: StudioId::new(self.studio_id),
            member_plus_only: self.member_plus_only,
            x_pass_eligible: self.x_pass_eligible,
            tags: self.tags,
            requirements: self.requirements,
        })
    }
}

fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Response for template creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCreatedResponse {
    pub template: ClassTemplate,
    /// Advisory notices for studio staff; never blocking.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Template list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateListResponse {
    pub templates: Vec<ClassTemplate>,
    pub total: usize,
}

/// Query parameters for template deletion.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DeleteTemplateQuery {
    /// Cancel future instances instead of refusing the deletion.
    #[serde(default)]
    pub cascade: bool,
}

/// Request body for template expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Response for template expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpandResponse {
    pub instances: Vec<ClassInstance>,
    pub total: usize,
}

/// Query parameters for class search.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub instructor_id: Option<i64>,
    #[serde(default)]
    pub available_only: Option<bool>,
    /// "morning" | "afternoon" | "evening"
    #[serde(default)]
    pub time_of_day: Option<String>,
    /// Comma-separated tag list, any-match.
    #[serde(default)]
    pub tags: Option<String>,
    /// "date" | "popularity" | "availability" | "price"
    #[serde(default)]
    pub sort: Option<String>,
}

impl SearchQuery {
    /// Convert into the core filter set and sort key.
    ///
    /// # Errors
    /// Returns a message for unknown time-of-day buckets or sort keys.
    pub fn into_filters(self) -> Result<(ClassFilters, SortKey), String> {
        let time_of_day = self
            .time_of_day
            .as_deref()
            .map(str::parse)
            .transpose()?;
        let sort = self
            .sort
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();

        let tags = self
            .tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok((
            ClassFilters {
                date_from: self.date_from,
                date_to: self.date_to,
                category: self.category,
                level: self.level,
                instructor_id: self.instructor_id.map(InstructorId::new),
                available_only: self.available_only.unwrap_or(false),
                time_of_day,
                tags,
            },
            sort,
        ))
    }
}

/// Class search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassListResponse {
    pub classes: Vec<ClassAvailability>,
    pub total: usize,
}

/// Request body for creating a booking.
///
/// The membership snapshot is supplied by the caller, which obtained it from
/// the identity/membership provider; this core treats it as read-only input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub instance_id: String,
    pub user_id: String,
    pub membership: Membership,
}

/// Response for a booking cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationResponse {
    pub booking: Booking,
    /// Waitlist promotions triggered by the freed seat.
    pub promotions: Vec<Promotion>,
}

/// Request body for joining a waitlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinWaitlistRequest {
    pub user_id: String,
    #[serde(default)]
    pub auto_book: bool,
    #[serde(default)]
    pub notify: NotificationPreferences,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_accepts_both_formats() {
        assert_eq!(
            parse_time_of_day("09:00"),
            NaiveTime::from_hms_opt(9, 0, 0)
        );
        assert_eq!(
            parse_time_of_day("18:30:00"),
            NaiveTime::from_hms_opt(18, 30, 0)
        );
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("soon"), None);
    }

    #[test]
    fn test_search_query_tags_split() {
        let query = SearchQuery {
            tags: Some("cardio, strength,,".to_string()),
            ..Default::default()
        };
        let (filters, _) = query.into_filters().unwrap();
        assert_eq!(filters.tags, vec!["cardio", "strength"]);
    }

    #[test]
    fn test_search_query_rejects_unknown_sort() {
        let query = SearchQuery {
            sort: Some("rating".to_string()),
            ..Default::default()
        };
        assert!(query.into_filters().is_err());
    }

    #[test]
    fn test_template_request_rejects_unknown_weekday() {
        let request = CreateTemplateRequest {
            name: "X".to_string(),
            description: String::new(),
            category: "yoga".to_string(),
            level: "all".to_string(),
            duration_minutes: 60,
            capacity: 10,
            price: 10.0,
            start_time: Some("09:00".to_string()),
            schedule_days: vec!["funday".to_string()],
            recurrence: RecurrencePattern::Daily,
            default_instructor_id: None,
            default_instructor_name: None,
            studio_id: 1,
            member_plus_only: false,
            x_pass_eligible: false,
            tags: vec![],
            requirements: None,
        };
        assert!(request.into_proposal().is_err());
    }

    #[test]
    fn test_template_request_bad_time_becomes_none() {
        let request = CreateTemplateRequest {
            name: "X".to_string(),
            description: String::new(),
            category: "yoga".to_string(),
            level: "all".to_string(),
            duration_minutes: 60,
            capacity: 10,
            price: 10.0,
            start_time: Some("not-a-time".to_string()),
            schedule_days: vec!["mon".to_string()],
            recurrence: RecurrencePattern::Daily,
            default_instructor_id: None,
            default_instructor_name: None,
            studio_id: 1,
            member_plus_only: false,
            x_pass_eligible: false,
            tags: vec![],
            requirements: None,
        };
        let proposal = request.into_proposal().unwrap();
        assert!(proposal.start_time.is_none());
        assert_eq!(proposal.schedule_days, vec![Weekday::Mon]);
    }
}
