//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

use studio_core::api::{InstanceId, InstructorId, StudioId, TemplateId};
use studio_core::db::LocalRepository;
use studio_core::models::instance::{ClassInstance, InstanceStatus};
use studio_core::models::template::{ClassTemplate, RecurrencePattern, TemplateProposal};

pub fn repo() -> LocalRepository {
    LocalRepository::new()
}

/// A fixed "now" well before any fixture class starts.
pub fn early_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 6, 0, 0).unwrap()
}

pub fn class_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 18, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn template(name: &str, capacity: u32, price: f64) -> ClassTemplate {
    ClassTemplate {
        id: None,
        name: name.to_string(),
        description: String::new(),
        category: "yoga".to_string(),
        level: "all".to_string(),
        duration_minutes: 60,
        capacity,
        price,
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

pub fn proposal(name: &str) -> TemplateProposal {
    TemplateProposal {
        name: name.to_string(),
        description: String::new(),
        category: "yoga".to_string(),
        level: "all".to_string(),
        duration_minutes: 60,
        capacity: 20,
        price: 18.0,
        start_time: NaiveTime::from_hms_opt(18, 0, 0),
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

/// A standalone instance fixture, for tests that bypass expansion.
pub fn instance(id: &str, capacity: u32, price: f64) -> ClassInstance {
    ClassInstance {
        id: InstanceId::new(id),
        template_id: TemplateId::new(1),
        name: "Evening Flow".to_string(),
        category: "yoga".to_string(),
        level: "all".to_string(),
        start_time: class_start(),
        end_time: class_start() + chrono::Duration::minutes(60),
        instructor_id: Some(InstructorId::new(5)),
        instructor_name: Some("Sam".to_string()),
        capacity,
        price,
        member_plus_only: false,
        x_pass_eligible: false,
        tags: vec!["restorative".to_string()],
        status: InstanceStatus::Scheduled,
    }
}
