//! Class templates and membership records.
//!
//! A [`ClassTemplate`] is the reusable definition of a recurring offering;
//! concrete bookable occurrences are generated from it by the template
//! expander. A [`Membership`] is read-only input supplied by the external
//! billing collaborator and drives pricing and eligibility.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::api::{InstructorId, StudioId, TemplateId};

/// How a template repeats inside an expansion window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePattern {
    /// Single occurrence at the window start date.
    None,
    /// One occurrence per calendar day (optionally restricted to weekdays in
    /// `schedule_days`).
    Daily,
    /// One occurrence every 7 days from the window start date.
    Weekly,
    /// One occurrence per month on the start date's day-of-month; months
    /// without that day emit nothing.
    Monthly,
}

/// Membership tier, as reported by the billing collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipType {
    None,
    DropIn,
    Unlimited,
    ClassPack,
    MemberPlus,
}

/// Read-only membership snapshot for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(rename = "type")]
    pub membership_type: MembershipType,
    /// Credits consumed this cycle (class packs).
    #[serde(default)]
    pub classes_used: u32,
    /// Credit allowance, if the tier is metered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classes_allowed: Option<u32>,
}

impl Membership {
    pub fn none() -> Self {
        Self {
            membership_type: MembershipType::None,
            classes_used: 0,
            classes_allowed: None,
        }
    }

    pub fn of_type(membership_type: MembershipType) -> Self {
        Self {
            membership_type,
            classes_used: 0,
            classes_allowed: None,
        }
    }
}

/// Reusable definition of a recurring class offering.
///
/// Capacity and price are copied onto instances at generation time; editing a
/// template affects only instances generated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTemplate {
    /// Assigned by the store; `None` until persisted.
    pub id: Option<TemplateId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub level: String,
    pub duration_minutes: i64,
    pub capacity: u32,
    pub price: f64,
    /// Local start time shared by every generated instance.
    pub start_time_of_day: NaiveTime,
    /// Weekday restriction, consulted only by daily recurrence. Empty means
    /// every day qualifies.
    #[serde(default)]
    pub schedule_days: Vec<Weekday>,
    pub recurrence: RecurrencePattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_instructor_id: Option<InstructorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_instructor_name: Option<String>,
    pub studio_id: StudioId,
    #[serde(default)]
    pub member_plus_only: bool,
    #[serde(default)]
    pub x_pass_eligible: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

/// A proposed template, as submitted by studio staff before validation.
///
/// `start_time` is `None` when the submitted value was missing or not a valid
/// time of day; the scheduling validator turns that into a blocking error
/// rather than a transport-level failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateProposal {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub level: String,
    pub duration_minutes: i64,
    pub capacity: u32,
    pub price: f64,
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub schedule_days: Vec<Weekday>,
    pub recurrence: RecurrencePattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_instructor_id: Option<InstructorId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_instructor_name: Option<String>,
    pub studio_id: StudioId,
    #[serde(default)]
    pub member_plus_only: bool,
    #[serde(default)]
    pub x_pass_eligible: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

impl TemplateProposal {
    /// Convert a validated proposal into a storable template.
    ///
    /// Returns `None` when the proposal has no start time; callers are
    /// expected to have run the validator first.
    pub fn into_template(self) -> Option<ClassTemplate> {
        let start_time_of_day = self.start_time?;
        Some(ClassTemplate {
            id: None,
            name: self.name,
            description: self.description,
            category: self.category,
            level: self.level,
            duration_minutes: self.duration_minutes,
            capacity: self.capacity,
            price: self.price,
            start_time_of_day,
            schedule_days: self.schedule_days,
            recurrence: self.recurrence,
            default_instructor_id: self.default_instructor_id,
            default_instructor_name: self.default_instructor_name,
            studio_id: self.studio_id,
            member_plus_only: self.member_plus_only,
            x_pass_eligible: self.x_pass_eligible,
            tags: self.tags,
            requirements: self.requirements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurrence_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&RecurrencePattern::Weekly).unwrap(),
            "\"weekly\""
        );
        let parsed: RecurrencePattern = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(parsed, RecurrencePattern::None);
    }

    #[test]
    fn test_membership_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&MembershipType::MemberPlus).unwrap(),
            "\"member_plus\""
        );
        assert_eq!(
            serde_json::to_string(&MembershipType::ClassPack).unwrap(),
            "\"class_pack\""
        );
    }

    #[test]
    fn test_proposal_without_start_time_is_not_storable() {
        let proposal = TemplateProposal {
            name: "Vinyasa Flow".to_string(),
            description: String::new(),
            category: "yoga".to_string(),
            level: "beginner".to_string(),
            duration_minutes: 60,
            capacity: 20,
            price: 18.0,
            start_time: None,
            schedule_days: vec![],
            recurrence: RecurrencePattern::Weekly,
            default_instructor_id: None,
            default_instructor_name: None,
            studio_id: StudioId::new(1),
            member_plus_only: false,
            x_pass_eligible: true,
            tags: vec![],
            requirements: None,
        };
        assert!(proposal.into_template().is_none());
    }
}
