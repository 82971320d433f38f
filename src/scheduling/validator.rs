//! Pre-flight validation of proposed class templates.
//!
//! Errors block persistence; warnings are advisory notices for studio staff
//! and never prevent creation.

use serde::{Deserialize, Serialize};

use crate::models::template::TemplateProposal;
use crate::scheduling::eligibility::InstructorAssignment;

/// Capacity above which a warning nudges staff to double-check the room.
const CAPACITY_WARNING_THRESHOLD: u32 = 50;
/// Duration above which a warning flags engagement/fatigue concerns.
const DURATION_WARNING_MINUTES: i64 = 120;

/// Validation outcome with categorized issues.
///
/// Errors make `is_valid` false; warnings are informational and leave the
/// proposal storable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl TemplateValidation {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add a blocking error and mark the result invalid.
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(error.into());
    }

    /// Add a non-blocking advisory.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl Default for TemplateValidation {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a proposed template before persistence.
///
/// `conflicts` is the set of existing instructor assignments that overlap the
/// proposal's projected occurrences, computed by the caller with
/// [`crate::scheduling::eligibility::instructor_conflicts`]; a non-empty set
/// is a blocking error.
pub fn validate_template(
    proposal: &TemplateProposal,
    conflicts: &[InstructorAssignment],
) -> TemplateValidation {
    let mut result = TemplateValidation::new();

    if proposal.name.trim().is_empty() {
        result.add_error("Class name is required");
    }
    if proposal.start_time.is_none() {
        result.add_error("Start time is missing or not a valid time of day");
    }
    if proposal.duration_minutes <= 0 {
        result.add_error(format!(
            "Duration must be positive, got {} minutes",
            proposal.duration_minutes
        ));
    }
    if proposal.capacity == 0 {
        result.add_error("Capacity must be greater than zero");
    }
    for conflict in conflicts {
        result.add_error(format!(
            "Instructor is already assigned to '{}' from {} to {}",
            conflict.class_name,
            conflict.range.start.format("%Y-%m-%d %H:%M"),
            conflict.range.end.format("%H:%M"),
        ));
    }

    if proposal.capacity > CAPACITY_WARNING_THRESHOLD {
        result.add_warning(format!(
            "Capacity {} is unusually high; ensure the space can accommodate it",
            proposal.capacity
        ));
    }
    if proposal.duration_minutes > DURATION_WARNING_MINUTES {
        result.add_warning(format!(
            "Duration {} minutes is unusually long; consider participant fatigue",
            proposal.duration_minutes
        ));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{InstructorId, StudioId};
    use crate::models::template::RecurrencePattern;
    use crate::models::time::TimeRange;
    use chrono::{NaiveTime, TimeZone, Utc};

    fn proposal() -> TemplateProposal {
        TemplateProposal {
            name: "Sunrise Yoga".to_string(),
            description: String::new(),
            category: "yoga".to_string(),
            level: "beginner".to_string(),
            duration_minutes: 60,
            capacity: 20,
            price: 15.0,
            start_time: NaiveTime::from_hms_opt(7, 0, 0),
            schedule_days: vec![],
            recurrence: RecurrencePattern::Weekly,
            default_instructor_id: Some(InstructorId::new(1)),
            default_instructor_name: None,
            studio_id: StudioId::new(1),
            member_plus_only: false,
            x_pass_eligible: false,
            tags: vec![],
            requirements: None,
        }
    }

    #[test]
    fn test_valid_proposal_passes_clean() {
        let result = validate_template(&proposal(), &[]);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_name_blocks() {
        let mut p = proposal();
        p.name = "   ".to_string();
        let result = validate_template(&p, &[]);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_missing_start_time_blocks() {
        let mut p = proposal();
        p.start_time = None;
        let result = validate_template(&p, &[]);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_non_positive_duration_and_capacity_block() {
        let mut p = proposal();
        p.duration_minutes = 0;
        p.capacity = 0;
        let result = validate_template(&p, &[]);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_instructor_conflict_blocks() {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 7, 30, 0).unwrap();
        let conflicts = vec![InstructorAssignment {
            instructor_id: InstructorId::new(1),
            class_name: "Pilates".to_string(),
            range: TimeRange::from_start(start, 60).unwrap(),
        }];
        let result = validate_template(&proposal(), &conflicts);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("Pilates"));
    }

    #[test]
    fn test_warnings_do_not_block() {
        let mut p = proposal();
        p.capacity = 80;
        p.duration_minutes = 150;
        let result = validate_template(&p, &[]);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 2);
    }
}
