//! Template expander: recurring definitions to concrete instances.
//!
//! Expansion is a pure function over its inputs; persistence is the caller's
//! responsibility. Instance ids are deterministic so that repeated expansion
//! over overlapping windows regenerates identical ids and the store can
//! upsert instead of inserting duplicates.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use sha2::{Digest, Sha256};

use crate::api::{InstanceId, TemplateId};
use crate::models::instance::{ClassInstance, InstanceStatus};
use crate::models::template::{ClassTemplate, RecurrencePattern};

/// Deterministic instance id for a (template, date, start time) slot.
///
/// SHA-256 over `"{template_id}:{ISO date}:{HH:MM}"`, truncated to 16 bytes of
/// lowercase hex. Stable across expansions by construction.
pub fn instance_id(template_id: TemplateId, date: NaiveDate, start: NaiveTime) -> InstanceId {
    let slot = format!(
        "{}:{}:{}",
        template_id.value(),
        date.format("%Y-%m-%d"),
        start.format("%H:%M")
    );
    let digest = Sha256::digest(slot.as_bytes());
    InstanceId::new(hex::encode(&digest[..16]))
}

/// Expand a template into concrete instances for `[start_date, end_date]`
/// (both endpoints inclusive).
///
/// - `none`: exactly one instance at `start_date`; `end_date` is ignored.
/// - `weekly`: one instance every 7 days from `start_date`.
/// - `daily`: one instance per calendar day whose weekday is in
///   `schedule_days`; an empty restriction admits every day.
/// - `monthly`: one instance per month on `start_date`'s day-of-month;
///   months without that day emit nothing.
///
/// Capacity, price and instructor are copied from the template at generation
/// time, so later template edits never retroactively alter the output of an
/// earlier expansion.
pub fn generate_instances(
    template_id: TemplateId,
    template: &ClassTemplate,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<ClassInstance> {
    let dates: Vec<NaiveDate> = match template.recurrence {
        RecurrencePattern::None => vec![start_date],
        RecurrencePattern::Weekly => weekly_dates(start_date, end_date),
        RecurrencePattern::Daily => daily_dates(template, start_date, end_date),
        RecurrencePattern::Monthly => monthly_dates(start_date, end_date),
    };

    dates
        .into_iter()
        .map(|date| materialize(template_id, template, date))
        .collect()
}

fn weekly_dates(start_date: NaiveDate, end_date: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start_date;
    while current <= end_date {
        dates.push(current);
        current += Duration::days(7);
    }
    dates
}

fn daily_dates(template: &ClassTemplate, start_date: NaiveDate, end_date: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start_date;
    while current <= end_date {
        if template.schedule_days.is_empty() || template.schedule_days.contains(&current.weekday())
        {
            dates.push(current);
        }
        current += Duration::days(1);
    }
    dates
}

fn monthly_dates(start_date: NaiveDate, end_date: NaiveDate) -> Vec<NaiveDate> {
    let day = start_date.day();
    let mut dates = Vec::new();
    let mut year = start_date.year();
    let mut month = start_date.month();
    loop {
        if let Some(candidate) = NaiveDate::from_ymd_opt(year, month, day) {
            if candidate > end_date {
                break;
            }
            if candidate >= start_date {
                dates.push(candidate);
            }
        } else if NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first| first > end_date)
            .unwrap_or(true)
        {
            break;
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    dates
}

fn materialize(template_id: TemplateId, template: &ClassTemplate, date: NaiveDate) -> ClassInstance {
    let start_time = NaiveDateTime::new(date, template.start_time_of_day).and_utc();
    let end_time = start_time + Duration::minutes(template.duration_minutes);

    ClassInstance {
        id: instance_id(template_id, date, template.start_time_of_day),
        template_id,
        name: template.name.clone(),
        category: template.category.clone(),
        level: template.level.clone(),
        start_time,
        end_time,
        instructor_id: template.default_instructor_id,
        instructor_name: template.default_instructor_name.clone(),
        capacity: template.capacity,
        price: template.price,
        member_plus_only: template.member_plus_only,
        x_pass_eligible: template.x_pass_eligible,
        tags: template.tags.clone(),
        status: InstanceStatus::Scheduled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StudioId;
    use chrono::Weekday;
    use std::collections::HashSet;

    fn template(recurrence: RecurrencePattern) -> ClassTemplate {
        ClassTemplate {
            id: Some(TemplateId::new(11)),
            name: "Morning Flow".to_string(),
            description: String::new(),
            category: "yoga".to_string(),
            level: "all".to_string(),
            duration_minutes: 60,
            capacity: 20,
            price: 18.0,
            start_time_of_day: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            schedule_days: vec![],
            recurrence,
            default_instructor_id: None,
            default_instructor_name: None,
            studio_id: StudioId::new(1),
            member_plus_only: false,
            x_pass_eligible: false,
            tags: vec![],
            requirements: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_expansion_four_mondays() {
        let tpl = template(RecurrencePattern::Weekly);
        let instances =
            generate_instances(TemplateId::new(11), &tpl, date(2024, 1, 1), date(2024, 1, 22));

        assert_eq!(instances.len(), 4);
        let days: Vec<u32> = instances
            .iter()
            .map(|i| i.start_time.date_naive().day())
            .collect();
        assert_eq!(days, vec![1, 8, 15, 22]);
        for instance in &instances {
            assert_eq!(instance.start_time.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
            assert_eq!(instance.end_time - instance.start_time, Duration::minutes(60));
        }
    }

    #[test]
    fn test_weekly_end_date_inclusive() {
        let tpl = template(RecurrencePattern::Weekly);
        let instances =
            generate_instances(TemplateId::new(11), &tpl, date(2024, 1, 1), date(2024, 1, 15));
        assert_eq!(instances.len(), 3);
    }

    #[test]
    fn test_none_emits_single_instance_ignoring_end() {
        let tpl = template(RecurrencePattern::None);
        let instances =
            generate_instances(TemplateId::new(11), &tpl, date(2024, 3, 5), date(2024, 12, 31));
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].start_time.date_naive(), date(2024, 3, 5));
    }

    #[test]
    fn test_daily_respects_schedule_days() {
        let mut tpl = template(RecurrencePattern::Daily);
        tpl.schedule_days = vec![Weekday::Mon, Weekday::Wed];
        // 2024-01-01 is a Monday.
        let instances =
            generate_instances(TemplateId::new(11), &tpl, date(2024, 1, 1), date(2024, 1, 7));
        let days: Vec<u32> = instances
            .iter()
            .map(|i| i.start_time.date_naive().day())
            .collect();
        assert_eq!(days, vec![1, 3]);
    }

    #[test]
    fn test_daily_empty_schedule_days_means_every_day() {
        let tpl = template(RecurrencePattern::Daily);
        let instances =
            generate_instances(TemplateId::new(11), &tpl, date(2024, 1, 1), date(2024, 1, 7));
        assert_eq!(instances.len(), 7);
    }

    #[test]
    fn test_monthly_skips_short_months() {
        let tpl = template(RecurrencePattern::Monthly);
        let instances =
            generate_instances(TemplateId::new(11), &tpl, date(2024, 1, 31), date(2024, 4, 30));
        let dates: Vec<NaiveDate> = instances
            .iter()
            .map(|i| i.start_time.date_naive())
            .collect();
        // No Feb 31 or Apr 31; March 31 survives.
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 3, 31)]);
    }

    #[test]
    fn test_idempotent_expansion_overlapping_windows() {
        let tpl = template(RecurrencePattern::Weekly);
        let first: HashSet<InstanceId> =
            generate_instances(TemplateId::new(11), &tpl, date(2024, 1, 1), date(2024, 2, 1))
                .into_iter()
                .map(|i| i.id)
                .collect();
        let second: HashSet<InstanceId> =
            generate_instances(TemplateId::new(11), &tpl, date(2024, 1, 1), date(2024, 2, 1))
                .into_iter()
                .map(|i| i.id)
                .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_instance_id_varies_by_slot() {
        let t = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let base = instance_id(TemplateId::new(1), date(2024, 1, 1), t);
        assert_ne!(base, instance_id(TemplateId::new(2), date(2024, 1, 1), t));
        assert_ne!(base, instance_id(TemplateId::new(1), date(2024, 1, 2), t));
        assert_ne!(
            base,
            instance_id(
                TemplateId::new(1),
                date(2024, 1, 1),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap()
            )
        );
        assert_eq!(base, instance_id(TemplateId::new(1), date(2024, 1, 1), t));
        assert_eq!(base.value().len(), 32);
    }

    #[test]
    fn test_inverted_window_yields_nothing_for_recurring() {
        let tpl = template(RecurrencePattern::Daily);
        let instances =
            generate_instances(TemplateId::new(11), &tpl, date(2024, 2, 1), date(2024, 1, 1));
        assert!(instances.is_empty());
    }
}
