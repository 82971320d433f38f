//! Expansion idempotency and search integration tests.

mod support;

use chrono::NaiveTime;
use std::collections::HashSet;

use studio_core::api::{InstanceId, TemplateId};
use studio_core::db::repository::{InstanceRepository, TemplateRepository};
use studio_core::models::template::RecurrencePattern;
use studio_core::scheduling::search::{ClassFilters, SortKey};
use studio_core::services::{expand_template, search_classes, cancel_instance};

use support::{date, repo, template};

#[tokio::test]
async fn test_expand_weekly_template_through_service() {
    let repo = repo();
    let stored = repo.store_template(&template("Monday Flow", 20, 18.0)).await.unwrap();
    let template_id = stored.id.unwrap();

    let instances = expand_template(&repo, template_id, date(2024, 1, 1), date(2024, 1, 22))
        .await
        .unwrap();

    assert_eq!(instances.len(), 4);
    for instance in &instances {
        assert_eq!(
            instance.start_time.time(),
            NaiveTime::from_hms_opt(18, 0, 0).unwrap()
        );
        assert_eq!(instance.capacity, 20);
        assert_eq!(instance.template_id, template_id);
    }
}

#[tokio::test]
async fn test_re_expansion_is_idempotent() {
    let repo = repo();
    let stored = repo.store_template(&template("Monday Flow", 20, 18.0)).await.unwrap();
    let template_id = stored.id.unwrap();

    let first = expand_template(&repo, template_id, date(2024, 1, 1), date(2024, 1, 22))
        .await
        .unwrap();
    // Overlapping window: two shared Mondays plus two new ones.
    let second = expand_template(&repo, template_id, date(2024, 1, 15), date(2024, 2, 5))
        .await
        .unwrap();

    let first_ids: HashSet<InstanceId> = first.into_iter().map(|i| i.id).collect();
    let second_ids: HashSet<InstanceId> = second.into_iter().map(|i| i.id).collect();
    let overlap: HashSet<_> = first_ids.intersection(&second_ids).collect();
    assert_eq!(overlap.len(), 2);

    // Store holds the union, not duplicated slots: 4 + 4 - 2 shared.
    let all = repo.list_instances_for_template(template_id).await.unwrap();
    assert_eq!(all.len(), 6);

    let unique: HashSet<InstanceId> = all.iter().map(|i| i.id.clone()).collect();
    assert_eq!(unique.len(), all.len(), "ids must be unique after re-expansion");
}

#[tokio::test]
async fn test_template_edits_do_not_rewrite_generated_instances() {
    let repo = repo();
    let stored = repo.store_template(&template("Flow", 20, 18.0)).await.unwrap();
    let template_id = stored.id.unwrap();

    expand_template(&repo, template_id, date(2024, 1, 1), date(2024, 1, 8))
        .await
        .unwrap();

    // Raise capacity on the template, then expand a later window.
    let mut edited = stored.clone();
    edited.capacity = 30;
    repo.update_template(&edited).await.unwrap();
    expand_template(&repo, template_id, date(2024, 1, 15), date(2024, 1, 22))
        .await
        .unwrap();

    let all = repo.list_instances_for_template(template_id).await.unwrap();
    let capacities: Vec<u32> = all.iter().map(|i| i.capacity).collect();
    // Old instances keep the copied capacity; only newly generated ones see
    // the edit.
    assert_eq!(capacities, vec![20, 20, 30, 30]);
}

#[tokio::test]
async fn test_search_excludes_cancelled_instances() {
    let repo = repo();
    let stored = repo.store_template(&template("Flow", 20, 18.0)).await.unwrap();
    let template_id = stored.id.unwrap();

    let instances = expand_template(&repo, template_id, date(2024, 1, 1), date(2024, 1, 8))
        .await
        .unwrap();
    cancel_instance(&repo, &instances[0].id).await.unwrap();

    let results = search_classes(&repo, &ClassFilters::default(), SortKey::Date)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].instance.id, instances[1].id);
}

#[tokio::test]
async fn test_search_filters_by_category_across_templates() {
    let repo = repo();

    let yoga = repo.store_template(&template("Flow", 20, 18.0)).await.unwrap();
    let mut spin_template = template("Spin", 12, 25.0);
    spin_template.category = "cycling".to_string();
    spin_template.start_time_of_day = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
    let spin = repo.store_template(&spin_template).await.unwrap();

    expand_template(&repo, yoga.id.unwrap(), date(2024, 1, 1), date(2024, 1, 8))
        .await
        .unwrap();
    expand_template(&repo, spin.id.unwrap(), date(2024, 1, 1), date(2024, 1, 8))
        .await
        .unwrap();

    let filters = ClassFilters {
        category: Some("cycling".to_string()),
        ..Default::default()
    };
    let results = search_classes(&repo, &filters, SortKey::Date).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|c| c.instance.category == "cycling"));

    // Morning bucket catches the 07:00 spins only.
    let filters = ClassFilters {
        time_of_day: Some(studio_core::models::time::TimeOfDay::Morning),
        ..Default::default()
    };
    let results = search_classes(&repo, &filters, SortKey::Date).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|c| c.instance.name == "Spin"));
}

#[tokio::test]
async fn test_monthly_template_expansion_via_service() {
    let repo = repo();
    let mut monthly = template("Workshop", 30, 40.0);
    monthly.recurrence = RecurrencePattern::Monthly;
    let stored = repo.store_template(&monthly).await.unwrap();

    let instances = expand_template(
        &repo,
        stored.id.unwrap(),
        date(2024, 1, 15),
        date(2024, 4, 15),
    )
    .await
    .unwrap();

    let days: Vec<_> = instances
        .iter()
        .map(|i| i.start_time.date_naive())
        .collect();
    assert_eq!(
        days,
        vec![
            date(2024, 1, 15),
            date(2024, 2, 15),
            date(2024, 3, 15),
            date(2024, 4, 15)
        ]
    );
}

#[tokio::test]
async fn test_expanding_unknown_template_is_not_found() {
    let repo = repo();
    let result = expand_template(&repo, TemplateId::new(404), date(2024, 1, 1), date(2024, 1, 8)).await;
    assert!(result.is_err());
}
