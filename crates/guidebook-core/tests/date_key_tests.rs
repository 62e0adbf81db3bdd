use guidebook_core::{ChecklistStore, DateKeyService, GuidebookConfig, MemoryChecklistStore};
use guidebook_core::checklist::checklist_for_today;
use guidebook_test_utils::{any_day, any_identifier, dates_on, fixed_clock};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn downtown_manager_key() {
    let dates = dates_on("2025-07-04");
    assert_eq!(
        dates.checklist_storage_key("downtown", "manager", Some("2024-03-01")),
        "checklist_downtown_manager_2024-03-01"
    );
}

#[test]
fn is_today_only_on_that_day() {
    assert!(dates_on("2024-03-01").is_today("2024-03-01"));
    assert!(!dates_on("2024-03-02").is_today("2024-03-01"));
    assert!(!dates_on("2023-03-01").is_today("2024-03-01"));
}

#[test]
fn key_is_stable_across_the_day() {
    let morning = DateKeyService::with_clock(fixed_clock("2024-03-01", 0, 0));
    let night = DateKeyService::with_clock(fixed_clock("2024-03-01", 23, 59));
    assert_eq!(
        morning.checklist_storage_key("marina", "staff", None),
        night.checklist_storage_key("marina", "staff", None)
    );
}

#[test]
fn configured_patterns_apply() {
    let config = GuidebookConfig::from_toml_str(
        "date_pattern = \"%d %b %Y\"\ntime_pattern = \"%H.%M\"\n",
    )
    .unwrap();
    let dates = config.date_service_with(fixed_clock("2024-03-01", 9, 0));
    assert_eq!(dates.format_date("2024-03-01T17:45:00", None).unwrap(), "01 Mar 2024");
    assert_eq!(dates.format_time("2024-03-01T17:45:00").unwrap(), "17.45");
}

#[test]
fn next_day_starts_a_fresh_checklist() {
    let store = MemoryChecklistStore::new();
    let friday = dates_on("2024-03-01");
    let (key, mut state) = checklist_for_today(&friday, &store, "marina", "staff", &["open"]).unwrap();
    state.items.insert("open".to_string(), true);
    store.save(&key, &state).unwrap();

    let saturday = dates_on("2024-03-02");
    let (next_key, next_state) =
        checklist_for_today(&saturday, &store, "marina", "staff", &["open"]).unwrap();
    assert_eq!(next_key, "checklist_marina_staff_2024-03-02");
    assert!(!next_state.is_done("open"));
    assert_eq!(store.purge_before("2024-03-02"), 1);
}

proptest! {
    #[test]
    fn prop_key_is_deterministic(
        branch in any_identifier(),
        role in any_identifier(),
        day in any_day(),
    ) {
        let dates = dates_on("2024-03-01");
        let a = dates.checklist_storage_key(&branch, &role, Some(day.as_str()));
        let b = dates.checklist_storage_key(&branch, &role, Some(day.as_str()));
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a, format!("checklist_{branch}_{role}_{day}"));
    }

    #[test]
    fn prop_default_date_is_daily_key(day in any_day(), branch in any_identifier()) {
        let dates = dates_on(&day);
        prop_assert_eq!(
            dates.checklist_storage_key(&branch, "staff", None),
            dates.checklist_storage_key(&branch, "staff", Some(dates.daily_key().as_str()))
        );
        prop_assert!(dates.is_today(&day));
    }
}
