//! Testing utilities for the guidebook workspace
//!
//! Shared fixtures, clocks and proptest strategies.

#![allow(missing_docs)]

use chrono::{NaiveDate, NaiveDateTime};
use guidebook_core::{
    AppContext, Capability, DateKeyService, FixedClock, GuidebookConfig, PreviewState, Providers,
    Role, StaticSession,
};
use proptest::prelude::*;

pub fn parse_day(day: &str) -> NaiveDate {
    NaiveDate::parse_from_str(day, "%Y-%m-%d").unwrap()
}

pub fn fixed_clock(day: &str, hour: u32, minute: u32) -> FixedClock {
    let now: NaiveDateTime = parse_day(day).and_hms_opt(hour, minute, 0).unwrap();
    FixedClock::new(now)
}

pub fn dates_on(day: &str) -> DateKeyService {
    DateKeyService::with_clock(fixed_clock(day, 9, 0))
}

pub fn providers_on(day: &str) -> Providers {
    let config = GuidebookConfig::default();
    let dates = config.date_service_with(fixed_clock(day, 9, 0));
    Providers::with_dates(config, dates)
}

pub fn context_for(role: Option<Role>) -> AppContext {
    providers_on("2024-03-01").mount(StaticSession::from_role(role))
}

pub fn any_role() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

pub fn any_capability() -> impl Strategy<Value = Capability> {
    prop::sample::select(Capability::ALL.to_vec())
}

pub fn any_real_role() -> impl Strategy<Value = Option<Role>> {
    prop::option::of(any_role())
}

pub fn any_preview_state() -> impl Strategy<Value = PreviewState> {
    prop_oneof![
        Just(PreviewState::Inactive),
        any_role().prop_map(PreviewState::Previewing),
    ]
}

/// Slug-like identifiers without the key delimiter
pub fn any_identifier() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,16}"
}

pub fn any_day() -> impl Strategy<Value = String> {
    (2000i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}"))
}
