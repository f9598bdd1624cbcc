#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use tally_core::{core::FixedClock, ledger::Ledger, storage::TextStorage};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// "Today" for every test ledger: Wednesday 13 March 2024.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 13).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .expect("valid time")
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::at_date(today()))
}

/// Creates an isolated text store and an empty ledger loaded from it.
pub fn setup_test_env() -> (Ledger, TextStorage) {
    let temp = TempDir::new().expect("create temp dir");
    let storage = TextStorage::in_home(temp.path()).expect("create text storage");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let report = Ledger::load(&storage, clock()).expect("load empty ledger");
    assert!(report.warnings.is_empty());
    (report.ledger, storage)
}
