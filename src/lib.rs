#![doc(test(attr(deny(warnings))))]

//! Tally Core is a command-driven personal finance tracker: expenses, incomes,
//! upcoming payments and a monthly budget, kept in plain text files and shown
//! as sorted, filtered list views.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tally Core tracing initialized.");
    });
}
