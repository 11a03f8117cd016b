#![doc(test(attr(deny(warnings))))]

//! Grocer Core keeps the income and expense records of a small grocery store and
//! derives revenue targets, pending payables, chart series and CSV exports from them.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod storage;
pub mod time;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Grocer Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
