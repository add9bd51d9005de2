#![doc(test(attr(deny(warnings))))]

//! Stepper Core is a multi-step form wizard engine: a pure navigation state
//! machine, pluggable per-step collection and validation, error annotation,
//! and an asynchronous submission with failure recovery, rendered through a
//! [`surface::Surface`] adapter.

pub mod cli;
pub mod config;
pub mod errors;
pub mod flows;
pub mod notify;
pub mod pricing;
pub mod surface;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Stepper Core tracing initialized.");
    });
}
