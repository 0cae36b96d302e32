// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{EnvFilter, Layer};

use crate::constant::LOG_LEVEL_ENV;

pub use tracing::{error, info, debug, info_span, Span, Instrument};

// This function initializes the global logger
pub fn setup_logging() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .boxed();

    let env_filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
