//! OpenTelemetry request metrics.
//!
//! Every request ends in exactly one outcome (`registered`, `validation_failure`,
//! `auth_failure`, ...). The counter goes to the global meter provider; with no
//! provider installed the calls are no-ops.

use opentelemetry::metrics::{Counter, Meter};
use opentelemetry::KeyValue;
use std::sync::OnceLock;

static REGISTRY_METER: OnceLock<Meter> = OnceLock::new();
static REQUEST_OUTCOMES_TOTAL: OnceLock<Counter<u64>> = OnceLock::new();

fn meter() -> &'static Meter {
    REGISTRY_METER.get_or_init(|| opentelemetry::global::meter("app-registry"))
}

/// Total requests by outcome.
///
/// Labels:
/// - outcome: success outcome (`healthy`, `registered`, `updated`, `fetched`, `removed`)
///   or failure kind (`auth_failure`, `validation_failure`, `not_found`,
///   `ownership_mismatch`, `storage_conflict`, `storage_failure`, `unavailable`)
pub fn request_outcomes_total() -> &'static Counter<u64> {
    REQUEST_OUTCOMES_TOTAL.get_or_init(|| {
        meter()
            .u64_counter("app_registry.requests.total")
            .with_description("Requests handled, labelled by outcome")
            .build()
    })
}

pub fn record_outcome(outcome: &'static str) {
    request_outcomes_total().add(1, &[KeyValue::new("outcome", outcome)]);
}
