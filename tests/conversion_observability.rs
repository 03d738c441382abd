use std::sync::{Arc, Mutex};

use csv2xml::ConversionError;
use csv2xml::convert::{
    ConversionObserver, ConversionOptions, ConversionSeverity, TableContext, TableRole,
    TableStats, convert_to_tree,
};

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<(TableRole, usize)>>,
    failures: Mutex<Vec<(TableRole, ConversionSeverity)>>,
    alerts: Mutex<Vec<ConversionSeverity>>,
}

impl ConversionObserver for RecordingObserver {
    fn on_success(&self, ctx: &TableContext, stats: TableStats) {
        self.successes.lock().unwrap().push((ctx.role, stats.rows));
    }

    fn on_failure(&self, ctx: &TableContext, severity: ConversionSeverity, _error: &ConversionError) {
        self.failures.lock().unwrap().push((ctx.role, severity));
    }

    fn on_alert(&self, _ctx: &TableContext, severity: ConversionSeverity, _error: &ConversionError) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options_with(observer: &Arc<RecordingObserver>) -> ConversionOptions {
    ConversionOptions {
        observer: Some(observer.clone()),
        ..Default::default()
    }
}

#[test]
fn happy_path_reports_success_per_table() {
    let obs = Arc::new(RecordingObserver::default());

    let tree = convert_to_tree(
        "tests/fixtures/person.csv",
        &["tests/fixtures/pet.csv"],
        &options_with(&obs),
    )
    .unwrap();
    assert_eq!(tree.children.len(), 1);

    let successes = obs.successes.lock().unwrap().clone();
    assert_eq!(
        successes,
        vec![(TableRole::Sub, 2), (TableRole::Main, 1)]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}

#[test]
fn missing_sub_table_degrades_and_alerts_at_critical() {
    let obs = Arc::new(RecordingObserver::default());

    // Missing file -> Io error -> Critical, but the conversion still succeeds with an empty
    // join group for "pet".
    let tree = convert_to_tree(
        "tests/fixtures/person.csv",
        &["tests/fixtures/missing/pet.csv"],
        &options_with(&obs),
    )
    .unwrap();

    let pets = tree.children[0].find("petListList").unwrap();
    assert!(pets.children.is_empty());

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![(TableRole::Sub, ConversionSeverity::Critical)]);
    assert_eq!(
        obs.alerts.lock().unwrap().clone(),
        vec![ConversionSeverity::Critical]
    );
}

#[test]
fn malformed_sub_row_fails_that_table_without_alerting() {
    let obs = Arc::new(RecordingObserver::default());

    // Malformed row -> Error severity (not Critical) -> no alert at the default threshold.
    let tree = convert_to_tree(
        "tests/fixtures/person.csv",
        &["tests/fixtures/malformed/pet.csv"],
        &options_with(&obs),
    )
    .unwrap();
    assert!(tree.children[0].find("petListList").unwrap().children.is_empty());

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![(TableRole::Sub, ConversionSeverity::Error)]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn lowered_threshold_alerts_on_malformed_sub_row() {
    let obs = Arc::new(RecordingObserver::default());
    let options = ConversionOptions {
        observer: Some(obs.clone()),
        alert_at_or_above: ConversionSeverity::Error,
    };

    convert_to_tree(
        "tests/fixtures/person.csv",
        &["tests/fixtures/malformed/pet.csv"],
        &options,
    )
    .unwrap();

    assert_eq!(
        obs.alerts.lock().unwrap().clone(),
        vec![ConversionSeverity::Error]
    );
}

#[test]
fn missing_main_table_reports_critical_failure_and_propagates() {
    let obs = Arc::new(RecordingObserver::default());

    let err = convert_to_tree(
        "tests/fixtures/missing/person.csv",
        &["tests/fixtures/pet.csv"],
        &options_with(&obs),
    )
    .unwrap_err();
    assert!(matches!(err, ConversionError::Io(_)));

    let failures = obs.failures.lock().unwrap().clone();
    assert_eq!(failures, vec![(TableRole::Main, ConversionSeverity::Critical)]);
}
