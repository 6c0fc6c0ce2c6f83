//! Catalog and proof store behaviour through the public API.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use rulebook_eval::{evaluate, Value};
use rulebook_storage::{
    CatalogError, Clock, NewRuleVersion, ProofStore, RegressionCase, RuleCatalog, RuleStatus,
};
use serde_json::json;
use time::macros::datetime;
use time::OffsetDateTime;

/// Number of threads spawned in each concurrency test.
const N: usize = 10;

struct FixedClock(OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Advances one second on every reading.
struct SteppingClock {
    start: OffsetDateTime,
    ticks: AtomicI64,
}

impl Clock for SteppingClock {
    fn now(&self) -> OffsetDateTime {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + time::Duration::seconds(tick)
    }
}

fn rule(stable_id: &str, definition: serde_json::Value) -> NewRuleVersion {
    NewRuleVersion::new(stable_id, "Loan decision", Value::from(definition))
}

fn published_versions(catalog: &RuleCatalog, stable_id: &str) -> Vec<u32> {
    catalog
        .list_versions(stable_id)
        .unwrap()
        .into_iter()
        .filter(|v| v.status == RuleStatus::Published)
        .map(|v| v.version)
        .collect()
}

// ──────────────────────────────────────────────
// Versioning and publication
// ──────────────────────────────────────────────

#[test]
fn publishing_keeps_a_single_published_version() {
    let catalog = RuleCatalog::new();
    catalog.create_version(rule("loan-decision", json!({"var": "a"}))).unwrap();
    catalog.create_version(rule("loan-decision", json!({"var": "b"}))).unwrap();

    catalog.publish_version("loan-decision", 1, None).unwrap();
    assert_eq!(published_versions(&catalog, "loan-decision"), vec![1]);

    let record = catalog.publish_version("loan-decision", 2, Some("tightened")).unwrap();
    assert_eq!(record.status, RuleStatus::Published);
    assert!(record.published_at.is_some());
    assert_eq!(published_versions(&catalog, "loan-decision"), vec![2]);
    let demoted = catalog.get_version("loan-decision", Some(1), false).unwrap();
    assert_eq!(demoted.status, RuleStatus::Draft);
    assert_eq!(demoted.published_at, None);

    // Creating a new version doesn't change publication.
    let v3 = catalog.create_version(rule("loan-decision", json!({"var": "c"}))).unwrap();
    assert_eq!(v3.status, RuleStatus::Draft);
    assert_eq!(published_versions(&catalog, "loan-decision"), vec![2]);
}

#[test]
fn lookup_prefers_published_then_latest() {
    let catalog = RuleCatalog::new();
    catalog.create_version(rule("pricing", json!(1))).unwrap();
    catalog.create_version(rule("pricing", json!(2))).unwrap();

    // Nothing published: latest wins.
    assert_eq!(catalog.get_version("pricing", None, false).unwrap().version, 2);

    catalog.publish_version("pricing", 1, None).unwrap();
    assert_eq!(catalog.get_version("pricing", None, false).unwrap().version, 1);
    assert_eq!(catalog.get_version("pricing", None, true).unwrap().version, 2);
    assert_eq!(catalog.get_version("pricing", Some(2), false).unwrap().version, 2);

    assert_eq!(
        catalog.get_version("pricing", Some(7), false).unwrap_err(),
        CatalogError::RuleVersionNotFound {
            stable_id: "pricing".to_string(),
            version: 7
        }
    );
    assert_eq!(
        catalog.get_version("unknown", None, false).unwrap_err(),
        CatalogError::RuleNotFound {
            stable_id: "unknown".to_string()
        }
    );
}

#[test]
fn listing_reports_latest_and_published() {
    let catalog = RuleCatalog::new();
    let mut first = rule("beta-rule", json!(true));
    first.labels.insert("team".to_string(), "risk".to_string());
    catalog.create_version(first).unwrap();
    catalog.create_version(rule("alpha-rule", json!(false))).unwrap();
    catalog.publish_version("beta-rule", 1, None).unwrap();
    let mut second = rule("beta-rule", json!(false));
    second.name = "Renamed".to_string();
    catalog.create_version(second).unwrap();

    let listing = catalog.list_rules();
    assert_eq!(listing.total, 2);
    let ids: Vec<_> = listing.rules.iter().map(|r| r.stable_id.as_str()).collect();
    assert_eq!(ids, ["alpha-rule", "beta-rule"]);

    let beta = &listing.rules[1];
    assert_eq!(beta.name, "Renamed");
    assert_eq!(beta.latest_version, 2);
    assert_eq!(beta.published_version, Some(1));
    assert_eq!(beta.status, RuleStatus::Draft);
    assert!(beta.labels.is_empty());

    let alpha = &listing.rules[0];
    assert_eq!(alpha.published_version, None);
}

#[test]
fn timestamps_come_from_the_clock() {
    let at = datetime!(2024-03-01 12:00 UTC);
    let catalog = RuleCatalog::with_clock(Arc::new(FixedClock(at)));
    let record = catalog.create_version(rule("clocked", json!(1))).unwrap();
    assert_eq!(record.created_at, at);
    assert_eq!(record.updated_at, at);
    assert_eq!(record.published_at, None);

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["created_at"], json!("2024-03-01T12:00:00Z"));
    assert_eq!(json["status"], json!("draft"));
}

#[test]
fn demotion_keeps_the_demoted_update_time() {
    let catalog = RuleCatalog::with_clock(Arc::new(SteppingClock {
        start: datetime!(2024-03-01 12:00 UTC),
        ticks: AtomicI64::new(0),
    }));
    catalog.create_version(rule("stepped", json!(1))).unwrap();
    catalog.create_version(rule("stepped", json!(2))).unwrap();
    let first = catalog.publish_version("stepped", 1, None).unwrap();

    let second = catalog.publish_version("stepped", 2, None).unwrap();
    assert!(second.updated_at > first.updated_at);

    let demoted = catalog.get_version("stepped", Some(1), false).unwrap();
    assert_eq!(demoted.status, RuleStatus::Draft);
    assert_eq!(demoted.published_at, None);
    assert_eq!(demoted.updated_at, first.updated_at);
}

#[test]
fn replacing_cases_touches_only_the_target_version() {
    let catalog = RuleCatalog::new();
    let seeded = rule("cases", json!({"var": "x"})).with_regression_cases(vec![RegressionCase::new(
        "original",
        Value::from(json!({"x": 1})),
        Value::Number(1.0),
    )]);
    catalog.create_version(seeded.clone()).unwrap();
    catalog.create_version(seeded).unwrap();

    let updated = catalog
        .replace_regression_cases(
            "cases",
            2,
            vec![
                RegressionCase::new("a", Value::from(json!({"x": 2})), Value::Number(2.0)),
                RegressionCase::new("b", Value::from(json!({"x": 3})), Value::Number(3.0)),
            ],
        )
        .unwrap();
    assert_eq!(updated.regression_cases.len(), 2);

    let v1 = catalog.get_version("cases", Some(1), false).unwrap();
    assert_eq!(v1.regression_cases[0].name, "original");
}

// ──────────────────────────────────────────────
// Concurrency
// ──────────────────────────────────────────────

#[test]
fn concurrent_creates_get_distinct_version_numbers() {
    let catalog = RuleCatalog::new();
    std::thread::scope(|s| {
        for i in 0..N {
            let catalog = &catalog;
            s.spawn(move || {
                catalog.create_version(rule("shared", json!(i))).unwrap();
            });
        }
    });

    let mut numbers: Vec<u32> = catalog
        .list_versions("shared")
        .unwrap()
        .iter()
        .map(|v| v.version)
        .collect();
    numbers.sort_unstable();
    let expected: Vec<u32> = (1..=N as u32).collect();
    assert_eq!(numbers, expected);
}

#[test]
fn concurrent_publishes_leave_exactly_one_published() {
    let catalog = RuleCatalog::new();
    for i in 0..N {
        catalog.create_version(rule("race", json!(i))).unwrap();
    }

    std::thread::scope(|s| {
        for version in 1..=N as u32 {
            let catalog = &catalog;
            s.spawn(move || {
                catalog.publish_version("race", version, None).unwrap();
            });
        }
    });

    assert_eq!(published_versions(&catalog, "race").len(), 1);
}

#[test]
fn readers_always_see_exactly_one_published_version() {
    const ROUNDS: usize = 200;

    let catalog = RuleCatalog::new();
    for i in 0..N {
        catalog.create_version(rule("contended", json!(i))).unwrap();
    }
    catalog.publish_version("contended", 1, None).unwrap();

    std::thread::scope(|s| {
        for writer in 0..N / 2 {
            let catalog = &catalog;
            s.spawn(move || {
                for round in 0..ROUNDS {
                    let version = ((writer + round) % N) as u32 + 1;
                    catalog.publish_version("contended", version, None).unwrap();
                }
            });
        }
        for _ in 0..N / 2 {
            let catalog = &catalog;
            s.spawn(move || {
                for _ in 0..ROUNDS {
                    let published = published_versions(catalog, "contended");
                    assert_eq!(published.len(), 1, "saw {published:?}");

                    let current = catalog.get_version("contended", None, false).unwrap();
                    assert_eq!(current.status, RuleStatus::Published);
                    assert!(current.published_at.is_some());
                }
            });
        }
    });

    assert_eq!(published_versions(&catalog, "contended").len(), 1);
}

// ──────────────────────────────────────────────
// Proof artifacts
// ──────────────────────────────────────────────

#[test]
fn artifacts_are_snapshots_of_their_inputs() {
    let store = ProofStore::new();
    let mut definition = Value::from(json!({"var": "applicant.score"}));
    let mut context = Value::from(json!({"applicant": {"score": 700}}));
    let evaluation = evaluate(&definition, &context).unwrap();

    let artifact = store.record(
        Some("scoring"),
        Some(1),
        &definition,
        &context,
        &evaluation.result,
        &evaluation.trace,
    );

    if let Value::Object(map) = &mut context {
        map.insert("applicant".to_string(), Value::Null);
    }
    if let Value::Object(map) = &mut definition {
        map.insert("var".to_string(), Value::from("applicant.name"));
    }

    let stored = store.get(&artifact.id).unwrap();
    assert_eq!(stored.definition, Value::from(json!({"var": "applicant.score"})));
    assert_eq!(stored.context, Value::from(json!({"applicant": {"score": 700}})));
    assert_eq!(stored.result, Value::Number(700.0));
    assert_eq!(stored.trace, evaluation.trace);
    assert_eq!(stored.stable_id.as_deref(), Some("scoring"));
}

#[test]
fn concurrent_records_are_all_retained() {
    let store = ProofStore::new();
    std::thread::scope(|s| {
        for i in 0..N {
            let store = &store;
            s.spawn(move || {
                store.record(
                    Some("parallel"),
                    Some(1),
                    &Value::from(json!({"var": "n"})),
                    &Value::from(json!({"n": i})),
                    &Value::from(i),
                    &[],
                );
            });
        }
    });

    let artifacts = store.list_for_rule("parallel");
    assert_eq!(artifacts.len(), N);
    let mut ids: Vec<_> = artifacts.iter().map(|a| a.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), N);
}
