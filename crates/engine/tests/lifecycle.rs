//! Rule lifecycle end to end: create, version, publish, evaluate, regress.

use std::sync::Arc;

use rulebook_engine::{Engine, EngineError, EvaluationRequest, RegressionRunRequest};
use rulebook_eval::Value;
use rulebook_storage::{NewRuleVersion, ProofStore, RuleCatalog, RuleStatus};
use serde_json::json;

fn loan_rule(threshold: i64, cases: serde_json::Value) -> NewRuleVersion {
    serde_json::from_value(json!({
        "stable_id": "loan-decision",
        "name": "Loan Decision",
        "description": "Base underwriting rule",
        "labels": {"product": "personal-loan"},
        "definition": {"if": [
            {">=": [{"var": "applicant.credit_score"}, threshold]},
            "approve",
            "manual-review"
        ]},
        "regression_tests": cases
    }))
    .expect("valid create payload")
}

#[test]
fn rule_lifecycle_and_evaluation() {
    let engine = Engine::new();
    let mut cases = json!([
        {"name": "approve-high-score", "context": {"applicant": {"credit_score": 720}}, "expected": "approve"},
        {"name": "flag-borderline", "context": {"applicant": {"credit_score": 680}}, "expected": "manual-review"}
    ]);

    let v1 = engine.create_rule(loan_rule(690, cases.clone())).unwrap();
    assert_eq!(v1.version, 1);
    assert_eq!(v1.status, RuleStatus::Draft);

    if let Some(list) = cases.as_array_mut() {
        list.push(json!({
            "name": "approve-borderline",
            "context": {"applicant": {"credit_score": 700}},
            "expected": "approve"
        }));
    }
    let v2 = engine.create_rule(loan_rule(700, cases)).unwrap();
    assert_eq!(v2.version, 2);

    let published = engine.catalog().publish_version("loan-decision", 2, None).unwrap();
    assert_eq!(published.status, RuleStatus::Published);

    let listing = engine.catalog().list_rules();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.rules[0].published_version, Some(2));

    let response = engine
        .evaluate(&EvaluationRequest::rule(
            "loan-decision",
            Value::from(json!({"applicant": {"credit_score": 715}})),
        ))
        .unwrap();
    assert_eq!(response.result, Value::from("approve"));
    assert_eq!(response.version, Some(2));
    assert!(!response.trace.is_empty());

    let artifact = engine.proof(&response.proof.id).unwrap();
    assert_eq!(artifact.result, Value::from("approve"));
    assert_eq!(artifact.stable_id.as_deref(), Some("loan-decision"));
    assert_eq!(artifact.version, Some(2));

    let inline = engine
        .evaluate(&EvaluationRequest::inline(
            Value::from(json!({"+": [1, 2, 3]})),
            Value::empty_object(),
        ))
        .unwrap();
    assert_eq!(inline.result, Value::Number(6.0));
    assert_eq!(inline.proof.stable_id, None);

    let run = engine
        .run_regressions(&RegressionRunRequest::new("loan-decision"))
        .unwrap();
    assert_eq!(run.version, 2);
    assert_eq!(run.total, 3);
    assert_eq!(run.failed, 0);

    // One catalog evaluation plus three regression cases.
    assert_eq!(engine.proofs().list_for_rule("loan-decision").len(), 4);
}

#[test]
fn regression_runner_detects_failures() {
    let engine = Engine::new();
    engine
        .create_rule(NewRuleVersion::new(
            "eligibility",
            "Eligibility",
            Value::from(json!({"bl_any": [{"var": "flags"}, {"==": [{"var": "item"}, "approved"]}]})),
        ))
        .unwrap();
    engine.catalog().publish_version("eligibility", 1, None).unwrap();

    let request: RegressionRunRequest = serde_json::from_value(json!({
        "stable_id": "eligibility",
        "cases": [
            {"name": "passes-when-flag-present", "context": {"flags": ["approved", "kyc"]}, "expected": true},
            {"name": "fails-when-flag-missing", "context": {"flags": ["kyc"]}, "expected": true}
        ]
    }))
    .unwrap();

    let run = engine.run_regressions(&request).unwrap();
    assert_eq!(run.passed, 1);
    assert_eq!(run.failed, 1);
    let failing = run.failures().next().expect("one failure");
    assert_eq!(failing.name, "fails-when-flag-missing");
    assert_eq!(failing.actual, Value::Bool(false));
    assert_eq!(failing.trace[0].operator, "bl_any");
    let comparison = failing.trace[0].find("==").expect("predicate step");
    assert_eq!(comparison.result, Value::Bool(false));
    assert!(failing.trace[0].find("and").is_none());

    let json = serde_json::to_value(&run).unwrap();
    assert_eq!(json["cases"][1]["actual"], json!(false));
}

#[test]
fn invalid_rule_definition_is_rejected() {
    let engine = Engine::new();
    let err = engine
        .create_rule(NewRuleVersion::new(
            "invalid",
            "Invalid",
            Value::from(json!({"bad": [1, 2, 3]})),
        ))
        .unwrap_err();
    assert!(matches!(err, EngineError::Eval(_)));
    assert!(err.to_string().contains("bad"));
}

#[test]
fn regressions_against_an_explicit_older_version() {
    let engine = Engine::new();
    engine
        .create_rule(loan_rule(
            690,
            json!([{"name": "edge", "context": {"applicant": {"credit_score": 695}}, "expected": "approve"}]),
        ))
        .unwrap();
    engine
        .create_rule(loan_rule(
            700,
            json!([{"name": "edge", "context": {"applicant": {"credit_score": 695}}, "expected": "approve"}]),
        ))
        .unwrap();

    let mut request = RegressionRunRequest::new("loan-decision");
    request.version = Some(1);
    assert!(engine.run_regressions(&request).unwrap().all_passed());

    request.version = None;
    let latest = engine.run_regressions(&request).unwrap();
    assert_eq!(latest.version, 2);
    assert!(!latest.all_passed());
}

#[test]
fn engines_can_share_one_proof_store() {
    let proofs = Arc::new(ProofStore::new());
    let underwriting = Engine::with_stores(Arc::new(RuleCatalog::new()), Arc::clone(&proofs));
    let pricing = Engine::with_stores(Arc::new(RuleCatalog::new()), Arc::clone(&proofs));

    underwriting.create_rule(loan_rule(700, json!([]))).unwrap();
    pricing
        .create_rule(NewRuleVersion::new(
            "pricing",
            "Pricing",
            Value::from(json!({"*": [{"var": "amount"}, 0.5]})),
        ))
        .unwrap();

    let decision = underwriting
        .evaluate(&EvaluationRequest::rule(
            "loan-decision",
            Value::from(json!({"applicant": {"credit_score": 710}})),
        ))
        .unwrap();
    let fee = pricing
        .evaluate(&EvaluationRequest::rule("pricing", Value::from(json!({"amount": 200}))))
        .unwrap();
    assert_eq!(fee.result, Value::Number(100.0));

    // Catalogs stay separate while artifacts land in the shared store.
    assert!(pricing.catalog().get_version("loan-decision", None, false).is_err());
    assert_eq!(proofs.len(), 2);
    assert_eq!(pricing.proof(&decision.proof.id).unwrap().result, Value::from("approve"));
    assert_eq!(underwriting.proof(&fee.proof.id).unwrap().stable_id.as_deref(), Some("pricing"));
}
