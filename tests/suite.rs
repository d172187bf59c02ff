mod common;

use common::{FakeDriver, FakeElement};
use page_components::suite::Suite;

fn signup_page() -> std::sync::Arc<FakeDriver> {
    FakeDriver::new(vec![
        FakeElement::new("form").id("signup"),
        FakeElement::new("input").id("name").child_of(0),
        FakeElement::new("input").id("terms").attr("type", "checkbox").child_of(0),
        FakeElement::new("li").class("plan").text("Free"),
        FakeElement::new("li").class("plan").class("popular").text("Pro"),
    ])
}

#[tokio::test]
async fn test_suite_runs_all_steps() {
    let driver = signup_page();
    let suite = Suite::from_json(
        r##"{
            "components": [
                {"id": "signup", "kind": "form", "selector": "#signup"},
                {"id": "name", "kind": "typeable", "selector": "#name"},
                {"id": "terms", "kind": "input", "selector": "#terms"},
                {"id": "plans", "selector": ".plan"}
            ],
            "steps": [
                {"component": "name", "action": "type", "args": ["Ada"]},
                {"component": "name", "should": "have.value", "args": ["Ada"]},
                {"component": "terms", "action": "check"},
                {"component": "terms", "should": "be.checked"},
                {"component": "plans", "chain": [{"op": "filter", "args": [".popular"]}],
                 "should": "have.text", "args": ["Pro"]},
                {"component": "signup", "action": "submit"}
            ]
        }"##,
    )
    .unwrap();

    let report = suite.run(&driver.shared()).await.unwrap();

    assert!(report.success(), "{}", report.format_output());
    assert_eq!(report.passed, 6);
    assert_eq!(report.total, 6);
    assert!(driver.calls().contains(&"perform trigger(submit)".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_suite_stops_at_first_failure() {
    let driver = signup_page();
    let suite = Suite::from_json(
        r##"{
            "components": [{"id": "plans", "selector": ".plan"}],
            "steps": [
                {"component": "plans", "should": "have.length", "args": ["2"]},
                {"component": "plans", "chain": [{"op": "first"}], "should": "have.text", "args": ["Pro"]},
                {"component": "plans", "action": "click"}
            ]
        }"##,
    )
    .unwrap();

    let report = suite.run(&driver.shared()).await.unwrap();

    assert!(!report.success());
    assert_eq!(report.passed, 1);
    assert_eq!(report.total, 3);
    assert!(report
        .failure
        .as_deref()
        .unwrap()
        .contains("Expected '.plan >> first()' to have text 'Pro'"));
    assert!(driver.calls().iter().all(|c| !c.starts_with("perform")));
}

#[tokio::test]
async fn test_suite_rejects_unsupported_action() {
    let driver = signup_page();
    let suite = Suite::from_json(
        r##"{
            "components": [{"id": "plans", "selector": ".plan"}],
            "steps": [{"component": "plans", "action": "type", "args": ["x"]}]
        }"##,
    )
    .unwrap();

    let report = suite.run(&driver.shared()).await.unwrap();

    assert_eq!(report.passed, 0);
    assert!(report
        .failure
        .unwrap()
        .contains("does not support action 'type'"));
}
