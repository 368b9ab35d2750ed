use admin_form_assist::{
    form::{
        admin_page::AdminPage,
        field_view::FormSurface,
        form_model::{FieldSelector, RuleTable},
        visibility::VisibilityRuleEngine,
    },
    lookup::annotator::{LookupAnnotator, ResponseOrdering},
    trace::{logger::TraceLogger, trace::TraceEvent},
};
use serde_json::Value;

use crate::common::utils::{reply, temp_trace_path};

mod common;

fn read_events(path: &std::path::Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn logger_appends_one_json_line_per_event() {
    let path = temp_trace_path("lines");
    let tracer = TraceLogger::new(path.to_str().unwrap());
    assert!(tracer.is_enabled());

    tracer.log(&TraceEvent::now("lookup", "issued").with_key("item-stock-info").with_seq(1));
    tracer.log(&TraceEvent::now("lookup", "applied").with_field("id_item"));

    let events = read_events(&path);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["component"], "lookup");
    assert_eq!(events[0]["event"], "issued");
    assert_eq!(events[0]["key"], "item-stock-info");
    assert_eq!(events[0]["seq"], 1);
    assert!(events[0].get("field").is_none());
    assert_eq!(events[1]["field"], "id_item");
    assert!(events[1]["timestamp_ms"].as_u64().unwrap() > 0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn unopenable_path_disables_tracing() {
    let tracer = TraceLogger::new("/nonexistent-dir/trace.jsonl");
    assert!(!tracer.is_enabled());
    // Logging to a disabled tracer is a no-op.
    tracer.log(&TraceEvent::now("visibility", "applied"));

    assert!(!TraceLogger::disabled().is_enabled());
    assert!(!TraceLogger::from_path(None).is_enabled());
}

#[test]
fn visibility_event_lists_visible_and_hidden_groups() {
    let path = temp_trace_path("visibility");
    let tracer = TraceLogger::from_path(path.to_str());
    let mut page = AdminPage::item_stock_request();
    page.set_value("id_request_type", Some("new".into()));

    let engine = VisibilityRuleEngine::bind(RuleTable::item_stock_request(), &page);
    engine.init(&mut page, &tracer);

    let events = read_events(&path);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["component"], "visibility");
    assert_eq!(events[0]["field"], "id_request_type");
    assert_eq!(events[0]["detail"], "value=new");
    assert_eq!(
        events[0]["visible"],
        serde_json::json!(["approval", "count", "new_item"])
    );
    assert_eq!(events[0]["hidden"], serde_json::json!(["existing_item"]));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn lookup_lifecycle_is_traced() {
    let path = temp_trace_path("lookup");
    let tracer = TraceLogger::from_path(path.to_str());
    let mut page = AdminPage::item_booking();
    let mut annotator = LookupAnnotator::stock(
        &FieldSelector::id("id_item"),
        &page,
        ResponseOrdering::LatestRequest,
    );

    annotator.on_trigger_change(&page, "id_item", &tracer);
    page.set_value("id_item", Some("42".into()));
    let first = annotator.on_trigger_change(&page, "id_item", &tracer).unwrap();
    page.set_value("id_item", Some("43".into()));
    let second = annotator.on_trigger_change(&page, "id_item", &tracer).unwrap();
    annotator.on_complete(&mut page, reply(&second, r#"{"stock": 0}"#), &tracer);
    annotator.on_complete(&mut page, reply(&first, r#"{"stock": 7}"#), &tracer);

    let kinds: Vec<String> = read_events(&path)
        .iter()
        .map(|e| e["event"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["skipped", "issued", "issued", "applied", "stale"]);

    let _ = std::fs::remove_file(&path);
}
