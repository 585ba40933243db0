//! Runtime tests: listing, compilation, composition and lifecycle dispatch
//! over live documents.

extern crate formscript;

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use formscript::controller::{
    Document, DocumentScripts, MemoryScriptSource, RuntimeConfig, RuntimeError, RuntimeState,
    ScriptRecord, ScriptRuntime, ScriptSource, SourceError, StaticMetaResolver,
};
use formscript::runner::ds::operations::json::to_json;
use formscript::runner::ds::operations::object::{get_property, set_property};
use formscript::runner::ds::operations::type_conversion::to_display_string;
use formscript::runner::ds::value::ScriptValue;
use formscript::runner::plugin::CapabilitySet;
use serde_json::json;

type Log = Rc<RefCell<Vec<String>>>;

/// `record(...)` appends its arguments, joined by spaces, to the log.
fn recording_capabilities(log: &Log) -> CapabilitySet {
    let log = log.clone();
    CapabilitySet::new().with_function("record", move |_, _, args| {
        log.borrow_mut()
            .push(args.iter().map(to_display_string).collect::<Vec<_>>().join(" "));
        Ok(ScriptValue::Undefined)
    })
}

fn widget_records(scripts: &[&str]) -> Vec<ScriptRecord> {
    scripts
        .iter()
        .enumerate()
        .map(|(i, s)| ScriptRecord::new(format!("Widget Script {}", i + 1), "Widget", *s))
        .collect()
}

fn runtime(source: Rc<MemoryScriptSource>, log: &Log) -> ScriptRuntime {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let meta = StaticMetaResolver::new().with("Widget", json!({ "fields": [{ "fieldname": "email" }] }));
    ScriptRuntime::new(source, recording_capabilities(log), Rc::new(meta), RuntimeConfig::default())
}

fn widget(name: &str) -> Document {
    Document::from_json(
        "Widget",
        name,
        &json!({
            "email": "a@x.com",
            "title": "first",
            "items": [
                { "doctype": "Widget Items", "parentfield": "items", "idx": 1, "name": "row-1", "qty": 2 },
                { "doctype": "Widget Items", "parentfield": "items", "idx": 2, "name": "row-2" }
            ]
        }),
    )
}

async fn setup(scripts: &[&str], log: &Log) -> (ScriptRuntime, Rc<DocumentScripts>, Document) {
    let source = Rc::new(MemoryScriptSource::new(widget_records(scripts)));
    let runtime = runtime(source, log);
    let document = widget("W-1");
    let scripts = match runtime.setup_script(document.clone()).await {
        Ok(s) => s,
        Err(e) => panic!("setup failed: {}", e),
    };
    (runtime, scripts, document)
}

fn class_names(scripts: &DocumentScripts) -> Vec<String> {
    scripts
        .controllers()
        .iter()
        .map(|c| c.class_name.clone())
        .collect()
}

// ── Scenarios ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_on_load_mutates_the_document() {
    let log = Log::default();
    let (_rt, scripts, document) = setup(&["class Widget { onload() { this.doc.touched = true } }"], &log).await;
    let outcome = scripts.trigger_on_load().await;
    assert_eq!(outcome.invoked, 1);
    assert_eq!(outcome.failed, 0);
    assert_eq!(document.get("touched"), json!(true));
}

#[tokio::test]
async fn test_row_change_updates_only_that_row() {
    let log = Log::default();
    let script = r#"
        class Widget {}
        class WidgetItems {
            rate() {
                this.doc.getRow('items', this.currentRowIdx).amount = this.value * 2
            }
        }
    "#;
    let (_rt, scripts, document) = setup(&[script], &log).await;
    let rows = document.rows("items");
    scripts.trigger_on_change("rate", json!(5), Some(&rows[1])).await.unwrap();
    let items = document.get("items");
    assert_eq!(items[1]["amount"], json!(10));
    assert_eq!(items[1]["rate"], json!(5));
    assert_eq!(items[0].get("amount"), None);
    assert_eq!(document.get("amount"), serde_json::Value::Null);
}

#[tokio::test]
async fn test_broken_script_does_not_affect_others() {
    let log = Log::default();
    let scripts = [
        "class Widget { onload() { record('widget') } }",
        "class WidgetItems { onload( { }",
        "class WidgetItems { items_add() { record('items') } }",
    ];
    let (_rt, document_scripts, _doc) = setup(&scripts, &log).await;
    assert_eq!(class_names(&document_scripts), vec!["Widget", "WidgetItems"]);
    document_scripts.trigger_on_load().await;
    assert_eq!(*log.borrow(), vec!["widget".to_string()]);
}

#[tokio::test]
async fn test_rejected_change_is_rolled_back() {
    let log = Log::default();
    let script = r#"
        class Widget {
            email() {
                if (!this.value.includes('@')) {
                    throw { message: 'invalid email' };
                }
            }
        }
    "#;
    let (_rt, scripts, document) = setup(&[script], &log).await;
    let result = scripts.trigger_on_change("email", json!("bad"), None).await;
    match result {
        Err(RuntimeError::Handler { class, handler, cause }) => {
            assert_eq!(class, "Widget");
            assert_eq!(handler, "email");
            assert_eq!(cause.message(), "invalid email");
        }
        other => panic!("expected a handler error, got {:?}", other.map(|_| ())),
    }
    assert_eq!(document.get("email"), json!("a@x.com"));

    scripts.trigger_on_change("email", json!("b@x.com"), None).await.unwrap();
    assert_eq!(document.get("email"), json!("b@x.com"));
}

// ── on-change ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rollback_removes_a_field_that_was_absent() {
    let log = Log::default();
    let (_rt, scripts, document) = setup(&["class Widget { discount() { throw 'no' } }"], &log).await;
    assert!(scripts.trigger_on_change("discount", json!(5), None).await.is_err());
    assert!(document.to_json().get("discount").is_none());
}

#[tokio::test]
async fn test_rollback_clears_the_controller_mirror() {
    let log = Log::default();
    let scripts = [
        "class Widget { refresh() { record('mirror', this.nickname) } }",
        "class Widget { nickname() { throw 'no' } }",
    ];
    let (_rt, scripts, _document) = setup(&scripts, &log).await;
    assert!(scripts.trigger_on_change("nickname", json!("bad"), None).await.is_err());
    scripts.trigger_on_refresh().await;
    assert_eq!(*log.borrow(), vec!["mirror undefined".to_string()]);
}

#[tokio::test]
async fn test_rollback_restores_every_controller_mirror() {
    let log = Log::default();
    let scripts = [
        "class Widget { title() { throw 'locked' } refresh() { record('root', this.title) } }",
        "class WidgetItems { rate() { record('child', this.title) } }",
    ];
    let (_rt, document_scripts, document) = setup(&scripts, &log).await;
    assert!(document_scripts.trigger_on_change("title", json!("second"), None).await.is_err());
    document_scripts.trigger_on_refresh().await;
    let rows = document.rows("items");
    document_scripts.trigger_on_change("rate", json!(1), Some(&rows[0])).await.unwrap();
    assert_eq!(*log.borrow(), vec!["root first".to_string(), "child first".to_string()]);
}

#[tokio::test]
async fn test_child_write_through_doc_updates_every_mirror() {
    let log = Log::default();
    let script = r#"
        class Widget { refresh() { record('root sees', this.title) } }
        class WidgetItems {
            rate() {
                this.doc.title = 'changed';
                record('child sees', this.title)
            }
        }
    "#;
    let (_rt, scripts, document) = setup(&[script], &log).await;
    let rows = document.rows("items");
    scripts.trigger_on_change("rate", json!(5), Some(&rows[1])).await.unwrap();
    scripts.trigger_on_refresh().await;
    assert_eq!(document.get("title"), json!("changed"));
    assert_eq!(
        *log.borrow(),
        vec!["child sees changed".to_string(), "root sees changed".to_string()]
    );
}

#[tokio::test]
async fn test_min_integer_arithmetic_in_handlers_does_not_abort() {
    let log = Log::default();
    let script = r#"
        class Widget {
            onload() { this.doc.q = (-9223372036854775807 - 1) / -1 }
            qty() { record('' + this.value % -1) }
        }
    "#;
    let (_rt, scripts, document) = setup(&[script], &log).await;
    let outcome = scripts.trigger_on_load().await;
    assert_eq!(outcome.failed, 0);
    assert_eq!(document.get("q").as_f64(), Some(9_223_372_036_854_775_808.0));
    scripts.trigger_on_change("qty", json!(i64::MIN), None).await.unwrap();
    assert_eq!(*log.borrow(), vec!["0".to_string()]);
}

#[tokio::test]
async fn test_rollback_is_idempotent_across_values() {
    let log = Log::default();
    let (_rt, scripts, document) = setup(&["class Widget { title() { throw 'locked' } }"], &log).await;
    for value in [json!("second"), json!(3), json!(null), json!({ "a": 1 })] {
        assert!(scripts.trigger_on_change("title", value, None).await.is_err());
        assert_eq!(document.get("title"), json!("first"));
    }
}

#[tokio::test]
async fn test_change_sets_value_and_old_value() {
    let log = Log::default();
    let script = "class Widget { title() { record(this.oldValue, '->', this.value, this.title) } }";
    let (_rt, scripts, _document) = setup(&[script], &log).await;
    scripts.trigger_on_change("title", json!("second"), None).await.unwrap();
    assert_eq!(*log.borrow(), vec!["first -> second second".to_string()]);
}

#[tokio::test]
async fn test_first_failing_handler_stops_the_change() {
    let log = Log::default();
    let scripts = [
        "class Widget { title() { record('first'); throw 'stop' } }",
        "class Widget { title() { record('second') } }",
    ];
    let (_rt, document_scripts, document) = setup(&scripts, &log).await;
    assert!(document_scripts.trigger_on_change("title", json!("x"), None).await.is_err());
    assert_eq!(*log.borrow(), vec!["first".to_string()]);
    assert_eq!(document.get("title"), json!("first"));
}

#[tokio::test]
async fn test_change_without_handler_keeps_value() {
    let log = Log::default();
    let (_rt, scripts, document) = setup(&["class Widget {}"], &log).await;
    scripts.trigger_on_change("status", json!("Open"), None).await.unwrap();
    assert_eq!(document.get("status"), json!("Open"));
}

// ── Dispatch ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_handler_names_are_tried_in_order() {
    let log = Log::default();
    let scripts = [
        "class Widget { onLoad() { record('camel') } onload() { record('lower') } }",
        "class Widget { on_load() { record('snake') } }",
    ];
    let (_rt, document_scripts, _doc) = setup(&scripts, &log).await;
    document_scripts.trigger_on_load().await;
    assert_eq!(*log.borrow(), vec!["camel".to_string(), "snake".to_string()]);
}

#[tokio::test]
async fn test_failing_controller_does_not_stop_others() {
    let log = Log::default();
    let scripts = [
        "class Widget { onSave() { missing() } }",
        "class Widget { onSave() { record('saved') } }",
    ];
    let (_rt, document_scripts, _doc) = setup(&scripts, &log).await;
    let outcome = document_scripts.trigger_on_save().await;
    assert_eq!(outcome.invoked, 2);
    assert_eq!(outcome.failed, 1);
    assert_eq!(*log.borrow(), vec!["saved".to_string()]);
}

#[tokio::test]
async fn test_concurrent_triggers_run_one_chain_at_a_time() {
    let log = Log::default();
    let scripts = [
        "class Widget { onload() { record('a:load') } onSave() { record('a:save') } }",
        "class Widget { onload() { record('b:load') } onSave() { record('b:save') } }",
    ];
    let (_rt, document_scripts, _doc) = setup(&scripts, &log).await;
    tokio::join!(document_scripts.trigger_on_load(), document_scripts.trigger_on_save());
    assert_eq!(
        *log.borrow(),
        vec!["a:load", "b:load", "a:save", "b:save"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_trigger_arguments_are_passed() {
    let log = Log::default();
    let script = r#"
        class Widget {
            onBeforeCreate(a, b) { record('before', a, b.x) }
            onCreateLead(id) { record('lead', id) }
            convertToDeal(deal) { record('deal', deal) }
            refresh() { record('refresh') }
        }
    "#;
    let (_rt, scripts, _doc) = setup(&[script], &log).await;
    scripts.trigger_on_before_create(vec![json!(1), json!({ "x": "y" })]).await;
    scripts.trigger_on_create_lead(vec![json!("LEAD-1")]).await;
    scripts.trigger_convert_to_deal(vec![json!("DEAL-1")]).await;
    scripts.trigger_on_refresh().await;
    assert_eq!(
        *log.borrow(),
        vec!["before 1 y", "lead LEAD-1", "deal DEAL-1", "refresh"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_row_add_sets_cursor_and_value() {
    let log = Log::default();
    let script = r#"
        class Widget {}
        class WidgetItems {
            items_add() { record('add', this.currentRowIdx, this.value.qty) }
        }
    "#;
    let (_rt, scripts, document) = setup(&[script], &log).await;
    let rows = document.rows("items");
    let outcome = scripts.trigger_on_row_add(&rows[0]).await;
    assert_eq!(outcome.invoked, 1);
    assert_eq!(*log.borrow(), vec!["add 1 2".to_string()]);
}

#[tokio::test]
async fn test_row_remove_single_and_multiple() {
    let log = Log::default();
    let script = r#"
        class Widget {}
        class WidgetItems {
            items_remove() { record(this.currentRowIdx, this.value.length ?? this.value.name) }
        }
    "#;
    let (_rt, scripts, document) = setup(&[script], &log).await;
    let rows = document.rows("items");
    scripts.trigger_on_row_remove(&["row-2".to_string()], &rows).await;
    scripts
        .trigger_on_row_remove(&["row-1".to_string(), "row-2".to_string()], &rows)
        .await;
    assert_eq!(
        *log.borrow(),
        vec!["row-2 row-2".to_string(), "row-1,row-2 2".to_string()]
    );
}

#[tokio::test]
async fn test_row_remove_without_rows_is_a_no_op() {
    let log = Log::default();
    let (_rt, scripts, _doc) = setup(&["class Widget { items_remove() { record('x') } }"], &log).await;
    let outcome = scripts.trigger_on_row_remove(&[], &[]).await;
    assert_eq!(outcome.invoked, 0);
    assert!(log.borrow().is_empty());
}

// ── Composition ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_root_precedes_children() {
    let log = Log::default();
    let scripts = [
        "class WidgetItems {}\nclass Widget {}\nclass WidgetNotes {}",
        "class WidgetItems {}",
    ];
    let (_rt, document_scripts, _doc) = setup(&scripts, &log).await;
    let names = class_names(&document_scripts);
    assert_eq!(names, vec!["Widget", "WidgetNotes", "WidgetItems"]);
    for c in &document_scripts.controllers()[1..] {
        assert_eq!(c.parent().map(|p| p.class_name.as_str()), Some("Widget"));
    }
    assert_eq!(document_scripts.registry().root_index(), Some(0));
}

#[tokio::test]
async fn test_scripts_without_classes_contribute_nothing() {
    let log = Log::default();
    let (_rt, with_extra, _doc) = setup(&["const helper = 1;", "class Widget {}", "// nothing"], &log).await;
    let (_rt2, plain, _doc2) = setup(&["class Widget {}"], &log).await;
    assert_eq!(class_names(&with_extra), class_names(&plain));
}

#[tokio::test]
async fn test_no_scripts_makes_dispatch_a_no_op() {
    let log = Log::default();
    let (_rt, scripts, document) = setup(&[], &log).await;
    assert!(scripts.controllers().is_empty());
    assert_eq!(scripts.trigger_on_load().await.invoked, 0);
    scripts.trigger_on_change("title", json!("x"), None).await.unwrap();
    assert_eq!(document.get("title"), json!("x"));
}

#[tokio::test]
async fn test_document_fields_are_mirrored_on_instances() {
    let log = Log::default();
    let (_rt, scripts, _doc) = setup(&["class Widget { title = 'default' }"], &log).await;
    let root = &scripts.get_controllers(None)[0];
    assert_eq!(root.get("title").unwrap(), ScriptValue::String("first".to_string()));
}

#[tokio::test]
async fn test_get_meta_is_available() {
    let log = Log::default();
    let script = "class Widget { onload() { record(this.getMeta('Widget').fields[0].fieldname) } }";
    let (_rt, scripts, _doc) = setup(&[script], &log).await;
    scripts.trigger_on_load().await;
    assert_eq!(*log.borrow(), vec!["email".to_string()]);
}

#[tokio::test]
async fn test_get_controllers_by_row_doctype() {
    let log = Log::default();
    let (_rt, scripts, document) = setup(&["class Widget {}\nclass WidgetItems {}"], &log).await;
    let rows = document.rows("items");
    let for_row: Vec<String> = scripts
        .get_controllers(Some(&rows[0]))
        .iter()
        .map(|c| c.class_name.clone())
        .collect();
    assert_eq!(for_row, vec!["WidgetItems"]);
    assert_eq!(scripts.get_controllers(None)[0].class_name, "Widget");
}

// ── Proxy ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_proxy_reads_and_writes_through() {
    let log = Log::default();
    let (_rt, scripts, document) = setup(&["class Widget {}"], &log).await;
    let doc = scripts.doc();
    assert_eq!(get_property(&doc, "title").unwrap(), ScriptValue::String("first".to_string()));
    set_property(&doc, "title", ScriptValue::String("renamed".to_string())).unwrap();
    assert_eq!(get_property(&doc, "title").unwrap(), ScriptValue::String("renamed".to_string()));
    assert_eq!(document.get("title"), json!("renamed"));
    let root = &scripts.get_controllers(None)[0];
    assert_eq!(root.get("title").unwrap(), ScriptValue::String("renamed".to_string()));
}

#[tokio::test]
async fn test_trigger_bridge_calls_controller_methods() {
    let log = Log::default();
    let script = "class Widget { greet(name) { return 'hello ' + name + ' from ' + this.doc.title } }";
    let (_rt, scripts, _doc) = setup(&[script], &log).await;
    let doc = scripts.doc();
    let greeting = scripts
        .call_method(&doc, "trigger", vec![ScriptValue::String("greet".into()), ScriptValue::String("Ann".into())])
        .unwrap();
    assert_eq!(greeting, ScriptValue::String("hello Ann from first".to_string()));
    let missing = scripts
        .call_method(&doc, "trigger", vec![ScriptValue::String("nothing".into())])
        .unwrap();
    assert_eq!(missing, ScriptValue::Undefined);
}

#[tokio::test]
async fn test_row_proxy_and_get_row() {
    let log = Log::default();
    let script = r#"
        class Widget {}
        class WidgetItems {
            getRow(field, idx) { return 'custom' }
        }
    "#;
    let (_rt, scripts, document) = setup(&[script], &log).await;
    let rows = document.rows("items");
    let row = scripts.row(&rows[0]);
    assert_eq!(to_json(&get_property(&row, "qty").unwrap()), json!(2));
    let child = &scripts.get_controllers(Some(&rows[0]))[0];
    let hoisted = get_property(&child.doc(), "getRow").unwrap();
    assert!(hoisted.is_callable());
    assert_eq!(
        scripts.call_method(&child.doc(), "getRow", vec![]).unwrap(),
        ScriptValue::String("custom".to_string())
    );
}

// ── Runtime cache ────────────────────────────────────────────────────

/// Yields before answering, so concurrent callers overlap.
struct SlowSource {
    inner: MemoryScriptSource,
}

#[async_trait(?Send)]
impl ScriptSource for SlowSource {
    async fn list_scripts(&self, doctype: &str, view: &str) -> Result<Vec<ScriptRecord>, SourceError> {
        tokio::task::yield_now().await;
        self.inner.list_scripts(doctype, view).await
    }
}

#[tokio::test]
async fn test_concurrent_setup_compiles_once() {
    let log = Log::default();
    let source = Rc::new(SlowSource {
        inner: MemoryScriptSource::new(widget_records(&["class Widget {}"])),
    });
    let runtime = ScriptRuntime::new(
        source.clone(),
        recording_capabilities(&log),
        Rc::new(StaticMetaResolver::new()),
        RuntimeConfig::default(),
    );
    let (a, b) = tokio::join!(runtime.setup_script(widget("W-1")), runtime.setup_script(widget("W-1")));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(source.inner.calls(), 1);
}

#[tokio::test]
async fn test_scripts_are_listed_once_per_doctype() {
    let log = Log::default();
    let source = Rc::new(MemoryScriptSource::new(widget_records(&["class Widget {}"])));
    let runtime = runtime(source.clone(), &log);
    let first = runtime.setup_script(widget("W-1")).await.unwrap();
    let second = runtime.setup_script(widget("W-2")).await.unwrap();
    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_states_follow_setup_and_eviction() {
    let log = Log::default();
    let source = Rc::new(MemoryScriptSource::new(widget_records(&["class Widget {}"])));
    let runtime = runtime(source, &log);
    assert_eq!(runtime.state("Widget", "W-1"), RuntimeState::Uninitialized);
    runtime.setup_script(widget("W-1")).await.unwrap();
    assert_eq!(runtime.state("Widget", "W-1"), RuntimeState::DispatchReady);
    assert!(runtime.document("Widget", "W-1").is_some());
    runtime.evict("Widget", "W-1");
    assert_eq!(runtime.state("Widget", "W-1"), RuntimeState::Uninitialized);
    assert!(runtime.document("Widget", "W-1").is_none());
}

#[tokio::test]
async fn test_reload_picks_up_new_scripts() {
    let log = Log::default();
    let source = Rc::new(MemoryScriptSource::new(widget_records(&["class Widget {}"])));
    let runtime = runtime(source.clone(), &log);
    let before = runtime.setup_script(widget("W-1")).await.unwrap();
    assert_eq!(before.controllers().len(), 1);

    source.push(ScriptRecord::new("Widget Script 2", "Widget", "class Widget {}"));
    let cached = runtime.setup_script(widget("W-1")).await.unwrap();
    assert_eq!(cached.controllers().len(), 1);

    runtime.reload("Widget");
    let after = runtime.setup_script(widget("W-1")).await.unwrap();
    assert_eq!(after.controllers().len(), 2);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_clear_cache_resets_everything() {
    let log = Log::default();
    let source = Rc::new(MemoryScriptSource::new(widget_records(&["class Widget {}"])));
    let runtime = runtime(source.clone(), &log);
    runtime.setup_script(widget("W-1")).await.unwrap();
    runtime.clear_cache();
    assert_eq!(runtime.state("Widget", "W-1"), RuntimeState::Uninitialized);
    runtime.setup_script(widget("W-1")).await.unwrap();
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_disabled_and_other_view_records_are_ignored() {
    let log = Log::default();
    let source = Rc::new(MemoryScriptSource::new(vec![
        ScriptRecord::new("a", "Widget", "class Widget { onload() { record('a') } }"),
        ScriptRecord::new("b", "Widget", "class Widget { onload() { record('b') } }").disabled(),
        ScriptRecord::new("c", "Widget", "class Widget { onload() { record('c') } }").in_view("List"),
    ]));
    let runtime = runtime(source, &log);
    let scripts = runtime.setup_script(widget("W-1")).await.unwrap();
    scripts.trigger_on_load().await;
    assert_eq!(*log.borrow(), vec!["a".to_string()]);
}

#[tokio::test]
async fn test_allow_list_hides_capabilities() {
    let log = Log::default();
    let source = Rc::new(MemoryScriptSource::new(widget_records(&[
        "class Widget { onload() { record('visible') } }",
    ])));
    let config = RuntimeConfig::parse("[capabilities]\nallow = []").unwrap();
    let runtime = ScriptRuntime::new(
        source,
        recording_capabilities(&log),
        Rc::new(StaticMetaResolver::new()),
        config,
    );
    let scripts = runtime.setup_script(widget("W-1")).await.unwrap();
    let outcome = scripts.trigger_on_load().await;
    assert_eq!(outcome.failed, 1);
    assert!(log.borrow().is_empty());
}
