use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;

use eeprobe::engine::{JobOutcome, JobUpdate};
use eeprobe::remote::FailureMode;
use eeprobe::render::Section;
use eeprobe::{
    AsyncMode, DispatchEngine, InMemorySource, JobHandle, JobState, Placeholder, PlaceholderState,
    ProbeTarget, RenderNode, TypeTag,
};

const RECV_TIMEOUT_MS: u64 = 5_000;

fn image(id: &str) -> serde_json::Value {
    json!({
        "type": "Image",
        "id": id,
        "bands": [],
        "properties": {"system:index": id},
    })
}

async fn resolve_inline(engine: &DispatchEngine, id: &str, local_type: &str) -> Placeholder {
    let placeholder = Placeholder::loading();
    engine
        .dispatch_with(
            ProbeTarget::remote(id, local_type),
            placeholder.clone(),
            AsyncMode::Inline,
        )
        .await;
    placeholder
}

async fn next_update(rx: &mut tokio::sync::mpsc::UnboundedReceiver<JobUpdate>) -> JobUpdate {
    timeout(Duration::from_millis(RECV_TIMEOUT_MS), rx.recv())
        .await
        .expect("update timed out")
        .expect("update channel closed unexpectedly")
}

fn field_pairs(nodes: &[RenderNode]) -> Vec<(String, String)> {
    nodes
        .iter()
        .filter_map(|node| match node {
            RenderNode::Field { label, value } => Some((label.clone(), value.clone())),
            _ => None,
        })
        .collect()
}

fn image_id(placeholder: &Placeholder) -> String {
    let tree = placeholder.content().expect("placeholder has content");
    field_pairs(&tree.nodes)
        .into_iter()
        .find(|(label, _)| label == "Image id")
        .map(|(_, value)| value)
        .expect("rendered image carries an id field")
}

#[tokio::test]
async fn renders_remote_dictionary_with_sorted_keys() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new().insert("config", json!({"b": 2, "a": 1})),
    ));

    let placeholder = resolve_inline(&engine, "config", "Dictionary").await;

    assert_eq!(placeholder.state(), PlaceholderState::Rendered);
    let tree = placeholder.content().unwrap();
    assert_eq!(
        field_pairs(&tree.nodes),
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]
    );
}

#[tokio::test]
async fn server_type_falls_back_to_local_handle_type() {
    // No "type" key in the description, so the handle's client-side
    // class name stands in for both type labels.
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new().insert("opaque", json!({"value": 42})),
    ));

    let placeholder = resolve_inline(&engine, "opaque", "ComputedObject").await;

    assert_eq!(placeholder.state(), PlaceholderState::Rendered);
    assert_eq!(placeholder.label(), "ComputedObject [0s]");
    let tree = placeholder.content().unwrap();
    assert_eq!(
        field_pairs(&tree.nodes),
        vec![("value".to_string(), "42".to_string())]
    );
}

#[tokio::test]
async fn date_range_renders_utc_bounds() {
    let engine = DispatchEngine::new(Arc::new(InMemorySource::new().insert(
        "range",
        json!({"type": "DateRange", "dates": [0, 86_400_000i64]}),
    )));

    let placeholder = resolve_inline(&engine, "range", "DateRange").await;

    let tree = placeholder.content().unwrap();
    assert_eq!(
        tree.nodes,
        vec![RenderNode::text(
            "1970-01-01T00:00:00 to 1970-01-02T00:00:00"
        )]
    );
}

#[tokio::test]
async fn url_strings_render_as_links() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new().insert("thumb", json!("http://example.com")),
    ));

    let placeholder = resolve_inline(&engine, "thumb", "String").await;

    let tree = placeholder.content().unwrap();
    assert_eq!(tree.nodes, vec![RenderNode::link("http://example.com")]);
}

#[tokio::test]
async fn permission_denied_renders_error_and_traceback_sections() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new()
            .insert("secret", image("secret"))
            .with_failure("secret", FailureMode::PermissionDenied),
    ));

    let placeholder = resolve_inline(&engine, "secret", "Image").await;

    assert_eq!(placeholder.state(), PlaceholderState::Errored);
    assert_eq!(placeholder.label(), "ERROR");
    let tree = placeholder.content().unwrap();
    let error = tree.find_section("ERROR").expect("error section present");
    assert!(matches!(
        error.children.as_slice(),
        [RenderNode::Text(message)] if message.contains("secret")
    ));
    assert!(tree.find_section("TRACEBACK").is_some());
}

#[tokio::test]
async fn repeat_dispatch_renders_identical_trees() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new().insert("landsat", image("LANDSAT/LC08")),
    ));

    let first = resolve_inline(&engine, "landsat", "Image").await;
    let second = resolve_inline(&engine, "landsat", "Image").await;

    assert_eq!(first.content(), second.content());
}

#[tokio::test]
async fn latest_registered_renderer_wins() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new().insert("scene", image("scene")),
    ));
    engine.register_renderer_fn([TypeTag::Image], |_ctx, _desc| {
        Ok(eeprobe::RenderTree::leaf(RenderNode::text("first")))
    });
    engine.register_renderer_fn([TypeTag::Image], |_ctx, _desc| {
        Ok(eeprobe::RenderTree::leaf(RenderNode::text("second")))
    });

    let placeholder = resolve_inline(&engine, "scene", "Image").await;

    let tree = placeholder.content().unwrap();
    assert_eq!(tree.nodes, vec![RenderNode::text("second")]);
}

#[tokio::test]
async fn staggered_jobs_bind_their_own_placeholders() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new()
            .insert("slow", image("slow"))
            .insert("fast", image("fast"))
            .insert("mid", image("mid"))
            .with_latency("slow", Duration::from_millis(300))
            .with_latency("fast", Duration::from_millis(100))
            .with_latency("mid", Duration::from_millis(200)),
    ));

    let mut handles = Vec::new();
    for id in ["slow", "fast", "mid"] {
        let placeholder = Placeholder::with_label(id);
        handles.push(
            engine
                .dispatch(ProbeTarget::remote(id, "Image"), placeholder)
                .await,
        );
    }
    futures::future::join_all(handles.iter_mut().map(JobHandle::wait)).await;

    for (handle, id) in handles.iter().zip(["slow", "fast", "mid"]) {
        assert_eq!(handle.state(), JobState::Completed);
        assert_eq!(image_id(handle.placeholder()), id);
    }
}

#[tokio::test]
async fn updates_channel_reports_completion_order() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new()
            .insert("slow", image("slow"))
            .insert("fast", image("fast"))
            .with_latency("slow", Duration::from_millis(300))
            .with_latency("fast", Duration::from_millis(100)),
    ));
    let mut updates = engine.take_updates().expect("first take yields receiver");

    let slow = engine
        .dispatch(ProbeTarget::remote("slow", "Image"), Placeholder::loading())
        .await;
    let fast = engine
        .dispatch(ProbeTarget::remote("fast", "Image"), Placeholder::loading())
        .await;

    let first = next_update(&mut updates).await;
    let second = next_update(&mut updates).await;

    // Completion order, not dispatch order
    assert_eq!(first.job_id, fast.id());
    assert_eq!(second.job_id, slow.id());
    assert!(matches!(first.outcome, JobOutcome::Completed(_)));
    assert!(matches!(second.outcome, JobOutcome::Completed(_)));
}

#[tokio::test]
async fn cancel_stops_job_mid_fetch() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new()
            .insert("stalled", image("stalled"))
            .with_latency("stalled", Duration::from_secs(60)),
    ));

    let mut handle = engine
        .dispatch(
            ProbeTarget::remote("stalled", "Image"),
            Placeholder::loading(),
        )
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel().await;

    assert_eq!(handle.state(), JobState::Cancelled);
    assert_eq!(handle.placeholder().state(), PlaceholderState::Cancelled);
    assert_eq!(handle.placeholder().label(), "CANCELLED");
    assert!(handle.placeholder().content().is_none());
}

#[tokio::test]
async fn cancel_after_completion_keeps_rendered_content() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new().insert("done", image("done")),
    ));

    let placeholder = Placeholder::loading();
    let mut handle = engine
        .dispatch_with(
            ProbeTarget::remote("done", "Image"),
            placeholder.clone(),
            AsyncMode::Inline,
        )
        .await;
    assert_eq!(handle.state(), JobState::Completed);

    handle.cancel().await;

    assert_eq!(handle.state(), JobState::Completed);
    assert_eq!(placeholder.state(), PlaceholderState::Rendered);
    assert_eq!(image_id(&placeholder), "done");
}

#[tokio::test]
async fn dispatch_all_returns_handles_in_input_order() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new()
            .insert("a", image("a"))
            .insert("b", image("b"))
            .insert("c", image("c"))
            .with_latency("a", Duration::from_millis(120)),
    ));

    let mut handles = engine
        .dispatch_all(["a", "b", "c"].map(|id| ProbeTarget::remote(id, "Image")))
        .await;
    futures::future::join_all(handles.iter_mut().map(JobHandle::wait)).await;

    let rendered: Vec<String> = handles
        .iter()
        .map(|handle| image_id(handle.placeholder()))
        .collect();
    assert_eq!(rendered, vec!["a", "b", "c"]);
    assert!(handles.windows(2).all(|pair| pair[0].id() < pair[1].id()));
}

#[tokio::test]
async fn single_dispatch_fetches_description_once() {
    let source = Arc::new(InMemorySource::new().insert(
        "nested",
        json!({
            "type": "Image",
            "id": "nested",
            "bands": [],
            "properties": {"lineage": {"stage": {"step": 1}}},
        }),
    ));
    let engine = DispatchEngine::new(source.clone());

    let placeholder = resolve_inline(&engine, "nested", "Image").await;

    assert_eq!(placeholder.state(), PlaceholderState::Rendered);
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn local_targets_render_without_touching_the_source() {
    let source = Arc::new(InMemorySource::new());
    let engine = DispatchEngine::new(source.clone());

    let placeholder = Placeholder::loading();
    engine
        .dispatch_with(
            ProbeTarget::local(json!({"k": "v"})),
            placeholder.clone(),
            AsyncMode::Inline,
        )
        .await;

    assert_eq!(placeholder.state(), PlaceholderState::Rendered);
    assert_eq!(placeholder.label(), "Dictionary [0s]");
    assert_eq!(source.fetch_count(), 0);
}

#[tokio::test]
async fn collapse_follows_section_count() {
    let engine = DispatchEngine::new(Arc::new(
        InMemorySource::new()
            .insert("scalar", json!("plain"))
            .insert("scene", image("scene")),
    ));

    // One leaf node: stays expanded
    let scalar = resolve_inline(&engine, "scalar", "String").await;
    assert!(!scalar.is_collapsed());

    // Bands + Properties sections: collapses
    let scene = resolve_inline(&engine, "scene", "Image").await;
    assert!(scene.is_collapsed());
}

#[tokio::test]
async fn unknown_types_fall_back_to_generic_rendering() {
    let engine = DispatchEngine::new(Arc::new(InMemorySource::new().insert(
        "model",
        json!({"type": "Classifier", "mode": "CART", "trees": 10}),
    )));

    let placeholder = resolve_inline(&engine, "model", "Classifier").await;

    assert_eq!(placeholder.state(), PlaceholderState::Rendered);
    let tree = placeholder.content().unwrap();
    let labels: Vec<String> = field_pairs(&tree.nodes)
        .into_iter()
        .map(|(label, _)| label)
        .collect();
    assert_eq!(labels, vec!["mode", "trees", "type"]);
}

#[tokio::test]
async fn nested_sections_arrive_collapsed() {
    let engine = DispatchEngine::new(Arc::new(InMemorySource::new().insert(
        "wrapper",
        json!({"outer": {"inner": 1}}),
    )));

    let placeholder = resolve_inline(&engine, "wrapper", "Dictionary").await;

    let tree = placeholder.content().unwrap();
    let outer: &Section = tree.find_section("outer").expect("outer section");
    assert!(outer.collapsed);
}
