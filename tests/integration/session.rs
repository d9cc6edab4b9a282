use livetpl::persistence::{Field, FileStore, MemoryStore, PersistenceBridge};
use livetpl::preview::MemoryPreviewHost;
use livetpl::session::{DataBuffer, Edit, Session, SessionHandle, TemplateDocument};
use livetpl::templating::{Compiler, Engine};
use livetpl::test_utils::{TestWorkspace, init_test_logging};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

fn document() -> TemplateDocument {
    TemplateDocument {
        markup: "<p>{{name}}</p>".to_string(),
        stylesheet: String::new(),
        data: DataBuffer::new(json!({"name": "World"})),
        engine: Engine::Handlebars,
    }
}

fn memory_session() -> Session<MemoryStore, MemoryPreviewHost> {
    Session::new(
        document(),
        Arc::new(Compiler::default()),
        PersistenceBridge::new(MemoryStore::new()),
        MemoryPreviewHost::new(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_editing_walkthrough() {
    init_test_logging(None);
    let handle = SessionHandle::spawn(memory_session());

    // A half-typed data edit keeps the last valid value.
    handle.send(Edit::DataText("{\"name\": \"Ru".to_string())).await.unwrap();
    sleep(Duration::from_millis(600)).await;

    handle.send(Edit::DataText("{\"name\": \"Rust\"}".to_string())).await.unwrap();
    sleep(Duration::from_millis(600)).await;

    // Switching to html shows the raw markup.
    handle.send(Edit::Engine(Engine::Html)).await.unwrap();
    sleep(Duration::from_millis(600)).await;

    let session = handle.close().await.unwrap();
    assert_eq!(session.document().data.value(), &json!({"name": "Rust"}));
    assert_eq!(session.last_result().body(), "<p>{{name}}</p>");
    assert_eq!(session.bridge().load(Field::Engine).as_deref(), Some("html"));
    assert_eq!(session.bridge().load(Field::Data).map(|d| d.contains("Rust")), Some(true));
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_compile_once() {
    let handle = SessionHandle::spawn(memory_session());

    for i in 0..20 {
        handle.send(Edit::Markup(format!("<p>{i} {{{{name}}}}</p>"))).await.unwrap();
        sleep(Duration::from_millis(50)).await;
    }
    sleep(Duration::from_millis(600)).await;

    let session = handle.close().await.unwrap();
    assert_eq!(session.last_result().body(), "<p>19 World</p>");
    // Initial render plus one settled recompile.
    assert_eq!(session.preview().renders(), 2);
    assert_eq!(session.bridge().store().writes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_continuous_editing_still_persists_within_max_wait() {
    let ws = TestWorkspace::new().unwrap();
    let store = FileStore::open(ws.state_path()).unwrap();
    let session = Session::new(
        document(),
        Arc::new(Compiler::default()),
        PersistenceBridge::new(store),
        MemoryPreviewHost::new(),
    );
    let handle = SessionHandle::spawn(session);

    // An edit every 200ms never leaves a one-second quiet gap.
    for i in 0..27 {
        handle.send(Edit::Markup(format!("<p>{i}</p>"))).await.unwrap();
        sleep(Duration::from_millis(200)).await;
    }

    let persisted = ws.read_state("html").unwrap();
    assert!(persisted.is_some(), "markup not persisted after 5.4s of continuous edits");

    drop(handle);
}

#[tokio::test(start_paused = true)]
async fn test_state_survives_across_sessions() {
    let ws = TestWorkspace::new().unwrap();

    let first = Session::new(
        document(),
        Arc::new(Compiler::default()),
        PersistenceBridge::new(FileStore::open(ws.state_path()).unwrap()),
        MemoryPreviewHost::new(),
    );
    let handle = SessionHandle::spawn(first);
    handle.send(Edit::Markup("<h2>{{ name }}</h2>".to_string())).await.unwrap();
    handle.send(Edit::Stylesheet("h2 { color: teal; }".to_string())).await.unwrap();
    handle.send(Edit::Engine(Engine::Tera)).await.unwrap();
    handle.close().await.unwrap();

    let bridge = PersistenceBridge::new(FileStore::open(ws.state_path()).unwrap());
    let restored = bridge.load_document(&TemplateDocument::default());
    assert_eq!(restored.markup, "<h2>{{ name }}</h2>");
    assert_eq!(restored.stylesheet, "h2 { color: teal; }");
    assert_eq!(restored.engine, Engine::Tera);

    let second = Session::new(
        restored,
        Arc::new(Compiler::default()),
        bridge,
        MemoryPreviewHost::new(),
    );
    assert_eq!(second.last_result().body(), "<h2>World</h2>");
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_pending_timers() {
    let ws = TestWorkspace::new().unwrap();
    let session = Session::new(
        document(),
        Arc::new(Compiler::default()),
        PersistenceBridge::new(FileStore::open(ws.state_path()).unwrap()),
        MemoryPreviewHost::new(),
    );
    let handle = SessionHandle::spawn(session);

    handle.send(Edit::Markup("<p>late</p>".to_string())).await.unwrap();
    sleep(Duration::from_millis(10)).await;
    drop(handle);
    sleep(Duration::from_secs(10)).await;

    assert_eq!(ws.read_state("html").unwrap(), None);
}
