//! Test: the indexer loop keeps the store current as files change
//!
//! Drives `Workspace::run` with synthetic watch events against a real
//! temporary directory, the same way the file system watcher would.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use treesense::{Settings, SymbolKind, WatchEvent, Workspace};

const DEBOUNCE_MS: u64 = 50;
const WAIT_LIMIT: Duration = Duration::from_secs(5);

fn test_workspace(root: &Path) -> Workspace {
    let mut settings = Settings::default();
    settings.file_watch.debounce_ms = DEBOUNCE_MS;
    settings.indexing.parallel_threads = 2;
    Workspace::new(Arc::new(settings), root).expect("workspace")
}

fn start_loop(workspace: &Workspace) -> (mpsc::Sender<WatchEvent>, JoinHandle<()>) {
    let (sender, events) = mpsc::channel(64);
    let handle = tokio::spawn(workspace.clone().run(events));
    (sender, handle)
}

/// Poll until `condition` holds or the wait limit is reached
async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

#[tokio::test]
async fn test_initial_scan_indexes_both_kinds() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("trees")).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(
        root.join("trees/main.xml"),
        "<root main_tree_to_execute=\"Main\">\n  <BehaviorTree ID=\"Main\">\n    <MoveArm/>\n  </BehaviorTree>\n</root>\n",
    )
    .unwrap();
    fs::write(root.join("src/move_arm.hpp"), "// Moves the arm\nclass MoveArm : public SyncActionNode {};\n").unwrap();

    let ws = test_workspace(root);
    let stats = ws.index_workspace().await;

    assert_eq!(stats.files_indexed, 2);
    assert!(stats.errors.is_empty());

    let main = ws.definitions(SymbolKind::Tree, "Main");
    assert_eq!(main.len(), 1);
    assert_eq!(main[0].location.line, 1);
    assert_eq!(main[0].location.column, 2);
    assert!(main[0].path.ends_with("trees/main.xml"));

    let node = ws.definitions(SymbolKind::Node, "MoveArm");
    assert_eq!(node.len(), 1);
    assert_eq!(node[0].location.line, 1);
    assert_eq!(node[0].location.column, 0);
}

#[tokio::test]
async fn test_change_is_reindexed_after_debounce() {
    let temp_dir = TempDir::new().unwrap();
    let ws = test_workspace(temp_dir.path());
    let file = ws.root().join("tree.xml");
    fs::write(&file, r#"<BehaviorTree ID="Before"/>"#).unwrap();
    ws.index_workspace().await;
    assert!(ws.store().contains(SymbolKind::Tree, "Before"));

    let (events, handle) = start_loop(&ws);
    fs::write(&file, r#"<BehaviorTree ID="After"/>"#).unwrap();
    events.send(WatchEvent::Changed(file.clone())).await.unwrap();

    assert!(eventually(|| ws.store().contains(SymbolKind::Tree, "After")).await);
    assert!(!ws.store().contains(SymbolKind::Tree, "Before"));

    drop(events);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_burst_of_changes_settles_on_final_content() {
    let temp_dir = TempDir::new().unwrap();
    let ws = test_workspace(temp_dir.path());
    let file = ws.root().join("burst.xml");
    let (events, handle) = start_loop(&ws);

    for version in 1..=5 {
        fs::write(&file, format!(r#"<BehaviorTree ID="V{version}"/>"#)).unwrap();
        events.send(WatchEvent::Changed(file.clone())).await.unwrap();
    }

    assert!(eventually(|| ws.store().contains(SymbolKind::Tree, "V5")).await);
    assert_eq!(ws.store().names(SymbolKind::Tree), vec!["V5"]);
    assert!(eventually(|| !ws.is_pending(&file)).await);

    drop(events);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_created_file_is_picked_up() {
    let temp_dir = TempDir::new().unwrap();
    let ws = test_workspace(temp_dir.path());
    ws.index_workspace().await;
    assert!(ws.store().is_empty());

    let (events, handle) = start_loop(&ws);
    let file = ws.root().join("gripper.h");
    fs::write(&file, "class Gripper {};\n").unwrap();
    events.send(WatchEvent::Created(file)).await.unwrap();

    assert!(eventually(|| ws.store().contains(SymbolKind::Node, "Gripper")).await);

    drop(events);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_delete_cancels_pending_reindex() {
    let temp_dir = TempDir::new().unwrap();
    let ws = test_workspace(temp_dir.path());
    let file = ws.root().join("doomed.xml");
    fs::write(&file, r#"<BehaviorTree ID="Doomed"/>"#).unwrap();
    ws.index_workspace().await;
    assert!(ws.store().contains(SymbolKind::Tree, "Doomed"));

    let (events, handle) = start_loop(&ws);
    // The file stays on disk: only a cancelled timer keeps it out of the index
    events.send(WatchEvent::Changed(file.clone())).await.unwrap();
    events.send(WatchEvent::Deleted(file.clone())).await.unwrap();

    assert!(eventually(|| !ws.store().contains(SymbolKind::Tree, "Doomed")).await);
    tokio::time::sleep(Duration::from_millis(DEBOUNCE_MS * 4)).await;
    assert!(!ws.store().contains(SymbolKind::Tree, "Doomed"));
    assert!(!ws.is_pending(&file));

    drop(events);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_broken_rewrite_drops_entries() {
    let temp_dir = TempDir::new().unwrap();
    let ws = test_workspace(temp_dir.path());
    let file = ws.root().join("broken.xml");
    fs::write(&file, r#"<root><BehaviorTree ID="Stable"><Sequence/></BehaviorTree></root>"#).unwrap();
    ws.index_workspace().await;
    assert!(ws.store().contains(SymbolKind::Tree, "Stable"));

    let (events, handle) = start_loop(&ws);
    fs::write(&file, "<root><BehaviorTree ID=").unwrap();
    events.send(WatchEvent::Changed(file.clone())).await.unwrap();

    assert!(eventually(|| !ws.store().contains(SymbolKind::Tree, "Stable")).await);
    assert!(ws.lookup(SymbolKind::Tree, "Stable").is_empty());

    drop(events);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_deleted_file_removes_every_kind() {
    let temp_dir = TempDir::new().unwrap();
    let ws = test_workspace(temp_dir.path());
    let file = ws.root().join("nodes.cpp");
    fs::write(&file, "class Alpha {};\nclass Beta {};\n").unwrap();
    ws.index_workspace().await;
    assert_eq!(ws.store().len(SymbolKind::Node), 2);

    let (events, handle) = start_loop(&ws);
    fs::remove_file(&file).unwrap();
    events.send(WatchEvent::Deleted(file)).await.unwrap();

    assert!(eventually(|| ws.store().is_empty()).await);

    drop(events);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_multiple_definitions_keep_scan_order() {
    let temp_dir = TempDir::new().unwrap();
    let ws = test_workspace(temp_dir.path());
    let first = ws.root().join("first.xml");
    let second = ws.root().join("second.xml");
    fs::write(&first, "<BehaviorTree ID=\"Main\"/>\n<BehaviorTree ID=\"Main\"/>\n").unwrap();
    fs::write(&second, "\n\n<BehaviorTree ID=\"Main\"/>\n").unwrap();

    ws.index_file(&first, SymbolKind::Tree).await.unwrap();
    ws.index_file(&second, SymbolKind::Tree).await.unwrap();

    let lines: Vec<(String, u32)> = ws
        .definitions(SymbolKind::Tree, "Main")
        .into_iter()
        .map(|d| (d.path.file_name().unwrap().to_string_lossy().into_owned(), d.location.line))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("first.xml".to_string(), 0),
            ("first.xml".to_string(), 1),
            ("second.xml".to_string(), 2),
        ]
    );

    // Re-indexing moves a file's definitions behind the others
    ws.index_file(&first, SymbolKind::Tree).await.unwrap();
    let files: Vec<String> = ws
        .definitions(SymbolKind::Tree, "Main")
        .into_iter()
        .map(|d| d.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec!["second.xml", "first.xml", "first.xml"]);
}
