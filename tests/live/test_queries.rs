//! Test: outline, symbols, documentation and hover over an indexed workspace

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use treesense::{HoverInfo, IndexError, Settings, SymbolKind, Workspace};

const TREES: &str = r#"<root BTCPP_format="4" main_tree_to_execute="Main">
  <BehaviorTree ID="Main">
    <Sequence name="root">
      <MoveArm target="{goal}"/>
      <SubTree ID="Grasp"/>
    </Sequence>
  </BehaviorTree>
  <BehaviorTree ID="Grasp">
    <CloseGripper/>
  </BehaviorTree>
</root>
"#;

const NODES: &str = r#"#include <behaviortree_cpp/action_node.h>

/**
 * @brief Moves the arm to a target pose
 *
 * Input Ports:
 * - target: goal pose
 */
class MoveArm : public BT::SyncActionNode
{
};

class CloseGripper : public BT::SyncActionNode {};
"#;

async fn indexed(dir: &TempDir) -> Workspace {
    fs::write(dir.path().join("trees.xml"), TREES).unwrap();
    fs::write(dir.path().join("nodes.hpp"), NODES).unwrap();
    let ws = Workspace::new(Arc::new(Settings::default()), dir.path()).unwrap();
    ws.index_workspace().await;
    ws
}

#[tokio::test]
async fn test_tree_outline_from_index() {
    let dir = TempDir::new().unwrap();
    let ws = indexed(&dir).await;

    let outline = ws.tree_outline("Main").await.unwrap().expect("outline");
    assert_eq!(
        outline,
        [
            "- <BehaviorTree ID=\"Main\">",
            "  - <Sequence name=\"root\">",
            "    - <MoveArm target=\"{goal}\" />",
            "    - <SubTree ID=\"Grasp\" />",
            "  - </Sequence>",
            "- </BehaviorTree>",
        ]
        .join("\n")
    );
    assert!(ws.tree_outline("Missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_outline_of_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let ws = indexed(&dir).await;
    let broken = ws.root().join("broken.xml");
    fs::write(&broken, "<root><BehaviorTree ID=\"Main\"></root>").unwrap();

    let err = ws.outline(&broken, "Main").await.unwrap_err();
    assert!(matches!(err, IndexError::Parse { .. }));
}

#[tokio::test]
async fn test_entities_in_file_lists_spans() {
    let dir = TempDir::new().unwrap();
    let ws = indexed(&dir).await;
    let path = ws.root().join("trees.xml");

    let symbols = ws.entities_in_file(&path).await.unwrap();
    let names: Vec<&str> = symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Main", "Grasp"]);

    let main = &symbols[0];
    assert!(TREES[main.span.start..].starts_with("<BehaviorTree ID=\"Main\""));
    assert!(TREES[..main.span.end].ends_with("</BehaviorTree>"));
    assert_eq!(main.children.len(), 1);
    assert_eq!(main.children[0].tag, "Sequence");
}

#[tokio::test]
async fn test_entity_spans_share_the_indexed_file_id() {
    let dir = TempDir::new().unwrap();
    let ws = indexed(&dir).await;
    fs::create_dir_all(ws.root().join("sub")).unwrap();

    let indexed_id = ws.registry().id_of(&ws.root().join("trees.xml")).expect("indexed");
    let roundabout = ws.root().join("sub").join("..").join("trees.xml");
    let symbols = ws.entities_in_file(&roundabout).await.unwrap();

    assert_eq!(symbols.len(), 2);
    assert!(symbols.iter().all(|s| s.span.file_id == indexed_id));
    assert_eq!(ws.registry().len(), 2);
}

#[tokio::test]
async fn test_node_documentation_sections() {
    let dir = TempDir::new().unwrap();
    let ws = indexed(&dir).await;

    let doc = ws.node_documentation("MoveArm").await.expect("documented");
    assert_eq!(doc.signature, "class MoveArm : public BT::SyncActionNode");
    assert_eq!(doc.sections.brief, "Moves the arm to a target pose");
    assert_eq!(doc.sections.input_ports, vec!["target: goal pose"]);

    let bare = ws.node_documentation("CloseGripper").await.expect("declared");
    assert!(bare.sections.is_empty());
}

#[tokio::test]
async fn test_hover_on_reference_and_tag() {
    let dir = TempDir::new().unwrap();
    let ws = indexed(&dir).await;
    let path = ws.root().join("trees.xml");

    // Line 0 column 50 sits inside main_tree_to_execute="Main"
    match ws.hover_in_file(&path, 0, 50).await {
        Some(HoverInfo::Tree { name, outline }) => {
            assert_eq!(name, "Main");
            assert!(outline.starts_with("- <BehaviorTree ID=\"Main\">"));
        }
        other => panic!("expected tree hover, got {other:?}"),
    }

    // Line 3 column 8 sits on the MoveArm tag name
    match ws.hover_in_file(&path, 3, 8).await {
        Some(HoverInfo::Node { name, documentation }) => {
            assert_eq!(name, "MoveArm");
            assert_eq!(documentation.sections.brief, "Moves the arm to a target pose");
        }
        other => panic!("expected node hover, got {other:?}"),
    }

    assert!(ws.hover_in_file(&path, 0, 2).await.is_none());
}

#[tokio::test]
async fn test_completions_and_definitions_at_cursor() {
    let dir = TempDir::new().unwrap();
    let ws = indexed(&dir).await;

    let line = r#"<root main_tree_to_execute="Ma"#;
    assert_eq!(ws.complete_at(line, line.len() as u32), vec!["Main"]);
    assert_eq!(ws.completions(SymbolKind::Tree, ""), vec!["Grasp", "Main"]);
    assert_eq!(ws.completions(SymbolKind::Node, "Mo"), vec!["MoveArm"]);

    let line = r#"      <SubTree ID="Grasp"/>"#;
    let found = ws.definitions_at(line, 21);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].location.line, 7);
}
