//! Containment stays a consistent forest under arbitrary editing

use proptest::prelude::*;
use umlkit::prelude::*;

#[derive(Debug, Clone)]
enum Edit {
    AddPackage(i32, i32),
    AddClass(i32, i32),
    Translate(usize, i32, i32),
    Reparent(usize, usize),
    Detach(usize),
    Remove(usize),
    Connect(usize, usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0i32..400, 0i32..400).prop_map(|(x, y)| Edit::AddPackage(x, y)),
        (0i32..400, 0i32..400).prop_map(|(x, y)| Edit::AddClass(x, y)),
        (any::<usize>(), -60i32..60, -60i32..60).prop_map(|(i, dx, dy)| Edit::Translate(i, dx, dy)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Edit::Reparent(a, b)),
        any::<usize>().prop_map(Edit::Detach),
        any::<usize>().prop_map(Edit::Remove),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Edit::Connect(a, b)),
    ]
}

fn pick(diagram: &Diagram, index: usize) -> Option<NodeId> {
    let ids: Vec<NodeId> = diagram.nodes().map(|(id, _)| id).collect();
    if ids.is_empty() {
        None
    } else {
        Some(ids[index % ids.len()])
    }
}

fn apply(diagram: &mut Diagram, edit: &Edit) {
    match *edit {
        Edit::AddPackage(x, y) => {
            diagram.add_node(Node::package(), Point::new(x, y)).unwrap();
        }
        Edit::AddClass(x, y) => {
            diagram.add_node(Node::class(), Point::new(x, y)).unwrap();
        }
        Edit::Translate(index, dx, dy) => {
            if let Some(id) = pick(diagram, index) {
                diagram.translate_node(id, dx, dy).unwrap();
            }
        }
        Edit::Reparent(parent, child) => {
            if let (Some(parent), Some(child)) = (pick(diagram, parent), pick(diagram, child)) {
                let _ = diagram.add_child(parent, child);
            }
        }
        Edit::Detach(index) => {
            if let Some(id) = pick(diagram, index) {
                let parent = diagram.node(id).unwrap().parent();
                if let Some(parent) = parent {
                    diagram.remove_child(parent, id).unwrap();
                }
            }
        }
        Edit::Remove(index) => {
            if let Some(id) = pick(diagram, index) {
                diagram.remove_node(id).unwrap();
            }
        }
        Edit::Connect(start, end) => {
            if let (Some(start), Some(end)) = (pick(diagram, start), pick(diagram, end)) {
                let from = diagram.node(start).unwrap().position();
                let to = diagram.node(end).unwrap().position();
                let _ = diagram.add_edge(Edge::dependency(), from, to);
            }
        }
    }
}

proptest! {
    #[test]
    fn containment_stays_consistent(edits in prop::collection::vec(edit_strategy(), 1..40)) {
        let mut diagram = ClassDiagram::create();
        for edit in &edits {
            apply(&mut diagram, edit);
            prop_assert!(
                diagram.check_consistency().is_ok(),
                "inconsistent after {:?}: {:?}",
                edit,
                diagram.check_consistency()
            );
        }

        for (id, node) in diagram.nodes() {
            for &child in node.children() {
                let child_node = diagram.node(child).unwrap();
                prop_assert_eq!(child_node.parent(), Some(id));
                prop_assert!(node.bounds().encloses(&child_node.bounds()));
            }
        }
    }

    #[test]
    fn copy_paste_adds_one_root_per_selected_root(edits in prop::collection::vec(edit_strategy(), 1..25)) {
        let mut diagram = ClassDiagram::create();
        for edit in &edits {
            apply(&mut diagram, edit);
        }
        let roots = diagram.root_nodes().to_vec();
        let nodes_before = diagram.node_count();

        let mut selection = SelectionList::new();
        for &root in &roots {
            selection.add(root);
        }
        let mut clipboard = Clipboard::default();
        clipboard.copy(&diagram, &selection);
        clipboard.paste(&mut diagram).unwrap();

        prop_assert_eq!(diagram.root_nodes().len(), roots.len() * 2);
        prop_assert_eq!(diagram.node_count(), nodes_before * 2);
        prop_assert!(diagram.check_consistency().is_ok());
    }
}

#[test]
fn test_deepest_container_wins() {
    let mut diagram = ClassDiagram::create();
    let outer = diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
    let middle = diagram.add_node(Node::package(), Point::new(10, 10)).unwrap();
    let inner = diagram.add_node(Node::package(), Point::new(20, 20)).unwrap();
    let class = diagram.add_node(Node::class(), Point::new(25, 25)).unwrap();

    assert_eq!(diagram.ancestors(class), vec![inner, middle, outer]);
    assert_eq!(diagram.descendants(outer), vec![middle, inner, class]);
    assert_eq!(diagram.find_node(Point::new(26, 26)), Some(class));
}

#[test]
fn test_note_is_never_adopted() {
    let mut diagram = ClassDiagram::create();
    diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
    let note = diagram.add_node(Node::note(), Point::new(10, 10)).unwrap();
    assert!(diagram.node(note).unwrap().parent().is_none());
    assert_eq!(diagram.root_nodes().len(), 2);
}

#[test]
fn test_detached_child_keeps_position() {
    let mut diagram = ClassDiagram::create();
    let package = diagram.add_node(Node::package(), Point::new(0, 0)).unwrap();
    let class = diagram.add_node(Node::class(), Point::new(10, 30)).unwrap();
    diagram.remove_child(package, class).unwrap();
    assert_eq!(diagram.node(class).unwrap().position(), Point::new(10, 30));
    assert_eq!(
        diagram.node(package).unwrap().bounds(),
        Rectangle::new(0, 0, 100, 80)
    );
}
