//! Copy and paste of diagram fragments
//!
//! The [`Clipboard`] is an ordinary value owned by the editing session and
//! passed to whoever copies or pastes. It holds at most one snapshot: the
//! detached clones of the copied nodes, their containment expressed as
//! fragment-local indices, and the clones of the edges internal to the
//! copied nodes.

use std::collections::HashMap;

use tracing::{debug, info, span, Level};

use super::{Diagram, DiagramError, DiagramId, Edge, GraphElement, Node, NodeId, SelectionList};

/// Paste offset policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipboardConfig {
    /// Horizontal shift applied to pasted nodes
    pub paste_offset_x: i32,
    /// Vertical shift applied to pasted nodes
    pub paste_offset_y: i32,
    /// Apply the offset when pasting into a diagram other than the source
    pub offset_across_diagrams: bool,
}

impl ClipboardConfig {
    pub fn with_offset(dx: i32, dy: i32) -> Self {
        Self {
            paste_offset_x: dx,
            paste_offset_y: dy,
            ..Self::default()
        }
    }

    /// Offset to apply when pasting a fragment copied from `source` into `target`
    pub fn offset(&self, source: DiagramId, target: DiagramId) -> (i32, i32) {
        if source == target || self.offset_across_diagrams {
            (self.paste_offset_x, self.paste_offset_y)
        } else {
            (0, 0)
        }
    }
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            paste_offset_x: 10,
            paste_offset_y: 10,
            offset_across_diagrams: false,
        }
    }
}

#[derive(Debug, Clone)]
struct FragmentNode {
    node: Node,
    /// Index of the parent within the fragment, `None` for fragment roots
    parent: Option<usize>,
}

#[derive(Debug, Clone)]
struct FragmentEdge {
    edge: Edge,
    start: usize,
    end: usize,
}

/// Detached copy of a selection, nodes in containment pre-order
#[derive(Debug, Clone)]
struct Fragment {
    source: DiagramId,
    nodes: Vec<FragmentNode>,
    edges: Vec<FragmentEdge>,
}

/// Holder of the last copied fragment
#[derive(Debug, Default)]
pub struct Clipboard {
    config: ClipboardConfig,
    fragment: Option<Fragment>,
}

impl Clipboard {
    pub fn new(config: ClipboardConfig) -> Self {
        Self {
            config,
            fragment: None,
        }
    }

    pub fn config(&self) -> &ClipboardConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ClipboardConfig) {
        self.config = config;
    }

    pub fn is_empty(&self) -> bool {
        self.fragment.is_none()
    }

    /// Number of nodes in the snapshot, descendants included
    pub fn node_count(&self) -> usize {
        self.fragment.as_ref().map_or(0, |fragment| fragment.nodes.len())
    }

    pub fn edge_count(&self) -> usize {
        self.fragment.as_ref().map_or(0, |fragment| fragment.edges.len())
    }

    pub fn clear(&mut self) {
        self.fragment = None;
    }

    /// Replace the snapshot with clones of the transitive selection
    ///
    /// Copying an empty selection empties the clipboard.
    pub fn copy(&mut self, diagram: &Diagram, selection: &SelectionList) {
        let copy_span = span!(
            Level::INFO,
            "copy",
            diagram = %diagram.id(),
            selected = selection.len()
        );
        let _enter = copy_span.enter();

        let closure = selection.closure(diagram);
        if closure.is_empty() {
            debug!("Nothing to copy");
            self.fragment = None;
            return;
        }

        let mut index_of: HashMap<NodeId, usize> = HashMap::with_capacity(closure.nodes.len());
        let mut nodes = Vec::with_capacity(closure.nodes.len());
        for id in &closure.nodes {
            let Some(original) = diagram.node(*id) else {
                continue;
            };
            let parent = original
                .parent()
                .and_then(|parent| index_of.get(&parent).copied());
            index_of.insert(*id, nodes.len());
            nodes.push(FragmentNode {
                node: original.clone(),
                parent,
            });
        }

        let edges: Vec<FragmentEdge> = closure
            .edges
            .iter()
            .filter_map(|id| {
                let original = diagram.edge(*id)?;
                let start = *index_of.get(&original.start()?)?;
                let end = *index_of.get(&original.end()?)?;
                Some(FragmentEdge {
                    edge: original.clone(),
                    start,
                    end,
                })
            })
            .collect();

        info!(nodes = nodes.len(), edges = edges.len(), "Copied fragment");
        self.fragment = Some(Fragment {
            source: diagram.id(),
            nodes,
            edges,
        });
    }

    /// Insert a fresh copy of the snapshot into `diagram`
    ///
    /// Fragment roots become diagram roots and the rest keep their copied
    /// parents, so containment and relative positions are preserved. If the
    /// diagram type rejects any element, nothing is inserted. Returns the
    /// pasted top-level nodes and edges.
    pub fn paste(&self, diagram: &mut Diagram) -> Result<SelectionList, DiagramError> {
        let paste_span = span!(Level::INFO, "paste", diagram = %diagram.id());
        let _enter = paste_span.enter();

        let mut pasted = SelectionList::new();
        let Some(fragment) = &self.fragment else {
            debug!("Clipboard is empty");
            return Ok(pasted);
        };

        let diagram_type = diagram.diagram_type().clone();
        if let Some(rejected) = fragment
            .nodes
            .iter()
            .find(|entry| !diagram_type.supports_node(entry.node.kind()))
        {
            return Err(DiagramError::unsupported_element(
                diagram.name(),
                rejected.node.type_name(),
            ));
        }
        if let Some(rejected) = fragment
            .edges
            .iter()
            .find(|entry| !diagram_type.supports_edge(&entry.edge.kind()))
        {
            return Err(DiagramError::unsupported_element(
                diagram.name(),
                rejected.edge.type_name(),
            ));
        }

        let (dx, dy) = self.config.offset(fragment.source, diagram.id());
        let mut inserted: Vec<NodeId> = Vec::with_capacity(fragment.nodes.len());
        for entry in &fragment.nodes {
            let mut node = entry.node.clone();
            node.translate(dx, dy);
            let id = match entry.parent.and_then(|parent| inserted.get(parent).copied()) {
                Some(parent) => diagram.insert_child(parent, node)?,
                None => {
                    let id = diagram.insert_root(node);
                    pasted.add(id);
                    id
                }
            };
            inserted.push(id);
        }

        for entry in &fragment.edges {
            let (Some(&start), Some(&end)) = (inserted.get(entry.start), inserted.get(entry.end))
            else {
                continue;
            };
            let mut edge = entry.edge.clone();
            edge.attach(start, end);
            pasted.add(diagram.insert_edge(edge)?);
        }
        diagram.refresh_edges();

        info!(
            nodes = inserted.len(),
            edges = fragment.edges.len(),
            dx,
            dy,
            "Pasted fragment"
        );
        Ok(pasted)
    }

    /// Copy the selection, then remove it from `diagram`
    pub fn cut(
        &mut self,
        diagram: &mut Diagram,
        selection: &SelectionList,
    ) -> Result<(), DiagramError> {
        let closure = selection.closure(diagram);
        let top_level: Vec<NodeId> = closure
            .nodes
            .iter()
            .copied()
            .filter(|id| {
                diagram
                    .node(*id)
                    .and_then(Node::parent)
                    .map_or(true, |parent| !closure.nodes.contains(&parent))
            })
            .collect();
        self.copy(diagram, selection);

        // Removing a node or edge may take orphaned point nodes with it
        for node in top_level {
            if diagram.node(node).is_some() {
                diagram.remove_node(node)?;
            }
        }
        for edge in closure.edges {
            if diagram.edge(edge).is_some() {
                diagram.remove_edge(edge)?;
            }
        }
        debug!("Cut selection");
        Ok(())
    }
}
