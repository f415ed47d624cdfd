//! Sample diagrams built by the `demo` command
//!
//! Each sample goes through the same editing operations a user would:
//! nodes are dropped at points, edges are drawn between points and
//! resolved by hit-testing.

use anyhow::{anyhow, Result};
use umlkit::prelude::*;

/// Build the sample diagram of the named type
pub fn build_sample(registry: &DiagramRegistry, name: &str) -> Result<Diagram> {
    let mut diagram = registry.create_diagram(name)?;
    match name {
        "class" => class_sample(&mut diagram)?,
        "state" => state_sample(&mut diagram)?,
        "object" => object_sample(&mut diagram)?,
        other => return Err(anyhow!("No sample diagram for type '{}'", other)),
    }
    Ok(diagram)
}

fn connect(diagram: &mut Diagram, edge: Edge, start: Point, end: Point) -> Result<EdgeId> {
    let kind = edge.kind();
    diagram
        .add_edge(edge, start, end)
        .ok_or_else(|| anyhow!("Could not connect {} from {} to {}", kind, start, end))
}

/// A package holding a class that implements an interface, an outside
/// customer class and an annotated note
fn class_sample(diagram: &mut Diagram) -> Result<()> {
    diagram.add_node(Node::package().with_name("orders"), Point::new(20, 20))?;
    diagram.add_node(Node::class().with_name("Order"), Point::new(30, 50))?;
    diagram.add_node(Node::interface().with_name("Billable"), Point::new(260, 40))?;
    diagram.add_node(Node::class().with_name("Customer"), Point::new(260, 200))?;
    diagram.add_node(Node::note().with_name("Orders are immutable"), Point::new(40, 240))?;

    connect(
        diagram,
        Edge::new(EdgeKind::implementation()),
        Point::new(35, 55),
        Point::new(265, 45),
    )?;
    let mut placed = Edge::association();
    placed.set_start_label("1");
    placed.set_middle_label("places");
    placed.set_end_label("*");
    connect(diagram, placed, Point::new(265, 205), Point::new(35, 55))?;
    connect(diagram, Edge::note(), Point::new(45, 245), Point::new(150, 300))?;
    Ok(())
}

/// Two states toggling between each other, entered from the initial
/// state and left through the final state
fn state_sample(diagram: &mut Diagram) -> Result<()> {
    diagram.add_node(Node::initial_state(), Point::new(20, 20))?;
    diagram.add_node(Node::state().with_name("Idle"), Point::new(80, 20))?;
    diagram.add_node(Node::state().with_name("Busy"), Point::new(80, 120))?;
    diagram.add_node(Node::final_state(), Point::new(220, 140))?;

    connect(diagram, Edge::state_transition(), Point::new(25, 25), Point::new(85, 25))?;
    connect(
        diagram,
        Edge::state_transition().with_middle_label("start"),
        Point::new(85, 25),
        Point::new(85, 125),
    )?;
    connect(
        diagram,
        Edge::state_transition().with_middle_label("done"),
        Point::new(85, 125),
        Point::new(85, 25),
    )?;
    connect(diagram, Edge::state_transition(), Point::new(85, 125), Point::new(225, 145))?;
    Ok(())
}

/// An order object referencing its customer and collaborating with an item
fn object_sample(diagram: &mut Diagram) -> Result<()> {
    diagram.add_node(Node::object().with_name("order: Order"), Point::new(20, 20))?;
    diagram.add_node(Node::object().with_name("alice: Customer"), Point::new(200, 20))?;
    diagram.add_node(Node::object().with_name("item: Product"), Point::new(20, 140))?;

    connect(
        diagram,
        Edge::object_reference().with_middle_label("customer"),
        Point::new(25, 25),
        Point::new(205, 25),
    )?;
    connect(diagram, Edge::object_collaboration(), Point::new(25, 25), Point::new(25, 145))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_sample() {
        let registry = DiagramRegistry::with_all_plugins();
        let diagram = build_sample(&registry, "class").unwrap();
        // package, order, interface, customer, note and the note's point
        assert_eq!(diagram.node_count(), 6);
        assert_eq!(diagram.root_nodes().len(), 5);
        assert_eq!(diagram.edge_count(), 3);
        diagram.check_consistency().unwrap();
    }

    #[test]
    fn test_state_sample() {
        let registry = DiagramRegistry::with_all_plugins();
        let diagram = build_sample(&registry, "state").unwrap();
        assert_eq!(diagram.node_count(), 4);
        assert_eq!(diagram.edge_count(), 4);
    }

    #[test]
    fn test_object_sample() {
        let registry = DiagramRegistry::with_all_plugins();
        let diagram = build_sample(&registry, "object").unwrap();
        assert_eq!(diagram.node_count(), 3);
        assert_eq!(diagram.edge_count(), 2);
    }

    #[test]
    fn test_unknown_sample() {
        let registry = DiagramRegistry::with_all_plugins();
        assert!(build_sample(&registry, "sequence").is_err());
    }
}
