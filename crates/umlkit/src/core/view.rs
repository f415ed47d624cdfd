//! Views attached to nodes and edges
//!
//! A view is owned exclusively by its element and caches the element's
//! bounds. The diagram refreshes views eagerly after every structural
//! mutation; hit-testing and containment only ever read the cached bounds.
//! Pixel-level drawing lives outside this crate; the views here only carry
//! the geometry that drawing code needs.

use std::fmt;

use super::{Dimension, Point, Rectangle};

/// Horizontal and vertical gap between a package border and its children
pub const PACKAGE_GAP: i32 = 5;

/// Height of the name tab drawn on top of a package
pub const PACKAGE_TAB_HEIGHT: i32 = 20;

/// Distance within which a point is considered on an edge path
pub const EDGE_TOLERANCE: f64 = 3.0;

/// Size of the loop drawn when an edge starts and ends on the same node
const SELF_LOOP_SIZE: i32 = 20;

/// How the line of an edge is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
}

/// Decoration drawn at an edge end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrowHead {
    #[default]
    None,
    /// Open arrow: `>`
    V,
    /// Hollow triangle used by generalization
    Triangle,
    /// Hollow diamond used by aggregation
    Diamond,
    /// Filled diamond used by composition
    BlackDiamond,
}

/// Strategy used to route an edge between its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SegmentationStyle {
    /// Single straight segment between the node borders
    #[default]
    Straight,
    /// Horizontal, vertical, horizontal
    Hvh,
    /// Vertical, horizontal, vertical
    Vhv,
}

impl fmt::Display for SegmentationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentationStyle::Straight => write!(f, "straight"),
            SegmentationStyle::Hvh => write!(f, "hvh"),
            SegmentationStyle::Vhv => write!(f, "vhv"),
        }
    }
}

/// Visual capability of a node
pub trait NodeView: fmt::Debug + Send + Sync {
    /// Recompute bounds for a node at `position` with measured `content`
    /// whose children currently occupy `children`
    fn refresh(&mut self, position: Point, content: Dimension, children: &[Rectangle]);

    /// Bounds computed by the last refresh
    fn bounds(&self) -> Rectangle;

    /// Returns true if the point hits this node
    fn contains(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }
}

/// Visual capability of an edge
pub trait EdgeView: fmt::Debug + Send + Sync {
    /// Recompute the path between the bounds of the two endpoints
    fn refresh(&mut self, start: Rectangle, end: Rectangle);

    /// Bounds of the path computed by the last refresh
    fn bounds(&self) -> Rectangle;

    /// Polyline followed by the edge, empty before the first refresh
    fn path(&self) -> &[Point];

    /// Returns true if the point lies on the edge path
    fn contains(&self, point: Point) -> bool;
}

/// Box-shaped node that grows to fit its content
#[derive(Debug, Clone)]
pub struct RectangleNodeView {
    minimum: Dimension,
    bounds: Rectangle,
}

impl RectangleNodeView {
    pub fn new(minimum: Dimension) -> Self {
        Self {
            minimum,
            bounds: Rectangle::at(Point::default(), minimum),
        }
    }
}

impl NodeView for RectangleNodeView {
    fn refresh(&mut self, position: Point, content: Dimension, _children: &[Rectangle]) {
        self.bounds = Rectangle::at(position, self.minimum.max(content));
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

/// Fixed-size circular node such as an initial or final state
#[derive(Debug, Clone)]
pub struct CircleNodeView {
    diameter: i32,
    bounds: Rectangle,
}

impl CircleNodeView {
    pub fn new(diameter: i32) -> Self {
        Self {
            diameter,
            bounds: Rectangle::new(0, 0, diameter, diameter),
        }
    }
}

impl NodeView for CircleNodeView {
    fn refresh(&mut self, position: Point, _content: Dimension, _children: &[Rectangle]) {
        self.bounds = Rectangle::at(position, Dimension::new(self.diameter, self.diameter));
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

/// Zero-size anchor used as a free edge endpoint
#[derive(Debug, Clone, Default)]
pub struct PointNodeView {
    bounds: Rectangle,
}

impl PointNodeView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NodeView for PointNodeView {
    fn refresh(&mut self, position: Point, _content: Dimension, _children: &[Rectangle]) {
        self.bounds = Rectangle::at(position, Dimension::default());
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

/// Package node whose bounds enclose all of its children
#[derive(Debug, Clone)]
pub struct PackageNodeView {
    minimum: Dimension,
    bounds: Rectangle,
}

impl PackageNodeView {
    pub fn new(minimum: Dimension) -> Self {
        Self {
            minimum,
            bounds: Rectangle::at(Point::default(), minimum),
        }
    }
}

impl NodeView for PackageNodeView {
    fn refresh(&mut self, position: Point, content: Dimension, children: &[Rectangle]) {
        let body = Dimension::new(content.width, content.height + PACKAGE_TAB_HEIGHT);
        let own = Rectangle::at(position, self.minimum.max(body));
        self.bounds = children.iter().fold(own, |acc, child| {
            acc.union(&child.inflated(PACKAGE_GAP, PACKAGE_GAP))
        });
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }
}

/// Edge drawn as a polyline routed by a [`SegmentationStyle`]
#[derive(Debug, Clone)]
pub struct SegmentedEdgeView {
    style: SegmentationStyle,
    path: Vec<Point>,
    bounds: Rectangle,
}

impl SegmentedEdgeView {
    pub fn new(style: SegmentationStyle) -> Self {
        Self {
            style,
            path: Vec::new(),
            bounds: Rectangle::default(),
        }
    }

    pub fn style(&self) -> SegmentationStyle {
        self.style
    }

    fn route(&self, start: Rectangle, end: Rectangle) -> Vec<Point> {
        if start == end {
            return self_loop(start);
        }
        match self.style {
            SegmentationStyle::Straight => straight(start, end),
            SegmentationStyle::Hvh => {
                if start.max_x() < end.x() || end.max_x() < start.x() {
                    hvh(start, end)
                } else {
                    straight(start, end)
                }
            }
            SegmentationStyle::Vhv => {
                if start.max_y() < end.y() || end.max_y() < start.y() {
                    vhv(start, end)
                } else {
                    straight(start, end)
                }
            }
        }
    }
}

impl EdgeView for SegmentedEdgeView {
    fn refresh(&mut self, start: Rectangle, end: Rectangle) {
        self.path = self.route(start, end);
        self.bounds = Rectangle::bounding(self.path.iter().copied()).unwrap_or_default();
    }

    fn bounds(&self) -> Rectangle {
        self.bounds
    }

    fn path(&self) -> &[Point] {
        &self.path
    }

    fn contains(&self, point: Point) -> bool {
        self.path
            .windows(2)
            .any(|segment| segment_distance(point, segment[0], segment[1]) <= EDGE_TOLERANCE)
    }
}

fn straight(start: Rectangle, end: Rectangle) -> Vec<Point> {
    vec![
        start.connection_point(end.center()),
        end.connection_point(start.center()),
    ]
}

fn hvh(start: Rectangle, end: Rectangle) -> Vec<Point> {
    let (from_x, to_x) = if start.max_x() < end.x() {
        (start.max_x(), end.x())
    } else {
        (start.x(), end.max_x())
    };
    let from_y = start.center().y();
    let to_y = end.center().y();
    let mid_x = (from_x + to_x) / 2;
    vec![
        Point::new(from_x, from_y),
        Point::new(mid_x, from_y),
        Point::new(mid_x, to_y),
        Point::new(to_x, to_y),
    ]
}

fn vhv(start: Rectangle, end: Rectangle) -> Vec<Point> {
    let (from_y, to_y) = if start.max_y() < end.y() {
        (start.max_y(), end.y())
    } else {
        (start.y(), end.max_y())
    };
    let from_x = start.center().x();
    let to_x = end.center().x();
    let mid_y = (from_y + to_y) / 2;
    vec![
        Point::new(from_x, from_y),
        Point::new(from_x, mid_y),
        Point::new(to_x, mid_y),
        Point::new(to_x, to_y),
    ]
}

fn self_loop(node: Rectangle) -> Vec<Point> {
    let right = node.max_x();
    let top = node.y();
    vec![
        Point::new(right - SELF_LOOP_SIZE, top),
        Point::new(right - SELF_LOOP_SIZE, top - SELF_LOOP_SIZE),
        Point::new(right + SELF_LOOP_SIZE, top - SELF_LOOP_SIZE),
        Point::new(right + SELF_LOOP_SIZE, top + SELF_LOOP_SIZE),
        Point::new(right, top + SELF_LOOP_SIZE),
    ]
}

fn segment_distance(point: Point, a: Point, b: Point) -> f64 {
    let (px, py) = (f64::from(point.x()), f64::from(point.y()));
    let (ax, ay) = (f64::from(a.x()), f64::from(a.y()));
    let (bx, by) = (f64::from(b.x()), f64::from(b.y()));
    let (dx, dy) = (bx - ax, by - ay);
    let length_squared = dx * dx + dy * dy;
    if length_squared == 0.0 {
        return point.distance_squared(a).sqrt();
    }
    let t = (((px - ax) * dx + (py - ay) * dy) / length_squared).clamp(0.0, 1.0);
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt()
}
