//! Scene — the retained drawing surface contents.
//!
//! A scene is a flat, insertion-ordered set of nodes. Each node pairs a
//! `Shape` with placement state (anchor point, transient offset, opacity,
//! scale, rotation) and may hang off a parent group whose placement it
//! inherits. Nodes can be registered under a name so that a running sequence
//! can re-locate elements the renderer created.
//!
//! The scene never draws by itself: `resolve` turns it into `DrawOp`s that
//! the raster layer paints onto a cell grid.

pub mod shapes;

use std::collections::{BTreeMap, HashMap};

use crate::types::{Color, DrawOp, ResolvedScene, Style};

pub use shapes::{Anchor, Diamond, Dots, Label, Marker, Path, Rect, Resolve, Ring, Shape};

/// Terminal cells are roughly twice as tall as they are wide. Round shapes
/// stretch their horizontal radius by this factor.
pub const CELL_ASPECT: f32 = 2.0;

/// Opacity below which a node is not drawn at all.
const HIDDEN_BELOW: f32 = 0.1;
/// Opacity below which a node is drawn dimmed.
const DIM_BELOW: f32 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn lerp(self, to: Point, t: f32) -> Point {
        Point {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }

    pub fn offset(self, by: Point) -> Point {
        Point {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }

    /// Rotate around `pivot` by `degrees`, compensating for the cell aspect
    /// ratio so a rotation looks circular on screen.
    pub fn rotate_about(self, pivot: Point, degrees: f32) -> Point {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = (self.x - pivot.x) / CELL_ASPECT;
        let dy = self.y - pivot.y;
        Point {
            x: pivot.x + (dx * cos - dy * sin) * CELL_ASPECT,
            y: pivot.y + dx * sin + dy * cos,
        }
    }
}

/// Container dimensions in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Size { width, height }
    }

    /// A container with no area has not been laid out yet.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn w(&self) -> f32 {
        self.width as f32
    }

    pub fn h(&self) -> f32 {
        self.height as f32
    }

    pub fn center(&self) -> Point {
        Point::new(self.w() / 2.0, self.h() / 2.0)
    }
}

/// Identity of a node. Ids are never reused, not even across `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

#[derive(Debug, Clone)]
pub struct Node {
    pub shape: Shape,
    /// Anchor point. Its meaning depends on the shape (top-left for boxes,
    /// center for round shapes and centered labels). Children of a group
    /// are anchored relative to the group.
    pub at: Point,
    pub style: Style,
    pub z_order: i32,
    pub opacity: f32,
    /// Transient displacement on top of `at` (jitter, shake).
    pub offset: Point,
    pub scale: f32,
    /// Degrees, applied around `at`.
    pub rotation: f32,
    pub parent: Option<NodeId>,
    pub name: Option<String>,
}

impl Node {
    pub fn new(shape: impl Into<Shape>) -> Self {
        Node {
            shape: shape.into(),
            at: Point::default(),
            style: Style::default(),
            z_order: 0,
            opacity: 1.0,
            offset: Point::default(),
            scale: 1.0,
            rotation: 0.0,
            parent: None,
            name: None,
        }
    }

    pub fn group() -> Self {
        Node::new(Shape::Group)
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.at = Point::new(x, y);
        self
    }

    pub fn at_point(mut self, at: Point) -> Self {
        self.at = at;
        self
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.style.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.style.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.style.dim = true;
        self
    }

    pub fn z(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn child_of(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Effective placement of a node after folding in its ancestors.
#[derive(Debug, Clone)]
pub struct Placement {
    pub origin: Point,
    pub style: Style,
    pub z_order: i32,
    pub opacity: f32,
    pub scale: f32,
    pub rotation: f32,
    pub canvas: Size,
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    size: Size,
    nodes: BTreeMap<NodeId, Node>,
    names: HashMap<String, NodeId>,
    next_id: u64,
    revision: u64,
}

impl Scene {
    pub fn new(size: Size) -> Self {
        Scene {
            size,
            ..Default::default()
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        if self.size != size {
            self.size = size;
            self.revision += 1;
        }
    }

    /// Monotonic counter bumped by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every node. Ids handed out earlier stay dead.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.names.clear();
        self.revision += 1;
    }

    /// Insert a node and return its id. A node whose parent is missing is
    /// attached to the root instead.
    pub fn add(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        if let Some(parent) = node.parent {
            if !self.nodes.contains_key(&parent) {
                node.parent = None;
            }
        }
        if let Some(name) = &node.name {
            self.names.insert(name.clone(), id);
        }
        self.nodes.insert(id, node);
        self.revision += 1;
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let node = self.nodes.get_mut(&id)?;
        self.revision += 1;
        Some(node)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn named(&self, name: &str) -> Option<&Node> {
        self.find(name).and_then(|id| self.nodes.get(&id))
    }

    pub fn named_mut(&mut self, name: &str) -> Option<&mut Node> {
        let id = self.find(name)?;
        self.get_mut(id)
    }

    /// Direct children of `id`, in insertion order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent == Some(id))
            .map(|(child, _)| *child)
            .collect()
    }

    /// Remove a node together with its descendants.
    ///
    /// Returns `false` when the node is already gone, so cleanup paths can
    /// call it unconditionally.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }
        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            let parent = doomed[i];
            doomed.extend(self.children(parent));
            i += 1;
        }
        for gone in doomed {
            if let Some(node) = self.nodes.remove(&gone) {
                if let Some(name) = node.name {
                    if self.names.get(&name) == Some(&gone) {
                        self.names.remove(&name);
                    }
                }
            }
        }
        self.revision += 1;
        true
    }

    /// Fold a node's ancestry into its effective placement.
    pub fn placement(&self, id: NodeId) -> Option<Placement> {
        let node = self.nodes.get(&id)?;
        let mut origin = node.at.offset(node.offset);
        let mut opacity = node.opacity;
        let mut z_order = node.z_order;
        let mut rotation = node.rotation;
        let mut parent = node.parent;
        while let Some(pid) = parent {
            let Some(p) = self.nodes.get(&pid) else {
                break;
            };
            // A group's rotation turns its members around the group anchor.
            origin = origin
                .rotate_about(Point::default(), p.rotation)
                .offset(p.at)
                .offset(p.offset);
            opacity *= p.opacity;
            z_order += p.z_order;
            rotation += p.rotation;
            parent = p.parent;
        }

        let mut style = node.style.clone();
        if opacity < DIM_BELOW {
            style.dim = true;
        }
        Some(Placement {
            origin,
            style,
            z_order,
            opacity,
            scale: node.scale,
            rotation,
            canvas: self.size,
        })
    }

    /// Resolve every visible node into concrete draw operations.
    pub fn resolve(&self) -> ResolvedScene {
        let mut ops: Vec<DrawOp> = Vec::new();
        for (id, node) in &self.nodes {
            let Some(placement) = self.placement(*id) else {
                continue;
            };
            if placement.opacity < HIDDEN_BELOW {
                continue;
            }
            node.shape.resolve(&placement, &mut ops);
        }
        ResolvedScene {
            width: self.size.width,
            height: self.size.height,
            ops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Raster;

    fn text_of(scene: &Scene) -> String {
        Raster::to_text(&Raster::rasterize(&scene.resolve()))
    }

    #[test]
    fn find_returns_latest_named_node() {
        let mut scene = Scene::new(Size::new(10, 3));
        let first = scene.add(Node::new(Label::new("a")).named("counter"));
        let second = scene.add(Node::new(Label::new("b")).named("counter"));
        assert_ne!(first, second);
        assert_eq!(scene.find("counter"), Some(second));
    }

    #[test]
    fn remove_is_idempotent() {
        let mut scene = Scene::new(Size::new(10, 3));
        let id = scene.add(Node::new(Marker::new('o')).at(2.0, 1.0));
        assert!(scene.remove(id));
        assert!(!scene.remove(id));
        assert!(scene.is_empty());
    }

    #[test]
    fn removing_group_removes_children_and_names() {
        let mut scene = Scene::new(Size::new(10, 3));
        let group = scene.add(Node::group().named("g"));
        let child = scene.add(Node::new(Label::new("x")).child_of(group).named("x"));
        scene.remove(group);
        assert!(!scene.contains(child));
        assert_eq!(scene.find("x"), None);
        assert_eq!(scene.find("g"), None);
    }

    #[test]
    fn far_offscreen_cells_do_not_wrap_onto_canvas() {
        let mut scene = Scene::new(Size::new(10, 3));
        scene.add(Node::new(Marker::new('o')).at(65_538.0, 1.0));
        assert!(scene.resolve().ops.is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut scene = Scene::new(Size::new(10, 3));
        let old = scene.add(Node::new(Marker::new('o')));
        scene.clear();
        let new = scene.add(Node::new(Marker::new('o')));
        assert_ne!(old, new);
        assert!(!scene.remove(old));
        assert!(scene.contains(new));
    }

    #[test]
    fn children_inherit_group_offset_and_opacity() {
        let mut scene = Scene::new(Size::new(12, 3));
        let group = scene.add(Node::group().at(4.0, 1.0));
        scene.add(Node::new(Label::new("hi")).child_of(group));
        assert_eq!(text_of(&scene), "\n    hi\n\n");

        scene.get_mut(group).expect("group").opacity = 0.0;
        assert_eq!(text_of(&scene), "\n\n\n");
    }

    #[test]
    fn mutations_bump_revision() {
        let mut scene = Scene::new(Size::new(4, 4));
        let r0 = scene.revision();
        let id = scene.add(Node::new(Marker::new('o')));
        let r1 = scene.revision();
        assert!(r1 > r0);
        scene.get_mut(id).expect("node").at = Point::new(1.0, 1.0);
        assert!(scene.revision() > r1);
        assert!(scene.get_mut(NodeId(999)).is_none());
    }

    #[test]
    fn rotation_preserves_distance_in_row_units() {
        let p = Point::new(4.0, 0.0).rotate_about(Point::default(), 90.0);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y - 2.0).abs() < 1e-4);
    }
}
