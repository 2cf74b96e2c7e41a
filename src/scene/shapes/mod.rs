//! Shape types and their resolve implementations.
//!
//! Each shape lives in its own module with its struct definition and
//! `Resolve` implementation side by side.

mod diamond;
mod dots;
mod label;
mod marker;
mod path;
mod rect;
mod ring;

pub use diamond::Diamond;
pub use dots::Dots;
pub use label::{Anchor, Label};
pub use marker::Marker;
pub use path::Path;
pub use rect::Rect;
pub use ring::Ring;

use crate::types::DrawOp;

use super::Placement;

/// Resolve a shape at its effective placement into concrete `DrawOp`s.
pub trait Resolve {
    fn resolve(&self, at: &Placement, ops: &mut Vec<DrawOp>);
}

#[derive(Debug, Clone)]
pub enum Shape {
    /// Emits nothing; members hang off it through `Node::parent`.
    Group,
    Dots(Dots),
    Rect(Rect),
    Label(Label),
    Diamond(Diamond),
    Path(Path),
    Ring(Ring),
    Marker(Marker),
}

impl Resolve for Shape {
    fn resolve(&self, at: &Placement, ops: &mut Vec<DrawOp>) {
        match self {
            Shape::Group => {}
            Shape::Dots(s) => s.resolve(at, ops),
            Shape::Rect(s) => s.resolve(at, ops),
            Shape::Label(s) => s.resolve(at, ops),
            Shape::Diamond(s) => s.resolve(at, ops),
            Shape::Path(s) => s.resolve(at, ops),
            Shape::Ring(s) => s.resolve(at, ops),
            Shape::Marker(s) => s.resolve(at, ops),
        }
    }
}

macro_rules! impl_into_shape {
    ($($ty:ident),*) => {
        $(impl From<$ty> for Shape {
            fn from(s: $ty) -> Self {
                Shape::$ty(s)
            }
        })*
    };
}

impl_into_shape!(Dots, Rect, Label, Diamond, Path, Ring, Marker);

/// Emit one cell, skipping off-screen coordinates.
fn emit(ops: &mut Vec<DrawOp>, at: &Placement, x: i32, y: i32, ch: char) {
    if let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) {
        ops.push(DrawOp {
            x,
            y,
            ch,
            style: at.style.clone(),
            z_order: at.z_order,
        });
    }
}
