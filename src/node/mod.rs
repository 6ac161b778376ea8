//! The expression tree, and the conversions between it and content MathML.
//!
//! A tree is made of [`MathNode`]s, each tagged with a [`NodeKind`]. Trees are built from markup
//! by the [parser](MathParser) and turned back into markup by the [writer](MathWriter). Element
//! names are mapped to kinds through a fixed [dictionary], with anything it does not know about
//! handed to a [`MathExtension`](crate::extension::MathExtension).

pub mod kind;
pub mod math;
pub mod dictionary;
mod parser;
mod serialize;

pub use kind::{Constant, Function, Logical, NameKind, NodeKind, Operator, Relational};
pub use math::MathNode;
pub use parser::MathParser;
pub use serialize::MathWriter;
