//! Turtlefold renders RDF graphs as human-readable [Turtle](https://www.w3.org/TR/turtle/).
//!
//! Contrary to a streaming serializer, the whole document is collected before being written so that:
//! * only the namespace prefixes that are actually used are declared,
//! * conflicting prefix declarations are resolved (the last declaration wins),
//! * blank nodes used only once are nested as `[ ]` even if the graph contains blank node cycles,
//! * the output is deterministic for a given sequence of calls.
//!
//! Usage example:
//! ```
//! use turtlefold::*;
//!
//! let ex = NamedNode::new("http://example.com/me")?;
//! let knows = NamedNode::new("http://xmlns.com/foaf/0.1/knows")?;
//! let name = NamedNode::new("http://xmlns.com/foaf/0.1/name")?;
//!
//! let mut document = TurtleRenderer::new()
//!     .with_prefix("foaf", "http://xmlns.com/foaf/0.1/")?
//!     .start_write(Vec::new());
//! document.statement(Triple::new(ex, knows, BlankNode::new(1)));
//! document.statement(Triple::new(BlankNode::new(1), name, Literal::from("Alice")));
//! assert_eq!(
//!     String::from_utf8(document.end()?)?,
//!     "@prefix foaf: <http://xmlns.com/foaf/0.1/> .\n<http://example.com/me> foaf:knows [ foaf:name \"Alice\" ] .\n"
//! );
//! # Result::<_,Box<dyn std::error::Error>>::Ok(())
//! ```

mod blank_node;
mod error;
mod fold;
mod graph;
mod handler;
mod literal;
mod named_node;
mod observer;
mod prefix;
mod triple;
mod turtle;
pub mod vocab;

pub use crate::blank_node::BlankNode;
pub use crate::error::{
    InvalidLiteralError, InvalidNamespaceError, RenderError, TryFromNodeError,
};
pub use crate::graph::GraphBuilder;
pub use crate::handler::{RdfHandler, TurtleHandler};
pub use crate::literal::Literal;
pub use crate::named_node::NamedNode;
pub use crate::observer::{LabelReason, RenderEvent, RenderObserver};
pub use crate::prefix::PrefixAllocator;
pub use crate::triple::{Node, Subject, Triple};
pub use crate::turtle::{ToWriteTurtleDocument, TurtleDocument, TurtleRenderer};
pub use oxilangtag::LanguageTagParseError;
pub use oxiri::IriParseError;
