use crate::triple::Node;
use oxilangtag::LanguageTagParseError;
use oxiri::IriParseError;
use std::io;

/// An error raised when building a literal from inconsistent parts.
#[derive(Debug, thiserror::Error)]
pub enum InvalidLiteralError {
    #[error("A literal can not have both a datatype and a language tag")]
    DatatypeAndLanguage,
    #[error(transparent)]
    LanguageTag(#[from] LanguageTagParseError),
}

/// An error raised when a [`Node`] is used in a position it is not allowed in.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{node} can not be converted to a {target}")]
pub struct TryFromNodeError {
    node: Node,
    target: &'static str,
}

impl TryFromNodeError {
    #[inline]
    pub(crate) fn new(node: Node, target: &'static str) -> Self {
        Self { node, target }
    }

    /// The node that could not be converted.
    #[inline]
    pub fn node(&self) -> &Node {
        &self.node
    }
}

/// An error raised when declaring a namespace prefix that can not be written in Turtle.
#[derive(Debug, thiserror::Error)]
pub enum InvalidNamespaceError {
    #[error("{0:?} is not a valid Turtle prefix name")]
    Prefix(String),
    #[error("Invalid namespace IRI for prefix {prefix:?}: {error}")]
    Iri {
        prefix: String,
        #[source]
        error: IriParseError,
    },
}

/// An error raised while driving a [`TurtleHandler`](crate::TurtleHandler).
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The output sink failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    InvalidNamespace(#[from] InvalidNamespaceError),
    /// A call was made out of the `start`, namespaces/statements/comments, `end` order.
    #[error("Unexpected call to {call} {state}")]
    Protocol {
        call: &'static str,
        state: &'static str,
    },
}

impl From<RenderError> for io::Error {
    #[inline]
    fn from(error: RenderError) -> Self {
        match error {
            RenderError::Io(error) => error,
            RenderError::InvalidNamespace(error) => Self::new(io::ErrorKind::InvalidInput, error),
            RenderError::Protocol { .. } => Self::other(error),
        }
    }
}
