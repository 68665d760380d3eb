use std::fmt;

/// An RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node) scoped to a single document.
///
/// The identifier is opaque: two blank nodes are the same node if and only if they share the same id.
/// The renderer never prints it, it generates its own `_:bN` labels.
///
/// The default string formatter is returning an N-Triples compatible representation that is only meant for diagnostics:
/// ```
/// use turtlefold::BlankNode;
///
/// assert_eq!("_:b7", BlankNode::new(7).to_string());
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct BlankNode(u64);

impl BlankNode {
    /// Creates a blank node from a unique numerical id.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying ID of this blank node.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlankNode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:b{}", self.0)
    }
}

impl From<u64> for BlankNode {
    #[inline]
    fn from(id: u64) -> Self {
        Self(id)
    }
}
