use crate::blank_node::BlankNode;
use crate::error::TryFromNodeError;
use crate::literal::Literal;
use crate::named_node::NamedNode;
use std::fmt;

/// An RDF [term](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-term).
///
/// It is the union of [IRIs](https://www.w3.org/TR/rdf11-concepts/#dfn-iri), [blank nodes](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node) and [literals](https://www.w3.org/TR/rdf11-concepts/#dfn-literal).
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Node {
    Iri(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl Node {
    #[inline]
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }
}

impl fmt::Display for Node {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(node) => node.fmt(f),
            Self::BlankNode(node) => node.fmt(f),
            Self::Literal(literal) => literal.fmt(f),
        }
    }
}

impl From<NamedNode> for Node {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self::Iri(node)
    }
}

impl From<BlankNode> for Node {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Self::BlankNode(node)
    }
}

impl From<Literal> for Node {
    #[inline]
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<Subject> for Node {
    #[inline]
    fn from(node: Subject) -> Self {
        match node {
            Subject::Iri(node) => Self::Iri(node),
            Subject::BlankNode(node) => Self::BlankNode(node),
        }
    }
}

/// The union of [IRIs](https://www.w3.org/TR/rdf11-concepts/#dfn-iri) and [blank nodes](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node), the terms allowed in subject position.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Subject {
    Iri(NamedNode),
    BlankNode(BlankNode),
}

impl Subject {
    #[inline]
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }
}

impl fmt::Display for Subject {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(node) => node.fmt(f),
            Self::BlankNode(node) => node.fmt(f),
        }
    }
}

impl From<NamedNode> for Subject {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self::Iri(node)
    }
}

impl From<BlankNode> for Subject {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Self::BlankNode(node)
    }
}

impl TryFrom<Node> for Subject {
    type Error = TryFromNodeError;

    #[inline]
    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Iri(node) => Ok(Self::Iri(node)),
            Node::BlankNode(node) => Ok(Self::BlankNode(node)),
            Node::Literal(_) => Err(TryFromNodeError::new(node, "Subject")),
        }
    }
}

impl TryFrom<Node> for NamedNode {
    type Error = TryFromNodeError;

    #[inline]
    fn try_from(node: Node) -> Result<Self, Self::Error> {
        if let Node::Iri(node) = node {
            Ok(node)
        } else {
            Err(TryFromNodeError::new(node, "IRI"))
        }
    }
}

/// An owned [RDF triple](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-triple).
///
/// The default string formatter is returning an N-Triples compatible representation:
/// ```
/// use turtlefold::{NamedNode, Triple};
///
/// assert_eq!(
///     "<http://example.com/s> <http://example.com/p> <http://example.com/o>",
///     Triple::new(
///         NamedNode::new("http://example.com/s")?,
///         NamedNode::new("http://example.com/p")?,
///         NamedNode::new("http://example.com/o")?,
///     )
///     .to_string()
/// );
/// # Result::<_,turtlefold::IriParseError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Triple {
    /// The [subject](https://www.w3.org/TR/rdf11-concepts/#dfn-subject) of this triple.
    pub subject: Subject,

    /// The [predicate](https://www.w3.org/TR/rdf11-concepts/#dfn-predicate) of this triple.
    pub predicate: NamedNode,

    /// The [object](https://www.w3.org/TR/rdf11-concepts/#dfn-object) of this triple.
    pub object: Node,
}

impl Triple {
    /// Builds an RDF [triple](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-triple).
    #[inline]
    pub fn new(
        subject: impl Into<Subject>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Node>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Builds a triple from three arbitrary terms, checking each is allowed in its position.
    ///
    /// ```
    /// use turtlefold::{Literal, NamedNode, Node, Triple};
    ///
    /// let iri = Node::from(NamedNode::new_unchecked("http://example.com/s"));
    /// let literal = Node::from(Literal::new_simple_literal("foo"));
    /// assert!(Triple::from_nodes(iri.clone(), iri.clone(), literal.clone()).is_ok());
    /// assert!(Triple::from_nodes(literal, iri.clone(), iri).is_err());
    /// ```
    pub fn from_nodes(
        subject: Node,
        predicate: Node,
        object: Node,
    ) -> Result<Self, TryFromNodeError> {
        Ok(Self {
            subject: subject.try_into()?,
            predicate: predicate.try_into()?,
            object,
        })
    }
}

impl fmt::Display for Triple {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_misplaced_terms() {
        let literal = Node::from(Literal::new_simple_literal("foo"));
        let blank = Node::from(BlankNode::new(1));
        let error = Subject::try_from(literal.clone()).unwrap_err();
        assert_eq!(error.node(), &literal);
        assert_eq!(
            error.to_string(),
            "\"foo\" can not be converted to a Subject"
        );
        assert!(NamedNode::try_from(blank.clone()).is_err());
        assert_eq!(
            Subject::try_from(blank).unwrap(),
            Subject::BlankNode(BlankNode::new(1))
        );
    }
}
