//! In-memory accumulation of the triples of one document.

use crate::blank_node::BlankNode;
use crate::named_node::NamedNode;
use crate::triple::{Node, Subject, Triple};
use std::collections::{HashMap, HashSet};

/// Accumulates streamed triples into a graph keyed by subject.
///
/// Subjects and blank nodes are interned in arenas addressed by their first-seen position,
/// and each subject keeps its `(predicate, object)` pairs in insertion order.
/// This is what makes the rendering deterministic.
///
/// ```
/// use turtlefold::{BlankNode, GraphBuilder, NamedNode, Triple};
///
/// let s = NamedNode::new("http://example.com/s")?;
/// let p = NamedNode::new("http://example.com/p")?;
/// let mut graph = GraphBuilder::new();
/// assert!(graph.insert(Triple::new(s.clone(), p.clone(), BlankNode::new(1))));
/// assert!(!graph.insert(Triple::new(s, p, BlankNode::new(1))));
/// assert_eq!(graph.len(), 1);
/// # Result::<_,turtlefold::IriParseError>::Ok(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct GraphBuilder {
    subjects: Vec<SubjectEntry>,
    subject_ids: HashMap<Subject, usize>,
    blank_nodes: Vec<BlankNodeEntry>,
    blank_node_ids: HashMap<BlankNode, usize>,
    triples: HashSet<Triple>,
}

#[derive(Debug, Clone)]
pub(crate) struct SubjectEntry {
    pub(crate) subject: Subject,
    /// Position in the blank node arena if the subject is a blank node.
    pub(crate) blank_node: Option<usize>,
    pub(crate) predicate_objects: Vec<(NamedNode, Node)>,
}

#[derive(Debug, Clone)]
pub(crate) struct BlankNodeEntry {
    /// Position in the subject arena if the blank node has outgoing triples.
    pub(crate) subject: Option<usize>,
    /// Number of triples having this blank node as object.
    pub(crate) in_degree: usize,
    /// First subject that uses this blank node as object.
    pub(crate) parent: Option<usize>,
}

impl GraphBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a triple to the graph.
    ///
    /// Returns `false` if the triple was already there.
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        let subject_id = self.subject_id(&triple.subject);
        if let Node::BlankNode(object) = &triple.object {
            let object_id = self.blank_node_id(*object);
            let entry = &mut self.blank_nodes[object_id];
            entry.in_degree += 1;
            entry.parent.get_or_insert(subject_id);
        }
        self.subjects[subject_id]
            .predicate_objects
            .push((triple.predicate.clone(), triple.object.clone()));
        self.triples.insert(triple);
        true
    }

    #[inline]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Number of distinct triples.
    #[inline]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// The subjects in first-seen order.
    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter().map(|entry| &entry.subject)
    }

    /// The triples grouped by subject in first-seen order, each subject keeping its insertion order.
    pub fn triples(&self) -> impl Iterator<Item = (&Subject, &NamedNode, &Node)> {
        self.subjects.iter().flat_map(|entry| {
            entry
                .predicate_objects
                .iter()
                .map(move |(predicate, object)| (&entry.subject, predicate, object))
        })
    }

    #[inline]
    pub(crate) fn subject_entries(&self) -> &[SubjectEntry] {
        &self.subjects
    }

    #[inline]
    pub(crate) fn blank_node_entries(&self) -> &[BlankNodeEntry] {
        &self.blank_nodes
    }

    /// Arena position of a blank node that occurs in the graph.
    #[inline]
    pub(crate) fn blank_node_position(&self, node: BlankNode) -> Option<usize> {
        self.blank_node_ids.get(&node).copied()
    }

    fn subject_id(&mut self, subject: &Subject) -> usize {
        if let Some(id) = self.subject_ids.get(subject) {
            return *id;
        }
        let id = self.subjects.len();
        let blank_node = if let Subject::BlankNode(node) = subject {
            let blank_node_id = self.blank_node_id(*node);
            self.blank_nodes[blank_node_id].subject = Some(id);
            Some(blank_node_id)
        } else {
            None
        };
        self.subjects.push(SubjectEntry {
            subject: subject.clone(),
            blank_node,
            predicate_objects: Vec::new(),
        });
        self.subject_ids.insert(subject.clone(), id);
        id
    }

    fn blank_node_id(&mut self, node: BlankNode) -> usize {
        *self.blank_node_ids.entry(node).or_insert_with(|| {
            self.blank_nodes.push(BlankNodeEntry {
                subject: None,
                in_degree: 0,
                parent: None,
            });
            self.blank_nodes.len() - 1
        })
    }
}

impl Extend<Triple> for GraphBuilder {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl FromIterator<Triple> for GraphBuilder {
    fn from_iter<T: IntoIterator<Item = Triple>>(iter: T) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;

    fn iri(value: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{value}"))
    }

    #[test]
    fn keeps_first_seen_order() {
        let graph: GraphBuilder = [
            Triple::new(iri("b"), iri("p"), Literal::from("1")),
            Triple::new(iri("a"), iri("q"), Literal::from("2")),
            Triple::new(iri("b"), iri("r"), Literal::from("3")),
            Triple::new(iri("b"), iri("p"), Literal::from("0")),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            graph.subjects().cloned().collect::<Vec<_>>(),
            vec![Subject::from(iri("b")), Subject::from(iri("a"))]
        );
        let objects = graph
            .triples()
            .map(|(_, _, o)| o.to_string())
            .collect::<Vec<_>>();
        assert_eq!(objects, ["\"1\"", "\"3\"", "\"0\"", "\"2\""]);
    }

    #[test]
    fn tracks_blank_node_references() {
        let a = BlankNode::new(10);
        let b = BlankNode::new(20);
        let mut graph = GraphBuilder::new();
        graph.insert(Triple::new(iri("s"), iri("p"), a));
        graph.insert(Triple::new(a, iri("p"), b));
        graph.insert(Triple::new(iri("s"), iri("p"), b));
        graph.insert(Triple::new(iri("s"), iri("p"), b));

        let a_id = graph.blank_node_position(a).unwrap();
        let b_id = graph.blank_node_position(b).unwrap();
        assert_eq!((a_id, b_id), (0, 1));
        let entries = graph.blank_node_entries();
        assert_eq!(entries[a_id].in_degree, 1);
        assert_eq!(entries[a_id].subject, Some(1));
        assert_eq!(entries[b_id].in_degree, 2);
        assert_eq!(entries[b_id].parent, Some(1));
        assert_eq!(graph.subject_entries()[1].blank_node, Some(a_id));
        assert_eq!(graph.len(), 3);
    }
}
