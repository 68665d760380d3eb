//! A pretty [Turtle](https://www.w3.org/TR/turtle/) renderer implemented by [`TurtleRenderer`].

use crate::error::InvalidNamespaceError;
use crate::fold::{BlankNodeFolder, FoldOptions, FoldPlan};
use crate::graph::{GraphBuilder, SubjectEntry};
use crate::literal::{Literal, print_quoted_str};
use crate::named_node::NamedNode;
use crate::observer::{RenderEvent, RenderObserver};
use crate::prefix::PrefixAllocator;
use crate::triple::{Node, Subject, Triple};
use crate::vocab::rdf;
use oxiri::{Iri, IriParseError};
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::io::{self, Write};

/// A [Turtle](https://www.w3.org/TR/turtle/) renderer producing human-readable documents.
///
/// Contrary to a streaming serializer, it collects the whole document first so it can:
/// * write only the `@prefix` declarations that are actually used,
/// * nest the blank nodes used only once as `[ ]` instead of labelling them,
/// * group the triples by subject and predicate.
///
/// ```
/// use turtlefold::{BlankNode, Literal, NamedNode, Triple, TurtleRenderer};
///
/// let mut document = TurtleRenderer::new().start_write(Vec::new());
/// document.namespace("schema", "http://schema.org/")?;
/// document.namespace("unused", "http://example.com/unused#")?;
/// document.statement(Triple::new(
///     NamedNode::new("http://example.com#me")?,
///     NamedNode::new("http://schema.org/address")?,
///     BlankNode::new(0),
/// ));
/// document.statement(Triple::new(
///     BlankNode::new(0),
///     NamedNode::new("http://schema.org/addressCountry")?,
///     Literal::new_simple_literal("FR"),
/// ));
/// assert_eq!(
///     "@prefix schema: <http://schema.org/> .\n<http://example.com#me> schema:address [ schema:addressCountry \"FR\" ] .\n",
///     String::from_utf8(document.end()?)?
/// );
/// # Result::<_,Box<dyn std::error::Error>>::Ok(())
/// ```
#[must_use]
pub struct TurtleRenderer {
    base: Option<Iri<String>>,
    prefixes: PrefixAllocator,
    fold: FoldOptions,
    observer: Option<Box<dyn RenderObserver>>,
}

impl Default for TurtleRenderer {
    #[inline]
    fn default() -> Self {
        Self {
            base: None,
            prefixes: PrefixAllocator::new(),
            fold: FoldOptions {
                enabled: true,
                max_depth: None,
            },
            observer: None,
        }
    }
}

impl TurtleRenderer {
    /// Builds a new [`TurtleRenderer`] with blank node folding enabled.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a `@base` directive at the top of the document.
    ///
    /// IRIs are still written in full.
    #[inline]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Result<Self, IriParseError> {
        self.base = Some(Iri::parse(base_iri.into())?);
        Ok(self)
    }

    /// Declares a prefix before any streamed [`namespace`](TurtleDocument::namespace) call.
    ///
    /// Like streamed declarations, it is only written if it is used.
    #[inline]
    pub fn with_prefix(
        mut self,
        prefix_name: impl Into<String>,
        prefix_iri: impl Into<String>,
    ) -> Result<Self, InvalidNamespaceError> {
        self.prefixes.add_namespace(prefix_name, prefix_iri)?;
        Ok(self)
    }

    /// Writes every blank node with a generated label and its own subject block instead of nesting them.
    #[inline]
    pub fn without_folding(mut self) -> Self {
        self.fold.enabled = false;
        self
    }

    /// Maximal number of nested `[ ]`. There is no limit by default.
    ///
    /// Blank nodes that would be nested deeper get a label and their own subject block.
    #[inline]
    pub fn with_max_folding_depth(mut self, max_depth: usize) -> Self {
        self.fold.max_depth = Some(max_depth);
        self
    }

    /// The base IRI given to [`with_base_iri`](Self::with_base_iri).
    #[inline]
    pub fn base_iri(&self) -> Option<&Iri<String>> {
        self.base.as_ref()
    }

    /// Sets the receiver of the [`RenderEvent`]s of the documents.
    #[inline]
    pub fn with_observer(mut self, observer: impl RenderObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Starts a document that will be written to a [`Write`] implementation when it ends.
    ///
    /// ```
    /// use turtlefold::{NamedNode, Triple, TurtleRenderer};
    ///
    /// let mut document = TurtleRenderer::new()
    ///     .with_base_iri("http://example.com/")?
    ///     .start_write(Vec::new());
    /// document.namespace("ex", "http://example.com/")?;
    /// document.statement(Triple::new(
    ///     NamedNode::new("http://example.com/s")?,
    ///     NamedNode::new("http://www.w3.org/1999/02/22-rdf-syntax-ns#type")?,
    ///     NamedNode::new("http://example.com/Thing")?,
    /// ));
    /// assert_eq!(
    ///     b"@base <http://example.com/> .\n@prefix ex: <http://example.com/> .\nex:s a ex:Thing .\n",
    ///     document.end()?.as_slice()
    /// );
    /// # Result::<_,Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn start_write<W: Write>(self, write: W) -> ToWriteTurtleDocument<W> {
        ToWriteTurtleDocument {
            write,
            document: self.start(),
        }
    }

    /// Starts a document using the low-level API: the [`Write`] implementation is only given at the end.
    ///
    /// ```
    /// use turtlefold::{Literal, NamedNode, Triple, TurtleRenderer};
    ///
    /// let mut document = TurtleRenderer::new().start();
    /// document.comment("not written");
    /// document.statement(Triple::new(
    ///     NamedNode::new("http://example.com/s")?,
    ///     NamedNode::new("http://example.com/p")?,
    ///     Literal::new_simple_literal("o"),
    /// ));
    /// let mut buf = Vec::new();
    /// document.end(&mut buf)?;
    /// assert_eq!(
    ///     b"<http://example.com/s> <http://example.com/p> \"o\" .\n",
    ///     buf.as_slice()
    /// );
    /// # Result::<_,Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn start(self) -> TurtleDocument {
        TurtleDocument {
            base: self.base,
            prefixes: self.prefixes,
            fold: self.fold,
            observer: self.observer,
            graph: GraphBuilder::new(),
        }
    }
}

/// A document being collected. Can be built using [`TurtleRenderer::start_write`].
///
/// Nothing is written before [`end`](Self::end).
#[must_use]
pub struct ToWriteTurtleDocument<W: Write> {
    write: W,
    document: TurtleDocument,
}

impl<W: Write> ToWriteTurtleDocument<W> {
    /// Declares a namespace prefix. See [`TurtleDocument::namespace`].
    #[inline]
    pub fn namespace(
        &mut self,
        prefix_name: &str,
        prefix_iri: &str,
    ) -> Result<(), InvalidNamespaceError> {
        self.document.namespace(prefix_name, prefix_iri)
    }

    /// Adds a triple to the document.
    #[inline]
    pub fn statement(&mut self, triple: impl Into<Triple>) {
        self.document.statement(triple);
    }

    /// Receives a comment. Comments are never written.
    #[inline]
    pub fn comment(&mut self, text: &str) {
        self.document.comment(text);
    }

    /// Renders the document, writes it and returns the underlying [`Write`].
    pub fn end(mut self) -> io::Result<W> {
        self.document.end(&mut self.write)?;
        Ok(self.write)
    }
}

/// A document being collected using the low-level API. Can be built using [`TurtleRenderer::start`].
#[must_use]
pub struct TurtleDocument {
    base: Option<Iri<String>>,
    prefixes: PrefixAllocator,
    fold: FoldOptions,
    observer: Option<Box<dyn RenderObserver>>,
    graph: GraphBuilder,
}

impl TurtleDocument {
    /// Declares a namespace prefix.
    ///
    /// Declaring an existing prefix again moves it to the new namespace.
    /// Declaring a new prefix for a namespace that already has one replaces the old prefix for this namespace.
    pub fn namespace(
        &mut self,
        prefix_name: &str,
        prefix_iri: &str,
    ) -> Result<(), InvalidNamespaceError> {
        let registration = self
            .prefixes
            .register(prefix_name.to_owned(), prefix_iri.to_owned())?;
        if let Some(previous) = &registration.rebound_from {
            self.emit(&RenderEvent::PrefixRebound {
                prefix: prefix_name,
                previous,
                namespace: prefix_iri,
            });
        }
        for prefix in &registration.shadowed {
            self.emit(&RenderEvent::NamespaceShadowed {
                prefix,
                namespace: prefix_iri,
            });
        }
        Ok(())
    }

    /// Adds a triple to the document. Duplicated triples are ignored.
    #[inline]
    pub fn statement(&mut self, triple: impl Into<Triple>) {
        self.graph.insert(triple.into());
    }

    /// Receives a comment. Comments are never written.
    #[inline]
    pub fn comment(&mut self, text: &str) {
        self.emit(&RenderEvent::CommentDiscarded { text });
    }

    /// Renders the document and writes it to `write` at once.
    ///
    /// If writing fails, the sink might contain a partial document.
    pub fn end(mut self, mut write: impl Write) -> io::Result<()> {
        let plan = BlankNodeFolder::fold(&self.graph, self.fold);
        for (label, reason) in plan.labelled() {
            self.emit(&RenderEvent::BlankNodeLabelled { label, reason });
        }
        let mut writer = DocumentWriter {
            graph: &self.graph,
            plan: &plan,
            prefixes: &mut self.prefixes,
            output: String::new(),
            roots: 0,
        };
        writer.write_subjects().map_err(io::Error::other)?;
        let DocumentWriter { output: body, roots, .. } = writer;

        let mut output = String::with_capacity(body.len() + 256);
        if let Some(base) = &self.base {
            writeln!(output, "@base <{}> .", base.as_str()).map_err(io::Error::other)?;
        }
        let mut prefixes = 0;
        for (prefix, namespace) in self.prefixes.used_bindings() {
            writeln!(output, "@prefix {prefix}: <{namespace}> .").map_err(io::Error::other)?;
            prefixes += 1;
        }
        output.push_str(&body);

        write.write_all(output.as_bytes())?;
        write.flush()?;
        self.emit(&RenderEvent::Rendered {
            subjects: roots,
            triples: self.graph.len(),
            prefixes,
            bytes: output.len(),
        });
        Ok(())
    }

    fn emit(&mut self, event: &RenderEvent<'_>) {
        if let Some(observer) = &mut self.observer {
            observer.on_event(event);
        }
    }
}

/// Writes the statement blocks of a folded graph.
struct DocumentWriter<'a> {
    graph: &'a GraphBuilder,
    plan: &'a FoldPlan,
    prefixes: &'a mut PrefixAllocator,
    output: String,
    roots: usize,
}

/// A subject block being written, nested blocks are pushed on top of their parent.
struct Frame<'a> {
    groups: Vec<(&'a NamedNode, Vec<&'a Node>)>,
    predicate: usize,
    object: usize,
    indent: usize,
}

impl<'a> Frame<'a> {
    fn new(entry: &'a SubjectEntry, indent: usize) -> Self {
        Self {
            groups: group_by_predicate(&entry.predicate_objects),
            predicate: 0,
            object: 0,
            indent,
        }
    }
}

impl<'a> DocumentWriter<'a> {
    fn write_subjects(&mut self) -> fmt::Result {
        let graph = self.graph;
        for entry in graph.subject_entries() {
            if !self.plan.is_root(entry) {
                continue;
            }
            self.roots += 1;
            self.write_subject(entry)?;
            self.output.push(' ');
            self.write_predicate_objects(entry)?;
            self.output.push_str(" .\n");
        }
        Ok(())
    }

    fn write_subject(&mut self, entry: &SubjectEntry) -> fmt::Result {
        match (&entry.subject, entry.blank_node) {
            (Subject::Iri(iri), _) => self.write_iri(iri),
            (Subject::BlankNode(_), Some(blank_node)) => self.write_blank_node_label(blank_node),
            (Subject::BlankNode(node), None) => write!(self.output, "{node}"),
        }
    }

    /// Writes `predicate object , object ; predicate object` with the folded blank nodes nested as `[ ]`.
    ///
    /// Continuation lines are indented with one more tab per nesting level.
    fn write_predicate_objects(&mut self, entry: &'a SubjectEntry) -> fmt::Result {
        let mut stack = vec![Frame::new(entry, 1)];
        while let Some(frame) = stack.last_mut() {
            let Some((predicate, objects)) = frame.groups.get(frame.predicate) else {
                stack.pop();
                if !stack.is_empty() {
                    self.output.push_str(" ]");
                }
                continue;
            };
            let predicate = *predicate;
            let Some(object) = objects.get(frame.object).copied() else {
                frame.predicate += 1;
                frame.object = 0;
                continue;
            };
            let indent = frame.indent;
            if frame.object > 0 {
                self.output.push_str(" , ");
            } else {
                if frame.predicate > 0 {
                    self.output.push_str(" ;\n");
                    self.write_indent(indent);
                }
                if predicate == rdf::TYPE {
                    self.output.push('a');
                } else {
                    self.write_iri(predicate)?;
                }
                self.output.push(' ');
            }
            frame.object += 1;
            if let Some(nested) = self.nested_subject(object) {
                self.output.push_str("[ ");
                stack.push(Frame::new(nested, indent + 1));
            } else {
                self.write_object(object)?;
            }
        }
        Ok(())
    }

    /// The subject block to nest in place of `object` if it is a folded blank node with properties.
    fn nested_subject(&self, object: &Node) -> Option<&'a SubjectEntry> {
        let Node::BlankNode(node) = object else {
            return None;
        };
        let graph = self.graph;
        let blank_node = graph.blank_node_position(*node)?;
        if !self.plan.is_folded(blank_node) {
            return None;
        }
        let subject = graph.blank_node_entries()[blank_node].subject?;
        Some(&graph.subject_entries()[subject])
    }

    fn write_object(&mut self, object: &Node) -> fmt::Result {
        match object {
            Node::Iri(iri) => self.write_iri(iri),
            Node::BlankNode(node) => match self.graph.blank_node_position(*node) {
                Some(blank_node) if self.plan.is_folded(blank_node) => {
                    self.output.push_str("[]");
                    Ok(())
                }
                Some(blank_node) => self.write_blank_node_label(blank_node),
                None => write!(self.output, "{node}"),
            },
            Node::Literal(literal) => self.write_literal(literal),
        }
    }

    fn write_iri(&mut self, iri: &NamedNode) -> fmt::Result {
        if let Some((prefix, local)) = self.prefixes.resolve(iri.as_str()) {
            write!(self.output, "{prefix}:{local}")
        } else {
            write!(self.output, "{iri}")
        }
    }

    fn write_blank_node_label(&mut self, blank_node: usize) -> fmt::Result {
        match self.plan.label(blank_node) {
            Some(label) => write!(self.output, "_:b{label}"),
            None => {
                self.output.push_str("[]");
                Ok(())
            }
        }
    }

    fn write_literal(&mut self, literal: &Literal) -> fmt::Result {
        print_quoted_str(literal.value(), &mut self.output)?;
        if let Some(language) = literal.language() {
            write!(self.output, "@{language}")
        } else if let Some(datatype) = literal.datatype() {
            self.output.push_str("^^");
            self.write_iri(datatype)
        } else {
            Ok(())
        }
    }

    fn write_indent(&mut self, indent: usize) {
        for _ in 0..indent {
            self.output.push('\t');
        }
    }
}

/// Groups objects by predicate, keeping the first-seen order of both.
fn group_by_predicate(predicate_objects: &[(NamedNode, Node)]) -> Vec<(&NamedNode, Vec<&Node>)> {
    let mut groups: Vec<(&NamedNode, Vec<&Node>)> = Vec::new();
    let mut positions = HashMap::new();
    for (predicate, object) in predicate_objects {
        let position = *positions.entry(predicate).or_insert_with(|| {
            groups.push((predicate, Vec::new()));
            groups.len() - 1
        });
        groups[position].1.push(object);
    }
    groups
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic_in_result_fn)]

    use super::*;
    use crate::blank_node::BlankNode;
    use crate::observer::LabelReason;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ex(local: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{local}"))
    }

    fn render(renderer: TurtleRenderer, triples: Vec<Triple>) -> io::Result<String> {
        let mut document = renderer.start_write(Vec::new());
        for triple in triples {
            document.statement(triple);
        }
        String::from_utf8(document.end()?).map_err(io::Error::other)
    }

    #[test]
    fn empty_document() -> io::Result<()> {
        assert_eq!(render(TurtleRenderer::new(), Vec::new())?, "");
        assert_eq!(
            render(
                TurtleRenderer::new()
                    .with_base_iri("http://example.org/base/")
                    .map_err(io::Error::other)?,
                Vec::new()
            )?,
            "@base <http://example.org/base/> .\n"
        );
        Ok(())
    }

    #[test]
    fn groups_and_nests() -> Result<(), Box<dyn std::error::Error>> {
        let b1 = BlankNode::new(1);
        let b2 = BlankNode::new(2);
        let output = render(
            TurtleRenderer::new().with_prefix("ex", "http://example.com/")?,
            vec![
                Triple::new(ex("s"), ex("p"), ex("o1")),
                Triple::new(ex("s"), ex("q"), Literal::new_language_tagged_literal("x", "en")?),
                Triple::new(ex("s"), ex("p"), ex("o2")),
                Triple::new(ex("s"), ex("r"), b1),
                Triple::new(b1, ex("p2"), Literal::from("y")),
                Triple::new(b1, ex("p3"), b2),
                Triple::new(b1, NamedNode::new_unchecked(rdf::TYPE), ex("C")),
            ],
        )?;
        assert_eq!(
            output,
            "@prefix ex: <http://example.com/> .\nex:s ex:p ex:o1 , ex:o2 ;\n\tex:q \"x\"@en ;\n\tex:r [ ex:p2 \"y\" ;\n\t\tex:p3 [] ;\n\t\ta ex:C ] .\n"
        );
        Ok(())
    }

    #[test]
    fn typed_literals() -> Result<(), Box<dyn std::error::Error>> {
        let integer = Literal::from(42_i64);
        assert_eq!(
            render(
                TurtleRenderer::new(),
                vec![Triple::new(ex("s"), ex("p"), integer.clone())]
            )?,
            "<http://example.com/s> <http://example.com/p> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n"
        );
        assert_eq!(
            render(
                TurtleRenderer::new().with_prefix("xsd", "http://www.w3.org/2001/XMLSchema#")?,
                vec![Triple::new(ex("s"), ex("p"), integer)]
            )?,
            "@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .\n<http://example.com/s> <http://example.com/p> \"42\"^^xsd:integer .\n"
        );
        Ok(())
    }

    #[test]
    fn shared_blank_node_is_labelled() -> io::Result<()> {
        let b = BlankNode::new(7);
        assert_eq!(
            render(
                TurtleRenderer::new(),
                vec![
                    Triple::new(ex("s"), ex("p"), b),
                    Triple::new(ex("s"), ex("q"), b),
                    Triple::new(b, ex("r"), Literal::from("v")),
                ]
            )?,
            "<http://example.com/s> <http://example.com/p> _:b0 ;\n\t<http://example.com/q> _:b0 .\n_:b0 <http://example.com/r> \"v\" .\n"
        );
        Ok(())
    }

    #[test]
    fn folding_can_be_disabled() -> io::Result<()> {
        let b = BlankNode::new(7);
        assert_eq!(
            render(
                TurtleRenderer::new().without_folding(),
                vec![
                    Triple::new(ex("s"), ex("p"), b),
                    Triple::new(b, ex("r"), Literal::from("v")),
                ]
            )?,
            "<http://example.com/s> <http://example.com/p> _:b0 .\n_:b0 <http://example.com/r> \"v\" .\n"
        );
        Ok(())
    }

    #[test]
    fn cycle_is_closed_with_a_label() -> io::Result<()> {
        let a = BlankNode::new(1);
        let b = BlankNode::new(2);
        assert_eq!(
            render(
                TurtleRenderer::new(),
                vec![Triple::new(a, ex("p"), b), Triple::new(b, ex("p"), a)]
            )?,
            "_:b0 <http://example.com/p> [ <http://example.com/p> _:b0 ] .\n"
        );
        Ok(())
    }

    #[test]
    fn observer_receives_events() -> Result<(), Box<dyn std::error::Error>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let mut document = TurtleRenderer::new()
            .with_observer(move |event: &RenderEvent<'_>| {
                sink.borrow_mut().push(format!("{event:?}"));
            })
            .start();
        document.namespace("p1", "http://example.com/")?;
        document.namespace("p2", "http://example.com/")?;
        document.namespace("p2", "http://example.org/")?;
        document.comment("hidden");
        document.statement(Triple::new(BlankNode::new(1), ex("p"), ex("o")));
        let mut buf = Vec::new();
        document.end(&mut buf)?;
        assert_eq!(
            String::from_utf8(buf)?,
            "@prefix p1: <http://example.com/> .\n_:b0 p1:p p1:o .\n"
        );
        assert_eq!(
            *events.borrow(),
            [
                format!(
                    "{:?}",
                    RenderEvent::NamespaceShadowed {
                        prefix: "p1",
                        namespace: "http://example.com/"
                    }
                ),
                format!(
                    "{:?}",
                    RenderEvent::PrefixRebound {
                        prefix: "p2",
                        previous: "http://example.com/",
                        namespace: "http://example.org/"
                    }
                ),
                format!("{:?}", RenderEvent::CommentDiscarded { text: "hidden" }),
                format!(
                    "{:?}",
                    RenderEvent::BlankNodeLabelled {
                        label: 0,
                        reason: LabelReason::Unreferenced
                    }
                ),
                format!(
                    "{:?}",
                    RenderEvent::Rendered {
                        subjects: 1,
                        triples: 1,
                        prefixes: 1,
                        bytes: 53
                    }
                ),
            ]
        );
        Ok(())
    }

    struct FailingWrite;

    impl Write for FailingWrite {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_errors_are_returned() {
        let mut document = TurtleRenderer::new().start();
        document.statement(Triple::new(ex("s"), ex("p"), ex("o")));
        let error = document.end(FailingWrite).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
    }
}
