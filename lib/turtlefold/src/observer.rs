//! Instrumentation hook of the renderer.

/// Something notable that happened while collecting or rendering a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RenderEvent<'a> {
    /// A prefix was declared again for another namespace, the old binding is gone.
    PrefixRebound {
        prefix: &'a str,
        previous: &'a str,
        namespace: &'a str,
    },
    /// A namespace got a newer prefix, `prefix` is no longer used for it.
    NamespaceShadowed {
        prefix: &'a str,
        namespace: &'a str,
    },
    /// A comment was received and dropped.
    CommentDiscarded { text: &'a str },
    /// A blank node is written with the generated label `_:b{label}` instead of being nested.
    BlankNodeLabelled { label: usize, reason: LabelReason },
    /// The document has been written to the sink.
    Rendered {
        subjects: usize,
        triples: usize,
        prefixes: usize,
        bytes: usize,
    },
}

/// Why a blank node could not be nested in `[ ]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelReason {
    /// It is never used as object.
    Unreferenced,
    /// It is the object of several triples.
    Shared,
    /// Nesting it would close a cycle of blank nodes.
    CycleClosing,
    /// Folding is disabled.
    FoldingDisabled,
    /// It would be nested deeper than the configured maximum.
    TooDeep,
}

/// Receives the [`RenderEvent`]s of a document.
///
/// Implemented by any `FnMut(&RenderEvent<'_>)`:
/// ```
/// use turtlefold::{RenderEvent, TurtleRenderer};
///
/// let mut document = TurtleRenderer::new()
///     .with_observer(|event: &RenderEvent<'_>| {
///         if let RenderEvent::CommentDiscarded { text } = event {
///             assert_eq!(*text, "hello");
///         }
///     })
///     .start();
/// document.comment("hello");
/// ```
pub trait RenderObserver {
    fn on_event(&mut self, event: &RenderEvent<'_>);
}

impl<F: FnMut(&RenderEvent<'_>)> RenderObserver for F {
    #[inline]
    fn on_event(&mut self, event: &RenderEvent<'_>) {
        self(event)
    }
}
