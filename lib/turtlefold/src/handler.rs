//! Push-based document protocol, for parsers that report what they read through callbacks.

use crate::error::RenderError;
use crate::triple::Triple;
use crate::turtle::{ToWriteTurtleDocument, TurtleRenderer};
use std::io::Write;

/// Receives a parsed RDF document.
///
/// A document is one [`start`](Self::start) call, any sequence of
/// [`namespace`](Self::namespace), [`statement`](Self::statement) and [`comment`](Self::comment)
/// calls and a final [`end`](Self::end).
pub trait RdfHandler {
    type Error;

    fn start(&mut self) -> Result<(), Self::Error>;

    fn namespace(&mut self, prefix: &str, namespace: &str) -> Result<(), Self::Error>;

    fn statement(&mut self, triple: Triple) -> Result<(), Self::Error>;

    fn comment(&mut self, text: &str) -> Result<(), Self::Error>;

    fn end(&mut self) -> Result<(), Self::Error>;
}

/// An [`RdfHandler`] writing the received document as pretty Turtle with a [`TurtleRenderer`].
///
/// ```
/// use turtlefold::{Literal, NamedNode, RdfHandler, Triple, TurtleHandler, TurtleRenderer};
///
/// let mut handler = TurtleHandler::new(TurtleRenderer::new(), Vec::new());
/// handler.start()?;
/// handler.namespace("ex", "http://example.com/")?;
/// handler.comment("ignored")?;
/// handler.statement(Triple::new(
///     NamedNode::new("http://example.com/s")?,
///     NamedNode::new("http://example.com/p")?,
///     Literal::new_simple_literal("o"),
/// ))?;
/// handler.end()?;
/// assert_eq!(
///     handler.into_inner()?.as_slice(),
///     b"@prefix ex: <http://example.com/> .\nex:s ex:p \"o\" .\n"
/// );
/// # Result::<_,Box<dyn std::error::Error>>::Ok(())
/// ```
#[must_use]
pub struct TurtleHandler<W: Write> {
    state: HandlerState<W>,
}

enum HandlerState<W: Write> {
    Ready { renderer: TurtleRenderer, write: W },
    Collecting(ToWriteTurtleDocument<W>),
    Ended(W),
    Failed,
}

impl<W: Write> HandlerState<W> {
    fn name(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "before start",
            Self::Collecting(_) => "while a document is open",
            Self::Ended(_) => "after end",
            Self::Failed => "after a failed end",
        }
    }
}

impl<W: Write> TurtleHandler<W> {
    #[inline]
    pub fn new(renderer: TurtleRenderer, write: W) -> Self {
        Self {
            state: HandlerState::Ready { renderer, write },
        }
    }

    /// Returns the [`Write`] the document has been written to.
    ///
    /// Fails if [`end`](RdfHandler::end) has not successfully been called.
    pub fn into_inner(self) -> Result<W, RenderError> {
        match self.state {
            HandlerState::Ended(write) => Ok(write),
            state => Err(RenderError::Protocol {
                call: "into_inner",
                state: state.name(),
            }),
        }
    }

    fn document(
        &mut self,
        call: &'static str,
    ) -> Result<&mut ToWriteTurtleDocument<W>, RenderError> {
        match &mut self.state {
            HandlerState::Collecting(document) => Ok(document),
            state => Err(RenderError::Protocol {
                call,
                state: state.name(),
            }),
        }
    }
}

impl<W: Write> RdfHandler for TurtleHandler<W> {
    type Error = RenderError;

    fn start(&mut self) -> Result<(), RenderError> {
        match std::mem::replace(&mut self.state, HandlerState::Failed) {
            HandlerState::Ready { renderer, write } => {
                self.state = HandlerState::Collecting(renderer.start_write(write));
                Ok(())
            }
            state => {
                let name = state.name();
                self.state = state;
                Err(RenderError::Protocol {
                    call: "start",
                    state: name,
                })
            }
        }
    }

    fn namespace(&mut self, prefix: &str, namespace: &str) -> Result<(), RenderError> {
        self.document("namespace")?.namespace(prefix, namespace)?;
        Ok(())
    }

    fn statement(&mut self, triple: Triple) -> Result<(), RenderError> {
        self.document("statement")?.statement(triple);
        Ok(())
    }

    fn comment(&mut self, text: &str) -> Result<(), RenderError> {
        self.document("comment")?.comment(text);
        Ok(())
    }

    fn end(&mut self) -> Result<(), RenderError> {
        match std::mem::replace(&mut self.state, HandlerState::Failed) {
            HandlerState::Collecting(document) => {
                self.state = HandlerState::Ended(document.end()?);
                Ok(())
            }
            state => {
                let name = state.name();
                self.state = state;
                Err(RenderError::Protocol {
                    call: "end",
                    state: name,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidNamespaceError;
    use crate::literal::Literal;
    use crate::named_node::NamedNode;
    use std::io;

    fn triple() -> Triple {
        Triple::new(
            NamedNode::new_unchecked("http://example.com/s"),
            NamedNode::new_unchecked("http://example.com/p"),
            Literal::from("o"),
        )
    }

    #[test]
    fn rejects_calls_out_of_order() {
        let mut handler = TurtleHandler::new(TurtleRenderer::new(), Vec::new());
        let error = handler.statement(triple()).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unexpected call to statement before start"
        );
        handler.start().unwrap();
        assert!(matches!(
            handler.start(),
            Err(RenderError::Protocol { call: "start", .. })
        ));
        handler.statement(triple()).unwrap();
        handler.end().unwrap();
        assert!(matches!(
            handler.end(),
            Err(RenderError::Protocol {
                call: "end",
                state: "after end"
            })
        ));
        assert_eq!(
            handler.into_inner().unwrap(),
            b"<http://example.com/s> <http://example.com/p> \"o\" .\n"
        );
    }

    #[test]
    fn into_inner_requires_end() {
        let mut handler = TurtleHandler::new(TurtleRenderer::new(), Vec::new());
        handler.start().unwrap();
        assert!(matches!(
            handler.into_inner(),
            Err(RenderError::Protocol {
                call: "into_inner",
                ..
            })
        ));
    }

    #[test]
    fn invalid_namespace_is_reported() {
        let mut handler = TurtleHandler::new(TurtleRenderer::new(), Vec::new());
        handler.start().unwrap();
        assert!(matches!(
            handler.namespace("a b", "http://example.com/"),
            Err(RenderError::InvalidNamespace(InvalidNamespaceError::Prefix(_)))
        ));
        // The document is still usable
        handler.statement(triple()).unwrap();
        handler.end().unwrap();
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_failure_poisons_the_handler() {
        let mut handler = TurtleHandler::new(TurtleRenderer::new(), ClosedPipe);
        handler.start().unwrap();
        handler.statement(triple()).unwrap();
        assert!(matches!(handler.end(), Err(RenderError::Io(_))));
        assert!(matches!(
            handler.statement(triple()),
            Err(RenderError::Protocol {
                state: "after a failed end",
                ..
            })
        ));
    }
}
