use crate::cli::{Args, InputFormat, LogFormat};
use anyhow::{Context, bail};
use clap::Parser;
use oxiri::Iri;
use rio_api::model as rio;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesParser, TurtleParser};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write, stdin, stdout};
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use turtlefold::{
    BlankNode, Literal, NamedNode, Node, RdfHandler, RenderEvent, Subject, Triple, TurtleHandler,
    TurtleRenderer,
};

mod cli;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    let format = if let Some(format) = args.format {
        format
    } else if let Some(file) = &args.file {
        format_from_path(file)?
    } else {
        bail!("The --format option must be set when reading from stdin")
    };
    let prefixes = args
        .prefixes
        .iter()
        .map(|prefix| parse_prefix(prefix))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let mut renderer = TurtleRenderer::new().with_observer(log_event);
    if args.no_folding {
        renderer = renderer.without_folding();
    }
    if let Some(max_depth) = args.max_folding_depth {
        renderer = renderer.with_max_folding_depth(max_depth);
    }
    if let Some(base) = &args.base {
        renderer = renderer
            .with_base_iri(base.as_str())
            .with_context(|| format!("Invalid base IRI {base}"))?;
    }
    let conversion = Conversion {
        format,
        base: renderer.base_iri().cloned(),
        prefixes,
    };

    // The output is only touched once the whole input has been read
    let turtle = if let Some(file) = &args.file {
        conversion.run(open_file(file)?, renderer)?
    } else {
        conversion.run(stdin().lock(), renderer)?
    };
    if let Some(output) = &args.output {
        write_file(output, &turtle)?;
    } else {
        let mut stdout = stdout().lock();
        stdout.write_all(&turtle)?;
        stdout.flush()?;
    }
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => subscriber.init(),
        LogFormat::Json => subscriber.json().init(),
    }
}

/// Forwards the renderer events to the diagnostic log.
fn log_event(event: &RenderEvent<'_>) {
    match event {
        RenderEvent::PrefixRebound {
            prefix,
            previous,
            namespace,
        } => warn!(prefix, previous, namespace, "Prefix bound to another namespace"),
        RenderEvent::NamespaceShadowed { prefix, namespace } => {
            debug!(prefix, namespace, "Prefix replaced by a newer one for its namespace");
        }
        RenderEvent::CommentDiscarded { text } => debug!(text, "Comment discarded"),
        RenderEvent::BlankNodeLabelled { label, reason } => {
            debug!(label, reason = ?reason, "Blank node written with a label");
        }
        RenderEvent::Rendered {
            subjects,
            triples,
            prefixes,
            bytes,
        } => info!(subjects, triples, prefixes, bytes, "Turtle document written"),
        _ => (),
    }
}

/// Settings of a conversion from an input graph to Turtle.
struct Conversion {
    format: InputFormat,
    base: Option<Iri<String>>,
    prefixes: Vec<(String, String)>,
}

impl Conversion {
    /// Reads the whole input graph and returns it rendered as Turtle.
    fn run(self, read: impl BufRead, renderer: TurtleRenderer) -> anyhow::Result<Vec<u8>> {
        let mut handler = TurtleHandler::new(renderer, Vec::new());
        handler.start()?;
        let mut blank_nodes = BlankNodeIds::default();
        let mut triples = 0_usize;
        let mut on_triple = |t: rio::Triple<'_>| -> anyhow::Result<()> {
            handler.statement(convert_triple(t, &mut blank_nodes)?)?;
            triples += 1;
            Ok(())
        };
        let input_prefixes = match self.format {
            InputFormat::Turtle => {
                let mut parser = TurtleParser::new(read, self.base);
                parser.parse_all(&mut on_triple)?;
                let mut prefixes = parser
                    .prefixes()
                    .iter()
                    .map(|(prefix, namespace)| (prefix.clone(), namespace.clone()))
                    .collect::<Vec<_>>();
                prefixes.sort();
                prefixes
            }
            InputFormat::NTriples => {
                NTriplesParser::new(read).parse_all(&mut on_triple)?;
                Vec::new()
            }
        };
        debug!(triples, format = ?self.format, "Input parsed");

        // The command line declarations come last so that they take precedence
        for (prefix, namespace) in input_prefixes.iter().chain(&self.prefixes) {
            handler
                .namespace(prefix, namespace)
                .with_context(|| format!("Invalid prefix declaration {prefix}: <{namespace}>"))?;
        }
        handler.end()?;
        Ok(handler.into_inner()?)
    }
}

/// Gives stable numeric ids to the blank node labels of the input.
#[derive(Default)]
struct BlankNodeIds {
    ids: HashMap<String, u64>,
}

impl BlankNodeIds {
    fn get(&mut self, label: &str) -> BlankNode {
        if let Some(id) = self.ids.get(label) {
            return BlankNode::new(*id);
        }
        let id = self.ids.len() as u64;
        self.ids.insert(label.to_owned(), id);
        BlankNode::new(id)
    }
}

fn convert_triple(
    triple: rio::Triple<'_>,
    blank_nodes: &mut BlankNodeIds,
) -> anyhow::Result<Triple> {
    let subject = match triple.subject {
        rio::Subject::NamedNode(node) => Subject::from(NamedNode::new_unchecked(node.iri)),
        rio::Subject::BlankNode(node) => Subject::from(blank_nodes.get(node.id)),
        _ => bail!("RDF-star quoted triples are not supported"),
    };
    let object = match triple.object {
        rio::Term::NamedNode(node) => Node::from(NamedNode::new_unchecked(node.iri)),
        rio::Term::BlankNode(node) => Node::from(blank_nodes.get(node.id)),
        rio::Term::Literal(rio::Literal::Simple { value }) => {
            Literal::new_simple_literal(value).into()
        }
        rio::Term::Literal(rio::Literal::LanguageTaggedString { value, language }) => {
            Literal::new_language_tagged_literal(value, language)?.into()
        }
        rio::Term::Literal(rio::Literal::Typed { value, datatype }) => {
            Literal::new_typed_literal(value, NamedNode::new_unchecked(datatype.iri)).into()
        }
        _ => bail!("RDF-star quoted triples are not supported"),
    };
    Ok(Triple::new(
        subject,
        NamedNode::new_unchecked(triple.predicate.iri),
        object,
    ))
}

fn parse_prefix(declaration: &str) -> anyhow::Result<(String, String)> {
    let Some((prefix, namespace)) = declaration.split_once('=') else {
        bail!("The prefix declaration '{declaration}' must have the form NAME=IRI")
    };
    Ok((prefix.to_owned(), namespace.to_owned()))
}

fn format_from_path(path: &Path) -> anyhow::Result<InputFormat> {
    let Some(ext) = path.extension().and_then(OsStr::to_str) else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    };
    match ext {
        "ttl" => Ok(InputFormat::Turtle),
        "nt" => Ok(InputFormat::NTriples),
        _ => bail!(
            "Not able to guess the file format from file name extension '{ext}', use the --format option"
        ),
    }
}

fn open_file(path: &Path) -> anyhow::Result<BufReader<File>> {
    Ok(BufReader::new(
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
    ))
}

fn write_file(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .with_context(|| format!("Failed to write {}", path.display()))
}
