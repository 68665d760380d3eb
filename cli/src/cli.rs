use clap::{Parser, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "turtlefold")]
/// Rewrite an RDF graph as pretty Turtle
///
/// Only the prefixes that are used are declared and blank nodes used once are nested as [ ].
pub struct Args {
    /// File to read the graph from
    ///
    /// If no file is given, stdin is used.
    /// In this case, the input format must be specified using the --format option.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,
    /// The format of the input
    ///
    /// By default, the format is guessed from the input file extension.
    #[arg(long, value_enum, required_unless_present = "file")]
    pub format: Option<InputFormat>,
    /// Base IRI used to resolve the relative IRIs of the input and written as @base
    #[arg(long, value_hint = ValueHint::Url)]
    pub base: Option<String>,
    /// File to write the Turtle document to
    ///
    /// If no file is given, stdout is used.
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
    /// Namespace prefix to use, like "schema=http://schema.org/"
    ///
    /// Can be repeated. It is only written if the output uses it.
    #[arg(short, long = "prefix", value_name = "NAME=IRI")]
    pub prefixes: Vec<String>,
    /// Give a label to every blank node instead of nesting them
    #[arg(long)]
    pub no_folding: bool,
    /// Maximal number of nested [ ]
    ///
    /// Blank nodes nested deeper are written with a label. There is no limit by default.
    #[arg(long)]
    pub max_folding_depth: Option<usize>,
    /// Format of the diagnostic messages written to stderr
    ///
    /// Their verbosity is set by the RUST_LOG environment variable.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum InputFormat {
    /// Turtle, file extension "ttl"
    Turtle,
    /// N-Triples, file extension "nt"
    #[value(name = "ntriples")]
    NTriples,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
