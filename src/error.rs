//! Rich diagnostic error types for the dataset builder.
//!
//! Each stage of the pipeline defines its own error type with miette `#[diagnostic]`
//! derives, so a failed run reports which input, which line, and what to fix.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for a dataset build.
///
/// Each variant wraps a stage-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the process boundary.
#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Emit(#[from] EmitError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Trainer(#[from] TrainerError),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("split ratios {ratios:?} sum to {sum}, expected 1")]
    #[diagnostic(
        code(ods::config::ratio_sum),
        help(
            "The train/valid/test ratios must add up to exactly 1, \
             e.g. [0.9, 0.05, 0.05] or [1.0, 0.0, 0.0]."
        )
    )]
    RatioSum { ratios: [f64; 3], sum: f64 },

    #[error("split ratio {value} is invalid")]
    #[diagnostic(
        code(ods::config::ratio_value),
        help("Each split ratio must be a finite number between 0 and 1.")
    )]
    RatioValue { value: f64 },

    #[error("output directory does not exist: {}", .path.display())]
    #[diagnostic(
        code(ods::config::no_output_dir),
        help("Create the directory first; the builder never creates it implicitly.")
    )]
    MissingOutputDir { path: PathBuf },

    #[error("input file does not exist: {}", .path.display())]
    #[diagnostic(
        code(ods::config::no_input),
        help("Check the path passed on the command line or in the config file.")
    )]
    MissingInput { path: PathBuf },

    #[error("failed to read config file: {}", .path.display())]
    #[diagnostic(
        code(ods::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", .path.display())]
    #[diagnostic(
        code(ods::config::parse),
        help("Check the TOML syntax and field names in the config file.")
    )]
    Parse { path: PathBuf, message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Input-format errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("failed to read {}: {source}", .path.display())]
    #[diagnostic(
        code(ods::input::io),
        help(
            "A filesystem or decompression error occurred. Check that the file exists, \
             is readable, and (for interaction files) is valid gzip."
        )
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: missing header row", .path.display())]
    #[diagnostic(
        code(ods::input::no_header),
        help("Interaction files start with a header row; this file is empty.")
    )]
    MissingHeader { path: PathBuf },

    #[error("{}:{line}: expected at least {expected} fields, found {found}", .path.display())]
    #[diagnostic(
        code(ods::input::field_count),
        help(
            "Interaction rows are single-space separated: protein1 protein2 ... with the \
             confidence score in column 7. The row is truncated or uses another delimiter."
        )
    )]
    MissingField {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{}:{line}: score \"{value}\" is not a number", .path.display())]
    #[diagnostic(
        code(ods::input::score),
        help("The confidence score column must hold a numeric value.")
    )]
    InvalidScore {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("{}:{line}: malformed triple: {message}", .path.display())]
    #[diagnostic(
        code(ods::input::triple),
        help("Held-out triple files hold `<subject>\\t<predicate>\\t<object>` per line.")
    )]
    MalformedTriple {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

pub type InputResult<T> = std::result::Result<T, InputError>;

// ---------------------------------------------------------------------------
// Ontology substrate errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OntologyError {
    #[error("failed to create ontology store: {message}")]
    #[diagnostic(
        code(ods::ontology::store),
        help("The in-memory RDF store could not be initialized.")
    )]
    Store { message: String },

    #[error("failed to load ontology {}: {message}", .path.display())]
    #[diagnostic(
        code(ods::ontology::load),
        help(
            "The base ontology must be RDF/XML (.owl, .rdf, .xml), Turtle (.ttl) \
             or N-Triples (.nt). Check the file is complete and well-formed."
        )
    )]
    Load { path: PathBuf, message: String },

    #[error("failed to save ontology {}: {message}", .path.display())]
    #[diagnostic(
        code(ods::ontology::save),
        help("Check that the output directory is writable and the disk is not full.")
    )]
    Save { path: PathBuf, message: String },

    #[error("invalid IRI \"{iri}\": {message}")]
    #[diagnostic(
        code(ods::ontology::iri),
        help(
            "Entity and concept ids are embedded into IRIs. An id containing spaces \
             or angle brackets cannot form a valid IRI."
        )
    )]
    InvalidIri { iri: String, message: String },

    #[error("unknown class <{iri}>")]
    #[diagnostic(
        code(ods::ontology::unknown_class),
        help(
            "Strict term policy only accepts concepts declared in the base ontology and \
             entities declared there or by an annotation. The id may be misspelled; \
             use the lenient policy to create it as a new class."
        )
    )]
    UnknownClass { iri: String },

    #[error("SPARQL query failed: {message}")]
    #[diagnostic(
        code(ods::ontology::sparql),
        help("Internal query against the ontology store failed.")
    )]
    Sparql { message: String },
}

pub type OntologyResult<T> = std::result::Result<T, OntologyError>;

// ---------------------------------------------------------------------------
// Emission errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EmitError {
    #[error("failed to write {}: {source}", .path.display())]
    #[diagnostic(
        code(ods::emit::io),
        help(
            "A dataset file could not be written. Partial output in this directory \
             must not be used."
        )
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset file missing: {}", .path.display())]
    #[diagnostic(
        code(ods::emit::missing),
        help("Run `onto-dataset build` to produce ontology.owl, valid.tsv and test.tsv.")
    )]
    MissingFile { path: PathBuf },
}

pub type EmitResult<T> = std::result::Result<T, EmitError>;

// ---------------------------------------------------------------------------
// Embedding trainer errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TrainerError {
    #[error("failed to spawn trainer \"{program}\": {source}")]
    #[diagnostic(
        code(ods::trainer::spawn),
        help("Check that the trainer program is installed and on PATH.")
    )]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("trainer \"{program}\" exited with {status}")]
    #[diagnostic(
        code(ods::trainer::failed),
        help("The external trainer reported an error; its stderr was logged.")
    )]
    Failed { program: String, status: String },

    #[error("invalid walk configuration: {message}")]
    #[diagnostic(
        code(ods::trainer::config),
        help("Walk count, walk length and embedding size must all be positive.")
    )]
    InvalidConfig { message: String },
}

pub type TrainerResult<T> = std::result::Result<T, TrainerError>;

/// Convenience alias for whole-pipeline results.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
