//! Rich diagnostic error types for amor.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains. Only registry-level,
//! configuration and reasoner-attach failures reach callers of the public
//! [`Reference`](crate::reference::Reference) API; inconsistency signals are
//! absorbed at the coordinator boundary.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for amor.
#[derive(Debug, Error, Diagnostic)]
pub enum AmorError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Reasoner(#[from] ReasonerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Ontology(#[from] OntologyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Registry errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    #[error("a reference named \"{name}\" is already registered")]
    #[diagnostic(
        code(amor::registry::duplicate_name),
        help(
            "Reference names are unique per registry. Look the existing reference up \
             with `lookup()`, or `dispose()` it before creating a new one."
        )
    )]
    DuplicateReferenceName { name: String },

    #[error("no reference named \"{name}\" is registered")]
    #[diagnostic(
        code(amor::registry::not_found),
        help("Create it first with `ReferenceRegistry::create()`.")
    )]
    NotFound { name: String },
}

// ---------------------------------------------------------------------------
// Reasoner errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ReasonerError {
    #[error("ontology is inconsistent")]
    #[diagnostic(
        code(amor::reasoner::inconsistent),
        help(
            "The reasoner found a logical contradiction. Issue compensating writes \
             and call `synchronize()` again to clear the inconsistency flag."
        )
    )]
    InconsistentOntology,

    #[error("unknown reasoner \"{key}\"")]
    #[diagnostic(
        code(amor::reasoner::unknown),
        help("Supported reasoners: {available}.")
    )]
    UnknownReasoner { key: String, available: String },

    #[error("reasoner {reasoner} failed: {message}")]
    #[diagnostic(
        code(amor::reasoner::internal),
        help("The reasoner could not complete the request. Check the ontology for unsupported constructs.")
    )]
    Internal { reasoner: String, message: String },
}

// ---------------------------------------------------------------------------
// Ontology errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum OntologyError {
    #[error("I/O error on {path}: {source}")]
    #[diagnostic(
        code(amor::ontology::io),
        help(
            "A filesystem operation failed. Check that the path exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ontology document {source_name}: {message}")]
    #[diagnostic(
        code(amor::ontology::parse),
        help("The document is not valid in the format implied by its extension.")
    )]
    Parse { source_name: String, message: String },

    #[error("failed to serialize ontology: {message}")]
    #[diagnostic(code(amor::ontology::serialize))]
    Serialize { message: String },

    #[error("unsupported ontology document format: {extension}")]
    #[diagnostic(
        code(amor::ontology::format),
        help("Use one of: .ttl (Turtle), .nt (N-Triples), .owl/.rdf/.xml (RDF/XML).")
    )]
    UnsupportedFormat { extension: String },

    #[error("failed to fetch ontology from {url}: {message}")]
    #[diagnostic(
        code(amor::ontology::fetch),
        help("Check the URL and your network connection.")
    )]
    Fetch { url: String, message: String },

    #[error("invalid IRI: {iri}")]
    #[diagnostic(
        code(amor::ontology::invalid_iri),
        help("Entity names are appended to the ontology IRI after '#'; avoid spaces and angle brackets.")
    )]
    InvalidIri { iri: String },

    #[error("no file path configured for reference \"{reference}\"")]
    #[diagnostic(
        code(amor::ontology::no_path),
        help("Pass an explicit path to `save()` or set `file_path` in the reference config.")
    )]
    NoPath { reference: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read reference config: {path}")]
    #[diagnostic(
        code(amor::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse reference config: {path}")]
    #[diagnostic(
        code(amor::config::parse),
        help("Check the TOML syntax in the reference config file. {message}")
    )]
    Parse { path: String, message: String },

    #[error("failed to write reference config: {path}")]
    #[diagnostic(
        code(amor::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(amor::config::invalid))]
    Invalid { message: String },
}

/// Convenience alias for functions returning amor results.
pub type AmorResult<T> = std::result::Result<T, AmorError>;
