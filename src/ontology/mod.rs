//! Ontology substrate: the axiom store the dataset is assembled in.
//!
//! The pipeline only needs axiom storage, never classification, so the store is
//! reached through the narrow [`OntologyStore`] trait:
//!
//! - declare a class or object property
//! - assert `Sub SubClassOf (property some Filler)`
//! - load a base ontology document and persist the result
//!
//! [`OxigraphOntology`] implements it on top of an in-memory `oxigraph` store
//! using the standard OWL 2 RDF mapping for existential restrictions.

pub mod store;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotations::normalize_concept;
use crate::config::VocabularyConfig;
use crate::error::OntologyResult;

pub use store::OxigraphOntology;

/// An absolute IRI naming a class or property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Axiom storage capability required by the pipeline.
///
/// Implementations must treat repeated assertions as idempotent.
pub trait OntologyStore {
    /// Load a base ontology document.
    fn load(path: &Path) -> OntologyResult<Self>
    where
        Self: Sized;

    /// Declare `class` as an OWL class. Returns `true` if it was not declared before.
    fn declare_class(&mut self, class: &Iri) -> OntologyResult<bool>;

    /// Declare `property` as an OWL object property. Returns `true` if new.
    fn declare_property(&mut self, property: &Iri) -> OntologyResult<bool>;

    fn contains_class(&self, class: &Iri) -> bool;

    /// Assert `sub SubClassOf (property some filler)`. Returns `true` if new.
    ///
    /// Does not declare `sub`, `filler` or `property`; callers decide whether
    /// unseen terms may be created.
    fn add_some_values_from(&mut self, sub: &Iri, property: &Iri, filler: &Iri)
    -> OntologyResult<bool>;

    fn has_some_values_from(&self, sub: &Iri, property: &Iri, filler: &Iri) -> bool;

    /// Number of `SubClassOf (property some filler)` axioms with named terms.
    fn axiom_count(&self) -> usize;

    /// Write the whole ontology to `path`.
    fn persist(&self, path: &Path) -> OntologyResult<()>;
}

/// IRI layout for entities, concepts and the two relations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    entity_prefix: String,
    concept_prefix: String,
    pub has_function: Iri,
    pub interacts_with: Iri,
}

impl Vocabulary {
    pub fn from_config(config: &VocabularyConfig) -> Self {
        Self {
            entity_prefix: config.entity_prefix.clone(),
            concept_prefix: config.concept_prefix.clone(),
            has_function: Iri::new(config.has_function.clone()),
            interacts_with: Iri::new(config.interacts_with.clone()),
        }
    }

    /// `P1` -> `http://P1`
    pub fn entity(&self, id: &str) -> Iri {
        Iri::new(format!("{}{id}", self.entity_prefix))
    }

    /// `GO:0008150` -> `http://purl.obolibrary.org/obo/GO_0008150`
    pub fn concept(&self, id: &str) -> Iri {
        Iri::new(format!("{}{}", self.concept_prefix, normalize_concept(id)))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::from_config(&VocabularyConfig::default())
    }
}
