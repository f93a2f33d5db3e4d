//! Entity-to-concept annotations.
//!
//! One record per line, tab separated: the entity id followed by any number of
//! concept ids (`P1\tGO:0008150\tGO:0005634`). A line with only the entity is
//! legal and carries no assertions.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InputError, InputResult};

/// Character in concept ids that cannot appear in the local part of the IRI.
pub const CONCEPT_SEPARATOR: char = ':';

/// Normalize a concept id for embedding into an IRI (`GO:0008150` -> `GO_0008150`).
pub fn normalize_concept(id: &str) -> String {
    id.replace(CONCEPT_SEPARATOR, "_")
}

/// Concepts attached to a single entity, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub entity: String,
    /// Raw concept ids as they appear in the file.
    pub concepts: Vec<String>,
}

impl Annotation {
    /// `(entity, normalized concept)` pairs, one per concept, repeats included.
    pub fn assertions(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.concepts
            .iter()
            .map(|c| (self.entity.as_str(), normalize_concept(c)))
    }
}

/// Load an annotation file.
pub fn load_annotations(path: &Path) -> InputResult<Vec<Annotation>> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let annotations = read_annotations(BufReader::new(file), path)?;
    tracing::info!(
        path = %path.display(),
        entities = annotations.len(),
        concepts = annotations.iter().map(|a| a.concepts.len()).sum::<usize>(),
        "loaded annotations"
    );
    Ok(annotations)
}

/// Read annotation records. There is no header; blank lines are skipped.
pub fn read_annotations<R: BufRead>(reader: R, source: &Path) -> InputResult<Vec<Annotation>> {
    let mut annotations = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source_err| InputError::Io {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let Some(entity) = fields.next() else {
            continue;
        };
        annotations.push(Annotation {
            entity: entity.to_string(),
            concepts: fields
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect(),
        });
    }
    Ok(annotations)
}
