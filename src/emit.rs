//! Dataset emission: the augmented ontology plus held-out triple files.
//!
//! Output layout inside the dataset directory:
//!
//! - `ontology.owl`: base ontology, annotations and training edges only
//! - `valid.tsv`, `test.tsv`: `<s>\t<p>\t<o>` per line, two lines per edge
//!
//! Held-out edges are written as plain triples and never touch the ontology.

use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DatasetResult, EmitError, EmitResult};
use crate::interactions::Interaction;
use crate::ontology::{Iri, OntologyStore, Vocabulary};
use crate::split::Split;

pub const ONTOLOGY_FILE: &str = "ontology.owl";
pub const VALID_FILE: &str = "valid.tsv";
pub const TEST_FILE: &str = "test.tsv";

/// A directed held-out interaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldOutTriple {
    pub subject: Iri,
    pub predicate: Iri,
    pub object: Iri,
}

impl HeldOutTriple {
    /// The forward and mirrored triples of an undirected edge.
    pub fn expand(edge: &Interaction, vocab: &Vocabulary) -> [HeldOutTriple; 2] {
        edge.directed().map(|(s, o)| HeldOutTriple {
            subject: vocab.entity(s),
            predicate: vocab.interacts_with.clone(),
            object: vocab.entity(o),
        })
    }

    /// Parse one `<s>\t<p>\t<o>` line.
    pub fn parse_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split('\t').collect();
        let &[s, p, o] = fields.as_slice() else {
            return Err(format!("expected 3 tab-separated fields, found {}", fields.len()));
        };
        let iri = |field: &str| -> Result<Iri, String> {
            field
                .strip_prefix('<')
                .and_then(|f| f.strip_suffix('>'))
                .filter(|f| !f.is_empty())
                .map(Iri::from)
                .ok_or_else(|| format!("\"{field}\" is not an <IRI>"))
        };
        Ok(Self {
            subject: iri(s)?,
            predicate: iri(p)?,
            object: iri(o)?,
        })
    }
}

impl fmt::Display for HeldOutTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>\t<{}>\t<{}>", self.subject, self.predicate, self.object)
    }
}

/// Paths and counts of an emitted dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitReport {
    pub ontology: PathBuf,
    pub valid: PathBuf,
    pub test: PathBuf,
    pub valid_triples: usize,
    pub test_triples: usize,
}

/// Write every held-out edge as two triples. Returns the number of lines written.
pub fn write_triples<W: Write>(
    mut writer: W,
    edges: &[Interaction],
    vocab: &Vocabulary,
) -> std::io::Result<usize> {
    let mut lines = 0;
    for edge in edges {
        for triple in HeldOutTriple::expand(edge, vocab) {
            writeln!(writer, "{triple}")?;
            lines += 1;
        }
    }
    writer.flush()?;
    Ok(lines)
}

/// Write a triple file at `path`.
pub fn write_triple_file(path: &Path, edges: &[Interaction], vocab: &Vocabulary) -> EmitResult<usize> {
    let io_err = |source| EmitError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    write_triples(BufWriter::new(file), edges, vocab).map_err(io_err)
}

/// Persist the ontology and write the validation and test triple files.
pub fn emit_dataset<O: OntologyStore>(
    ontology: &O,
    split: &Split,
    vocab: &Vocabulary,
    output_dir: &Path,
) -> DatasetResult<EmitReport> {
    let ontology_path = output_dir.join(ONTOLOGY_FILE);
    ontology.persist(&ontology_path)?;

    let valid_path = output_dir.join(VALID_FILE);
    let valid_triples = write_triple_file(&valid_path, &split.valid, vocab)?;
    let test_path = output_dir.join(TEST_FILE);
    let test_triples = write_triple_file(&test_path, &split.test, vocab)?;

    tracing::info!(
        dir = %output_dir.display(),
        valid_triples,
        test_triples,
        "wrote held-out triples"
    );
    Ok(EmitReport {
        ontology: ontology_path,
        valid: valid_path,
        test: test_path,
        valid_triples,
        test_triples,
    })
}

/// Held-out entity ids with no class in `ontology`, sorted.
///
/// Such entities cannot be embedded from the training graph, so their edges are
/// unusable for evaluation.
pub fn heldout_coverage<'e, O, I>(ontology: &O, edges: I, vocab: &Vocabulary) -> Vec<String>
where
    O: OntologyStore,
    I: IntoIterator<Item = &'e Interaction>,
{
    let mut missing = BTreeSet::new();
    for edge in edges {
        for id in [&edge.a, &edge.b] {
            if !ontology.contains_class(&vocab.entity(id)) {
                missing.insert(id.clone());
            }
        }
    }
    missing.into_iter().collect()
}
