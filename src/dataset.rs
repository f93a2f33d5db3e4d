//! Read-side handle on an emitted dataset directory.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::emit::{HeldOutTriple, ONTOLOGY_FILE, TEST_FILE, VALID_FILE};
use crate::error::{DatasetResult, EmitError, InputError, InputResult};

/// A built dataset: persisted ontology plus held-out triples.
#[derive(Debug, Clone)]
pub struct Dataset {
    root: PathBuf,
    valid: Vec<HeldOutTriple>,
    test: Vec<HeldOutTriple>,
}

impl Dataset {
    /// Open a dataset directory, parsing both triple files.
    ///
    /// The ontology document is only checked for presence; loading it is up to
    /// the consumer.
    pub fn open(root: &Path) -> DatasetResult<Self> {
        for name in [ONTOLOGY_FILE, VALID_FILE, TEST_FILE] {
            let path = root.join(name);
            if !path.is_file() {
                return Err(EmitError::MissingFile { path }.into());
            }
        }
        let valid = read_triple_file(&root.join(VALID_FILE))?;
        let test = read_triple_file(&root.join(TEST_FILE))?;
        tracing::debug!(
            root = %root.display(),
            valid = valid.len(),
            test = test.len(),
            "opened dataset"
        );
        Ok(Self {
            root: root.to_path_buf(),
            valid,
            test,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ontology_path(&self) -> PathBuf {
        self.root.join(ONTOLOGY_FILE)
    }

    pub fn validation(&self) -> &[HeldOutTriple] {
        &self.valid
    }

    pub fn testing(&self) -> &[HeldOutTriple] {
        &self.test
    }
}

/// Parse a held-out triple file. Blank lines are skipped; anything else malformed
/// is fatal.
pub fn read_triple_file(path: &Path) -> InputResult<Vec<HeldOutTriple>> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_triples(BufReader::new(file), path)
}

pub fn read_triples<R: BufRead>(reader: R, source: &Path) -> InputResult<Vec<HeldOutTriple>> {
    let mut triples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source_err| InputError::Io {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let line = line.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }
        let triple = HeldOutTriple::parse_line(line).map_err(|message| {
            InputError::MalformedTriple {
                path: source.to_path_buf(),
                line: idx + 1,
                message,
            }
        })?;
        triples.push(triple);
    }
    Ok(triples)
}
