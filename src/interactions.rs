//! Interaction loading: gzip tables into a deduplicated undirected edge set.
//!
//! Input rows look like the STRING `protein.links.detailed` format:
//!
//! ```text
//! protein1 protein2 neighborhood fusion cooccurence coexpression experimental database textmining combined_score
//! 4932.Q0045 4932.Q0080 0 0 0 0 467 0 0 497
//! ```
//!
//! Column 7 (index 6) is the confidence score. A score of exactly zero means
//! "no evidence" and the row is dropped.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, InputResult};

/// Column holding the confidence score.
pub const SCORE_FIELD: usize = 6;

/// An undirected interaction between two entities.
///
/// The stored orientation is the one first observed in the input; it carries no
/// meaning beyond fixing the iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub a: String,
    pub b: String,
    /// Confidence score from the source table.
    pub score: f64,
}

impl Interaction {
    pub fn new(a: impl Into<String>, b: impl Into<String>, score: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            score,
        }
    }

    /// Both directed readings of this edge, forward first.
    ///
    /// Every place an undirected edge is materialized (training axioms and
    /// held-out triples alike) goes through this expansion.
    pub fn directed(&self) -> [(&str, &str); 2] {
        [(&self.a, &self.b), (&self.b, &self.a)]
    }

    /// Whether this edge connects `x` and `y` in either orientation.
    pub fn connects(&self, x: &str, y: &str) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

/// Counters collected while reading an interaction table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Data rows read (header and blank lines excluded).
    pub rows: usize,
    /// Rows dropped for a zero score.
    pub zero_score: usize,
    /// Rows dropped because the pair (in either orientation) was already present.
    pub duplicates: usize,
}

/// Insertion-ordered set of undirected interactions.
///
/// No edge and its reverse are both present. Iteration order is first-seen order,
/// which is the order the splitter permutes.
#[derive(Debug, Clone, Default)]
pub struct InteractionSet {
    edges: Vec<Interaction>,
    seen: HashSet<(String, String)>,
    stats: LoadStats,
}

impl InteractionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge unless it or its reverse is already present.
    /// Returns whether the edge was added.
    pub fn insert(&mut self, edge: Interaction) -> bool {
        let reverse = (edge.b.clone(), edge.a.clone());
        if self.seen.contains(&reverse) {
            return false;
        }
        let forward = (edge.a.clone(), edge.b.clone());
        if !self.seen.insert(forward) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn contains(&self, a: &str, b: &str) -> bool {
        self.seen.contains(&(a.to_string(), b.to_string()))
            || self.seen.contains(&(b.to_string(), a.to_string()))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges in insertion order.
    pub fn as_slice(&self) -> &[Interaction] {
        &self.edges
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }
}

impl FromIterator<Interaction> for InteractionSet {
    fn from_iter<I: IntoIterator<Item = Interaction>>(iter: I) -> Self {
        let mut set = Self::new();
        for edge in iter {
            set.insert(edge);
        }
        set
    }
}

/// Load a gzip-compressed interaction table.
pub fn load_interactions(path: &Path) -> InputResult<InteractionSet> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let set = read_interactions(BufReader::new(MultiGzDecoder::new(file)), path)?;
    let stats = set.stats();
    tracing::info!(
        path = %path.display(),
        edges = set.len(),
        rows = stats.rows,
        zero_score = stats.zero_score,
        duplicates = stats.duplicates,
        "loaded interactions"
    );
    Ok(set)
}

/// Read an (already decompressed) interaction table.
///
/// The first line is the header and is skipped unconditionally. `source` is only
/// used to label errors. Any malformed row aborts the read.
pub fn read_interactions<R: BufRead>(reader: R, source: &Path) -> InputResult<InteractionSet> {
    let io_err = |source_err| InputError::Io {
        path: source.to_path_buf(),
        source: source_err,
    };

    let mut lines = reader.lines();
    match lines.next() {
        Some(header) => {
            header.map_err(io_err)?;
        }
        None => {
            return Err(InputError::MissingHeader {
                path: source.to_path_buf(),
            });
        }
    }

    let mut set = InteractionSet::new();
    for (idx, line) in lines.enumerate() {
        let line = line.map_err(io_err)?;
        let line_no = idx + 2;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        set.stats.rows += 1;

        let fields: Vec<&str> = line.split(' ').collect();
        if fields.len() <= SCORE_FIELD {
            return Err(InputError::MissingField {
                path: source.to_path_buf(),
                line: line_no,
                expected: SCORE_FIELD + 1,
                found: fields.len(),
            });
        }
        let raw_score = fields[SCORE_FIELD];
        let score: f64 = raw_score.parse().map_err(|_| InputError::InvalidScore {
            path: source.to_path_buf(),
            line: line_no,
            value: raw_score.to_string(),
        })?;

        if score == 0.0 {
            set.stats.zero_score += 1;
            continue;
        }
        if !set.insert(Interaction::new(fields[0], fields[1], score)) {
            set.stats.duplicates += 1;
        }
    }
    Ok(set)
}
