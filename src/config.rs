//! Pipeline configuration, persisted as TOML.
//!
//! Layering is: built-in defaults, then an optional TOML file, then explicit
//! command-line flags. [`PipelineConfig::validate`] runs before the ontology is
//! loaded so configuration errors never leave a half-built dataset behind.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::embed::WalkConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::split::SplitRatios;

/// Seed used for the split permutation unless a config file overrides it.
pub const DEFAULT_SEED: u64 = 0;

/// Full configuration for one dataset build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Base ontology document (GO by default).
    #[serde(default = "default_ontology_file")]
    pub ontology_file: PathBuf,
    /// Gzip-compressed interaction table (STRING format).
    #[serde(default = "default_interactions_file")]
    pub interactions_file: PathBuf,
    /// Tab-separated entity-to-concept annotations.
    #[serde(default = "default_annotations_file")]
    pub annotations_file: PathBuf,
    /// Directory receiving `ontology.owl`, `valid.tsv` and `test.tsv`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub split: SplitConfig,
    /// How unseen entity and concept ids are treated during augmentation.
    #[serde(default)]
    pub term_policy: TermPolicy,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub embedding: WalkConfig,
}

fn default_ontology_file() -> PathBuf {
    PathBuf::from("data/go.owl")
}
fn default_interactions_file() -> PathBuf {
    PathBuf::from("data/4932.protein.links.detailed.v11.0.txt.gz")
}
fn default_annotations_file() -> PathBuf {
    PathBuf::from("data/annotations.tsv")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("datasets/ppi_yeast")
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ontology_file: default_ontology_file(),
            interactions_file: default_interactions_file(),
            annotations_file: default_annotations_file(),
            output_dir: default_output_dir(),
            split: SplitConfig::default(),
            term_policy: TermPolicy::default(),
            vocabulary: VocabularyConfig::default(),
            embedding: WalkConfig::default(),
        }
    }
}

/// Split ratios and the permutation seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Train, validation and test fractions; must sum to 1.
    #[serde(default = "default_ratios")]
    pub ratios: [f64; 3],
    #[serde(default)]
    pub seed: u64,
}

fn default_ratios() -> [f64; 3] {
    [0.9, 0.05, 0.05]
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            ratios: default_ratios(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Treatment of entity and concept ids the base ontology does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermPolicy {
    /// Unseen ids silently become new classes.
    #[default]
    Lenient,
    /// Concepts must be declared by the base ontology; interaction entities must be
    /// declared by the base ontology or introduced by an annotation.
    Strict,
}

/// IRI layout of the generated axioms and triples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// Prefix prepended to entity ids.
    #[serde(default = "default_entity_prefix")]
    pub entity_prefix: String,
    /// Prefix prepended to normalized concept ids.
    #[serde(default = "default_concept_prefix")]
    pub concept_prefix: String,
    #[serde(default = "default_has_function")]
    pub has_function: String,
    #[serde(default = "default_interacts_with")]
    pub interacts_with: String,
}

fn default_entity_prefix() -> String {
    "http://".into()
}
fn default_concept_prefix() -> String {
    "http://purl.obolibrary.org/obo/".into()
}
fn default_has_function() -> String {
    "http://has_function".into()
}
fn default_interacts_with() -> String {
    "http://interacts_with".into()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            entity_prefix: default_entity_prefix(),
            concept_prefix: default_concept_prefix(),
            has_function: default_has_function(),
            interacts_with: default_interacts_with(),
        }
    }
}

impl PipelineConfig {
    /// Load a config from a TOML file. Missing fields take their defaults.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validated split ratios.
    pub fn ratios(&self) -> ConfigResult<SplitRatios> {
        SplitRatios::new(self.split.ratios)
    }

    /// Check everything that can be checked before the first mutation:
    /// ratios, presence of every input, and presence of the output directory.
    pub fn validate(&self) -> ConfigResult<()> {
        self.ratios()?;
        for input in [
            &self.ontology_file,
            &self.interactions_file,
            &self.annotations_file,
        ] {
            if !input.is_file() {
                return Err(ConfigError::MissingInput {
                    path: input.clone(),
                });
            }
        }
        if !self.output_dir.is_dir() {
            return Err(ConfigError::MissingOutputDir {
                path: self.output_dir.clone(),
            });
        }
        Ok(())
    }
}
