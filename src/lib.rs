// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # onto-dataset
//!
//! Builds reproducible, ontology-augmented link-prediction datasets from a
//! protein interaction network, an annotation table and a base ontology.
//!
//! ## Architecture
//!
//! - **Edge loading** (`interactions`): gzip tables into an undirected, deduplicated edge set
//! - **Splitting** (`split`): seeded Fisher-Yates permutation into train/valid/test
//! - **Annotations** (`annotations`): entity-to-concept records
//! - **Ontology substrate** (`ontology`): axiom store behind a narrow trait, backed by oxigraph
//! - **Augmentation** (`augment`): annotations and training edges as existential restrictions
//! - **Emission** (`emit`, `dataset`): `ontology.owl` plus held-out `valid.tsv` / `test.tsv`
//! - **Embedding driver** (`embed`): hands the dataset to an external walk/skip-gram trainer
//!
//! ## Library usage
//!
//! ```no_run
//! use onto_dataset::config::PipelineConfig;
//! use onto_dataset::pipeline::build_dataset;
//!
//! let config = PipelineConfig::load(std::path::Path::new("pipeline.toml")).unwrap();
//! let report = build_dataset(&config).unwrap();
//! println!("{} training edges", report.split.train);
//! ```

pub mod annotations;
pub mod augment;
pub mod config;
pub mod dataset;
pub mod embed;
pub mod emit;
pub mod error;
pub mod interactions;
pub mod ontology;
pub mod pipeline;
pub mod split;
