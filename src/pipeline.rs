//! Dataset build pipeline.
//!
//! Stages run strictly in sequence, each to completion:
//!
//! validate config → load interactions → split → load annotations
//! → load base ontology → augment (annotations, training edges) → emit
//!
//! The ontology is moved into [`assemble`] and dropped once persisted.

use serde::{Deserialize, Serialize};

use crate::annotations::{Annotation, load_annotations};
use crate::augment::{AugmentReport, GraphAugmenter};
use crate::config::{PipelineConfig, TermPolicy};
use crate::emit::{EmitReport, emit_dataset, heldout_coverage};
use crate::error::DatasetResult;
use crate::interactions::{LoadStats, load_interactions};
use crate::ontology::{OntologyStore, OxigraphOntology, Vocabulary};
use crate::split::{Split, SplitSizes, split_interactions};

/// Summary of a completed build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub load: LoadStats,
    pub split: SplitSizes,
    pub augment: AugmentReport,
    pub emit: EmitReport,
    /// Held-out entities with no class in the persisted ontology.
    pub uncovered_entities: Vec<String>,
}

/// Build a dataset from the files named in `config`.
pub fn build_dataset(config: &PipelineConfig) -> DatasetResult<BuildReport> {
    config.validate()?;
    let ratios = config.ratios()?;
    let vocab = Vocabulary::from_config(&config.vocabulary);

    let interactions = load_interactions(&config.interactions_file)?;
    let split = split_interactions(&interactions, ratios, config.split.seed)?;
    let annotations = load_annotations(&config.annotations_file)?;
    let ontology = OxigraphOntology::load(&config.ontology_file)?;

    let assembled = assemble(
        ontology,
        &annotations,
        &split,
        &vocab,
        config.term_policy,
        &config.output_dir,
    )?;

    Ok(BuildReport {
        load: interactions.stats(),
        split: split.sizes(),
        augment: assembled.augment,
        emit: assembled.emit,
        uncovered_entities: assembled.uncovered_entities,
    })
}

/// Output of [`assemble`].
#[derive(Debug, Clone)]
pub struct Assembled {
    pub augment: AugmentReport,
    pub emit: EmitReport,
    pub uncovered_entities: Vec<String>,
}

/// Augment `ontology` with annotations and training edges, then emit the dataset.
pub fn assemble<O: OntologyStore>(
    mut ontology: O,
    annotations: &[Annotation],
    split: &Split,
    vocab: &Vocabulary,
    policy: TermPolicy,
    output_dir: &std::path::Path,
) -> DatasetResult<Assembled> {
    let augment = GraphAugmenter::new(vocab, policy).augment(
        &mut ontology,
        annotations,
        &split.train,
    )?;

    let uncovered_entities = heldout_coverage(&ontology, split.held_out(), vocab);
    if !uncovered_entities.is_empty() {
        tracing::warn!(
            count = uncovered_entities.len(),
            sample = ?uncovered_entities.iter().take(5).collect::<Vec<_>>(),
            "held-out entities missing from the training ontology"
        );
    }

    let emit = emit_dataset(&ontology, split, vocab, output_dir)?;
    Ok(Assembled {
        augment,
        emit,
        uncovered_entities,
    })
}
