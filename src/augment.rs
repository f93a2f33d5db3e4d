//! Graph augmentation: annotations and training interactions become axioms.
//!
//! Two passes over the ontology, annotations first:
//!
//! 1. `Entity SubClassOf (has_function some Concept)` per annotation pair
//! 2. `A SubClassOf (interacts_with some B)` and its mirror per training edge
//!
//! This is the only place the ontology is mutated. Held-out edges never reach it.

use serde::{Deserialize, Serialize};

use crate::annotations::Annotation;
use crate::config::TermPolicy;
use crate::error::{OntologyError, OntologyResult};
use crate::interactions::Interaction;
use crate::ontology::{Iri, OntologyStore, Vocabulary};

/// Counts of what augmentation added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AugmentReport {
    /// New `has_function` axioms.
    pub annotation_axioms: usize,
    /// New `interacts_with` axioms (two per edge unless already present).
    pub interaction_axioms: usize,
    /// Assertions that were already in the ontology.
    pub duplicate_axioms: usize,
    /// Classes that did not exist before augmentation.
    pub classes_created: usize,
}

/// Adds annotation and training-edge axioms to an ontology.
#[derive(Debug, Clone)]
pub struct GraphAugmenter<'a> {
    vocab: &'a Vocabulary,
    policy: TermPolicy,
}

impl<'a> GraphAugmenter<'a> {
    pub fn new(vocab: &'a Vocabulary, policy: TermPolicy) -> Self {
        Self { vocab, policy }
    }

    /// Run both passes.
    pub fn augment<O: OntologyStore>(
        &self,
        ontology: &mut O,
        annotations: &[Annotation],
        train: &[Interaction],
    ) -> OntologyResult<AugmentReport> {
        let mut report = AugmentReport::default();
        self.add_annotations(ontology, annotations, &mut report)?;
        self.add_interactions(ontology, train, &mut report)?;
        tracing::info!(
            annotation_axioms = report.annotation_axioms,
            interaction_axioms = report.interaction_axioms,
            duplicates = report.duplicate_axioms,
            classes_created = report.classes_created,
            "augmented ontology"
        );
        Ok(report)
    }

    /// Pass 1: `Entity SubClassOf (has_function some Concept)`.
    pub fn add_annotations<O: OntologyStore>(
        &self,
        ontology: &mut O,
        annotations: &[Annotation],
        report: &mut AugmentReport,
    ) -> OntologyResult<()> {
        ontology.declare_property(&self.vocab.has_function)?;
        for annotation in annotations {
            let entity = self.vocab.entity(&annotation.entity);
            for concept in &annotation.concepts {
                let concept = self.vocab.concept(concept);
                self.require(ontology, &concept)?;
                self.ensure_class(ontology, &entity, report)?;
                self.ensure_class(ontology, &concept, report)?;
                if ontology.add_some_values_from(&entity, &self.vocab.has_function, &concept)? {
                    report.annotation_axioms += 1;
                } else {
                    report.duplicate_axioms += 1;
                }
            }
        }
        Ok(())
    }

    /// Pass 2: both directions of every training edge under `interacts_with`.
    pub fn add_interactions<O: OntologyStore>(
        &self,
        ontology: &mut O,
        train: &[Interaction],
        report: &mut AugmentReport,
    ) -> OntologyResult<()> {
        ontology.declare_property(&self.vocab.interacts_with)?;
        for edge in train {
            for (sub, filler) in edge.directed() {
                let sub = self.vocab.entity(sub);
                let filler = self.vocab.entity(filler);
                self.require(ontology, &sub)?;
                self.require(ontology, &filler)?;
                self.ensure_class(ontology, &sub, report)?;
                self.ensure_class(ontology, &filler, report)?;
                if ontology.add_some_values_from(&sub, &self.vocab.interacts_with, &filler)? {
                    report.interaction_axioms += 1;
                } else {
                    report.duplicate_axioms += 1;
                }
            }
        }
        Ok(())
    }

    /// Under the strict policy, fail unless `class` is already declared.
    fn require<O: OntologyStore>(&self, ontology: &O, class: &Iri) -> OntologyResult<()> {
        if self.policy == TermPolicy::Strict && !ontology.contains_class(class) {
            return Err(OntologyError::UnknownClass {
                iri: class.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_class<O: OntologyStore>(
        &self,
        ontology: &mut O,
        class: &Iri,
        report: &mut AugmentReport,
    ) -> OntologyResult<()> {
        if ontology.declare_class(class)? {
            tracing::debug!(class = %class, "created class");
            report.classes_created += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::ontology::OxigraphOntology;

    fn annotation(entity: &str, concepts: &[&str]) -> Annotation {
        Annotation {
            entity: entity.into(),
            concepts: concepts.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn go_base(dir: &Path) -> OxigraphOntology {
        let path = dir.join("go.ttl");
        std::fs::write(
            &path,
            "@prefix owl: <http://www.w3.org/2002/07/owl#> .\n\
             <http://purl.obolibrary.org/obo/GO_0008150> a owl:Class .\n",
        )
        .unwrap();
        OxigraphOntology::load(&path).unwrap()
    }

    #[test]
    fn annotation_uses_normalized_concept() {
        let vocab = Vocabulary::default();
        let mut ont = OxigraphOntology::empty().unwrap();
        let augmenter = GraphAugmenter::new(&vocab, TermPolicy::Lenient);
        let report = augmenter
            .augment(&mut ont, &[annotation("P1", &["GO:0008150"])], &[])
            .unwrap();

        assert_eq!(report.annotation_axioms, 1);
        assert!(ont.has_some_values_from(
            &Iri::from("http://P1"),
            &Iri::from("http://has_function"),
            &Iri::from("http://purl.obolibrary.org/obo/GO_0008150"),
        ));
    }

    #[test]
    fn training_edge_becomes_mirrored_axioms() {
        let vocab = Vocabulary::default();
        let mut ont = OxigraphOntology::empty().unwrap();
        let augmenter = GraphAugmenter::new(&vocab, TermPolicy::Lenient);
        let report = augmenter
            .augment(&mut ont, &[], &[Interaction::new("P1", "P2", 300.0)])
            .unwrap();

        assert_eq!(report.interaction_axioms, 2);
        assert_eq!(report.classes_created, 2);
        let rel = Iri::from("http://interacts_with");
        let (p1, p2) = (Iri::from("http://P1"), Iri::from("http://P2"));
        assert!(ont.has_some_values_from(&p1, &rel, &p2));
        assert!(ont.has_some_values_from(&p2, &rel, &p1));
    }

    #[test]
    fn repeated_annotations_are_counted_as_duplicates() {
        let vocab = Vocabulary::default();
        let mut ont = OxigraphOntology::empty().unwrap();
        let augmenter = GraphAugmenter::new(&vocab, TermPolicy::Lenient);
        let annots = [annotation("P1", &["GO:1", "GO:1"]), annotation("P1", &["GO:1"])];
        let report = augmenter.augment(&mut ont, &annots, &[]).unwrap();
        assert_eq!(report.annotation_axioms, 1);
        assert_eq!(report.duplicate_axioms, 2);
        assert_eq!(ont.axiom_count(), 1);
    }

    #[test]
    fn lenient_policy_creates_unknown_terms() {
        let tmp = tempfile::TempDir::new().unwrap();
        let vocab = Vocabulary::default();
        let mut ont = go_base(tmp.path());
        let augmenter = GraphAugmenter::new(&vocab, TermPolicy::Lenient);
        let report = augmenter
            .augment(
                &mut ont,
                &[annotation("P1", &["GO:0008150", "GO:9999999"])],
                &[Interaction::new("P1", "P9", 1.0)],
            )
            .unwrap();
        // P1, GO:9999999 and P9 are new; GO:0008150 comes from the base.
        assert_eq!(report.classes_created, 3);
        assert!(ont.contains_class(&vocab.concept("GO:9999999")));
    }

    #[test]
    fn strict_policy_rejects_unknown_concept() {
        let tmp = tempfile::TempDir::new().unwrap();
        let vocab = Vocabulary::default();
        let mut ont = go_base(tmp.path());
        let augmenter = GraphAugmenter::new(&vocab, TermPolicy::Strict);
        let err = augmenter
            .augment(&mut ont, &[annotation("P1", &["GO:9999999"])], &[])
            .unwrap_err();
        match err {
            OntologyError::UnknownClass { iri } => {
                assert_eq!(iri, "http://purl.obolibrary.org/obo/GO_9999999")
            }
            other => panic!("expected UnknownClass, got {other:?}"),
        }
    }

    #[test]
    fn strict_policy_requires_annotated_entities() {
        let tmp = tempfile::TempDir::new().unwrap();
        let vocab = Vocabulary::default();
        let mut ont = go_base(tmp.path());
        let augmenter = GraphAugmenter::new(&vocab, TermPolicy::Strict);

        let annots = [
            annotation("P1", &["GO:0008150"]),
            annotation("P2", &["GO:0008150"]),
        ];
        let report = augmenter
            .augment(&mut ont, &annots, &[Interaction::new("P1", "P2", 1.0)])
            .unwrap();
        assert_eq!(report.interaction_axioms, 2);

        let err = augmenter
            .augment(&mut ont, &[], &[Interaction::new("P1", "P3", 1.0)])
            .unwrap_err();
        assert!(matches!(err, OntologyError::UnknownClass { iri } if iri == "http://P3"));
    }
}
