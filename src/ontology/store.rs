//! In-memory OWL axiom store backed by oxigraph.
//!
//! Existential restrictions use the OWL 2 RDF mapping:
//!
//! ```text
//! <Sub> rdfs:subClassOf _:r .
//! _:r a owl:Restriction ; owl:onProperty <R> ; owl:someValuesFrom <Filler> .
//! ```
//!
//! Declared classes, properties and named restrictions are mirrored in hash
//! sets so membership checks and idempotent inserts never hit the store.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use oxigraph::io::RdfFormat;
use oxigraph::model::vocab::{rdf, rdfs};
use oxigraph::model::{BlankNode, GraphName, GraphNameRef, NamedNode, Quad, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::{OntologyError, OntologyResult};

use super::{Iri, OntologyStore};

/// OWL vocabulary terms used by the restriction mapping.
mod owl {
    use oxigraph::model::NamedNodeRef;

    pub const CLASS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const OBJECT_PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    pub const RESTRICTION: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Restriction");
    pub const ON_PROPERTY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onProperty");
    pub const SOME_VALUES_FROM: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#someValuesFrom");
}

const PREFIXES: &str = "PREFIX owl: <http://www.w3.org/2002/07/owl#>\n\
                        PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>\n";

type AxiomKey = (String, String, String);

/// Mutable ontology owned by a single pipeline run.
pub struct OxigraphOntology {
    store: Store,
    classes: HashSet<String>,
    properties: HashSet<String>,
    axioms: HashSet<AxiomKey>,
}

impl OxigraphOntology {
    /// Create an ontology with no axioms.
    pub fn empty() -> OntologyResult<Self> {
        let store = Store::new().map_err(|e| OntologyError::Store {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self {
            store,
            classes: HashSet::new(),
            properties: HashSet::new(),
            axioms: HashSet::new(),
        })
    }

    /// Number of declared classes.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of RDF triples in the store.
    pub fn triple_count(&self) -> OntologyResult<usize> {
        self.store.len().map_err(|e| OntologyError::Store {
            message: format!("failed to count triples: {e}"),
        })
    }

    /// Rebuild the class, property and restriction indexes from the store.
    fn reindex(&mut self) -> OntologyResult<()> {
        self.classes = self
            .select_iris("SELECT ?c WHERE { ?c a owl:Class FILTER(isIRI(?c)) }", &["c"])?
            .into_iter()
            .map(|mut row| row.remove(0))
            .collect();
        self.properties = self
            .select_iris(
                "SELECT ?p WHERE { ?p a owl:ObjectProperty FILTER(isIRI(?p)) }",
                &["p"],
            )?
            .into_iter()
            .map(|mut row| row.remove(0))
            .collect();
        self.axioms = self
            .select_iris(
                "SELECT ?sub ?prop ?filler WHERE { \
                   ?sub rdfs:subClassOf ?r . \
                   ?r owl:onProperty ?prop ; owl:someValuesFrom ?filler . \
                   FILTER(isIRI(?sub) && isIRI(?prop) && isIRI(?filler)) }",
                &["sub", "prop", "filler"],
            )?
            .into_iter()
            .map(|row| {
                let mut row = row.into_iter();
                (
                    row.next().unwrap_or_default(),
                    row.next().unwrap_or_default(),
                    row.next().unwrap_or_default(),
                )
            })
            .collect();
        Ok(())
    }

    /// Run a SELECT query and collect the named-node bindings of `vars` per row.
    /// Rows where any variable is unbound or not an IRI are skipped.
    fn select_iris(&self, body: &str, vars: &[&str]) -> OntologyResult<Vec<Vec<String>>> {
        let sparql = format!("{PREFIXES}{body}");
        let results = self.store.query(sparql.as_str()).map_err(|e| OntologyError::Sparql {
            message: format!("{e}"),
        })?;

        let QueryResults::Solutions(solutions) = results else {
            return Err(OntologyError::Sparql {
                message: "expected solutions from SELECT query".into(),
            });
        };

        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| OntologyError::Sparql {
                message: format!("solution error: {e}"),
            })?;
            let row: Option<Vec<String>> = vars
                .iter()
                .map(|var| match solution.get(*var) {
                    Some(Term::NamedNode(node)) => Some(node.as_str().to_string()),
                    _ => None,
                })
                .collect();
            if let Some(row) = row {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    fn named(iri: &Iri) -> OntologyResult<NamedNode> {
        NamedNode::new(iri.as_str()).map_err(|e| OntologyError::InvalidIri {
            iri: iri.to_string(),
            message: e.to_string(),
        })
    }

    fn insert(&self, quad: Quad) -> OntologyResult<()> {
        self.store.insert(&quad).map_err(|e| OntologyError::Store {
            message: format!("insert failed: {e}"),
        })?;
        Ok(())
    }
}

/// Pick a parser from the file extension. Unknown extensions are read as RDF/XML,
/// the usual serialization of `.owl` documents.
fn format_for(path: &Path) -> RdfFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("ttl") => RdfFormat::Turtle,
        Some("nt") => RdfFormat::NTriples,
        _ => RdfFormat::RdfXml,
    }
}

impl OntologyStore for OxigraphOntology {
    fn load(path: &Path) -> OntologyResult<Self> {
        let file = File::open(path).map_err(|e| OntologyError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut ontology = Self::empty()?;
        ontology
            .store
            .load_from_reader(format_for(path), BufReader::new(file))
            .map_err(|e| OntologyError::Load {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        ontology.reindex()?;
        tracing::info!(
            path = %path.display(),
            classes = ontology.classes.len(),
            restrictions = ontology.axioms.len(),
            "loaded base ontology"
        );
        Ok(ontology)
    }

    fn declare_class(&mut self, class: &Iri) -> OntologyResult<bool> {
        if self.classes.contains(class.as_str()) {
            return Ok(false);
        }
        let node = Self::named(class)?;
        self.insert(Quad::new(
            node,
            rdf::TYPE.into_owned(),
            owl::CLASS.into_owned(),
            GraphName::DefaultGraph,
        ))?;
        self.classes.insert(class.as_str().to_string());
        Ok(true)
    }

    fn declare_property(&mut self, property: &Iri) -> OntologyResult<bool> {
        if self.properties.contains(property.as_str()) {
            return Ok(false);
        }
        let node = Self::named(property)?;
        self.insert(Quad::new(
            node,
            rdf::TYPE.into_owned(),
            owl::OBJECT_PROPERTY.into_owned(),
            GraphName::DefaultGraph,
        ))?;
        self.properties.insert(property.as_str().to_string());
        Ok(true)
    }

    fn contains_class(&self, class: &Iri) -> bool {
        self.classes.contains(class.as_str())
    }

    fn add_some_values_from(
        &mut self,
        sub: &Iri,
        property: &Iri,
        filler: &Iri,
    ) -> OntologyResult<bool> {
        let key = (
            sub.as_str().to_string(),
            property.as_str().to_string(),
            filler.as_str().to_string(),
        );
        if self.axioms.contains(&key) {
            return Ok(false);
        }
        let sub_node = Self::named(sub)?;
        let property_node = Self::named(property)?;
        let filler_node = Self::named(filler)?;
        let restriction = BlankNode::default();

        self.insert(Quad::new(
            sub_node,
            rdfs::SUB_CLASS_OF.into_owned(),
            restriction.clone(),
            GraphName::DefaultGraph,
        ))?;
        self.insert(Quad::new(
            restriction.clone(),
            rdf::TYPE.into_owned(),
            owl::RESTRICTION.into_owned(),
            GraphName::DefaultGraph,
        ))?;
        self.insert(Quad::new(
            restriction.clone(),
            owl::ON_PROPERTY.into_owned(),
            property_node,
            GraphName::DefaultGraph,
        ))?;
        self.insert(Quad::new(
            restriction,
            owl::SOME_VALUES_FROM.into_owned(),
            filler_node,
            GraphName::DefaultGraph,
        ))?;
        self.axioms.insert(key);
        Ok(true)
    }

    fn has_some_values_from(&self, sub: &Iri, property: &Iri, filler: &Iri) -> bool {
        self.axioms.contains(&(
            sub.as_str().to_string(),
            property.as_str().to_string(),
            filler.as_str().to_string(),
        ))
    }

    fn axiom_count(&self) -> usize {
        self.axioms.len()
    }

    fn persist(&self, path: &Path) -> OntologyResult<()> {
        let save_err = |message: String| OntologyError::Save {
            path: path.to_path_buf(),
            message,
        };
        let file = File::create(path).map_err(|e| save_err(e.to_string()))?;
        let mut writer = self
            .store
            .dump_graph_to_writer(
                GraphNameRef::DefaultGraph,
                RdfFormat::RdfXml,
                BufWriter::new(file),
            )
            .map_err(|e| save_err(e.to_string()))?;
        writer.flush().map_err(|e| save_err(e.to_string()))?;
        tracing::info!(
            path = %path.display(),
            classes = self.classes.len(),
            restrictions = self.axioms.len(),
            "saved ontology"
        );
        Ok(())
    }
}

impl std::fmt::Debug for OxigraphOntology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OxigraphOntology")
            .field("classes", &self.classes.len())
            .field("properties", &self.properties.len())
            .field("axioms", &self.axioms.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_TTL: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

<http://purl.obolibrary.org/obo/BFO_0000050> a owl:ObjectProperty .
<http://purl.obolibrary.org/obo/GO_0008150> a owl:Class .
<http://purl.obolibrary.org/obo/GO_0006260> a owl:Class ;
    rdfs:subClassOf [
        a owl:Restriction ;
        owl:onProperty <http://purl.obolibrary.org/obo/BFO_0000050> ;
        owl:someValuesFrom <http://purl.obolibrary.org/obo/GO_0008150>
    ] .
"#;

    fn iri(s: &str) -> Iri {
        Iri::from(s)
    }

    fn base(dir: &Path) -> OxigraphOntology {
        let path = dir.join("base.ttl");
        std::fs::write(&path, BASE_TTL).unwrap();
        OxigraphOntology::load(&path).unwrap()
    }

    #[test]
    fn load_indexes_classes_and_restrictions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let ont = base(tmp.path());
        assert_eq!(ont.class_count(), 2);
        assert!(ont.contains_class(&iri("http://purl.obolibrary.org/obo/GO_0008150")));
        assert_eq!(ont.axiom_count(), 1);
        assert!(ont.has_some_values_from(
            &iri("http://purl.obolibrary.org/obo/GO_0006260"),
            &iri("http://purl.obolibrary.org/obo/BFO_0000050"),
            &iri("http://purl.obolibrary.org/obo/GO_0008150"),
        ));
    }

    #[test]
    fn declare_class_reports_novelty() {
        let mut ont = OxigraphOntology::empty().unwrap();
        assert!(ont.declare_class(&iri("http://P1")).unwrap());
        assert!(!ont.declare_class(&iri("http://P1")).unwrap());
        assert!(ont.contains_class(&iri("http://P1")));
        assert_eq!(ont.triple_count().unwrap(), 1);
    }

    #[test]
    fn repeated_axiom_is_idempotent() {
        let mut ont = OxigraphOntology::empty().unwrap();
        let (p1, rel, p2) = (iri("http://P1"), iri("http://interacts_with"), iri("http://P2"));
        assert!(ont.add_some_values_from(&p1, &rel, &p2).unwrap());
        assert!(!ont.add_some_values_from(&p1, &rel, &p2).unwrap());
        assert_eq!(ont.axiom_count(), 1);
        assert_eq!(ont.triple_count().unwrap(), 4);
        assert!(!ont.has_some_values_from(&p2, &rel, &p1));
    }

    #[test]
    fn invalid_iri_is_rejected() {
        let mut ont = OxigraphOntology::empty().unwrap();
        let err = ont.declare_class(&iri("http://bad id")).unwrap_err();
        assert!(matches!(err, OntologyError::InvalidIri { .. }));
        assert!(!ont.contains_class(&iri("http://bad id")));
    }

    #[test]
    fn persist_and_reload_preserves_axioms() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut ont = base(tmp.path());
        let (p1, rel, go) = (
            iri("http://P1"),
            iri("http://has_function"),
            iri("http://purl.obolibrary.org/obo/GO_0008150"),
        );
        ont.declare_class(&p1).unwrap();
        ont.declare_property(&rel).unwrap();
        ont.add_some_values_from(&p1, &rel, &go).unwrap();

        let out = tmp.path().join("ontology.owl");
        ont.persist(&out).unwrap();

        let reloaded = OxigraphOntology::load(&out).unwrap();
        assert_eq!(reloaded.axiom_count(), 2);
        assert!(reloaded.has_some_values_from(&p1, &rel, &go));
        assert!(reloaded.contains_class(&p1));
        assert_eq!(reloaded.class_count(), 3);
    }

    #[test]
    fn missing_file_is_load_error() {
        let err = OxigraphOntology::load(Path::new("/nonexistent/go.owl")).unwrap_err();
        assert!(matches!(err, OntologyError::Load { .. }));
    }

    #[test]
    fn malformed_document_is_load_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.owl");
        std::fs::write(&path, "<rdf:RDF this is not xml").unwrap();
        assert!(matches!(
            OxigraphOntology::load(&path),
            Err(OntologyError::Load { .. })
        ));
    }

    #[test]
    fn extension_selects_parser() {
        assert_eq!(format_for(Path::new("go.owl")), RdfFormat::RdfXml);
        assert_eq!(format_for(Path::new("go.TTL")), RdfFormat::Turtle);
        assert_eq!(format_for(Path::new("go.nt")), RdfFormat::NTriples);
    }
}
