//! Corpus/embedding driver: hands a built dataset to an external trainer.
//!
//! Walk generation and skip-gram training live outside this crate. The driver
//! only composes a [`TrainingJob`] from the dataset and the walk
//! hyperparameters and invokes an [`EmbeddingTrainer`].

use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{TrainerError, TrainerResult};

/// Random-walk and embedding hyperparameters plus output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Walks started from every node.
    #[serde(default = "default_number_walks")]
    pub number_walks: usize,
    /// Nodes per walk.
    #[serde(default = "default_length_walk")]
    pub length_walk: usize,
    /// Embedding dimensionality.
    #[serde(default = "default_embedding_size")]
    pub embedding_size: usize,
    /// Where the trainer writes the walk corpus.
    #[serde(default = "default_corpus_file")]
    pub corpus_file: PathBuf,
    /// Where the trainer writes the word vectors.
    #[serde(default = "default_embeddings_file")]
    pub embeddings_file: PathBuf,
}

fn default_number_walks() -> usize {
    100
}
fn default_length_walk() -> usize {
    20
}
fn default_embedding_size() -> usize {
    20
}
fn default_corpus_file() -> PathBuf {
    PathBuf::from("data/walk_rdf_corpus.txt")
}
fn default_embeddings_file() -> PathBuf {
    PathBuf::from("data/walk_rdf_embeddings.wordvectors")
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            number_walks: default_number_walks(),
            length_walk: default_length_walk(),
            embedding_size: default_embedding_size(),
            corpus_file: default_corpus_file(),
            embeddings_file: default_embeddings_file(),
        }
    }
}

impl WalkConfig {
    pub fn validate(&self) -> TrainerResult<()> {
        for (name, value) in [
            ("number_walks", self.number_walks),
            ("length_walk", self.length_walk),
            ("embedding_size", self.embedding_size),
        ] {
            if value == 0 {
                return Err(TrainerError::InvalidConfig {
                    message: format!("{name} must be positive"),
                });
            }
        }
        Ok(())
    }
}

/// Everything a trainer needs for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingJob {
    pub ontology: PathBuf,
    pub corpus_file: PathBuf,
    pub embeddings_file: PathBuf,
    pub number_walks: usize,
    pub length_walk: usize,
    pub embedding_size: usize,
}

/// What a finished training run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingOutcome {
    pub corpus_file: PathBuf,
    pub embeddings_file: PathBuf,
}

/// An embedding trainer that consumes an ontology and produces vectors.
pub trait EmbeddingTrainer {
    fn train(&self, job: &TrainingJob) -> TrainerResult<TrainingOutcome>;
}

/// Trainer implemented by an external program, executed directly (no shell).
///
/// The program receives:
///
/// ```text
/// --ontology <path> --corpus <path> --embeddings <path>
/// --number-walks <n> --length-walk <n> --embedding-size <n>
/// ```
#[derive(Debug, Clone)]
pub struct ExternalTrainer {
    program: String,
    extra_args: Vec<String>,
}

impl ExternalTrainer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments placed before the generated flags (e.g. a script path).
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args = args.into_iter().map(Into::into).collect();
        self
    }

    fn arguments(&self, job: &TrainingJob) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.extend([
            "--ontology".to_string(),
            job.ontology.display().to_string(),
            "--corpus".to_string(),
            job.corpus_file.display().to_string(),
            "--embeddings".to_string(),
            job.embeddings_file.display().to_string(),
            "--number-walks".to_string(),
            job.number_walks.to_string(),
            "--length-walk".to_string(),
            job.length_walk.to_string(),
            "--embedding-size".to_string(),
            job.embedding_size.to_string(),
        ]);
        args
    }
}

impl EmbeddingTrainer for ExternalTrainer {
    fn train(&self, job: &TrainingJob) -> TrainerResult<TrainingOutcome> {
        let args = self.arguments(job);
        tracing::info!(program = %self.program, ?args, "starting embedding trainer");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| TrainerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            tracing::debug!(program = %self.program, stdout = %stdout.trim(), "trainer output");
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(program = %self.program, stderr = %stderr.trim(), "trainer failed");
            return Err(TrainerError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
            });
        }
        Ok(TrainingOutcome {
            corpus_file: job.corpus_file.clone(),
            embeddings_file: job.embeddings_file.clone(),
        })
    }
}

/// Composes training jobs from datasets.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingDriver {
    config: WalkConfig,
}

impl EmbeddingDriver {
    pub fn new(config: WalkConfig) -> TrainerResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn job(&self, dataset: &Dataset) -> TrainingJob {
        TrainingJob {
            ontology: dataset.ontology_path(),
            corpus_file: self.config.corpus_file.clone(),
            embeddings_file: self.config.embeddings_file.clone(),
            number_walks: self.config.number_walks,
            length_walk: self.config.length_walk,
            embedding_size: self.config.embedding_size,
        }
    }

    pub fn run<T: EmbeddingTrainer + ?Sized>(
        &self,
        dataset: &Dataset,
        trainer: &T,
    ) -> TrainerResult<TrainingOutcome> {
        let job = self.job(dataset);
        let outcome = trainer.train(&job)?;
        tracing::info!(
            embeddings = %outcome.embeddings_file.display(),
            "embedding training finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;

    use super::*;
    use crate::emit::{ONTOLOGY_FILE, TEST_FILE, VALID_FILE};

    struct RecordingTrainer {
        jobs: RefCell<Vec<TrainingJob>>,
    }

    impl EmbeddingTrainer for RecordingTrainer {
        fn train(&self, job: &TrainingJob) -> TrainerResult<TrainingOutcome> {
            self.jobs.borrow_mut().push(job.clone());
            Ok(TrainingOutcome {
                corpus_file: job.corpus_file.clone(),
                embeddings_file: job.embeddings_file.clone(),
            })
        }
    }

    fn empty_dataset(dir: &Path) -> Dataset {
        for name in [ONTOLOGY_FILE, VALID_FILE, TEST_FILE] {
            std::fs::write(dir.join(name), "").unwrap();
        }
        Dataset::open(dir).unwrap()
    }

    fn job() -> TrainingJob {
        TrainingJob {
            ontology: PathBuf::from("ds/ontology.owl"),
            corpus_file: PathBuf::from("corpus.txt"),
            embeddings_file: PathBuf::from("vectors"),
            number_walks: 100,
            length_walk: 20,
            embedding_size: 20,
        }
    }

    #[test]
    fn driver_passes_fixed_hyperparameters() {
        let tmp = tempfile::TempDir::new().unwrap();
        let dataset = empty_dataset(tmp.path());
        let trainer = RecordingTrainer {
            jobs: RefCell::new(Vec::new()),
        };
        let driver = EmbeddingDriver::new(WalkConfig::default()).unwrap();
        driver.run(&dataset, &trainer).unwrap();

        let jobs = trainer.jobs.borrow();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].number_walks, 100);
        assert_eq!(jobs[0].length_walk, 20);
        assert_eq!(jobs[0].embedding_size, 20);
        assert_eq!(jobs[0].ontology, tmp.path().join(ONTOLOGY_FILE));
    }

    #[test]
    fn zero_hyperparameter_rejected() {
        let config = WalkConfig {
            length_walk: 0,
            ..Default::default()
        };
        assert!(matches!(
            EmbeddingDriver::new(config),
            Err(TrainerError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn external_arguments_follow_extra_args() {
        let trainer = ExternalTrainer::new("python3").with_args(["walk.py"]);
        let args = trainer.arguments(&job());
        assert_eq!(args[0], "walk.py");
        assert_eq!(args[1], "--ontology");
        assert_eq!(args[2], "ds/ontology.owl");
        assert!(args.windows(2).any(|w| w[0] == "--embedding-size" && w[1] == "20"));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let trainer = ExternalTrainer::new("/nonexistent/trainer-binary");
        assert!(matches!(
            trainer.train(&job()),
            Err(TrainerError::Spawn { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_is_checked() {
        assert!(ExternalTrainer::new("true").train(&job()).is_ok());
        assert!(matches!(
            ExternalTrainer::new("false").train(&job()),
            Err(TrainerError::Failed { .. })
        ));
    }
}
