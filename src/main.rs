//! onto-dataset CLI: build ontology-augmented link-prediction datasets.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use onto_dataset::config::{PipelineConfig, TermPolicy};
use onto_dataset::dataset::Dataset;
use onto_dataset::embed::{EmbeddingDriver, ExternalTrainer};
use onto_dataset::pipeline::build_dataset;

#[derive(Parser)]
#[command(
    name = "onto-dataset",
    version,
    about = "Ontology-augmented link-prediction dataset builder"
)]
struct Cli {
    /// TOML config file; explicit flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split interactions and write ontology.owl, valid.tsv and test.tsv.
    Build {
        /// Ontology file [default: data/go.owl].
        #[arg(long, visible_alias = "ont")]
        ont_file: Option<PathBuf>,

        /// Gzip STRING interaction file [default: data/4932.protein.links.detailed.v11.0.txt.gz].
        #[arg(long, visible_alias = "df")]
        data_file: Option<PathBuf>,

        /// Annotations file [default: data/annotations.tsv].
        #[arg(long, visible_alias = "af")]
        annots_file: Option<PathBuf>,

        /// Dataset directory; must exist [default: datasets/ppi_yeast].
        #[arg(long, visible_alias = "od")]
        out_dir: Option<PathBuf>,

        /// Reject concepts and entities the ontology does not declare.
        #[arg(long)]
        strict: bool,

        /// Print the build report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Train embeddings for a built dataset with an external trainer.
    Embed {
        /// Dataset directory [default: the configured output directory].
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Trainer program, executed without a shell.
        #[arg(long)]
        trainer: String,

        /// Leading argument for the trainer (repeatable), e.g. a script path.
        #[arg(long = "trainer-arg")]
        trainer_args: Vec<String>,

        #[arg(long)]
        number_walks: Option<usize>,

        #[arg(long)]
        length_walk: Option<usize>,

        #[arg(long)]
        embedding_size: Option<usize>,

        /// Walk corpus output [default: data/walk_rdf_corpus.txt].
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Embedding vectors output [default: data/walk_rdf_embeddings.wordvectors].
        #[arg(long)]
        embeddings: Option<PathBuf>,
    },

    /// Show held-out triple counts of a built dataset.
    Inspect {
        /// Dataset directory [default: the configured output directory].
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };

    match cli.command {
        Commands::Build {
            ont_file,
            data_file,
            annots_file,
            out_dir,
            strict,
            json,
        } => {
            if let Some(path) = ont_file {
                config.ontology_file = path;
            }
            if let Some(path) = data_file {
                config.interactions_file = path;
            }
            if let Some(path) = annots_file {
                config.annotations_file = path;
            }
            if let Some(path) = out_dir {
                config.output_dir = path;
            }
            if strict {
                config.term_policy = TermPolicy::Strict;
            }

            let report = build_dataset(&config)?;

            if json {
                let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
                println!("{json}");
            } else {
                println!("Built dataset in {}", config.output_dir.display());
                println!(
                    "  interactions: {} rows, {} zero-score, {} duplicates",
                    report.load.rows, report.load.zero_score, report.load.duplicates
                );
                println!(
                    "  split:        {} train / {} valid / {} test",
                    report.split.train, report.split.valid, report.split.test
                );
                println!(
                    "  axioms:       {} annotation, {} interaction ({} classes created)",
                    report.augment.annotation_axioms,
                    report.augment.interaction_axioms,
                    report.augment.classes_created
                );
                println!("  ontology:     {}", report.emit.ontology.display());
                println!(
                    "  valid:        {} ({} triples)",
                    report.emit.valid.display(),
                    report.emit.valid_triples
                );
                println!(
                    "  test:         {} ({} triples)",
                    report.emit.test.display(),
                    report.emit.test_triples
                );
                if !report.uncovered_entities.is_empty() {
                    println!(
                        "  warning:      {} held-out entities are absent from the ontology",
                        report.uncovered_entities.len()
                    );
                }
            }
        }

        Commands::Embed {
            dataset,
            trainer,
            trainer_args,
            number_walks,
            length_walk,
            embedding_size,
            corpus,
            embeddings,
        } => {
            let mut walk = config.embedding.clone();
            if let Some(n) = number_walks {
                walk.number_walks = n;
            }
            if let Some(n) = length_walk {
                walk.length_walk = n;
            }
            if let Some(n) = embedding_size {
                walk.embedding_size = n;
            }
            if let Some(path) = corpus {
                walk.corpus_file = path;
            }
            if let Some(path) = embeddings {
                walk.embeddings_file = path;
            }

            let dataset = Dataset::open(&dataset.unwrap_or(config.output_dir))?;
            let driver = EmbeddingDriver::new(walk)?;
            let trainer = ExternalTrainer::new(trainer).with_args(trainer_args);
            let outcome = driver.run(&dataset, &trainer)?;
            println!("Corpus:     {}", outcome.corpus_file.display());
            println!("Embeddings: {}", outcome.embeddings_file.display());
        }

        Commands::Inspect { dataset } => {
            let dataset = Dataset::open(&dataset.unwrap_or(config.output_dir))?;
            println!("Dataset: {}", dataset.root().display());
            println!("  ontology: {}", dataset.ontology_path().display());
            println!("  valid:    {} triples", dataset.validation().len());
            println!("  test:     {} triples", dataset.testing().len());
        }
    }

    Ok(())
}
