//! # Word Frequency Analysis CLI
//!
//! Runs the analysis jobs of the `word_frequency_analyzer` crate over
//! directories of `.txt` files. Every file is a document: its file stem is
//! the document id and its first non-empty line is its title.
//!
//! ## Example
//! ```bash
//! wfa word-frequency path/to/texts --block-size 500 --last-block small_last
//! wfa craig-zeta path/to/author_a --compare path/to/author_b
//! wfa collocation path/to/texts --test likelihood --word york
//! ```

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};

use clap::{Args, Parser, Subcommand};
use log::{debug, error};
use word_frequency_analyzer::{
    analyzer::config::parse_word_list,
    jobs::{
        collocation::{self, Algorithm, CollocationConfig},
        craig_zeta::{self, CraigZetaConfig},
        word_frequency, JobContext,
    },
    AnalyzerConfig, Dataset, LastBlock, MemoryCorpus, Result, Stemming, StopList,
};

#[derive(Parser)]
#[command(name = "wfa", author, version, about)]
struct Cli {
    /// Write the result to this file instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Word frequency report (CSV)
    WordFrequency {
        /// Directory of .txt documents
        docs: PathBuf,

        #[command(flatten)]
        options: AnalyzerArgs,

        /// Print the full analysis as JSON instead of the CSV report
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Compare two datasets with Craig's Zeta (JSON)
    CraigZeta {
        /// Directory of .txt documents of the first dataset
        docs: PathBuf,

        /// Directory of .txt documents of the second dataset
        #[arg(long)]
        compare: PathBuf,

        /// Tokens per block
        #[arg(long, default_value_t = 500)]
        block_size: i64,
    },
    /// Significant word pairs (CSV)
    Collocation {
        /// Directory of .txt documents
        docs: PathBuf,

        /// Significance test: mi, t or likelihood
        #[arg(long, default_value = "mi")]
        test: Algorithm,

        /// Number of pairs to report
        #[arg(long, default_value_t = 50)]
        num_pairs: usize,

        /// Only report pairs containing this word
        #[arg(long)]
        word: Option<String>,
    },
}

#[derive(Args)]
struct AnalyzerArgs {
    /// JSON file with analyzer options; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Split into this many blocks
    #[arg(long, allow_negative_numbers = true)]
    num_blocks: Option<i64>,

    /// Split into blocks of this many words
    #[arg(long, allow_negative_numbers = true)]
    block_size: Option<i64>,

    /// Leftover policy in block-size mode: big_last, small_last, truncate_last, truncate_all
    #[arg(long)]
    last_block: Option<LastBlock>,

    /// Split each document on its own instead of the whole dataset
    #[arg(long, default_value_t = false)]
    per_document: bool,

    /// Analyze n-grams of this size
    #[arg(long, allow_negative_numbers = true)]
    ngrams: Option<i64>,

    /// Keep only the most frequent words
    #[arg(long, allow_negative_numbers = true)]
    num_words: Option<i64>,

    /// none, stem or lemma
    #[arg(long)]
    stemming: Option<Stemming>,

    /// Only analyze these words (comma or space separated)
    #[arg(long)]
    include: Option<String>,

    /// Never analyze these words (comma or space separated)
    #[arg(long)]
    exclude: Option<String>,

    /// Stop word file, whitespace separated
    #[arg(long)]
    stop_words: Option<PathBuf>,
}

impl AnalyzerArgs {
    fn to_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => AnalyzerConfig::default(),
        };
        if let Some(num_blocks) = self.num_blocks {
            config.num_blocks = num_blocks;
        }
        if let Some(block_size) = self.block_size {
            config.block_size = block_size;
        }
        if let Some(last_block) = self.last_block {
            config.last_block = last_block;
        }
        if self.per_document {
            config.split_across = false;
        }
        if let Some(ngrams) = self.ngrams {
            config.ngrams = ngrams;
        }
        if let Some(num_words) = self.num_words {
            config.num_words = num_words;
        }
        if let Some(stemming) = self.stemming {
            config.stemming = stemming;
        }
        if let Some(include) = &self.include {
            config.inclusion_list = Some(parse_word_list(include));
        }
        if let Some(exclude) = &self.exclude {
            config.exclusion_list = Some(parse_word_list(exclude));
        }
        if let Some(path) = &self.stop_words {
            config.stop_list = Some(StopList::parse("en", &fs::read_to_string(path)?));
        }
        Ok(config)
    }
}

/// Dataset named after its directory
fn dataset_for(dir: &Path, ids: &[String]) -> Dataset {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    Dataset::new(&name, ids)
}

fn progress(done: usize, total: usize, message: &str) {
    debug!("{message}: {done}/{total}");
}

fn run(cli: Cli) -> Result<()> {
    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    match cli.command {
        Command::WordFrequency { docs, options, json } => {
            let config = options.to_config()?;
            let corpus = MemoryCorpus::from_dir(&docs)?;
            let dataset = dataset_for(&docs, &corpus.document_ids());
            let context = JobContext::new(&corpus)
                .with_term_vectors(&corpus)
                .with_progress(&progress);
            if json {
                let analyzer = context.analyze(&dataset, &config)?;
                serde_json::to_writer_pretty(&mut out, &analyzer.summary())?;
                writeln!(out)?;
            } else {
                word_frequency::run(&context, &dataset, &config, &mut out)?;
            }
        }
        Command::CraigZeta { docs, compare, block_size } => {
            let mut corpus = MemoryCorpus::new();
            let ids_1 = corpus.add_dir(&docs, "1/")?;
            let ids_2 = corpus.add_dir(&compare, "2/")?;
            let dataset_1 = dataset_for(&docs, &ids_1);
            let dataset_2 = dataset_for(&compare, &ids_2);
            let config = CraigZetaConfig {
                block_size,
                ..Default::default()
            };
            let context = JobContext::new(&corpus).with_progress(&progress);
            let result = craig_zeta::run(&context, &dataset_1, &dataset_2, &config)?;
            serde_json::to_writer_pretty(&mut out, &result)?;
            writeln!(out)?;
        }
        Command::Collocation { docs, test, num_pairs, word } => {
            let corpus = MemoryCorpus::from_dir(&docs)?;
            let dataset = dataset_for(&docs, &corpus.document_ids());
            let config = CollocationConfig {
                algorithm: test,
                num_pairs,
                focal_word: word,
            };
            let context = JobContext::new(&corpus).with_progress(&progress);
            let pairs = collocation::run(&context, &dataset, &config)?;
            collocation::write_report(&dataset, config.algorithm, &pairs, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
