// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `rank`, `sections` and
// `init-tuning`, and all their flags.
//
// clap's derive macros generate help text, error messages for
// missing args and type conversion (string → usize, PathBuf).

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::rank_use_case::{EmbeddingsConfig, RankConfig};

/// Environment variable holding the embeddings API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank document sections for a persona and job, write output.json
    Rank(RankArgs),

    /// Print the sections detected in one document as JSON
    Sections(SectionsArgs),

    /// Write a tuning file with every default value
    InitTuning(InitTuningArgs),
}

/// All arguments for the `rank` command.
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Directory containing span .json files and/or .docx documents
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Directory that receives output.json (created if missing)
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Who the extract is for, e.g. "Travel planner"
    #[arg(long)]
    pub persona: String,

    /// What that persona is trying to do
    #[arg(long)]
    pub job: String,

    /// Maximum number of sections to select (one per document)
    #[arg(long, default_value_t = 5)]
    pub top_k: usize,

    /// Tuning file with weights and thresholds
    #[arg(long)]
    pub tuning: Option<PathBuf>,

    /// tokenizer.json used for token counts
    #[arg(long)]
    pub tokenizer: Option<PathBuf>,

    /// Base URL of an OpenAI-compatible API; enables remote embeddings
    #[arg(long)]
    pub embeddings_url: Option<String>,

    /// Embedding model name
    #[arg(long, default_value = "text-embedding-3-small")]
    pub embeddings_model: String,

    /// Per-request timeout for the embeddings API
    #[arg(long, default_value_t = 30)]
    pub embeddings_timeout_secs: u64,
}

/// Convert CLI RankArgs into the application-layer RankConfig.
/// The application layer never sees clap types.
impl From<RankArgs> for RankConfig {
    fn from(a: RankArgs) -> Self {
        let embeddings = a.embeddings_url.map(|base_url| EmbeddingsConfig {
            base_url,
            model:        a.embeddings_model,
            api_key:      std::env::var(API_KEY_ENV).unwrap_or_default(),
            timeout_secs: a.embeddings_timeout_secs,
        });

        RankConfig {
            input_dir:      a.input_dir,
            output_dir:     a.output_dir,
            persona:        a.persona,
            job:            a.job,
            top_k:          a.top_k,
            tuning_path:    a.tuning,
            tokenizer_path: a.tokenizer,
            embeddings,
        }
    }
}

/// Arguments for the `sections` command
#[derive(Args, Debug)]
pub struct SectionsArgs {
    /// A span .json file or a .docx document
    #[arg(long)]
    pub document: PathBuf,

    /// Tuning file with segmenter thresholds
    #[arg(long)]
    pub tuning: Option<PathBuf>,
}

/// Arguments for the `init-tuning` command
#[derive(Args, Debug)]
pub struct InitTuningArgs {
    /// Where to write the tuning file
    #[arg(long, default_value = "tuning.json")]
    pub path: PathBuf,
}
