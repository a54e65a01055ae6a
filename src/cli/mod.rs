// ============================================================
// Layer 1: CLI / Presentation Layer
// ============================================================
// The entry point for all user interaction. Uses the `clap`
// crate to parse command line arguments; all work is delegated
// to Layer 2 (application).
//
// Three commands are supported:
//   1. `rank`        runs the pipeline and writes output.json
//   2. `sections`    prints one document's sections
//   3. `init-tuning` writes the default tuning file

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InitTuningArgs, RankArgs, SectionsArgs};

#[derive(Parser, Debug)]
#[command(
    name = "persona-digest",
    version,
    about = "Pick and condense the document sections that matter to a persona and their task."
)]
pub struct Cli {
    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Rank(args)       => run_rank(args),
            Commands::Sections(args)   => run_sections(args),
            Commands::InitTuning(args) => run_init_tuning(args),
        }
    }
}

fn run_rank(args: RankArgs) -> Result<()> {
    use crate::application::rank_use_case::RankUseCase;

    tracing::info!("Ranking documents in '{}'", args.input_dir.display());

    let use_case = RankUseCase::new(args.into())?;
    match use_case.execute()? {
        Some(path) => println!("Report written to {}", path.display()),
        None       => println!("No sections found in the input documents; nothing written."),
    }
    Ok(())
}

fn run_sections(args: SectionsArgs) -> Result<()> {
    use crate::application::sections_use_case::SectionsUseCase;

    let sections = SectionsUseCase::new(args.document, args.tuning)?.sections()?;
    println!("{}", serde_json::to_string_pretty(&sections)?);
    Ok(())
}

fn run_init_tuning(args: InitTuningArgs) -> Result<()> {
    use crate::application::rank_use_case::Tuning;
    use crate::infra::tuning_store::TuningStore;

    TuningStore::new(&args.path).save(&Tuning::default())?;
    println!("Default tuning written to {}", args.path.display());
    Ok(())
}
