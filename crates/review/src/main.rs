mod pairs;
mod report;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use diff_desc::{describe_all, parse_ndiff, Algorithm, DiffDescriptor, SourceOptions};
use log::{debug, LevelFilter};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "review",
    version,
    about = "Side-by-side diff descriptors for code review",
    long_about = "Builds the aligned base/modified model a review viewer renders: \
    rows, character runs and change regions. Works on two files, on two staged \
    directory trees, or on a saved ndiff stream."
)]
struct Cli {
    #[command(flatten)]
    diff: DiffArgs,

    /// Raise the log level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DiffArgs {
    /// Line matching algorithm
    #[arg(long, value_enum, default_value_t = AlgorithmArg::Myers, global = true)]
    algorithm: AlgorithmArg,

    /// Similarity (0.0 to 1.0) a replaced line pair needs to get intraline runs
    #[arg(long, default_value_t = 0.75, global = true)]
    cutoff: f32,

    /// Line diff deadline in milliseconds, 0 disables it
    #[arg(long, value_name = "MS", global = true)]
    timeout_ms: Option<u64>,

    /// Do not fold CRLF and CR line endings into LF
    #[arg(long, global = true)]
    keep_line_endings: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Myers,
    Patience,
    Lcs,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every row with its runs and region
    Dump {
        #[command(flatten)]
        input: Input,
    },
    /// Print added/deleted/changed counts per file
    Stats {
        /// Base file or staged base directory
        base: PathBuf,
        /// Modified file or staged modified directory
        modified: PathBuf,
    },
    /// Validate descriptor invariants, failing on any violation
    Check {
        #[command(flatten)]
        input: Input,
    },
    /// Print the tagged line-diff stream in ndiff form
    Ndiff { base: PathBuf, modified: PathBuf },
}

#[derive(Args)]
struct Input {
    /// Build from a saved ndiff stream instead of two files
    #[arg(long, value_name = "FILE", conflicts_with_all = ["base", "modified"])]
    from_ndiff: Option<PathBuf>,

    #[arg(required_unless_present = "from_ndiff")]
    base: Option<PathBuf>,

    #[arg(required_unless_present = "from_ndiff")]
    modified: Option<PathBuf>,
}

impl DiffArgs {
    fn source_options(&self) -> SourceOptions {
        let algorithm = match self.algorithm {
            AlgorithmArg::Myers => Algorithm::Myers,
            AlgorithmArg::Patience => Algorithm::Patience,
            AlgorithmArg::Lcs => Algorithm::Lcs,
        };

        let mut options = SourceOptions::default()
            .algorithm(algorithm)
            .intraline_cutoff(self.cutoff)
            .normalize_line_endings(!self.keep_line_endings);
        if let Some(ms) = self.timeout_ms {
            options = options.timeout((ms > 0).then(|| Duration::from_millis(ms)));
        }
        options
    }
}

impl Input {
    fn descriptor(&self, options: &SourceOptions) -> Result<DiffDescriptor> {
        match (&self.from_ndiff, &self.base, &self.modified) {
            (Some(path), _, _) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read ndiff stream {}", path.display()))?;
                let stream = parse_ndiff(&text)
                    .with_context(|| format!("Malformed ndiff stream {}", path.display()))?;
                DiffDescriptor::build(stream)
                    .with_context(|| format!("Failed to build descriptor from {}", path.display()))
            }
            (None, Some(base), Some(modified)) => {
                let base_text = pairs::read_text(base)?;
                let modified_text = pairs::read_text(modified)?;
                options.describe(&base_text, &modified_text).with_context(|| {
                    format!(
                        "Failed to build descriptor for {} and {}",
                        base.display(),
                        modified.display()
                    )
                })
            }
            _ => bail!("expected BASE and MODIFIED paths or --from-ndiff"),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.diff.source_options();
    debug!("source options: {options:?}");

    match cli.command {
        Commands::Dump { input } => {
            let desc = input.descriptor(&options)?;
            print!("{desc}");
        }
        Commands::Stats { base, modified } => {
            let file_pairs = pairs::collect_pairs(&base, &modified)?;
            let files = describe_all(&options, &file_pairs);
            print!("{}", report::stats_table(&files));
            if files.iter().any(|file| file.descriptor.is_err()) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Check { input } => {
            let desc = input.descriptor(&options)?;
            let violations = desc.violations();
            if !violations.is_empty() {
                for violation in &violations {
                    eprintln!("{violation}");
                }
                eprintln!("{} invariant violations", violations.len());
                return Ok(ExitCode::FAILURE);
            }
            println!("ok: {} rows, {}", desc.row_count(), desc.stats());
        }
        Commands::Ndiff { base, modified } => {
            let base_text = pairs::read_text(&base)?;
            let modified_text = pairs::read_text(&modified)?;
            print!("{}", options.ndiff(&base_text, &modified_text));
        }
    }

    Ok(ExitCode::SUCCESS)
}
