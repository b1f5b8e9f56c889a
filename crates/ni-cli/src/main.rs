//! nicl: generate and verify named-information names
//!
//! Run with: `nicl [COMMAND]`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ni_name::{
    AlgorithmRegistry, DEFAULT_CHUNK_SIZE, EngineOptions, Name, NiEngine, NiError, SuiteSelector,
};

/// Exit status for failures that carry no name status (usage, translation).
const OTHER_FAILURE: u8 = 64;

#[derive(Parser)]
#[command(name = "nicl")]
#[command(about = "Generate and verify ni/nih content names")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Octets read per call while hashing files
    #[arg(long, global = true, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a template name with the digest of a file
    Generate {
        /// Template, e.g. ni://example.com/sha-256
        #[arg(short, long)]
        name: String,

        /// Content file
        #[arg(short, long)]
        file: PathBuf,

        /// Also print the well-known HTTP URL
        #[arg(short, long)]
        well_known: bool,
    },

    /// Check that a file matches the digest in a name
    Verify {
        /// Complete name
        #[arg(short, long)]
        name: String,

        /// Content file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the well-known HTTP URL of a name
    Wku {
        /// Complete name
        #[arg(short, long)]
        name: String,
    },

    /// Print the binary tagged digest of a file as hex
    Binary {
        /// Suite number or algorithm token
        #[arg(short, long)]
        suite: String,

        /// Content file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Rewrite a complete name in the other scheme
    Convert {
        /// Complete name
        #[arg(short, long)]
        name: String,

        /// Target form
        #[arg(short, long, value_enum)]
        to: Target,
    },

    /// List supported algorithms and suite numbers
    Algs,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Ni,
    Nih,
    Canonical,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match run(cli) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("nicl: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<NiError>().map_or(OTHER_FAILURE, NiError::code)
}

fn run(cli: Cli) -> Result<Vec<String>> {
    let registry = AlgorithmRegistry::shared();
    let options = EngineOptions::default().chunk_size(cli.chunk_size);
    let engine = NiEngine::new(registry.clone()).with_options(options);
    debug!(chunk_size = cli.chunk_size, "engine configured");

    match cli.command {
        Commands::Generate {
            name,
            file,
            well_known,
        } => {
            let mut name = parse(&name)?;
            engine
                .generate_file(&mut name, &file)
                .with_context(|| format!("generating {} from {}", name, file.display()))?;
            info!(url = name.url(), "generated");
            let mut lines = vec![name.url().to_string()];
            if well_known {
                lines.extend(name.well_known_url(&registry));
            }
            Ok(lines)
        }

        Commands::Verify { name, file } => {
            let mut name = parse(&name)?;
            engine
                .verify_file(&mut name, &file)
                .with_context(|| format!("verifying {} against {}", name, file.display()))?;
            info!(url = name.url(), "verified");
            Ok(vec![name.url().to_string()])
        }

        Commands::Wku { name } => {
            let mut parsed = parse(&name)?;
            parsed
                .validate(&registry, true)
                .with_context(|| format!("validating {name}"))?;
            let url = parsed
                .well_known_url(&registry)
                .ok_or_else(|| anyhow!("{name} has no well-known form"))?;
            Ok(vec![url])
        }

        Commands::Binary { suite, file } => {
            let selector = match suite.parse::<u8>() {
                Ok(number) => SuiteSelector::Number(number),
                Err(_) => SuiteSelector::Token(&suite),
            };
            let tagged = engine
                .binary_tagged_file(selector, &file)
                .with_context(|| format!("tagging {} with suite {suite}", file.display()))?;
            Ok(vec![hex::encode(tagged.to_bytes())])
        }

        Commands::Convert { name, to } => {
            let mut parsed = parse(&name)?;
            parsed
                .validate(&registry, true)
                .with_context(|| format!("validating {name}"))?;
            let converted = match to {
                Target::Ni => parsed.url_as_ni(),
                Target::Nih => parsed.url_as_nih(),
                Target::Canonical => parsed.canonical_ni_url(),
            }
            .with_context(|| format!("converting {name}"))?;
            Ok(vec![converted])
        }

        Commands::Algs => Ok(vec![registry.describe()]),
    }
}

fn parse(uri: &str) -> Result<Name> {
    Name::from_uri(uri).with_context(|| format!("parsing {uri}"))
}
