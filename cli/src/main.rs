use anyhow::{Context, Result};
use clap::Parser;
use jsonsubschema::SubschemaError;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "jsonsubschema")]
#[command(about = "Decide whether the left JSON Schema is a subschema of the right one")]
#[command(version)]
struct Cli {
    /// Left-hand schema file (S1)
    left: PathBuf,

    /// Right-hand schema file (S2)
    right: PathBuf,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

const EXIT_INVALID_INPUT: u8 = 2;
const EXIT_UNSUPPORTED: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli.left, &cli.right) {
        Ok(true) => {
            println!("true");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("false");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(left: &Path, right: &Path) -> Result<bool> {
    let s1 = read_and_validate_schema(left)?;
    let s2 = read_and_validate_schema(right)?;
    jsonsubschema::is_subschema(&s1, &s2).map_err(anyhow::Error::from)
}

/// Read `path` as JSON and validate it against the draft-4 metaschema.
///
/// Metaschema validation is deliberately kept out of the `jsonsubschema` library
/// crate (it is an external collaborator per the library's scope) and lives only
/// in this binary.
fn read_and_validate_schema(path: &Path) -> Result<Value> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open schema file: {}", path.display()))?;
    let reader = BufReader::new(file);
    let schema: Value = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse JSON from: {}", path.display()))?;

    if !jsonschema::draft4::meta::is_valid(&schema) {
        return Err(anyhow::Error::from(SubschemaError::InvalidInput {
            path: path.display().to_string(),
            message: "does not conform to the JSON Schema metaschema".to_string(),
        }));
    }
    Ok(schema)
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(sub_err) = err.downcast_ref::<SubschemaError>() {
        return match sub_err {
            SubschemaError::Unsupported { .. } => EXIT_UNSUPPORTED,
            SubschemaError::InvalidInput { .. } => EXIT_INVALID_INPUT,
            SubschemaError::Internal { .. } => 1,
        };
    }
    1
}
