use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use upload_guard::{
    BatchValidator, BatchVerdict, FileCandidate, FileMetadataGenerator, FilenameSafetyChecker,
    FilenameSanitizer, GuardConfig, HashAlgorithm, ValidationVerdict,
};

#[derive(Parser)]
#[command(name = "upload-guard")]
#[command(about = "Validate files before upload", long_about = None)]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log pipeline steps to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate one or more files as a single upload batch
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Declared MIME type for every file (guessed from the extension otherwise)
        #[arg(short, long)]
        mime_type: Option<String>,

        /// Role of the uploading user; enables role limits
        #[arg(short, long)]
        role: Option<String>,

        /// Id of the uploading user
        #[arg(short, long, default_value = "cli")]
        user: String,

        /// Print verdicts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a filename and show its sanitized form
    CheckName { name: String },

    /// Print the content hash of a file
    Hash {
        file: PathBuf,

        #[arg(short, long, value_enum)]
        algorithm: Option<Algorithm>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Algorithm {
    Sha256,
    Blake3,
}

impl From<Algorithm> for HashAlgorithm {
    fn from(a: Algorithm) -> Self {
        match a {
            Algorithm::Sha256 => HashAlgorithm::Sha256,
            Algorithm::Blake3 => HashAlgorithm::Blake3,
        }
    }
}

pub async fn execute_command(config: &GuardConfig, command: Commands) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Validate { files, mime_type, role, user, json } => {
            let mut candidates = Vec::with_capacity(files.len());
            for path in &files {
                let candidate = FileCandidate::from_path(path, mime_type.as_deref())
                    .await
                    .with_context(|| format!("cannot open {}", path.display()))?;
                candidates.push(candidate);
            }

            let batch = BatchValidator::new(config.validation.clone());
            let verdict = match role {
                Some(role) => batch.validate_files_with_auth(&candidates, &user, Some(role.as_str())).await,
                None => batch.validate_files(&candidates).await,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                print_batch(&candidates, &verdict);
            }

            Ok(if verdict.is_valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::CheckName { name } => {
            let check = FilenameSafetyChecker::check(&name);
            match check.violation {
                Some(violation) => println!("unsafe: {} ({})", check.message, violation),
                None => println!("safe"),
            }
            println!("sanitized: {}", FilenameSanitizer::sanitize(&name));
            Ok(if check.safe { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Commands::Hash { file, algorithm } => {
            let algorithm = algorithm.map(HashAlgorithm::from).unwrap_or(config.validation.hash_algorithm);
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("cannot read {}", file.display()))?;
            println!("{}  {}", FileMetadataGenerator::new(algorithm).hash(&data), file.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_batch(candidates: &[FileCandidate], verdict: &BatchVerdict) {
    for (candidate, result) in candidates.iter().zip(&verdict.results) {
        print_file(candidate, result);
    }
    match &verdict.error {
        Some(error) => println!("REJECTED: {}", error),
        None => println!("OK: {} file(s) accepted", verdict.results.len()),
    }
}

fn print_file(candidate: &FileCandidate, verdict: &ValidationVerdict) {
    match (&verdict.metadata, &verdict.error) {
        (Some(meta), _) => println!("{}: accepted as {} ({})", candidate.name, meta.sanitized_name, meta.hash),
        (None, Some(error)) => println!("{}: rejected: {}", candidate.name, error),
        (None, None) => println!("{}: rejected", candidate.name),
    }
    for warning in &verdict.warnings {
        println!("  warning: {}", warning);
    }
}
