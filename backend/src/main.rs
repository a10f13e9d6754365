//! Roster CLI - normalize employee CSV files into JSON
//!
//! ```bash
//! roster parse -f roster1.csv,roster2.csv                 # prompt for column names
//! roster parse -f roster1.csv --mapping mappings.json     # use saved column names
//! roster mapping -f roster1.csv -o mappings.json          # save column names for later
//! roster check-mapping mappings.json                      # validate a mapping file
//! ```

use clap::{Parser, Subcommand};
use roster::{logging, prompt_mappings, BatchProcessor, ColumnMappings, Config, Field, JsonFileSink};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Normalize employee roster CSV files into validated JSON", long_about = None)]
struct Cli {
    /// Log filter (overrides ROSTER_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format: json or pretty (overrides ROSTER_LOG_FORMAT)
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse CSV files and write employee and bad data JSON files
    Parse {
        /// File names separated by ","
        #[arg(short, long)]
        files: String,

        /// Column mapping JSON file (prompted on stdin if not given)
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Directory for result files (overrides ROSTER_OUTPUT_DIR)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Delimiter: a single character, "tab" or "auto" (overrides ROSTER_DELIMITER)
        #[arg(short, long)]
        delimiter: Option<String>,
    },

    /// Ask for the column names of each file and save them
    Mapping {
        /// File names separated by ","
        #[arg(short, long)]
        files: String,

        /// Output mapping file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Validate a column mapping file
    CheckMapping {
        /// Mapping JSON file
        input: PathBuf,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match Config::from_env().and_then(|c| {
        c.with_overrides(None, None, cli.log_level.clone(), cli.log_format.as_deref())
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(&config.log_level, config.log_format) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Parse {
            files,
            mapping,
            output_dir,
            delimiter,
        } => cmd_parse(config, &files, mapping.as_deref(), output_dir, delimiter.as_deref()),

        Commands::Mapping { files, output } => cmd_mapping(&files, &output),

        Commands::CheckMapping { input } => cmd_check_mapping(&input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

/// Split the `-f` argument into file names.
fn split_files(files: &str) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    if files.trim().is_empty() {
        return Err("the `-f` arg is required to process a file and must not be empty".into());
    }
    Ok(files.split(',').map(str::to_string).collect())
}

fn prompt_stdio(files: &[String]) -> io::Result<ColumnMappings> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    prompt_mappings(files, &mut input, &mut output)
}

fn cmd_parse(
    config: Config,
    files: &str,
    mapping: Option<&Path>,
    output_dir: Option<PathBuf>,
    delimiter: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = split_files(files)?;
    let config = config.with_overrides(output_dir, delimiter, None, None)?;

    let mappings = match mapping {
        Some(path) => ColumnMappings::load(path)?,
        None => prompt_stdio(&files)?,
    };

    let sink = JsonFileSink::new(&config.output_dir);
    let processor = BatchProcessor::new(mappings, sink)?.with_delimiter(config.delimiter);
    let result = processor.parse_files(files.as_slice());

    eprintln!(
        "📊 {} files, {} employees, {} bad lines",
        result.report.files_total, result.report.employees, result.report.bad_lines
    );

    if !result.is_success() {
        for (key, err) in &result.errors {
            tracing::warn!(event = "parse_file_finished_with_errors", error_key = %key, kind = err.kind().message(), reason = %err);
            eprintln!("⚠️  {}: {}", key, err);
        }
        return Ok(());
    }

    tracing::info!(event = "all_files_processed", files = ?files);
    Ok(())
}

fn cmd_mapping(files: &str, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let files = split_files(files)?;
    let mappings = prompt_stdio(&files)?;
    mappings.validate()?;
    mappings.save(output)?;
    eprintln!("💾 Mapping written to: {}", output.display());
    Ok(())
}

fn cmd_check_mapping(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mappings = ColumnMappings::load(input)?;

    for (file, mapping) in mappings.iter() {
        let missing = mapping.missing_required();
        if missing.is_empty() {
            println!("✅ {}", file);
        } else {
            let labels: Vec<&str> = missing.iter().map(|f: &Field| f.label()).collect();
            println!("❌ {} (missing: {})", file, labels.join(", "));
        }
    }

    mappings.validate()?;
    Ok(())
}
