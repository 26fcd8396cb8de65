use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use zdrive::license::TokenAmount;
use zdrive::metadata::{self, CreateReleaseInput};
use zdrive::types::ReleaseMetadata;
use zdrive::{assets, collection, config, file_type, license, output, preview};

#[derive(Parser)]
#[command(name = "zdrive")]
#[command(about = "Build, validate, and inspect Z:Drive release metadata")]
#[command(long_about = "\
Build, validate, and inspect Z:Drive release metadata

A release is a tradeable coin whose metadata document describes the work:
cover image, primary previewable file, attachments, source links, license,
and collection membership.

Document shape:

  {
    \"name\": \"Tyrolean Chair\",
    \"description\": \"Measured drawings of a carved chair\",
    \"image\": \"ipfs://QmCover\",                 # Cover image
    \"animation_url\": \"ipfs://QmModel\",         # Mirrors content.uri
    \"content\": { \"mime\": \"model/gltf-binary\", \"uri\": \"ipfs://QmModel\" },
    \"properties\": {
      \"zdrive\": {
        \"schemaVersion\": 1,
        \"release\":    { \"assets\": [...], \"external\": [...] },
        \"license\":    { \"baseline\": \"ALL_RIGHTS_RESERVED\", \"cbe\": {...}, \"gate\": {...} },
        \"collection\": { \"id\": \"8453:0xabc...:chairs\", \"slug\": \"chairs\", ... }
      }
    }
  }

Run 'zdrive gen-config' to generate a documented zdrive.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "zdrive.toml", global = true)]
    config: PathBuf,

    /// Enable debug logging (also honors RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a metadata document from create-form input JSON
    Build {
        /// CreateReleaseInput JSON file
        input: PathBuf,
        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse and validate a metadata document
    Validate {
        /// Metadata JSON file
        document: PathBuf,
    },
    /// Summarize a metadata document, its preview, and its badge
    Inspect {
        /// Metadata JSON file
        document: PathBuf,
    },
    /// Classify a file by MIME type and/or filename
    Classify {
        #[arg(long)]
        mime: Option<String>,
        #[arg(long)]
        filename: Option<String>,
    },
    /// Encode or decode collection ids
    #[command(subcommand)]
    CollectionId(CollectionIdCommand),
    /// Derive a collection slug from a title
    Slug {
        title: String,
    },
    /// List the CBE licenses
    Licenses,
    /// Describe a directory of files as release attachments
    Assets {
        dir: PathBuf,
        /// URI of the uploaded directory, e.g. ipfs://QmDir
        #[arg(long)]
        base_uri: String,
        /// Print a readable list instead of JSON
        #[arg(long)]
        list: bool,
    },
    /// Check whether a holder's balance meets a release's license gate
    LicenseStatus {
        /// Metadata JSON file
        document: PathBuf,
        /// Holder balance as a decimal integer
        #[arg(long, default_value = "0")]
        balance: String,
    },
    /// Print a stock zdrive.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum CollectionIdCommand {
    /// Join chain, creator, and slug into an id
    Encode {
        #[arg(allow_negative_numbers = true)]
        chain_id: i64,
        creator: String,
        slug: String,
    },
    /// Split an id into its parts
    Decode { id: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Command::Build {
            input,
            output: out_path,
        } => {
            let cfg = config::load_config(&cli.config)?;
            let content = std::fs::read_to_string(&input)?;
            let input: CreateReleaseInput = serde_json::from_str(&content)?;
            let metadata = metadata::build_release_metadata_on_chain(&input, cfg.chain.id);
            let json = serde_json::to_string_pretty(&metadata)?;
            match &out_path {
                Some(path) => {
                    std::fs::write(path, format!("{json}\n"))?;
                    println!("==> Wrote {}", path.display());
                }
                None => println!("{}", json),
            }
            let report = metadata::validate_release_metadata(&metadata);
            if !report.valid {
                for line in output::format_validation_report(&report) {
                    eprintln!("{}", line);
                }
                std::process::exit(1);
            }
        }
        Command::Validate { document } => {
            let metadata = read_document(&document)?;
            let report = metadata::validate_release_metadata(&metadata);
            output::print_validation_report(&report);
            if !report.valid {
                std::process::exit(1);
            }
        }
        Command::Inspect { document } => {
            let cfg = config::load_config(&cli.config)?;
            let metadata = read_document(&document)?;
            output::print_inspect_output(
                &metadata,
                &preview::select_preview(&metadata),
                preview::badge(&metadata),
                &cfg.gateways,
            );
        }
        Command::Classify { mime, filename } => {
            if mime.is_none() && filename.is_none() {
                return Err("classify needs --mime and/or --filename".into());
            }
            let ft = file_type::file_type(mime.as_deref(), filename.as_deref());
            output::print_classification(ft, mime.as_deref(), filename.as_deref());
        }
        Command::CollectionId(CollectionIdCommand::Encode {
            chain_id,
            creator,
            slug,
        }) => {
            println!("{}", collection::build_collection_id(chain_id, &creator, &slug));
        }
        Command::CollectionId(CollectionIdCommand::Decode { id }) => {
            let decoded = collection::parse_collection_id(&id);
            output::print_collection_id(&id, decoded.as_ref());
            if decoded.is_none() {
                std::process::exit(1);
            }
        }
        Command::Slug { title } => {
            println!("{}", collection::slugify(&title));
        }
        Command::Licenses => {
            output::print_license_table();
        }
        Command::Assets {
            dir,
            base_uri,
            list,
        } => {
            let cfg = config::load_config(&cli.config)?;
            let options = assets::AssetScanOptions {
                base_uri,
                max_file_size: cfg.uploads.max_file_size,
            };
            let scanned = assets::scan_assets(&dir, &options)?;
            if list {
                output::print_asset_list(&scanned, &cfg.gateways);
            } else {
                println!("{}", serde_json::to_string_pretty(&scanned)?);
            }
        }
        Command::LicenseStatus { document, balance } => {
            let metadata = read_document(&document)?;
            let balance = TokenAmount::parse(&balance)?;
            let status =
                license::license_status(metadata.properties.zdrive.license.as_ref(), &balance);
            output::print_license_status(&status, &balance);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install a stderr subscriber when `--verbose` or `RUST_LOG` asks for one.
///
/// Logs go to stderr so JSON on stdout stays pipeable.
fn init_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if verbose || has_rust_log {
        let filter = if verbose {
            EnvFilter::from_default_env().add_directive("zdrive=debug".parse()?)
        } else {
            EnvFilter::from_default_env()
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
    Ok(())
}

/// Read and parse a stored metadata document.
fn read_document(path: &Path) -> Result<ReleaseMetadata, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    metadata::parse_release_metadata_str(&content).ok_or_else(|| {
        format!(
            "{} is not a Z:Drive release document (schema version {})",
            path.display(),
            zdrive::types::SCHEMA_VERSION
        )
        .into()
    })
}
