use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use library_scrubber::constants;
use library_scrubber::error::Result;
use library_scrubber::logging;
use library_scrubber::pipeline::coerce::SchemaVersion;
use library_scrubber::pipeline::{ScrubSummary, Scrubber};
use library_scrubber::stats::dataset_stats;
use library_scrubber::storage::DatasetStore;

#[derive(Parser)]
#[command(name = "library_scrubber")]
#[command(about = "Library directory dataset scrubber")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the dataset file
    #[arg(long, global = true, default_value = constants::DEFAULT_DATA_FILE)]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the scrub pass and rewrite the dataset
    Scrub {
        /// Target schema: v1 keeps coordinates as strings, v2 strips deprecated fields
        #[arg(long, value_enum, default_value_t = SchemaVersion::V1)]
        schema: SchemaVersion,
        /// Run the pass and report, but write nothing
        #[arg(long)]
        dry_run: bool,
    },
    /// Report what a scrub pass would change; never writes
    Check {
        /// Target schema to check against
        #[arg(long, value_enum, default_value_t = SchemaVersion::V1)]
        schema: SchemaVersion,
    },
    /// Print dataset statistics
    Stats,
}

fn main() {
    logging::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("Scrub run failed: {}", e);
        println!("❌ {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = DatasetStore::new(&cli.data);

    match cli.command {
        Commands::Scrub { schema, dry_run } => {
            let mut records = store.load()?;
            let summary = Scrubber::new(schema).run(&mut records);

            if dry_run {
                println!("🔍 Dry run, dataset not written");
            } else {
                store.save(&records)?;
                info!("scrub pass written back");
                println!("✅ Dataset scrubbed: {}", store.path().display());
            }
            print_summary(schema, &summary);
        }
        Commands::Check { schema } => {
            let mut records = store.load()?;
            let summary = Scrubber::new(schema).run(&mut records);
            println!("🔍 Check only, dataset not written");
            print_summary(schema, &summary);
        }
        Commands::Stats => {
            let records = store.load()?;
            let stats = dataset_stats(&records);
            println!("\n📊 Dataset statistics for {}:", store.path().display());
            println!("   Total records: {}", stats.total_records);
            println!("   Unique nations: {}", stats.nations.len());
            println!("   IIIF-enabled: {}", stats.iiif_count);
            println!("   Free-license: {}", stats.free_license_count);
            println!("   With website: {}", stats.with_website);
        }
    }
    Ok(())
}

fn print_summary(schema: SchemaVersion, summary: &ScrubSummary) {
    println!("\n📊 Scrub results (schema {}):", schema);
    println!("   Total records: {}", summary.total_records);
    println!("   Records changed: {}", summary.records_changed);
    println!("   URLs changed: {}", summary.urls_changed);
    println!("   URLs query re-encoded: {}", summary.urls_query_encoded);
    println!("   URLs replaced as broken: {}", summary.urls_replaced);
}
