//! Reshaper CLI - Restructure township workbooks
//!
//! # Commands
//!
//! ```bash
//! reshaper serve                          # Start HTTP server (port 3000)
//! reshaper process input.xlsx -o out/     # Write the generated workbooks
//! reshaper sheets input.xlsx              # Show how each sheet is classified
//! reshaper catalog                        # Print the effective township catalog
//! ```
//!
//! Every command accepts `--catalog <file.json>`; otherwise the catalog comes
//! from `RESHAPER_CATALOG` or the built-in lists.

use clap::{Parser, Subcommand};
use reshaper::config::DEFAULT_PORT;
use reshaper::{reshape_file, SourceWorkbook, TownshipCatalog};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "reshaper")]
#[command(about = "Restructure township workbooks into summary workbooks", long_about = None)]
struct Cli {
    /// Township catalog JSON file
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Process a workbook and write the generated files
    Process {
        /// Input workbook
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// List the sheets of a workbook with their category
    Sheets {
        /// Input workbook
        input: PathBuf,
    },

    /// Print the effective township catalog as JSON
    Catalog,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match TownshipCatalog::resolve(cli.catalog.as_deref()) {
        Ok(catalog) => match cli.command {
            Commands::Serve { port } => cmd_serve(port, catalog).await,
            Commands::Process { input, out_dir } => cmd_process(&input, &out_dir, &catalog),
            Commands::Sheets { input } => cmd_sheets(&input, &catalog),
            Commands::Catalog => cmd_catalog(&catalog),
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_serve(port: u16, catalog: TownshipCatalog) -> Result<(), Box<dyn std::error::Error>> {
    reshaper::server::start_server(port, catalog).await
}

fn cmd_process(
    input: &Path,
    out_dir: &Path,
    catalog: &TownshipCatalog,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let report = reshape_file(input, catalog);

    for file in &report.outputs {
        let path = file.write_to_dir(out_dir)?;
        eprintln!(
            "💾 {} ({} sheets): {}",
            file.kind.label(),
            file.sheet_names.len(),
            path.display()
        );
    }

    match report.error {
        Some(message) => Err(message.into()),
        None => {
            eprintln!("\n✨ Done!");
            Ok(())
        }
    }
}

fn cmd_sheets(input: &Path, catalog: &TownshipCatalog) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Reading: {}", input.display());

    let mut workbook = SourceWorkbook::open(input)?;
    let names = workbook.sheet_names().to_vec();

    eprintln!("📋 {} sheets:\n", names.len());
    for name in names {
        let rows = workbook.load_table(&name)?.height();
        println!("  {:<24} {:<14} {} rows", name, catalog.category_of(&name), rows);
    }

    Ok(())
}

fn cmd_catalog(catalog: &TownshipCatalog) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", catalog.to_json()?);
    Ok(())
}
