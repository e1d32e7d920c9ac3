use anyhow::Result;
use clap::{Parser, Subcommand};
use molecule_cli::commands;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "molecule")]
#[command(about = "Molecule - Schema-driven binary serialization for CKB types", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the known types
    List,

    /// Print the schema of a type
    Schema {
        /// Type name, e.g. Script
        type_name: String,

        /// Include every declaration the type depends on
        #[arg(long)]
        all: bool,
    },

    /// Pack JSON into molecule bytes
    Pack {
        /// Type name, e.g. WitnessArgs
        type_name: String,

        /// JSON text, a JSON file, or - for stdin
        #[arg(short, long)]
        input: String,

        /// Output file for the packed bytes (prints hex when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Unpack molecule bytes into JSON
    Unpack {
        /// Type name, e.g. CellOutput
        type_name: String,

        /// 0x hex string, a file, or - for stdin
        #[arg(short, long)]
        input: String,

        /// Input file holds raw binary instead of hex text
        #[arg(long)]
        raw: bool,

        /// Reject table schema-evolution differences
        #[arg(long)]
        strict: bool,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::List => commands::list::execute(),

        Commands::Schema { type_name, all } => commands::schema::execute(&type_name, all),

        Commands::Pack {
            type_name,
            input,
            output,
        } => commands::pack::execute(&type_name, &input, output.as_deref()),

        Commands::Unpack {
            type_name,
            input,
            raw,
            strict,
            output,
        } => commands::unpack::execute(&type_name, &input, raw, strict, output.as_deref()),
    }
}
