use clap::builder::{styling::AnsiColor, Styles};
use clap::ColorChoice;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use commands::{
    apply_packs, show_catalog, show_status, ApplyPacksArgs, ShowCatalogArgs, ShowStatusArgs,
};
use miette::Result;

mod commands;
mod errors;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the pack catalog per sign category
    Catalog {
        /// The path to the pack configuration file (JSON or TOML)
        #[arg(short, long)]
        packs: String,

        /// Optional world snapshot used to check workshop availability
        #[arg(short, long)]
        world: Option<String>,
    },
    /// Apply pack selections to a world snapshot
    Apply {
        /// The path to the pack configuration file (JSON or TOML)
        #[arg(short, long)]
        packs: String,

        /// The path to the world snapshot to rewrite
        #[arg(short, long)]
        world: String,

        /// Sign pack to select (defaults to the saved selection)
        #[arg(long)]
        signs: Option<String>,

        /// Speed pack to select (defaults to the saved selection)
        #[arg(long)]
        speed: Option<String>,

        /// The path to the settings file
        #[arg(long, default_value = "sign-swap.settings.json")]
        settings: String,
    },
    /// Show the saved pack selections
    Status {
        /// The path to the settings file
        #[arg(long, default_value = "sign-swap.settings.json")]
        settings: String,

        /// Optional pack file; when given, the rules the saved selections
        /// put in effect are listed too
        #[arg(short, long)]
        packs: Option<String>,
    },
}

fn parse_args() -> Args {
    // Configure colored/styled help output
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Blue.on_default());

    let matches = Args::command()
        .styles(styles)
        .color(ColorChoice::Auto)
        .get_matches();

    Args::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = parse_args();

    match args.command {
        Commands::Catalog { packs, world } => show_catalog(ShowCatalogArgs { packs, world }),
        Commands::Apply {
            packs,
            world,
            signs,
            speed,
            settings,
        } => apply_packs(ApplyPacksArgs {
            packs,
            world,
            signs,
            speed,
            settings,
        }),
        Commands::Status { settings, packs } => show_status(ShowStatusArgs { settings, packs }),
    }
}
