//! CLI entry point for drivetree

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::{debug, warn};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;
use termcolor::{ColorChoice, StandardStream};

use drivetree::config::{self, Config};
use drivetree::entry::{Direction, OrderBy, OrderOptions};
use drivetree::index::{CancellationToken, throttle_for};
use drivetree::{
    Error, IndexOptions, LocalStore, LsOptions, Result, SearchOptions, run_create_index,
    run_listing, run_search,
};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            // Respect FORCE_COLOR environment variable
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            // Respect TERM=dumb
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            // Check if stdout is a TTY
            std::io::stdout().is_terminal()
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "drivetree")]
#[command(about = "List, search and index a remote drive tree")]
#[command(version)]
struct Cli {
    /// Root directory of the store (overrides `store` in the config file)
    #[arg(long, value_name = "DIR", global = true)]
    store: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Remote working directory for relative paths (default: /)
    #[arg(long, value_name = "PATH", global = true)]
    cwd: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto", global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List a remote directory
    Ls(LsArgs),
    /// Search a remote directory for names containing a keyword
    Search(SearchArgs),
    /// Build an index file of a remote directory, upload it and share the directory
    #[command(name = "createfileindex")]
    CreateFileIndex(IndexArgs),
}

#[derive(Args, Debug)]
struct LsArgs {
    /// Remote directory; may contain glob patterns
    #[arg(default_value = ".")]
    path: String,

    /// Show ids, creation time and hashes
    #[arg(long)]
    total: bool,

    /// Sort key
    #[arg(long = "order-by", value_name = "KEY", default_value = "name")]
    order_by: OrderBy,

    /// Sort in descending order
    #[arg(long)]
    desc: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Remote directory to search in
    path: String,

    /// Case-insensitive name fragment
    keyword: String,

    /// Also search subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Show ids, creation time and hashes
    #[arg(long)]
    total: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct IndexArgs {
    /// Remote directory to index
    path: String,

    /// Local directory for the index file
    #[arg(long = "output-dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Pause before listing each subdirectory, e.g. 500ms, 1s, 0s
    #[arg(long, value_name = "DURATION", value_parser = parse_duration_string)]
    throttle: Option<Duration>,
}

/// Parse a duration string like "500ms", "1s" or "2m" into a Duration.
fn parse_duration_string(s: &str) -> std::result::Result<Duration, String> {
    humantime::parse_duration(s.trim()).map_err(|e| e.to_string())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if quiet { log::LevelFilter::Error } else { level })
        .format_timestamp(None)
        .init();
}

/// Cancellation token tripped by SIGINT or SIGTERM.
fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    for sig in [SIGINT, SIGTERM] {
        if let Err(e) = flag::register(sig, token.flag()) {
            warn!("cannot register handler for signal {}: {}", sig, e);
        }
    }
    token
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let root = cli.store.or(config.store).ok_or_else(|| {
        Error::Config("no store given; pass --store DIR or set `store` in the config file".into())
    })?;
    let root = config::expand_home(&root);
    let store = LocalStore::new(&root)
        .map_err(|e| Error::Config(format!("cannot open store {}: {}", root.display(), e)))?;
    let cwd = cli.cwd.unwrap_or(config.cwd);
    debug!("store {} cwd {}", root.display(), cwd);

    let choice = if should_use_color(cli.color) {
        ColorChoice::Always
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    match cli.command {
        Command::Ls(args) => {
            let options = LsOptions {
                show_totals: args.total,
                order: OrderOptions {
                    by: args.order_by,
                    direction: if args.desc {
                        Direction::Desc
                    } else {
                        Direction::Asc
                    },
                },
                json: args.json,
            };
            run_listing(&store, &mut stdout, &cwd, &args.path, &options)?;
        }
        Command::Search(args) => {
            let options = SearchOptions {
                show_totals: args.total,
                recursive: args.recursive,
                json: args.json,
            };
            run_search(&store, &mut stdout, &cwd, &args.path, &args.keyword, &options)?;
        }
        Command::CreateFileIndex(args) => {
            let throttle = throttle_for(args.throttle.unwrap_or(config.index.throttle));
            let options = IndexOptions {
                output_dir: args
                    .output_dir
                    .map(|dir| config::expand_home(&dir))
                    .unwrap_or(config.index.output_dir),
                suffix: config.index.suffix,
                throttle: throttle.as_ref(),
                cancel: interrupt_token(),
            };
            run_create_index(&store, &mut stdout, &cwd, &args.path, &options)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        eprintln!("drivetree: {}", e);
        process::exit(1);
    }
}
