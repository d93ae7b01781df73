//! tide CLI - Main entry point

mod dispatcher;

use clap::Parser;
use dispatcher::{find_project_root, Dispatcher};
use std::path::PathBuf;
use tide_foundation::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 설정 오류 / 알 수 없는 명령어 종료 코드
const EXIT_USAGE: i32 = 2;

/// tide - pluggable project task runner
#[derive(Parser, Debug)]
#[command(name = "tide")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<External>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Enable debug logging and show hidden commands in help
    #[arg(short, long)]
    verbose: bool,

    /// Project root (default: nearest directory with tide.toml or .tiderc)
    #[arg(long)]
    project_root: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum External {
    /// 레지스트리 명령어 (이름 + 인자)
    #[command(external_subcommand)]
    Run(Vec<String>),
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { args.log_level.as_str() };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let code = match run(&args) {
        Ok(code) => code,
        Err(e) => report(&e),
    };
    std::process::exit(code);
}

fn run(args: &Args) -> anyhow::Result<i32> {
    let project_root = match &args.project_root {
        Some(root) => root.clone(),
        None => find_project_root(&std::env::current_dir()?),
    };

    let dispatcher = Dispatcher::load(project_root)?;

    let Some(External::Run(argv)) = &args.command else {
        print!("{}", dispatcher.help_text(args.verbose)?);
        return Ok(0);
    };

    let Some((name, rest)) = argv.split_first() else {
        print!("{}", dispatcher.help_text(args.verbose)?);
        return Ok(0);
    };

    Ok(dispatcher.dispatch(name, rest)?)
}

fn report(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<Error>() {
        Some(e) if e.is_fatal_config() => {
            eprintln!("tide appears to be misconfigured: {}", e);
            EXIT_USAGE
        }
        Some(e) if matches!(e, Error::CommandNotFound(_)) => {
            eprintln!("{}. Run 'tide' to list available commands.", e);
            EXIT_USAGE
        }
        _ => {
            eprintln!("Error: {:#}", error);
            1
        }
    }
}
