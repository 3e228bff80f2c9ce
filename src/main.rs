mod commands;
mod core;
mod graph;
mod search;
mod syntax;
mod ui;
mod utils;
mod workspace;

#[cfg(test)]
mod testing;

use clap::{ArgAction, Parser, Subcommand};
use core::error::{AffectedError, print_error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Find the projects affected by a change set in Nx-style monorepos
#[derive(Parser)]
#[command(name = "true-affected")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// More log output (-v debug, -vv trace). TRUE_AFFECTED_LOG overrides.
  #[arg(short, long, global = true, action = ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show which projects are affected by changes
  Affected {
    /// Git ref to compare against (default: [git].base, origin/main)
    #[arg(long, conflicts_with_all = ["from", "files"])]
    since: Option<String>,
    /// Start ref (for ref pair mode)
    #[arg(long, requires = "to", conflicts_with = "files")]
    from: Option<String>,
    /// End ref (for ref pair mode)
    #[arg(long, requires = "from", conflicts_with = "files")]
    to: Option<String>,
    /// Changed files, workspace-relative (skips git history)
    #[arg(long, num_args = 1..)]
    files: Vec<String>,
    /// Include uncommitted, staged and untracked files
    #[arg(long)]
    uncommitted: bool,
    /// Output format: text (default), json, names
    #[arg(long, default_value = "text")]
    format: String,
    /// Skip the cross-reference scan for non-source files
    #[arg(long)]
    no_scan: bool,
    /// Only list the changed files that would be analyzed
    #[arg(long)]
    dry_run: bool,
  },

  /// List resolved projects with their effective tsconfig
  Projects {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Show files that reference a non-source file
  Refs {
    /// Workspace-relative path of the file
    file: String,
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);
  let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
  let red = anstyle::Color::Ansi(anstyle::AnsiColor::Red);

  clap::builder::Styles::styled()
    .usage(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .header(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
    .literal(anstyle::Style::new().fg_color(Some(green)))
    .invalid(anstyle::Style::new().bold().fg_color(Some(red)))
    .error(anstyle::Style::new().bold().fg_color(Some(red)))
    .valid(anstyle::Style::new().bold().underline().fg_color(Some(green)))
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// stderr logging; `TRUE_AFFECTED_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
  let default_level = match verbose {
    0 => "warn",
    1 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_env("TRUE_AFFECTED_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time(),
    )
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let workspace_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => handle_error(AffectedError::message(format!("Failed to get current directory: {}", e))),
  };

  // Build workspace context once (config, projects, tsconfig cascade)
  let ctx = match core::context::WorkspaceContext::build(&workspace_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Affected {
      since,
      from,
      to,
      files,
      uncommitted,
      format,
      no_scan,
      dry_run,
    } => commands::run_affected(
      &ctx,
      commands::ChangeSource {
        since,
        from,
        to,
        files,
        uncommitted,
      },
      format,
      no_scan,
      dry_run,
    ),
    Commands::Projects { json } => commands::run_projects(&ctx, json),
    Commands::Refs { file, json } => commands::run_refs(&ctx, file, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: AffectedError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
