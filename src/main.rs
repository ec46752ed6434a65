mod changeset;
mod commands;
mod core;
mod profile;
mod release;
mod tools;
mod ui;

use clap::{Parser, Subcommand};
use crate::core::config::PilotConfig;
use crate::core::context::InvocationContext;
use crate::core::error::{ExitCode, PilotError, PilotResult, print_error};
use crate::core::runner::Runner;
use std::path::Path;

/// Format, lint and test only the files that have changed on this branch.
#[derive(Parser)]
#[command(name = "testpilot")]
#[command(long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Print every command before running it
  #[arg(short, long)]
  debug: bool,

  /// Print the installed version and exit
  #[arg(short = 'v', long)]
  version: bool,

  /// Run all commands in tox instead of directly
  #[arg(short = 't', long = "tox", short_alias = 's', alias = "slower")]
  tox: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Create a new patch release on GitHub with generated notes
  Release,

  /// Regenerate this project from its cookiecutter template
  Template,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  if cli.version {
    println!("{}", env!("CARGO_PKG_VERSION"));
    return;
  }

  ui::output::init_tracing(cli.debug);

  let config = PilotConfig {
    debug: cli.debug,
    use_tox: cli.tox,
  };

  let cwd = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(ExitCode::System.as_i32());
    }
  };

  if let Err(err) = run(cli.command, &cwd, config) {
    handle_error(err);
  }
}

fn run(command: Option<Commands>, cwd: &Path, config: PilotConfig) -> PilotResult<()> {
  let runner = Runner::new(config.debug);

  match command {
    None => {
      // Fails early, before any stage, when run outside a git working tree
      let ctx = InvocationContext::build(cwd, config)?;
      commands::run_pilot(&ctx)
    }
    Some(Commands::Release) => commands::run_release(cwd, runner),
    Some(Commands::Template) => commands::run_template(cwd, runner),
  }
}

fn handle_error(err: PilotError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code());
}
