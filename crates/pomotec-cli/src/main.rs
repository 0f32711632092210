use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod logging;
mod screen;

#[derive(Parser)]
#[command(name = "pomotec", version, about = "Pomodoro focus/break timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive timer screen
    Run,
    /// One-shot timer control over persisted state
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Completed session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let target = match cli.command {
        Commands::Run => logging::Target::File,
        _ => logging::Target::Stderr,
    };
    logging::init(target);

    let result = match cli.command {
        Commands::Run => commands::run::run(),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pomotec", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_timer_skip_break() {
        let cli = Cli::try_parse_from(["pomotec", "timer", "skip-break"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Timer {
                action: commands::timer::TimerAction::SkipBreak
            }
        ));
    }

    #[test]
    fn parses_config_set() {
        let cli = Cli::try_parse_from(["pomotec", "config", "set", "ui.dark_mode", "true"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { .. }));
    }
}
