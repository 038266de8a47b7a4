use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;

use role_flow_core::{
    load_agents, render_dot, Assigner, Assignment, Config, PathSearch, Result, RoleFlowError,
    CONFIG_FILE,
};

mod args;
mod logging;
use args::{Algorithm, Cli, Commands, ConfigAction, OutputFormat, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    let config_path = resolve_config_path(cli.config);

    let result = match cli.command {
        Some(Commands::Assign {
            players,
            format,
            dot,
            algorithm,
        }) => handle_assign(
            &config_path,
            &players,
            format,
            dot.as_deref(),
            algorithm,
            cli.quiet,
        ),
        Some(Commands::Config { action }) => handle_config(action, &config_path),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn handle_assign(
    config_path: &Path,
    players: &Path,
    format: OutputFormat,
    dot: Option<&Path>,
    algorithm: Option<Algorithm>,
    quiet: bool,
) -> Result<()> {
    let config = Config::load(config_path)?;
    let agents = load_agents(players)?;
    let search = algorithm
        .map(path_search)
        .unwrap_or(config.solver.algorithm);

    let (assignment, solved) =
        Assigner::with_search(search).assign(&agents, &config.categories())?;

    match format {
        OutputFormat::Text => {
            if !quiet {
                print_assignment(&assignment);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&assignment)?);
        }
    }

    if let Some(path) = dot {
        fs::write(path, render_dot(&solved, &assignment))?;
        tracing::info!(path = %path.display(), "graph written");
        if !quiet && matches!(format, OutputFormat::Text) {
            println!("{} {}", "Graph saved:".green(), path.display());
        }
    }

    Ok(())
}

fn print_assignment(assignment: &Assignment) {
    println!();
    println!("{}", "Final Role Assignment:".bold());
    if assignment.is_empty() {
        println!("  {}", "(nobody assigned)".dimmed());
    }
    for entry in assignment {
        println!(
            "  {} → {} {}",
            entry.agent.cyan(),
            entry.category.green(),
            format!("(choice {})", entry.rank + 1).dimmed()
        );
    }

    if !assignment.unassigned().is_empty() {
        println!();
        println!("{}", "Unassigned:".yellow());
        for agent in assignment.unassigned() {
            println!("  {}", agent);
        }
    }

    println!();
    println!("Total cost: {}", assignment.total_cost());
}

fn handle_config(action: ConfigAction, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load(config_path)?;
            match config.get(&key) {
                Some(value) => {
                    println!("{}", value);
                }
                None => {
                    return Err(RoleFlowError::ConfigKeyNotFound { key });
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(config_path)?;
            config.set(&key, &value)?;
            config.save(config_path)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let config = Config::load(config_path)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Init => {
            let path = Config::init(config_path)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "role-flow", &mut io::stdout());
}

fn path_search(algorithm: Algorithm) -> PathSearch {
    match algorithm {
        Algorithm::Dijkstra => PathSearch::Dijkstra,
        Algorithm::BellmanFord => PathSearch::BellmanFord,
    }
}

fn resolve_config_path(cli_config: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_config {
        return path;
    }

    if let Ok(path) = std::env::var("ROLE_FLOW_CONFIG") {
        return PathBuf::from(path);
    }

    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return local;
    }

    dirs::config_dir()
        .map(|d| Config::path(&d.join("role-flow")))
        .unwrap_or(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_assign() {
        let cli = Cli::try_parse_from([
            "role-flow",
            "-vv",
            "--config",
            "my-roles.toml",
            "assign",
            "--players",
            "team.json",
            "--format",
            "json",
            "--algorithm",
            "bellman-ford",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("my-roles.toml")));
        match cli.command {
            Some(Commands::Assign {
                players,
                format,
                algorithm,
                dot,
            }) => {
                assert_eq!(players, PathBuf::from("team.json"));
                assert!(matches!(format, OutputFormat::Json));
                assert!(matches!(algorithm, Some(Algorithm::BellmanFord)));
                assert!(dot.is_none());
            }
            _ => panic!("expected assign"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let path = resolve_config_path(Some(PathBuf::from("/tmp/x.toml")));
        assert_eq!(path, PathBuf::from("/tmp/x.toml"));
    }

    #[test]
    fn test_algorithm_mapping() {
        assert_eq!(path_search(Algorithm::Dijkstra), PathSearch::Dijkstra);
        assert_eq!(path_search(Algorithm::BellmanFord), PathSearch::BellmanFord);
    }
}
