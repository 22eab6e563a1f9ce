use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

mod client;
mod config;
mod execution;
mod input;
mod intent;
mod logging;
mod pipeline;
mod prompt;

use config::Config;
use execution::ExecutionOutcome;
use intent::ExecutionMode;
use logging::{get_logger, init_logger};
use pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "shellspeak")]
#[command(version = "0.1.0")]
#[command(about = "Turn a natural-language request into an executable shell command")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// The request to translate (read interactively when omitted)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    request: Vec<String>,

    /// Force multi-step mode (bulk file actions via a generated script)
    #[arg(long)]
    multi_step: bool,

    /// Create an explicit folder/file hierarchy, e.g. "Folder1 > file1.txt"
    #[arg(long)]
    hierarchy: Option<String>,

    /// Execute the generated command even when auto-execute is disabled
    #[arg(long)]
    run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current configuration
    Config,
    /// Select the model to use
    Select {
        /// Name of the model
        name: String,
    },
    /// Enable or disable automatic execution of generated commands
    AutoExecute {
        /// Mode: on, off, enable, or disable
        mode: String,
    },
    /// Show the current log file location
    LogStatus,
    /// Clear the event log file
    ClearLogs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = init_logger() {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let app_config = Config::load();

    if let Ok(logger) = get_logger() {
        if let Ok(logger_guard) = logger.lock() {
            let os_info = format!("{} {}", std::env::consts::OS, std::env::consts::ARCH);
            let _ = logger_guard.log_startup("0.1.0", &os_info);
        }
    }

    let cli = Cli::parse();

    if let Some(command) = cli.command {
        match command {
            Commands::Config => {
                app_config.display();
                return Ok(());
            }
            Commands::Select { name } => {
                let mut new_config = app_config.clone();
                new_config.model = name.clone();
                match new_config.save() {
                    Ok(_) => println!("{} Switched to model: {}", "✅".green(), name.bold().yellow()),
                    Err(e) => eprintln!("{} {}", "❌".red(), e),
                }
                return Ok(());
            }
            Commands::AutoExecute { mode } => {
                let enabled = match mode.to_lowercase().as_str() {
                    "on" | "enable" | "true" | "yes" => true,
                    "off" | "disable" | "false" | "no" => false,
                    _ => {
                        eprintln!("{} Invalid mode. Use: on, off, enable, or disable", "❌".red());
                        return Ok(());
                    }
                };

                let mut new_config = app_config.clone();
                let old_value = new_config.auto_execute;
                new_config.auto_execute = enabled;
                match new_config.save() {
                    Ok(_) => {
                        if let Ok(logger) = get_logger() {
                            if let Ok(logger_guard) = logger.lock() {
                                let _ = logger_guard.log_config_change(
                                    "auto_execute",
                                    &old_value.to_string(),
                                    &enabled.to_string(),
                                );
                            }
                        }
                        if enabled {
                            println!(
                                "{} Auto-execute enabled. Generated commands will run immediately.",
                                "⚠️".yellow()
                            );
                        } else {
                            println!(
                                "{} Auto-execute disabled. Commands will be shown for manual execution.",
                                "✅".green()
                            );
                        }
                    }
                    Err(e) => eprintln!("{} {}", "❌".red(), e),
                }
                return Ok(());
            }
            Commands::LogStatus => {
                if let Ok(logger) = get_logger() {
                    if let Ok(logger_guard) = logger.lock() {
                        println!(
                            "Log file: {}",
                            logger_guard.get_log_path().display().to_string().green()
                        );
                        println!(
                            "{}",
                            "Requests and generated commands are never logged.".dimmed()
                        );
                    }
                } else {
                    eprintln!("{} Logger not initialized", "❌".red());
                }
                return Ok(());
            }
            Commands::ClearLogs => {
                if let Ok(logger) = get_logger() {
                    if let Ok(logger_guard) = logger.lock() {
                        match logger_guard.clear_logs() {
                            Ok(_) => println!("{} Log file cleared.", "🧹".cyan()),
                            Err(e) => eprintln!("{} {}", "❌".red(), e),
                        }
                    }
                } else {
                    eprintln!("{} Logger not initialized", "❌".red());
                }
                return Ok(());
            }
        }
    }

    // Request text: command line first, interactive prompt otherwise.
    let request = if cli.request.is_empty() {
        match input::read_request()? {
            Some(text) => text,
            None => {
                println!("{}", "No input provided.".yellow());
                return Ok(());
            }
        }
    } else {
        cli.request.join(" ")
    };

    let pipeline = Pipeline::new(&app_config);

    // Mode selection: auto-detected bulk requests bypass the choice entirely.
    let mode = if pipeline.is_multi_file_request(&request) {
        println!(
            "{}",
            "Detected a multi-file request. Using multi-step execution.".cyan()
        );
        ExecutionMode::MultiStep
    } else if let Some(spec) = &cli.hierarchy {
        let mode = ExecutionMode::explicit_hierarchy(spec);
        if mode == ExecutionMode::SingleAction {
            println!(
                "{}",
                "Empty file structure. Falling back to a single command.".yellow()
            );
        }
        mode
    } else if cli.multi_step {
        ExecutionMode::MultiStep
    } else if cli.request.is_empty() {
        // Interactive session: ask, like the request itself was asked for.
        input::choose_execution_mode()?
    } else {
        ExecutionMode::SingleAction
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈")
            .template("{spinner:.cyan} {msg}")?,
    );
    pb.set_message("Generating command...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let command = match pipeline.run(&request, mode).await {
        Ok(command) => {
            pb.finish_and_clear();
            command
        }
        Err(e) => {
            pb.finish_and_clear();
            eprintln!("{} {}", "Network Error:".bold().red(), e);
            eprintln!(
                "{}",
                "Please check your internet connection or try again later.".dimmed()
            );
            return Ok(());
        }
    };

    if command.is_empty() {
        println!("{}", "No valid command detected.".yellow());
        return Ok(());
    }

    println!("\n{}", "Generated Command:".bold().green());
    println!("{}", command);

    if !app_config.auto_execute && !cli.run {
        println!(
            "\n{} {}",
            "💡".cyan(),
            "Copy and paste the command to run it, or re-run with --run.".dimmed()
        );
        return Ok(());
    }

    println!("\n{}", "Executing command...".bold());
    match execution::dispatch(&command)? {
        ExecutionOutcome::Skipped => {
            println!("{}", "No valid command detected.".yellow());
        }
        ExecutionOutcome::ChangedDirectory(new_dir) => {
            println!(
                "{} Changed directory to: {}",
                "✅".green(),
                new_dir.display().to_string().bold()
            );
        }
        ExecutionOutcome::DirectoryNotFound(target) => {
            eprintln!(
                "{} Directory '{}' not found.",
                "❌".red(),
                target.bold()
            );
        }
        ExecutionOutcome::Completed(0) => {}
        ExecutionOutcome::Completed(code) => {
            eprintln!("{}", format!("Command failed with status {}.", code).red());
        }
    }

    Ok(())
}
