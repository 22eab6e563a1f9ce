use crate::intent::ExecutionMode;
use anyhow::Result;
use colored::*;
use std::io::{self, Write};

/// Read the request text from stdin.
///
/// Returns `None` for empty input, which short-circuits the whole pipeline
/// before classification. Transcribed speech arrives through the same path:
/// the transcription collaborator hands over plain text.
pub fn read_request() -> Result<Option<String>> {
    print!("{} ", "Enter your request:".bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

/// Interactively choose the execution mode for a request.
///
/// An invalid choice or an empty hierarchy description falls back to
/// single-action, so explicit-hierarchy mode never leaves here without a
/// non-empty structure.
pub fn choose_execution_mode() -> Result<ExecutionMode> {
    println!("\n{}", "Choose execution option:".bold());
    println!("1. Multi-step (create/delete/modify multiple files with a script)");
    println!("2. Normal (single file or simple command)");
    println!("3. File structure (e.g. create Folder1 > file1.txt)");
    print!("{} ", "Enter 1, 2, or 3:".bold());
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin().read_line(&mut choice)?;

    match choice.trim() {
        "1" => Ok(ExecutionMode::MultiStep),
        "2" => Ok(ExecutionMode::SingleAction),
        "3" => {
            print!(
                "\n{} ",
                "Enter file structure (e.g. Folder1 > file1.txt):".bold()
            );
            io::stdout().flush()?;

            let mut structure = String::new();
            io::stdin().read_line(&mut structure)?;

            let mode = ExecutionMode::explicit_hierarchy(&structure);
            if mode == ExecutionMode::SingleAction {
                println!("{}", "Empty file structure. Defaulting to Normal.".yellow());
            }
            Ok(mode)
        }
        _ => {
            println!("{}", "Invalid choice. Defaulting to Normal.".yellow());
            Ok(ExecutionMode::SingleAction)
        }
    }
}
