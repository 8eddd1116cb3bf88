use anyhow::Result;

use page_control::cli::Command;
use page_control::{handle_browse, handle_window, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Browse(args) => handle_browse(args),
        Command::Window {
            current,
            last,
            range,
            no_limits,
        } => handle_window(*current, *last, *range, *no_limits),
    }
}
