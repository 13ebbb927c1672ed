use crate::library::logger::interface::Logger;
use crate::presentation::controller::{PresentationController, UserAction};
use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const MENU: &str = "Choose Image: camera | library <path> | cancel | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Action(UserAction),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "camera" | "c" => Ok(Command::Action(UserAction::Camera)),
        "library" | "l" if rest.is_empty() => Err("library needs a path".to_string()),
        "library" | "l" => Ok(Command::Action(UserAction::PhotoLibrary(PathBuf::from(rest)))),
        "cancel" => Ok(Command::Action(UserAction::Cancel)),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "" | "help" | "?" => Ok(Command::Help),
        other => Err(format!("unknown command: {}", other)),
    }
}

/// Reads commands line by line until `quit` or end of input. Each
/// classification is waited on so its result is on screen before the next
/// prompt.
pub fn run<R: BufRead>(
    controller: &mut PresentationController,
    input: R,
    logger: Arc<dyn Logger + Send + Sync>,
    result_timeout: Duration,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let logger = logger.with_namespace("console");
    println!("{}", MENU);

    for line in input.lines() {
        let action = match parse_command(&line?) {
            Ok(Command::Action(action)) => action,
            Ok(Command::Help) => {
                println!("{}", MENU);
                continue;
            }
            Ok(Command::Quit) => break,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match controller.handle(action) {
            Ok(true) => {
                if controller.wait_for_terminal(result_timeout)?.is_none() {
                    let _ = logger.info("Timed out waiting for a result");
                }
            }
            Ok(false) => {}
            Err(error) => {
                let _ = logger.info(&format!("Could not get an image: {}", error));
            }
        }
    }

    Ok(())
}
