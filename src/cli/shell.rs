//! `attendant-registry shell`: interactive registration form.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::output::{self, OutputMode};
use crate::coordinator::SubmissionCoordinator;
use crate::domain::DraftField;
use crate::error::{RegistryError, Result};

/// One line typed at the form prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Set(DraftField, String),
    Show,
    Submit,
    Reset,
    Roster { detail: bool },
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map(|(h, r)| (h, r.trim()))
            .unwrap_or((line, ""));

        match head {
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(f, v)| (f, v.trim()))
                    .unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(RegistryError::Validation("usage: set <field> <value>".to_string()));
                }
                Ok(Self::Set(field.parse()?, value.to_string()))
            }
            "clear" => Ok(Self::Set(rest.parse()?, String::new())),
            "show" | "draft" => Ok(Self::Show),
            "submit" => Ok(Self::Submit),
            "reset" => Ok(Self::Reset),
            "roster" | "list" => Ok(Self::Roster {
                detail: rest == "--detail" || rest == "detail",
            }),
            "help" | "?" => Ok(Self::Help),
            "exit" | "quit" | "q" => Ok(Self::Quit),
            other => Err(RegistryError::Validation(format!(
                "unknown command '{other}', type 'help'"
            ))),
        }
    }
}

fn prompt(coordinator: &SubmissionCoordinator) -> &'static str {
    if coordinator.is_busy() {
        "\x1b[33mattendant [submitting]>\x1b[0m "
    } else {
        "\x1b[36mattendant>\x1b[0m "
    }
}

/// Apply one command; returns false when the shell should exit
pub async fn apply(
    coordinator: &SubmissionCoordinator,
    command: ShellCommand,
    mode: OutputMode,
) -> anyhow::Result<bool> {
    match command {
        ShellCommand::Set(field, value) => coordinator.set_field(field, value),
        ShellCommand::Show => println!("{}", output::render_draft(&coordinator.draft())),
        ShellCommand::Reset => {
            coordinator.reset();
            println!("Form cleared.");
        }
        ShellCommand::Submit => {
            println!("Submitting...");
            match coordinator.handle_submit().await {
                Some(record) => {
                    println!("\x1b[32m✓ Registered {}\x1b[0m", record.identifier);
                    if let Some(notice) = coordinator.notice() {
                        println!("{}", output::render_notice(&notice));
                    }
                }
                None => {
                    if let Some(notice) = coordinator.notice() {
                        println!("{}", output::render_notice(&notice));
                    }
                }
            }
        }
        ShellCommand::Roster { detail } => {
            println!("{}", output::render_roster(&coordinator.roster(), mode, detail)?)
        }
        ShellCommand::Help => print_shell_help(),
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

pub async fn run(coordinator: &SubmissionCoordinator, mode: OutputMode) -> anyhow::Result<()> {
    println!("\x1b[36mTraining Attendant Registration Form\x1b[0m");
    println!("Type 'help' for available commands, 'exit' to quit.");
    println!();

    let history_path = dirs::data_dir().map(|d| d.join("attendant-registry").join("history.txt"));

    let mut rl = DefaultEditor::new()?;

    if let Some(ref path) = history_path {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline(prompt(coordinator)) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match ShellCommand::parse(line) {
                    Ok(command) => {
                        if !apply(coordinator, command, mode).await? {
                            break;
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("readline error: {e}");
                break;
            }
        }
    }

    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(path);
    }

    Ok(())
}

fn print_shell_help() {
    println!("Available commands:");
    println!("  set <field> <value>   fill in a field");
    println!("  clear <field>         empty a field");
    println!("  show                  print the form");
    println!("  submit                register the attendant");
    println!("  reset                 clear the form");
    println!("  roster [--detail]     list registered attendants");
    println!("  help                  (this message)");
    println!("  exit                  (quit shell)");
    println!();
    println!("Fields: firstName, lastName, age, gender (Male|Female|Other),");
    println!("        organizationUnit, trainingDate (YYYY-MM-DD)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_keeps_spaces_in_the_value() {
        assert_eq!(
            ShellCommand::parse("set organizationUnit  Bo District  Hospital").unwrap(),
            ShellCommand::Set(
                DraftField::OrganizationUnit,
                "Bo District  Hospital".to_string()
            )
        );
        assert_eq!(
            ShellCommand::parse("set age").unwrap(),
            ShellCommand::Set(DraftField::Age, String::new())
        );
    }

    #[test]
    fn parses_the_simple_commands() {
        assert_eq!(ShellCommand::parse("submit").unwrap(), ShellCommand::Submit);
        assert_eq!(ShellCommand::parse(" q ").unwrap(), ShellCommand::Quit);
        assert_eq!(
            ShellCommand::parse("roster --detail").unwrap(),
            ShellCommand::Roster { detail: true }
        );
        assert_eq!(
            ShellCommand::parse("clear gender").unwrap(),
            ShellCommand::Set(DraftField::Gender, String::new())
        );
    }

    #[test]
    fn rejects_unknown_input() {
        assert!(ShellCommand::parse("set").is_err());
        assert!(ShellCommand::parse("set nickname Ama").is_err());
        assert!(ShellCommand::parse("dance").is_err());
    }
}
