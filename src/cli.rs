use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "boiler-ocr", version, about = "Boiler display OCR recorder")]
pub struct Cli {
    /// Add more logging information
    #[arg(long, global = true)]
    pub debug: bool,

    /// Log to a dated file instead of the console
    #[arg(long = "file-log", alias = "file_log", global = true)]
    pub file_log: bool,

    /// Only log results, never write to the database
    #[arg(long = "dry-run", alias = "dry_run", global = true)]
    pub dry_run: bool,

    /// Settings file; `.json` is appended when no extension is given
    #[arg(long, global = true, default_value = "settings")]
    pub settings: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture the display continuously and persist changes
    Run,
    /// Aggregate unreported records into sessions
    Report,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_around_the_command() {
        let cli = Cli::parse_from(["boiler-ocr", "--debug", "run", "--dry-run", "--settings", "home"]);
        assert!(cli.debug);
        assert!(cli.dry_run);
        assert!(!cli.file_log);
        assert_eq!(cli.settings, PathBuf::from("home"));
        assert!(matches!(cli.command, Command::Run));
    }

    #[test]
    fn report_defaults() {
        let cli = Cli::parse_from(["boiler-ocr", "report"]);
        assert!(matches!(cli.command, Command::Report));
        assert_eq!(cli.settings, PathBuf::from("settings"));
        assert!(!cli.dry_run);
    }

    #[test]
    fn command_is_required() {
        assert!(Cli::try_parse_from(["boiler-ocr"]).is_err());
    }
}
