//! Command-line argument parsing
//!
//! Supports:
//! - Placing the cursor with `--line` / `--column` (1-indexed)
//! - Running one or more table commands in sequence
//! - Writing back, printing to stdout, or checking without writing

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use crate::commands::{command_names, TableCommand};
use crate::config::TableOptions;
use crate::editable::{Position, Selection};
use crate::engine::CommandOutcome;

/// Format and edit markdown pipe tables
#[derive(Parser, Debug)]
#[command(name = "pipetab", version, about = "Format and edit markdown pipe tables")]
pub struct CliArgs {
    /// Markdown file to edit
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Put the cursor on line N before running commands
    #[arg(long, value_name = "N")]
    pub line: Option<usize>,

    /// Put the cursor on column N (used with --line)
    #[arg(long, value_name = "N")]
    pub column: Option<usize>,

    /// Command to run; repeat to run several in order
    /// (default: format with --line, format-all without)
    #[arg(short = 'c', long = "command", value_name = "CMD", value_parser = parse_command)]
    pub commands: Vec<TableCommand>,

    /// Read options from this YAML file instead of the user config
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Remember the starting column across next-cell / next-row
    #[arg(long)]
    pub smart_cursor: bool,

    /// Minimum column content width
    #[arg(long, value_name = "N")]
    pub min_width: Option<usize>,

    /// Exit with status 1 if the file would change; never write
    #[arg(long, conflicts_with = "stdout")]
    pub check: bool,

    /// Print the result instead of writing the file
    #[arg(long)]
    pub stdout: bool,

    /// Print a JSON report of the run
    #[arg(long, conflicts_with = "stdout")]
    pub json: bool,
}

fn parse_command(name: &str) -> Result<TableCommand, String> {
    TableCommand::from_name(name).ok_or_else(|| {
        format!(
            "unknown command '{}' (expected one of: {})",
            name,
            command_names().collect::<Vec<_>>().join(", ")
        )
    })
}

/// Where the result goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Write the file back if it changed
    Write,
    /// Print the document to stdout
    Stdout,
    /// Report whether the file would change
    Check,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub path: PathBuf,
    /// Initial cursor position, 0-indexed
    pub position: Position,
    pub commands: Vec<TableCommand>,
    pub output: OutputMode,
    pub json: bool,
    pub config_path: Option<PathBuf>,
    pub smart_cursor: bool,
    pub min_width: Option<usize>,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        if self.column.is_some() && self.line.is_none() {
            return Err("--column requires --line".to_string());
        }

        // Convert from 1-indexed (user input) to 0-indexed (internal)
        let position = Position::new(
            self.line.unwrap_or(1).saturating_sub(1),
            self.column.unwrap_or(1).saturating_sub(1),
        );

        let commands = if !self.commands.is_empty() {
            self.commands
        } else if self.line.is_some() {
            vec![TableCommand::Format]
        } else {
            vec![TableCommand::FormatAll]
        };

        let output = if self.check {
            OutputMode::Check
        } else if self.stdout {
            OutputMode::Stdout
        } else {
            OutputMode::Write
        };

        Ok(RunConfig {
            path: self.path,
            position,
            commands,
            output,
            json: self.json,
            config_path: self.config,
            smart_cursor: self.smart_cursor,
            min_width: self.min_width,
        })
    }
}

impl RunConfig {
    /// Table options: the config file, then command-line overrides
    pub fn table_options(&self) -> anyhow::Result<TableOptions> {
        let mut options = match &self.config_path {
            Some(path) => TableOptions::load_from(path)
                .with_context(|| format!("Invalid --config {}", path.display()))?,
            None => TableOptions::load(),
        };
        if self.smart_cursor {
            options.smart_cursor = true;
        }
        if let Some(width) = self.min_width {
            options.min_content_width = width;
        }
        Ok(options)
    }
}

/// 1-indexed position for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPosition {
    pub line: usize,
    pub column: usize,
}

impl From<Position> for ReportPosition {
    fn from(pos: Position) -> Self {
        Self {
            line: pos.line + 1,
            column: pos.column + 1,
        }
    }
}

/// Outcome of one command in a report
#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub label: String,
    pub outcome: CommandOutcome,
}

impl CommandReport {
    pub fn new(command: TableCommand, outcome: CommandOutcome) -> Self {
        let (name, label) = command
            .def()
            .map(|def| (def.name, def.label))
            .unwrap_or(("unknown", "Unknown Command"));
        Self {
            command: name.to_string(),
            label: label.to_string(),
            outcome,
        }
    }
}

/// Summary of a CLI run, printed with `--json`
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub path: PathBuf,
    pub changed: bool,
    pub commands: Vec<CommandReport>,
    pub cursor: ReportPosition,
    /// Selected range, if the last command selected a cell
    pub selection: Option<(ReportPosition, ReportPosition)>,
}

impl RunReport {
    pub fn new(
        path: PathBuf,
        changed: bool,
        commands: Vec<CommandReport>,
        selection: Selection,
    ) -> Self {
        Self {
            path,
            changed,
            commands,
            cursor: selection.head.into(),
            selection: (!selection.is_empty())
                .then(|| (selection.start().into(), selection.end().into())),
        }
    }
}
