use anyhow::{bail, Context, Result};
use clap::Parser;

use pipetab::cli::{CliArgs, CommandReport, OutputMode, RunReport};
use pipetab::document::Document;
use pipetab::editable::{RopeEditor, TextEditor};
use pipetab::engine::{CommandOutcome, TableEditor};

fn main() -> Result<()> {
    pipetab::tracing::init();

    let config = CliArgs::parse().into_config().map_err(anyhow::Error::msg)?;
    let options = config.table_options()?;
    let path = &config.path;

    let document =
        Document::load(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let mut editor = RopeEditor::from_text(&document.text).with_cursor(config.position);
    let mut engine = TableEditor::new();
    let mut reports = Vec::with_capacity(config.commands.len());

    for &command in &config.commands {
        let outcome = engine.execute(&mut editor, command, &options);
        tracing::info!(?command, ?outcome, "command finished");
        reports.push(CommandReport::new(command, outcome));
        if outcome == CommandOutcome::NoTable {
            let pos = editor.cursor_position();
            bail!(
                "{}:{}:{}: no table at the cursor",
                path.display(),
                pos.line + 1,
                pos.column + 1
            );
        }
    }

    let text = editor.text();
    let changed = text != document.text;

    match config.output {
        OutputMode::Check => {
            if changed {
                eprintln!("{} would be reformatted", path.display());
            }
        }
        OutputMode::Stdout => print!("{}", document.render(&text)),
        OutputMode::Write => {
            if changed {
                document
                    .save(path, &text)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
    }

    if config.json {
        let report = RunReport::new(path.clone(), changed, reports, editor.selection());
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if config.output == OutputMode::Check && changed {
        std::process::exit(1);
    }
    Ok(())
}
