//! Table command identifiers
//!
//! Commands are plain values dispatched by [`crate::engine::TableEditor::execute`].
//! The registry maps each command to the name used on the command line.

use crate::table::Alignment;

/// A table editing command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableCommand {
    // Formatting
    Format,
    FormatAll,
    Escape,
    Align(Alignment),

    // Navigation
    SelectCell,
    MoveFocus { rows: isize, columns: isize },
    NextCell,
    PreviousCell,
    NextRow,

    // Rows
    InsertRow,
    DeleteRow,
    MoveRow(isize),

    // Columns
    InsertColumn,
    DeleteColumn,
    MoveColumn(isize),
}

/// A command definition for the registry
#[derive(Debug, Clone)]
pub struct CommandDef {
    pub command: TableCommand,
    /// Command-line name
    pub name: &'static str,
    pub label: &'static str,
}

/// Static registry of all available commands
pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        command: TableCommand::Format,
        name: "format",
        label: "Format Table",
    },
    CommandDef {
        command: TableCommand::FormatAll,
        name: "format-all",
        label: "Format All Tables",
    },
    CommandDef {
        command: TableCommand::Escape,
        name: "escape",
        label: "Format Table and Leave",
    },
    CommandDef {
        command: TableCommand::Align(Alignment::Left),
        name: "align-left",
        label: "Align Column Left",
    },
    CommandDef {
        command: TableCommand::Align(Alignment::Right),
        name: "align-right",
        label: "Align Column Right",
    },
    CommandDef {
        command: TableCommand::Align(Alignment::Center),
        name: "align-center",
        label: "Align Column Center",
    },
    CommandDef {
        command: TableCommand::Align(Alignment::Default),
        name: "align-default",
        label: "Reset Column Alignment",
    },
    CommandDef {
        command: TableCommand::SelectCell,
        name: "select-cell",
        label: "Select Cell",
    },
    CommandDef {
        command: TableCommand::MoveFocus {
            rows: -1,
            columns: 0,
        },
        name: "move-up",
        label: "Move Up",
    },
    CommandDef {
        command: TableCommand::MoveFocus {
            rows: 1,
            columns: 0,
        },
        name: "move-down",
        label: "Move Down",
    },
    CommandDef {
        command: TableCommand::MoveFocus {
            rows: 0,
            columns: -1,
        },
        name: "move-left",
        label: "Move Left",
    },
    CommandDef {
        command: TableCommand::MoveFocus {
            rows: 0,
            columns: 1,
        },
        name: "move-right",
        label: "Move Right",
    },
    CommandDef {
        command: TableCommand::NextCell,
        name: "next-cell",
        label: "Next Cell",
    },
    CommandDef {
        command: TableCommand::PreviousCell,
        name: "previous-cell",
        label: "Previous Cell",
    },
    CommandDef {
        command: TableCommand::NextRow,
        name: "next-row",
        label: "Next Row",
    },
    CommandDef {
        command: TableCommand::InsertRow,
        name: "insert-row",
        label: "Insert Row",
    },
    CommandDef {
        command: TableCommand::DeleteRow,
        name: "delete-row",
        label: "Delete Row",
    },
    CommandDef {
        command: TableCommand::MoveRow(-1),
        name: "move-row-up",
        label: "Move Row Up",
    },
    CommandDef {
        command: TableCommand::MoveRow(1),
        name: "move-row-down",
        label: "Move Row Down",
    },
    CommandDef {
        command: TableCommand::InsertColumn,
        name: "insert-column",
        label: "Insert Column",
    },
    CommandDef {
        command: TableCommand::DeleteColumn,
        name: "delete-column",
        label: "Delete Column",
    },
    CommandDef {
        command: TableCommand::MoveColumn(-1),
        name: "move-column-left",
        label: "Move Column Left",
    },
    CommandDef {
        command: TableCommand::MoveColumn(1),
        name: "move-column-right",
        label: "Move Column Right",
    },
];

impl TableCommand {
    /// Look up a command by its command-line name
    pub fn from_name(name: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|def| def.name == name)
            .map(|def| def.command)
    }

    /// Registry entry, if the command is registered
    pub fn def(&self) -> Option<&'static CommandDef> {
        COMMANDS.iter().find(|def| def.command == *self)
    }

    /// Command-line name, if the command is registered
    pub fn name(&self) -> Option<&'static str> {
        self.def().map(|def| def.name)
    }
}

/// All registered command names, in registry order
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|def| def.name)
}
