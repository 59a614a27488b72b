//! Smart cursor: remember the starting column across a run of
//! next-cell / next-row commands so row wraps return to it.

use crate::table::Focus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SmartCursor {
    #[default]
    Inactive,
    Active {
        /// Column row transitions return to
        column: usize,
        /// First buffer row of the table the run started in
        anchor: usize,
        /// Focus left behind by the last command of the run
        last_focus: Focus,
    },
}

impl SmartCursor {
    pub fn reset(&mut self) {
        *self = SmartCursor::Inactive;
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SmartCursor::Active { .. })
    }

    /// Remembered column, if active
    pub fn column(&self) -> Option<usize> {
        match self {
            SmartCursor::Active { column, .. } => Some(*column),
            SmartCursor::Inactive => None,
        }
    }

    /// Drop the memory if the cursor left the run: a different table, or
    /// a focus other than the one the last command produced.
    pub fn invalidate_stale(&mut self, anchor: usize, focus: &Focus) {
        if let SmartCursor::Active {
            anchor: remembered,
            last_focus,
            ..
        } = *self
        {
            if remembered != anchor || !last_focus.same_cell(focus) {
                tracing::trace!("smart cursor invalidated");
                self.reset();
            }
        }
    }

    /// Record the outcome of a next-cell / next-row command.
    ///
    /// Activates with `start_column` when inactive; always remembers the
    /// focus the command left behind.
    pub fn record(&mut self, anchor: usize, start_column: usize, new_focus: Focus) {
        match self {
            SmartCursor::Active { last_focus, .. } => *last_focus = new_focus,
            SmartCursor::Inactive => {
                tracing::trace!(column = start_column, anchor, "smart cursor activated");
                *self = SmartCursor::Active {
                    column: start_column,
                    anchor,
                    last_focus: new_focus,
                };
            }
        }
    }
}
