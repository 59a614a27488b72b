//! Edit history (undo/redo)
//!
//! One table command produces one [`Transaction`], however many line
//! edits it makes, so a single undo reverts the whole command.

use super::selection::Selection;

/// A single text replacement that can be undone/redone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOperation {
    /// Character offset where the edit occurred
    pub offset: usize,
    /// Text that was deleted (empty for pure inserts)
    pub deleted_text: String,
    /// Text that was inserted (empty for pure deletes)
    pub inserted_text: String,
}

impl EditOperation {
    pub fn replace(offset: usize, deleted_text: String, inserted_text: String) -> Self {
        Self {
            offset,
            deleted_text,
            inserted_text,
        }
    }

    /// Get the inverse operation for undo
    pub fn inverse(&self) -> Self {
        Self {
            offset: self.offset,
            deleted_text: self.inserted_text.clone(),
            inserted_text: self.deleted_text.clone(),
        }
    }
}

/// A group of operations undone and redone together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub operations: Vec<EditOperation>,
    /// Selection before the first operation
    pub selection_before: Selection,
    /// Selection after the last operation
    pub selection_after: Selection,
}

impl Transaction {
    pub fn new(selection: Selection) -> Self {
        Self {
            operations: Vec::new(),
            selection_before: selection,
            selection_after: selection,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations reversed and inverted, selections swapped
    pub fn inverse(&self) -> Self {
        Self {
            operations: self.operations.iter().rev().map(EditOperation::inverse).collect(),
            selection_before: self.selection_after,
            selection_after: self.selection_before,
        }
    }
}

/// Edit history with undo/redo stacks.
#[derive(Debug, Clone)]
pub struct EditHistory {
    undo_stack: Vec<Transaction>,
    redo_stack: Vec<Transaction>,
    max_size: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl EditHistory {
    /// Create a new edit history with default max size
    pub fn new() -> Self {
        Self::with_max_size(1000)
    }

    /// Create a new edit history with specified max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Push a transaction onto the undo stack (clears redo stack)
    pub fn push(&mut self, transaction: Transaction) {
        self.redo_stack.clear();
        self.undo_stack.push(transaction);

        while self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
    }

    /// Pop a transaction to revert (its inverse moves to the redo stack)
    pub fn pop_undo(&mut self) -> Option<Transaction> {
        let transaction = self.undo_stack.pop()?;
        self.redo_stack.push(transaction.inverse());
        Some(transaction)
    }

    /// Pop a transaction to revert for redo (its inverse moves back to undo)
    pub fn pop_redo(&mut self) -> Option<Transaction> {
        let transaction = self.redo_stack.pop()?;
        self.undo_stack.push(transaction.inverse());
        Some(transaction)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[cfg(test)]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
}
