use shared::domain::{Diagnostic, RowId, TaxRow};

/// Immutable view of the row collection and its diagnostics at one
/// point in time. Mutations build a fresh snapshot and swap it in
/// wholesale; observers never see a partially applied edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorSnapshot {
    pub rows: Vec<TaxRow>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EditorSnapshot {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Current display position of a row, if it still exists.
    pub fn position_of(&self, row: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == row)
    }

    pub fn diagnostics_for(&self, row: RowId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.row == row)
    }

    /// Diagnostics paired with the display position of their row, in
    /// recorded order. Every diagnostic resolves: rows drop their
    /// diagnostics when deleted.
    pub fn located_diagnostics(&self) -> Vec<(usize, &Diagnostic)> {
        self.diagnostics
            .iter()
            .filter_map(|d| self.position_of(d.row).map(|pos| (pos, d)))
            .collect()
    }

    /// The identifier column only, in row order, for identifier-batch
    /// submission.
    pub fn identifiers(&self) -> Vec<u64> {
        self.rows.iter().map(|row| row.identifier).collect()
    }
}
