use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use shared::domain::{RowId, TaxRow};
use shared::protocol::CellEditEvent;

use crate::command::EditCommand;
use crate::error::EditorError;
use crate::reducer;
use crate::snapshot::EditorSnapshot;

/// Single source of truth for one editing session.
///
/// Constructed per session and passed to the adapters explicitly; there
/// is no process-wide instance. Every mutation builds a complete new
/// snapshot and swaps it in atomically, then publishes it on a watch
/// channel so the grid adapter can re-render.
pub struct RowStore {
    current: watch::Sender<Arc<EditorSnapshot>>,
    next_row_id: u64,
    selected: Option<RowId>,
}

impl RowStore {
    /// A new session starts with one blank row.
    pub fn new() -> Self {
        let (current, _) = watch::channel(Arc::new(EditorSnapshot::default()));
        let mut store = Self {
            current,
            next_row_id: 1,
            selected: None,
        };
        store.add_row();
        store
    }

    pub fn snapshot(&self) -> Arc<EditorSnapshot> {
        self.current.borrow().clone()
    }

    /// Change notifications for observers; each received value is a
    /// complete immutable snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<EditorSnapshot>> {
        self.current.subscribe()
    }

    pub fn selected_row(&self) -> Option<RowId> {
        self.selected
    }

    /// Appends one row in the default state. Always succeeds.
    pub fn add_row(&mut self) -> RowId {
        let id = RowId(self.next_row_id);
        self.next_row_id += 1;

        let mut next = self.snapshot().as_ref().clone();
        next.rows.push(TaxRow::blank(id));
        debug!(row = id.0, rows = next.rows.len(), "row added");
        self.install(next);
        id
    }

    /// Removes the row at `position` together with its diagnostics.
    pub fn delete_row(&mut self, position: usize) -> Result<(), EditorError> {
        let mut next = self.snapshot().as_ref().clone();
        if position >= next.rows.len() {
            return Err(EditorError::IndexOutOfRange {
                position,
                len: next.rows.len(),
            });
        }
        let removed = next.rows.remove(position);
        next.diagnostics.retain(|d| d.row != removed.id);
        if self.selected == Some(removed.id) {
            self.selected = None;
        }
        debug!(row = removed.id.0, position, "row deleted");
        self.install(next);
        Ok(())
    }

    /// Replaces the collection with an empty one. Diagnostics go with
    /// it: every one of them references a dropped row.
    pub fn clear_all(&mut self) {
        self.selected = None;
        debug!("all rows cleared");
        self.install(EditorSnapshot::default());
    }

    /// Runs one field edit through the reducer and installs the result.
    pub fn apply_edit(&mut self, position: usize, command: &EditCommand) -> Result<(), EditorError> {
        let next = reducer::apply_edit(&self.snapshot(), position, command)?;
        debug!(position, ?command, diagnostics = next.diagnostics.len(), "edit applied");
        self.install(next);
        Ok(())
    }

    /// Wire-event entry point for grid adapters.
    pub fn apply_event(&mut self, event: &CellEditEvent) -> Result<(), EditorError> {
        self.apply_edit(event.position, &EditCommand::from(event))
    }

    /// Records which row is selected. Observational only; the
    /// collection is never affected.
    pub fn select_row(&mut self, position: usize) -> Result<RowId, EditorError> {
        let snapshot = self.snapshot();
        let row = snapshot
            .rows
            .get(position)
            .ok_or(EditorError::IndexOutOfRange {
                position,
                len: snapshot.rows.len(),
            })?;
        self.selected = Some(row.id);
        Ok(row.id)
    }

    fn install(&self, next: EditorSnapshot) {
        self.current.send_replace(Arc::new(next));
    }
}

impl Default for RowStore {
    fn default() -> Self {
        Self::new()
    }
}
