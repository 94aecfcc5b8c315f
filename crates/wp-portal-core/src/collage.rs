use tracing::warn;
use wp_api_types::{Message, MessageColumns};

use crate::{Notification, PortalError};

/// The wave collage: columns, loading flag and the selected wave.
#[derive(Debug, Clone, Default)]
pub struct Collage {
    loading: bool,
    columns: MessageColumns,
    selected: Option<String>,
}

impl Collage {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn columns(&self) -> &MessageColumns {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn start_loading(&mut self) {
        self.loading = true;
    }

    /// Store a read result. A failed read leaves the collage empty and
    /// returns the toast to show.
    pub fn finish_loading(
        &mut self,
        result: Result<MessageColumns, PortalError>,
    ) -> Option<Notification> {
        self.loading = false;
        match result {
            Ok(columns) => {
                self.columns = columns;
                if self.selected_message().is_none() {
                    self.selected = None;
                }
                None
            }
            Err(err) => {
                warn!("loading waves failed: {}", err);
                self.columns.clear();
                self.selected = None;
                Some(Notification::from(&err))
            }
        }
    }

    /// Select a wave by id. Unknown ids clear the selection.
    pub fn select(&mut self, id: &str) -> Option<&Message> {
        self.selected = Some(id.to_owned());
        let found = self.selected_message().is_some();
        if !found {
            self.selected = None;
        }
        self.selected_message()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_message(&self) -> Option<&Message> {
        let id = self.selected.as_deref()?;
        self.columns.values().flatten().find(|m| m.id == id)
    }
}
