//! Validation and status-transition rules on top of the store.
//!
//! The service owns the completed_at invariant: on every
//! mutation it recomputes `completed_at` from the item's *resulting* status,
//! so a text-only update to an already-completed item refreshes the
//! completion timestamp. That mirrors the presentation contract this tracker
//! has always had; see DESIGN.md for the discussion.

use chrono::{SecondsFormat, Utc};

use crate::error::{CoreError, Result};
use crate::item::{Axis, Item, Status, UpdateFields};
use crate::store::ItemStore;

/// Current time in the ISO-8601 form the store persists
/// (millisecond precision, `Z` suffix).
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Item operations with the axis/status contract enforced. Cloneable; all
/// clones share the injected store.
#[derive(Clone)]
pub struct ItemService {
    store: ItemStore,
}

impl ItemService {
    pub fn new(store: ItemStore) -> Self {
        Self { store }
    }

    /// Create an item. Text and axes must be non-empty; `completed_at` is set
    /// iff the initial status is `completed`.
    pub fn create(&self, text: &str, axes: &[Axis], status: Status) -> Result<Item> {
        if text.trim().is_empty() {
            return Err(CoreError::Validation("text must not be empty".into()));
        }
        if axes.is_empty() {
            return Err(CoreError::Validation("axes must not be empty".into()));
        }

        let now = now_iso();
        let completed_at = (status == Status::Completed).then(|| now.clone());
        let axes_json = serde_json::to_string(axes)?;

        let id = self.store.insert(
            text,
            &axes_json,
            status,
            &now,
            completed_at.as_deref(),
            &now,
        )?;

        Ok(Item {
            id,
            text: text.to_string(),
            axes: axes.to_vec(),
            status,
            created_at: now.clone(),
            completed_at,
            updated_at: now,
        })
    }

    /// Partial update; absent fields keep their prior value. Fails with
    /// `ItemNotFound` when the id is unknown.
    pub fn update(&self, id: i64, fields: UpdateFields) -> Result<Item> {
        let existing = self
            .store
            .get_by_id(id)?
            .ok_or(CoreError::ItemNotFound(id))?;

        if let Some(text) = &fields.text {
            if text.trim().is_empty() {
                return Err(CoreError::Validation("text must not be empty".into()));
            }
        }
        if let Some(axes) = &fields.axes {
            if axes.is_empty() {
                return Err(CoreError::Validation("axes must not be empty".into()));
            }
        }

        let resulting_status = fields.status.unwrap_or(existing.status);
        let now = now_iso();
        let completed_at = (resulting_status == Status::Completed).then(|| now.clone());
        let axes_json = fields
            .axes
            .as_deref()
            .map(serde_json::to_string)
            .transpose()?;

        self.store.update(
            id,
            fields.text.as_deref(),
            axes_json.as_deref(),
            fields.status,
            completed_at.as_deref(),
            &now,
        )?;

        self.store
            .get_by_id(id)?
            .ok_or(CoreError::ItemNotFound(id))
    }

    /// Transition an item to `completed`.
    pub fn complete(&self, id: i64) -> Result<Item> {
        self.update(
            id,
            UpdateFields {
                status: Some(Status::Completed),
                ..Default::default()
            },
        )
    }

    /// Delete an item permanently. `ItemNotFound` when the id is unknown.
    pub fn remove(&self, id: i64) -> Result<()> {
        if self.store.get_by_id(id)?.is_none() {
            return Err(CoreError::ItemNotFound(id));
        }
        self.store.delete(id)?;
        Ok(())
    }

    /// List items, newest first. `None` or `"all"` returns everything; any
    /// other filter must be a valid status.
    pub fn list(&self, status_filter: Option<&str>) -> Result<Vec<Item>> {
        match status_filter {
            None | Some("all") => self.store.get_all(),
            Some(s) => self.store.get_by_status(s.parse()?),
        }
    }
}
