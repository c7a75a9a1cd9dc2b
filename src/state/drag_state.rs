//! Shared drag coordination record.
//!
//! Input plugins announce "I am dragging" / "I released" through this record and
//! store the device-space anchor of the current gesture. Writes never trigger a
//! render. There is no lock: two plugins may be marked dragging at the same time
//! and whichever one calls the movement engine last wins that frame. Any plugin
//! may reset the whole record, which also ends every other plugin's gesture.

use super::Offset;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragRecord {
    /// Indexed by plugin registration order. Missing entries read as `false`.
    pub plugin_dragging: Vec<bool>,
    /// Anchor of the current gesture in the device's coordinate space.
    pub initial_offsets: Offset,
}

/// Cloneable handle to the shared [`DragRecord`].
#[derive(Clone, Debug, Default)]
pub struct HandleState {
    record: Rc<RefCell<DragRecord>>,
}

impl HandleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self, plugin_index: usize) -> bool {
        self.record
            .borrow()
            .plugin_dragging
            .get(plugin_index)
            .copied()
            .unwrap_or(false)
    }

    pub fn set_dragging(&self, plugin_index: usize, dragging: bool) {
        let mut record = self.record.borrow_mut();
        if record.plugin_dragging.len() <= plugin_index {
            record.plugin_dragging.resize(plugin_index + 1, false);
        }
        record.plugin_dragging[plugin_index] = dragging;
    }

    pub fn any_dragging(&self) -> bool {
        self.record.borrow().plugin_dragging.iter().any(|d| *d)
    }

    pub fn initial_offsets(&self) -> Offset {
        self.record.borrow().initial_offsets
    }

    pub fn set_initial_offsets(&self, anchor: Offset) {
        self.record.borrow_mut().initial_offsets = anchor;
    }

    /// Back to the zero value: nobody dragging, anchor at the origin.
    pub fn reset(&self) {
        debug!("Resetting shared drag state");
        *self.record.borrow_mut() = DragRecord::default();
    }

    pub fn snapshot(&self) -> DragRecord {
        self.record.borrow().clone()
    }
}
