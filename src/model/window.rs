use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::sys::geometry::{Rect, Size};

#[allow(non_camel_case_types)]
pub type pid_t = i32;

/// Stable identity of a window: the owning application plus a per-app index
/// that is never reused while the app lives.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId {
    pub pid: pid_t,
    pub idx: NonZeroU32,
}

impl WindowId {
    pub fn new(pid: pid_t, idx: u32) -> WindowId {
        WindowId {
            pid,
            idx: NonZeroU32::new(idx).expect("window index must be non-zero"),
        }
    }
}

impl std::fmt::Debug for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.pid, self.idx)
    }
}

/// Per-window bookkeeping carried on the window's leaf node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WindowData {
    pub wid: WindowId,
    /// Remembered size for when the window returns to the floating bucket.
    pub floating_size: Option<Size>,
    pub fullscreen: bool,
    /// The rect last pushed to the backend.
    pub last_applied_rect: Option<Rect>,
    /// The gap-free rect the window was last assigned by a layout pass.
    pub last_applied_virtual_rect: Option<Rect>,
}

impl WindowData {
    pub fn new(wid: WindowId) -> WindowData {
        WindowData {
            wid,
            floating_size: None,
            fullscreen: false,
            last_applied_rect: None,
            last_applied_virtual_rect: None,
        }
    }
}
