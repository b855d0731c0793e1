//! Abstract window backend. One implementation exists per OS; the engine
//! only ever talks to these traits, and absorbs transient backend failures
//! at the call site (the next refresh pass re-synchronises).

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::model::window::WindowId;
use crate::sys::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    #[error("backend unavailable")]
    Unavailable,
    #[error("window {0:?} is gone")]
    WindowDead(WindowId),
    /// The backend refused the request (e.g. the window is mid-animation).
    #[error("backend rejected request for {0:?}")]
    Rejected(WindowId),
}

/// Asynchronous notifications observed from the OS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackendEvent {
    Resized { wid: WindowId, frame: Rect },
    Moved { wid: WindowId, frame: Rect },
    Closed(WindowId),
}

/// Suspending window operations. Calls are serialised by the engine's
/// single-threaded event loop; implementations may still take arbitrarily
/// long to answer, and the engine re-checks its own state after every await.
pub trait WindowBackend {
    fn get_rect(
        &self,
        wid: WindowId,
    ) -> impl Future<Output = Result<Rect, BackendError>>;

    fn set_rect(
        &self,
        wid: WindowId,
        origin: Point,
        size: Size,
    ) -> impl Future<Output = Result<(), BackendError>>;

    fn set_frame(&self, wid: WindowId, frame: Rect) -> impl Future<Output = Result<(), BackendError>> {
        self.set_rect(wid, frame.origin, frame.size)
    }

    fn focus(&self, wid: WindowId) -> impl Future<Output = Result<(), BackendError>>;

    /// Registers the channel on which resize/move/close observations are
    /// delivered. The host forwards them into the engine's event loop.
    fn subscribe(&self, events: mpsc::UnboundedSender<BackendEvent>);
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Monitor {
    /// The full monitor rectangle.
    pub frame: Rect,
    /// The monitor rectangle minus system reserved areas.
    pub visible_frame: Rect,
}

impl Monitor {
    pub fn new(frame: Rect) -> Monitor { Monitor { frame, visible_frame: frame } }
}

pub trait MonitorProvider {
    fn monitors(&self) -> Vec<Monitor>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::common::collections::HashMap;

    #[derive(Default)]
    struct Inner {
        rects: HashMap<WindowId, Rect>,
        set_calls: Vec<(WindowId, Rect)>,
        focused: Option<WindowId>,
        unavailable: bool,
    }

    /// In-memory backend: remembers the last rect set per window and a log
    /// of every `set_rect` call.
    #[derive(Clone, Default)]
    pub(crate) struct StubBackend {
        inner: Rc<RefCell<Inner>>,
    }

    impl StubBackend {
        pub fn with_rect(self, wid: WindowId, rect: Rect) -> Self {
            self.inner.borrow_mut().rects.insert(wid, rect);
            self
        }

        pub fn rect_of(&self, wid: WindowId) -> Option<Rect> {
            self.inner.borrow().rects.get(&wid).copied()
        }

        pub fn set_calls(&self) -> Vec<(WindowId, Rect)> {
            self.inner.borrow().set_calls.clone()
        }

        pub fn focused(&self) -> Option<WindowId> { self.inner.borrow().focused }

        pub fn make_unavailable(&self) { self.inner.borrow_mut().unavailable = true; }
    }

    impl WindowBackend for StubBackend {
        async fn get_rect(&self, wid: WindowId) -> Result<Rect, BackendError> {
            let inner = self.inner.borrow();
            if inner.unavailable {
                return Err(BackendError::Unavailable);
            }
            inner.rects.get(&wid).copied().ok_or(BackendError::WindowDead(wid))
        }

        async fn set_rect(
            &self,
            wid: WindowId,
            origin: Point,
            size: Size,
        ) -> Result<(), BackendError> {
            let mut inner = self.inner.borrow_mut();
            if inner.unavailable {
                return Err(BackendError::Unavailable);
            }
            let rect = Rect::new(origin, size);
            inner.rects.insert(wid, rect);
            inner.set_calls.push((wid, rect));
            Ok(())
        }

        async fn focus(&self, wid: WindowId) -> Result<(), BackendError> {
            self.inner.borrow_mut().focused = Some(wid);
            Ok(())
        }

        fn subscribe(&self, _events: tokio::sync::mpsc::UnboundedSender<BackendEvent>) {}
    }
}
