//! `mosaic-wm` is the tiling layout engine of a window manager: it owns
//! the workspace tree, computes every window's rectangle from the
//! declarative model, and reacts to structural edits, discrete and
//! pointer-driven resizes, and spatial focus navigation.
//!
//! The engine never talks to an OS directly; hosts provide a
//! [`sys::backend::WindowBackend`] and drive the engine from a
//! single-threaded event loop (a tokio current-thread runtime with a
//! `LocalSet` for the pointer-resize apply tasks).

pub mod common;
pub mod layout_engine;
pub mod model;
pub mod sys;

pub use common::config::EngineConfig;
pub use layout_engine::{
    CommandError, EventResponse, LayoutArg, LayoutCommand, LayoutEngine, LayoutEvent,
    ResizeAmount, ResizeDimension, Session, WorkspaceId,
};
pub use model::window::WindowId;
pub use model::workspace::{LayoutKind, Workspace};
pub use sys::backend::{BackendError, BackendEvent, Monitor, MonitorProvider, WindowBackend};
pub use sys::geometry::{Direction, Orientation, Point, Rect, Size};
