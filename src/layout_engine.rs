pub mod engine;
pub mod navigation;
pub mod resize;
pub mod systems;
pub mod utils;

pub use engine::{
    CommandError, EventResponse, LayoutArg, LayoutCommand, LayoutEngine, LayoutEvent, Session,
    WorkspaceId,
};
pub use navigation::NavigationProvider;
pub use resize::{ResizeAmount, ResizeDimension, ResizeDriver};
pub use systems::{LayoutContext, calculate_layout};

pub use crate::sys::geometry::{Direction, Orientation};
