pub mod tree;
pub mod window;
pub mod workspace;

pub use tree::{BindingToken, Forest, NodeId};
pub use window::{WindowData, WindowId, pid_t};
pub use workspace::{Container, ContainerLayout, LayoutKind, NodeData, NodeKind, Workspace};
