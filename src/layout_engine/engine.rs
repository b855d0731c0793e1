//! The engine proper: workspaces, the command surface, and the refresh
//! pass. All mutations run on the caller's single event-loop thread;
//! commands thread a [`Session`] value instead of touching global state,
//! and every command yields an [`EventResponse`] rather than an error
//! crossing the loop boundary.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::common::config::EngineConfig;
use crate::layout_engine::navigation::{self, NavigationProvider};
use crate::layout_engine::resize::{self, ResizeAmount, ResizeDimension, ResizeDriver};
use crate::layout_engine::systems::dwindle::DwindleCache;
use crate::layout_engine::systems::master::{MasterSide, MasterState};
use crate::layout_engine::systems::{LayoutContext, calculate_layout};
use crate::model::window::{WindowId, pid_t};
use crate::model::workspace::{ContainerLayout, LayoutKind, Workspace};
use crate::sys::backend::{Monitor, WindowBackend};
use crate::sys::geometry::{Direction, Orientation, Rect};

slotmap::new_key_type! { pub struct WorkspaceId; }

/// Per-invocation mutable state threaded through every command.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Session {
    pub focused: Option<WindowId>,
    /// The window currently driven by the user's pointer. At most one
    /// window carries this mark at any instant.
    pub manipulated: Option<WindowId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("no-window-focused")]
    NoWindowFocused,
    #[error("non-tiling")]
    NonTiling,
    #[error("floating-not-supported")]
    FloatingNotSupported,
    #[error("master-height-unsupported")]
    MasterHeightUnsupported,
    #[error("not-master-layout")]
    NotMasterLayout,
    #[error("already-master")]
    AlreadyMaster,
}

/// Argument of the `layout` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutArg {
    Tiles,
    Accordion,
    Dwindle,
    Scroll,
    Master,
    MasterLeft,
    MasterRight,
    HTiles,
    VTiles,
    HAccordion,
    VAccordion,
    Horizontal,
    Vertical,
    Tiling,
    Floating,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutCommand {
    Layout(LayoutArg),
    Resize { dimension: ResizeDimension, amount: ResizeAmount },
    BalanceSizes,
    PromoteMaster,
    Focus(Direction),
}

/// What a command did: whether it was applied, an optional user-facing
/// message, and a window the host should focus.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventResponse {
    pub handled: bool,
    pub message: Option<String>,
    pub focus_window: Option<WindowId>,
}

impl EventResponse {
    pub fn ok() -> EventResponse {
        EventResponse { handled: true, message: None, focus_window: None }
    }

    pub fn failed(err: CommandError) -> EventResponse {
        EventResponse { handled: false, message: Some(err.to_string()), focus_window: None }
    }

    fn from_result(result: Result<(), CommandError>) -> EventResponse {
        match result {
            Ok(()) => EventResponse::ok(),
            Err(err) => EventResponse::failed(err),
        }
    }
}

/// Structural events reported by the host's backend observers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutEvent {
    WindowAdded(WindowId),
    WindowRemoved(WindowId),
    WindowFocused(WindowId),
    WindowMinimized(WindowId, bool),
    AppHidden(pid_t, bool),
    MonitorChanged(Monitor),
}

pub struct LayoutEngine {
    workspaces: SlotMap<WorkspaceId, Workspace>,
    active: Option<WorkspaceId>,
    config: EngineConfig,
    driver: ResizeDriver,
}

impl LayoutEngine {
    pub fn new(config: EngineConfig) -> LayoutEngine {
        LayoutEngine {
            workspaces: SlotMap::with_key(),
            active: None,
            config,
            driver: ResizeDriver::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    /// Creates a workspace on the given monitor. The first workspace
    /// becomes active.
    pub fn add_workspace(&mut self, monitor: Monitor) -> WorkspaceId {
        let id = self.workspaces.insert(Workspace::new(monitor, &self.config));
        if self.active.is_none() {
            self.active = Some(id);
        }
        id
    }

    pub fn set_active_workspace(&mut self, id: WorkspaceId) -> bool {
        if self.workspaces.contains_key(id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn active_workspace(&self) -> Option<&Workspace> {
        self.active.and_then(|id| self.workspaces.get(id))
    }

    pub fn active_workspace_mut(&mut self) -> Option<&mut Workspace> {
        self.active.and_then(|id| self.workspaces.get_mut(id))
    }

    pub fn workspace(&self, id: WorkspaceId) -> Option<&Workspace> { self.workspaces.get(id) }

    pub fn workspace_mut(&mut self, id: WorkspaceId) -> Option<&mut Workspace> {
        self.workspaces.get_mut(id)
    }

    /// Applies a structural event to the active workspace. The host should
    /// follow up with a refresh.
    pub fn handle_event(&mut self, session: &mut Session, event: LayoutEvent) {
        let config = self.config.clone();
        let Some(ws) = self.active_workspace_mut() else { return };
        match event {
            LayoutEvent::WindowAdded(wid) => {
                ws.add_window(wid);
                ws.normalize(&config);
            }
            LayoutEvent::WindowRemoved(wid) => {
                ws.remove_window(wid);
                ws.normalize(&config);
                if session.focused == Some(wid) {
                    session.focused = None;
                }
                if session.manipulated == Some(wid) {
                    session.manipulated = None;
                }
            }
            LayoutEvent::WindowFocused(wid) => {
                ws.record_focus(wid);
                session.focused = Some(wid);
            }
            LayoutEvent::WindowMinimized(wid, minimized) => ws.set_minimized(wid, minimized),
            LayoutEvent::AppHidden(pid, hidden) => ws.set_app_hidden(pid, hidden),
            LayoutEvent::MonitorChanged(monitor) => ws.assign_monitor(monitor),
        }
    }

    /// Applies one command against the session. Errors come back as the
    /// response message; engine state is untouched on failure.
    pub async fn apply_command<B: WindowBackend + Clone + 'static>(
        &mut self,
        session: &mut Session,
        backend: &B,
        command: LayoutCommand,
    ) -> EventResponse {
        match command {
            LayoutCommand::Layout(arg) => {
                EventResponse::from_result(self.cmd_layout(session, arg))
            }
            LayoutCommand::Resize { dimension, amount } => {
                let result = match session.focused {
                    None => Err(CommandError::NoWindowFocused),
                    Some(focused) => {
                        let config = self.config.clone();
                        match self.active_workspace_mut() {
                            Some(ws) => {
                                resize::discrete_resize(ws, &config, focused, dimension, amount)
                            }
                            None => Err(CommandError::NoWindowFocused),
                        }
                    }
                };
                EventResponse::from_result(result)
            }
            LayoutCommand::BalanceSizes => {
                self.cmd_balance_sizes();
                EventResponse::ok()
            }
            LayoutCommand::PromoteMaster => {
                EventResponse::from_result(self.cmd_promote_master(session))
            }
            LayoutCommand::Focus(direction) => self.cmd_focus(session, backend, direction).await,
        }
    }

    fn cmd_layout(&mut self, session: &mut Session, arg: LayoutArg) -> Result<(), CommandError> {
        let focused = session.focused.ok_or(CommandError::NoWindowFocused)?;
        let config = self.config.clone();
        let ws = self.active_workspace_mut().ok_or(CommandError::NoWindowFocused)?;

        if matches!(arg, LayoutArg::Tiling | LayoutArg::Floating) {
            let floating = ws.is_floating(focused);
            let wants_floating = arg == LayoutArg::Floating;
            if floating != wants_floating {
                ws.toggle_floating(focused).ok_or(CommandError::NoWindowFocused)?;
                ws.normalize(&config);
            }
            return Ok(());
        }

        if ws.is_floating(focused) {
            return Err(CommandError::NonTiling);
        }
        let node = ws.node_for(focused).ok_or(CommandError::NoWindowFocused)?;
        let parent = ws.tree().parent(node).ok_or(CommandError::NonTiling)?;
        let current = ws.container_kind(parent);

        match arg {
            LayoutArg::Horizontal => ws.set_container_orientation(parent, Orientation::Horizontal),
            LayoutArg::Vertical => ws.set_container_orientation(parent, Orientation::Vertical),
            LayoutArg::Tiles if current == Some(LayoutKind::Tiles) => {}
            LayoutArg::Tiles => ws.set_container_layout(parent, ContainerLayout::Tiles),
            LayoutArg::HTiles | LayoutArg::VTiles => {
                if current != Some(LayoutKind::Tiles) {
                    ws.set_container_layout(parent, ContainerLayout::Tiles);
                }
                let orientation = if arg == LayoutArg::HTiles {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                ws.set_container_orientation(parent, orientation);
            }
            LayoutArg::Accordion if current == Some(LayoutKind::Accordion) => {}
            LayoutArg::Accordion => ws.set_container_layout(parent, ContainerLayout::Accordion),
            LayoutArg::HAccordion | LayoutArg::VAccordion => {
                if current != Some(LayoutKind::Accordion) {
                    ws.set_container_layout(parent, ContainerLayout::Accordion);
                }
                let orientation = if arg == LayoutArg::HAccordion {
                    Orientation::Horizontal
                } else {
                    Orientation::Vertical
                };
                ws.set_container_orientation(parent, orientation);
            }
            LayoutArg::Dwindle if current == Some(LayoutKind::Dwindle) => {}
            LayoutArg::Dwindle => {
                ws.set_container_layout(parent, ContainerLayout::Dwindle(DwindleCache::default()))
            }
            LayoutArg::Scroll if current == Some(LayoutKind::Scroll) => {}
            LayoutArg::Scroll => ws.set_container_layout(parent, ContainerLayout::Scroll),
            LayoutArg::Master | LayoutArg::MasterLeft | LayoutArg::MasterRight => {
                let side = match arg {
                    LayoutArg::MasterRight => MasterSide::Right,
                    _ => MasterSide::Left,
                };
                if let Some(state) = ws.master_state_mut(parent) {
                    // Already a master container: only adjust the side.
                    if arg != LayoutArg::Master {
                        state.side = side;
                    }
                } else {
                    ws.set_container_layout(
                        parent,
                        ContainerLayout::Master(MasterState::new(
                            config.master_default_percent,
                            side,
                        )),
                    );
                }
            }
            LayoutArg::Tiling | LayoutArg::Floating => unreachable!("handled above"),
        }
        Ok(())
    }

    /// Resets every adaptive weight, dwindle split ratio and master
    /// percent to its pristine default. Weights collapse to zero and are
    /// re-spread on the next layout pass.
    fn cmd_balance_sizes(&mut self) {
        let config = self.config.clone();
        let Some(ws) = self.active_workspace_mut() else { return };
        for node in ws.tree.descendants(ws.root()) {
            ws.tree[node].set_weights((0.0, 0.0));
            if let Some(container) = ws.tree[node].as_container_mut() {
                match &mut container.layout {
                    ContainerLayout::Dwindle(cache) => {
                        cache.balance(config.dwindle_default_split_ratio)
                    }
                    ContainerLayout::Master(state) => {
                        state.set_percent(config.master_default_percent)
                    }
                    _ => {}
                }
            }
        }
    }

    fn cmd_promote_master(&mut self, session: &mut Session) -> Result<(), CommandError> {
        let focused = session.focused.ok_or(CommandError::NoWindowFocused)?;
        let ws = self.active_workspace_mut().ok_or(CommandError::NoWindowFocused)?;
        let node = ws.node_for(focused).ok_or(CommandError::NoWindowFocused)?;
        let parent = ws.tree().parent(node).ok_or(CommandError::NotMasterLayout)?;
        if ws.container_kind(parent) != Some(LayoutKind::Master) {
            return Err(CommandError::NotMasterLayout);
        }
        let index = ws.tree().index_in_parent(node).unwrap_or(0);
        if index == 0 {
            return Err(CommandError::AlreadyMaster);
        }
        let first = ws.tree().children(parent)[0];
        if !ws.swap_nodes(node, first) {
            warn!(?focused, "promote-master swap failed; tree left unchanged");
        }
        Ok(())
    }

    async fn cmd_focus<B: WindowBackend>(
        &mut self,
        session: &mut Session,
        backend: &B,
        direction: Direction,
    ) -> EventResponse {
        let Some(focused) = session.focused else {
            return EventResponse::failed(CommandError::NoWindowFocused);
        };
        let inner_gap = self.config.gaps.inner.along(direction.orientation());
        let Some(ws) = self.active_workspace_mut() else {
            return EventResponse::failed(CommandError::NoWindowFocused);
        };
        if ws.is_floating(focused) {
            return EventResponse::ok();
        }
        let Some(node) = ws.node_for(focused) else {
            return EventResponse::failed(CommandError::NoWindowFocused);
        };
        let Some(parent) = ws.tree().parent(node) else {
            return EventResponse::ok();
        };
        let kind = ws.container_kind(parent).unwrap_or(LayoutKind::Tiles);

        let neighbor = match navigation::provider_for(kind) {
            None => None,
            Some(NavigationProvider::Tree) => navigation::tree_neighbor(ws, focused, direction),
            Some(NavigationProvider::Geometric) => {
                let windows: Vec<WindowId> = match ws.dwindle_cache_mut(parent) {
                    Some(cache) => cache.leaf_frames().map(|(wid, _)| wid).collect(),
                    None => Vec::new(),
                };
                // Tolerate windows moved outside the layout system: refresh
                // the cached frames from the backend before searching.
                let frames = navigation::sync_geometry(backend, &windows).await;
                let Some(ws) = self.active_workspace_mut() else {
                    return EventResponse::ok();
                };
                match ws.dwindle_cache_mut(parent) {
                    Some(cache) => {
                        for (wid, frame) in frames {
                            cache.set_leaf_frame(wid, frame);
                        }
                        navigation::geometric_neighbor(cache, focused, direction, inner_gap)
                    }
                    None => None,
                }
            }
        };

        match neighbor {
            Some(next) => {
                if let Some(ws) = self.active_workspace_mut() {
                    ws.record_focus(next);
                }
                session.focused = Some(next);
                if let Err(err) = backend.focus(next).await {
                    debug!(?next, %err, "backend focus call failed");
                }
                EventResponse { handled: true, message: None, focus_window: Some(next) }
            }
            // Silent no-op at the boundary.
            None => EventResponse::ok(),
        }
    }

    /// Full refresh pass: waits out any pending pointer-resize task, then
    /// recomputes the active workspace and pushes every rect to the
    /// backend, leaving the pointer-manipulated window alone. Backend
    /// failures are absorbed; the next refresh re-synchronises.
    pub async fn refresh<B: WindowBackend>(&mut self, session: &Session, backend: &B) {
        self.driver.settle().await;
        let Some(id) = self.active else { return };
        let ctx = LayoutContext { config: &self.config, manipulated: session.manipulated };
        let Some(ws) = self.workspaces.get_mut(id) else { return };
        let frames = calculate_layout(ws, &ctx);
        for (wid, frame) in frames {
            if session.manipulated == Some(wid) {
                continue;
            }
            if let Err(err) = backend.set_frame(wid, frame).await {
                debug!(?wid, %err, "set_frame failed; will repair on next refresh");
            }
        }
    }

    /// Computes the active workspace's layout without pushing it.
    pub fn peek_layout(&mut self, session: &Session) -> Vec<(WindowId, Rect)> {
        let Some(id) = self.active else { return Vec::new() };
        let ctx = LayoutContext { config: &self.config, manipulated: session.manipulated };
        let Some(ws) = self.workspaces.get_mut(id) else { return Vec::new() };
        calculate_layout(ws, &ctx)
    }

    /// Entry point for backend window-resized notifications (the pointer
    /// drag path). Returns whether the event was accepted.
    pub async fn on_pointer_resize<B: WindowBackend + Clone + 'static>(
        &mut self,
        session: &mut Session,
        backend: &B,
        wid: WindowId,
        frame: Rect,
    ) -> bool {
        let Some(id) = self.active else { return false };
        let Some(ws) = self.workspaces.get_mut(id) else { return false };
        resize::pointer_resize(ws, &mut self.driver, session, &self.config, backend, wid, frame)
            .await
    }

    /// Entry point for the end of a pointer drag.
    pub async fn end_pointer_drag<B: WindowBackend + Clone + 'static>(
        &mut self,
        session: &mut Session,
        backend: &B,
    ) {
        if let Some(id) = self.active {
            if let Some(ws) = self.workspaces.get_mut(id) {
                resize::end_pointer_drag(ws, &mut self.driver, session).await;
            }
        }
        self.refresh(session, backend).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::backend::testing::StubBackend;

    fn w(idx: u32) -> WindowId { WindowId::new(1, idx) }

    fn engine_with_windows(count: u32) -> (LayoutEngine, Session) {
        let mut engine = LayoutEngine::new(EngineConfig::default());
        engine.add_workspace(Monitor::new(Rect::from_parts(0.0, 0.0, 1000.0, 600.0)));
        let mut session = Session::default();
        for idx in 1..=count {
            engine.handle_event(&mut session, LayoutEvent::WindowAdded(w(idx)));
        }
        if count > 0 {
            engine.handle_event(&mut session, LayoutEvent::WindowFocused(w(1)));
        }
        (engine, session)
    }

    #[tokio::test]
    async fn commands_without_focus_report_the_error() {
        let (mut engine, mut session) = engine_with_windows(0);
        let backend = StubBackend::default();
        let response = engine
            .apply_command(&mut session, &backend, LayoutCommand::Layout(LayoutArg::Dwindle))
            .await;
        assert!(!response.handled);
        assert_eq!(response.message.as_deref(), Some("no-window-focused"));
    }

    #[tokio::test]
    async fn layout_command_switches_layout_and_orientation() {
        let (mut engine, mut session) = engine_with_windows(2);
        let backend = StubBackend::default();
        let response = engine
            .apply_command(&mut session, &backend, LayoutCommand::Layout(LayoutArg::VTiles))
            .await;
        assert!(response.handled);
        let ws = engine.active_workspace().unwrap();
        let root = ws.root();
        assert_eq!(ws.container_kind(root), Some(LayoutKind::Tiles));
        assert_eq!(
            ws.tree()[root].as_container().unwrap().orientation,
            Orientation::Vertical
        );

        let response = engine
            .apply_command(&mut session, &backend, LayoutCommand::Layout(LayoutArg::Scroll))
            .await;
        assert!(response.handled);
        let ws = engine.active_workspace().unwrap();
        // Scroll containers are pinned to horizontal.
        assert_eq!(
            ws.tree()[ws.root()].as_container().unwrap().orientation,
            Orientation::Horizontal
        );
    }

    #[tokio::test]
    async fn floating_window_cannot_change_layout() {
        let (mut engine, mut session) = engine_with_windows(2);
        let backend = StubBackend::default();
        engine
            .apply_command(&mut session, &backend, LayoutCommand::Layout(LayoutArg::Floating))
            .await;
        assert!(engine.active_workspace().unwrap().is_floating(w(1)));
        let response = engine
            .apply_command(&mut session, &backend, LayoutCommand::Layout(LayoutArg::Dwindle))
            .await;
        assert_eq!(response.message.as_deref(), Some("non-tiling"));
        // And back to tiling.
        engine
            .apply_command(&mut session, &backend, LayoutCommand::Layout(LayoutArg::Tiling))
            .await;
        assert!(!engine.active_workspace().unwrap().is_floating(w(1)));
    }

    #[tokio::test]
    async fn promote_master_swaps_and_double_promote_is_identity() {
        let (mut engine, mut session) = engine_with_windows(3);
        let backend = StubBackend::default();
        engine
            .apply_command(&mut session, &backend, LayoutCommand::Layout(LayoutArg::Master))
            .await;
        engine.handle_event(&mut session, LayoutEvent::WindowFocused(w(3)));

        let response =
            engine.apply_command(&mut session, &backend, LayoutCommand::PromoteMaster).await;
        assert!(response.handled);
        let order = engine.active_workspace().unwrap().all_tiled_windows();
        assert_eq!(order[0], w(3));

        // The promoted window is now at index 0.
        let response =
            engine.apply_command(&mut session, &backend, LayoutCommand::PromoteMaster).await;
        assert_eq!(response.message.as_deref(), Some("already-master"));

        // Re-focus the demoted window and promote again: original order.
        engine.handle_event(&mut session, LayoutEvent::WindowFocused(w(1)));
        engine.apply_command(&mut session, &backend, LayoutCommand::PromoteMaster).await;
        let order = engine.active_workspace().unwrap().all_tiled_windows();
        assert_eq!(order[0], w(1));
        assert_eq!(order[2], w(3));
    }

    #[tokio::test]
    async fn promote_master_outside_master_layout_is_rejected() {
        let (mut engine, mut session) = engine_with_windows(2);
        let backend = StubBackend::default();
        let response =
            engine.apply_command(&mut session, &backend, LayoutCommand::PromoteMaster).await;
        assert_eq!(response.message.as_deref(), Some("not-master-layout"));
    }

    #[tokio::test]
    async fn balance_sizes_restores_pristine_layout() {
        let (mut engine, mut session) = engine_with_windows(3);
        let backend = StubBackend::default();
        let pristine = engine.peek_layout(&session);

        engine
            .apply_command(&mut session, &backend, LayoutCommand::Resize {
                dimension: ResizeDimension::Width,
                amount: ResizeAmount::Add(120.0),
            })
            .await;
        let skewed = engine.peek_layout(&session);
        assert_ne!(pristine, skewed);

        engine.apply_command(&mut session, &backend, LayoutCommand::BalanceSizes).await;
        let balanced = engine.peek_layout(&session);
        assert_eq!(pristine, balanced);
    }

    #[tokio::test]
    async fn focus_moves_spatially_and_stops_at_the_boundary() {
        let (mut engine, mut session) = engine_with_windows(3);
        let backend = StubBackend::default();
        let response = engine
            .apply_command(&mut session, &backend, LayoutCommand::Focus(Direction::Right))
            .await;
        assert_eq!(response.focus_window, Some(w(2)));
        assert_eq!(session.focused, Some(w(2)));
        assert_eq!(backend.focused(), Some(w(2)));

        // At the left boundary from w1: silent no-op.
        engine.handle_event(&mut session, LayoutEvent::WindowFocused(w(1)));
        let response = engine
            .apply_command(&mut session, &backend, LayoutCommand::Focus(Direction::Left))
            .await;
        assert!(response.handled);
        assert_eq!(response.focus_window, None);
        assert_eq!(session.focused, Some(w(1)));
    }

    #[tokio::test]
    async fn geometric_focus_uses_backend_geometry() {
        let (mut engine, mut session) = engine_with_windows(2);
        let backend = StubBackend::default();
        engine
            .apply_command(&mut session, &backend, LayoutCommand::Layout(LayoutArg::Dwindle))
            .await;
        engine.refresh(&session, &backend).await;

        let response = engine
            .apply_command(&mut session, &backend, LayoutCommand::Focus(Direction::Right))
            .await;
        assert_eq!(response.focus_window, Some(w(2)));
    }

    #[tokio::test]
    async fn refresh_pushes_frames_and_absorbs_backend_failures() {
        let (mut engine, session) = engine_with_windows(2);
        let backend = StubBackend::default();
        engine.refresh(&session, &backend).await;
        assert_eq!(backend.set_calls().len(), 2);
        assert_eq!(
            backend.rect_of(w(1)),
            Some(Rect::from_parts(0.0, 0.0, 500.0, 600.0))
        );

        // An unavailable backend never panics the engine.
        backend.make_unavailable();
        engine.refresh(&session, &backend).await;
    }

    #[tokio::test]
    async fn refresh_skips_the_manipulated_window() {
        let (mut engine, mut session) = engine_with_windows(2);
        let backend = StubBackend::default();
        session.manipulated = Some(w(1));
        engine.refresh(&session, &backend).await;
        assert!(backend.set_calls().iter().all(|(wid, _)| *wid != w(1)));
        session.manipulated = None;
    }

    #[tokio::test]
    async fn removed_window_releases_focus_and_manipulation() {
        let (mut engine, mut session) = engine_with_windows(2);
        session.manipulated = Some(w(1));
        engine.handle_event(&mut session, LayoutEvent::WindowRemoved(w(1)));
        assert_eq!(session.focused, None);
        assert_eq!(session.manipulated, None);
        assert_eq!(engine.active_workspace().unwrap().all_tiled_windows(), vec![w(2)]);
    }
}
