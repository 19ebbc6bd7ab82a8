//! Routes host events to menus and executes what their callbacks ask for.
//!
//! Everything here runs on the host's event thread, one event at a time.
//! Callbacks only ever see the menu they belong to, so nothing can call back
//! into the dispatcher while it is in the middle of an event.

use slog::Logger;

use crate::config::DispatcherConfig;
use crate::error::MenuError;
use crate::logging::root_logger;
use crate::menu::{ClickKind, CloseReason, ComponentAction, Menu};
use crate::session::{MenuId, MenuStore, Session, SessionRegistry, SurfaceId, ViewerId};

pub use self::event::{ClickOutcome, RawClickEvent, RawCloseEvent, RawDisconnectEvent, RawDragEvent, Ticket};
pub use self::render::Renderer;

mod event;
mod render;

pub struct Dispatcher<R: Renderer> {
    registry: SessionRegistry,
    store: MenuStore,
    renderer: R,
    config: DispatcherConfig,
    logger: Logger,
    next_surface: u64,
}

impl<R: Renderer> Dispatcher<R> {
    pub fn new(renderer: R, config: DispatcherConfig) -> Self {
        let logger = root_logger().new(o!("module" => "dispatcher"));
        Dispatcher::with_logger(renderer, config, logger)
    }

    pub fn with_logger(renderer: R, config: DispatcherConfig, logger: Logger) -> Self {
        Dispatcher {
            registry: SessionRegistry::init(),
            store: MenuStore::new(),
            renderer,
            config,
            logger,
            next_surface: 1,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Stores a menu for a later [`open`](Dispatcher::open). Once it has been
    /// opened and closed it is dropped unless it is [`pin`](Dispatcher::pin)ned
    /// or still reachable as another open menu's `previous`.
    pub fn insert(&mut self, menu: Menu) -> MenuId {
        self.store.insert(menu)
    }

    pub fn menu(&self, id: MenuId) -> Option<&Menu> {
        self.store.get(id)
    }

    /// Mutate a menu from outside a click; call [`refresh`](Dispatcher::refresh) afterwards
    /// to send the changes to an open surface.
    pub fn menu_mut(&mut self, id: MenuId) -> Option<&mut Menu> {
        self.store.get_mut(id)
    }

    /// Keeps a closed menu in the store until it is unpinned or removed.
    pub fn pin(&mut self, id: MenuId) -> bool {
        self.store.pin(id)
    }

    pub fn unpin(&mut self, id: MenuId) -> bool {
        let unpinned = self.store.unpin(id);
        self.collect();
        unpinned
    }

    /// Takes a menu out of the store, closing it first if it is open.
    pub fn remove(&mut self, id: MenuId) -> Option<Menu> {
        let viewer = self.store.get(id)?.viewer();
        if let Some(viewer) = viewer {
            if let Some(session) = self.registry.current(viewer) {
                self.close_session(viewer, session, CloseReason::ProgrammaticClose, true);
            }
        }
        self.store.remove(id)
    }

    pub fn current_menu(&self, viewer: ViewerId) -> Option<MenuId> {
        self.registry.current(viewer).map(|s| s.menu)
    }

    pub fn current_session(&self, viewer: ViewerId) -> Option<Session> {
        self.registry.current(viewer)
    }

    /// Opens `menu` for `viewer`, closing whatever the viewer had open first.
    ///
    /// Reopening an unpinned menu after it was closed fails with `UnknownMenu`;
    /// see [`pin`](Dispatcher::pin).
    pub fn open(&mut self, menu: MenuId, viewer: ViewerId) -> Result<SurfaceId, MenuError> {
        let surface = self.focus(menu, viewer)?;
        self.collect();
        Ok(surface)
    }

    /// Inserts `menu` and opens it.
    pub fn open_new(&mut self, menu: Menu, viewer: ViewerId) -> Result<MenuId, MenuError> {
        let id = self.store.insert(menu);
        self.open(id, viewer)?;
        Ok(id)
    }

    /// Closes the viewer's focused menu and dismisses its surface.
    pub fn close(&mut self, viewer: ViewerId) -> bool {
        match self.registry.current(viewer) {
            Some(session) => {
                self.close_session(viewer, session, CloseReason::ProgrammaticClose, true);
                self.collect();
                true
            }
            None => false,
        }
    }

    /// Reopens the focused menu's `previous` menu. Returns `false` when there is none.
    pub fn navigate_back(&mut self, viewer: ViewerId) -> bool {
        let navigated = self.back(viewer);
        self.collect();
        navigated
    }

    /// Sends every dirty slot of the viewer's focused menu to the renderer.
    pub fn refresh(&mut self, viewer: ViewerId) -> usize {
        match self.registry.current(viewer) {
            Some(session) => self.flush(session),
            None => 0,
        }
    }

    pub fn handle_click(&mut self, event: &RawClickEvent) -> ClickOutcome {
        let kind = match ClickKind::from_host(&event.click_kind) {
            Some(kind) => kind,
            None => {
                debug!(self.logger, "ignoring unrecognized click kind {:?}", event.click_kind;
                    "viewer" => event.viewer.raw());
                return ClickOutcome::Ignored;
            }
        };
        let session = match self.live_session(event.viewer, event.surface, "click") {
            Some(session) => session,
            None => return ClickOutcome::Ignored,
        };
        if event.raw_slot > self.config.max_raw_slot {
            warn!(self.logger, "dropping click on implausible slot {}", event.raw_slot;
                "viewer" => event.viewer.raw(), "surface" => event.surface.raw());
            return ClickOutcome::Ignored;
        }
        let ticket = Ticket { viewer: event.viewer, menu: session.menu, surface: session.surface };
        let default_cancel = self.config.cancel_unmapped_clicks;
        let (outcome, action) = {
            let menu = match self.store.get_mut(session.menu) {
                Some(menu) => menu,
                None => return ClickOutcome::Ignored,
            };
            let policy = menu.policy();
            let cancel_unmapped = policy.cancel_unmapped.unwrap_or(default_cancel);
            if event.raw_slot < 0 {
                return ClickOutcome::Handled { cancel_default: cancel_unmapped, feedback: false };
            }
            if event.is_transfer(kind) {
                debug!(self.logger, "cancelling item transfer on slot {}", event.raw_slot;
                    "viewer" => event.viewer.raw());
                return ClickOutcome::Handled { cancel_default: true, feedback: false };
            }
            let slot = event.raw_slot as usize;
            if slot >= menu.size() {
                return ClickOutcome::Handled { cancel_default: policy.lock_player_inventory, feedback: false };
            }
            let outcome = match menu.grid().component_at(slot) {
                Some(component) => ClickOutcome::Handled {
                    cancel_default: component.cancels_default_action(),
                    feedback: component.is_clickable() && !component.is_silent(),
                },
                None => ClickOutcome::Handled { cancel_default: cancel_unmapped, feedback: false },
            };
            (outcome, menu.click(ticket, kind, slot))
        };
        if let Some(action) = action {
            self.apply(ticket, action);
        }
        if self.config.flush_after_click {
            if let Some(session) = self.registry.current(event.viewer) {
                self.flush(session);
            }
        }
        self.collect();
        outcome
    }

    pub fn handle_close(&mut self, event: &RawCloseEvent) {
        if let Some(session) = self.live_session(event.viewer, event.surface, "close") {
            self.close_session(event.viewer, session, event.close_reason(), false);
            self.collect();
        }
    }

    pub fn handle_disconnect(&mut self, event: &RawDisconnectEvent) {
        if let Some(session) = self.registry.current(event.viewer) {
            self.close_session(event.viewer, session, CloseReason::ViewerDisconnected, false);
            self.collect();
        }
    }

    /// Drags touching any menu slot are cancelled.
    pub fn handle_drag(&mut self, event: &RawDragEvent) -> ClickOutcome {
        let session = match self.live_session(event.viewer, event.surface, "drag") {
            Some(session) => session,
            None => return ClickOutcome::Ignored,
        };
        let menu = match self.store.get(session.menu) {
            Some(menu) => menu,
            None => return ClickOutcome::Ignored,
        };
        let size = menu.size();
        let touches_menu = event.raw_slots.iter().any(|&s| s >= 0 && (s as usize) < size);
        ClickOutcome::Handled {
            cancel_default: touches_menu || menu.policy().lock_player_inventory,
            feedback: false,
        }
    }

    /// Finishes deferred work, unless the ticket's menu has been closed or replaced since.
    pub fn resume<F>(&mut self, ticket: Ticket, work: F) -> bool
        where F: FnOnce(&mut Menu) -> ComponentAction
    {
        if !self.is_current(ticket) {
            debug!(self.logger, "discarding deferred work for {}", ticket.menu; "viewer" => ticket.viewer.raw());
            return false;
        }
        let action = match self.store.get_mut(ticket.menu) {
            Some(menu) => work(menu),
            None => return false,
        };
        self.apply(ticket, action);
        self.collect();
        true
    }

    /// Closes every focused menu and empties the registry and the store.
    pub fn shutdown(&mut self) {
        let sessions = self.registry.clear();
        info!(self.logger, "shutting down"; "open_menus" => sessions.len());
        for (viewer, session) in sessions {
            if let Some(menu) = self.store.get_mut(session.menu) {
                menu.close(viewer, CloseReason::ProgrammaticClose);
            }
            self.renderer.dismiss(viewer, session.surface);
        }
        self.store.clear();
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.registry.current(ticket.viewer) == Some(Session { menu: ticket.menu, surface: ticket.surface })
    }

    /// The viewer's session, if `surface` is the one it is shown on.
    fn live_session(&self, viewer: ViewerId, surface: SurfaceId, what: &str) -> Option<Session> {
        match self.registry.current(viewer) {
            Some(session) if session.surface == surface => Some(session),
            Some(session) => {
                debug!(self.logger, "ignoring stale {} event", what;
                    "viewer" => viewer.raw(), "surface" => surface.raw(), "focused_surface" => session.surface.raw());
                None
            }
            None => {
                debug!(self.logger, "ignoring {} event without a focused menu", what;
                    "viewer" => viewer.raw(), "surface" => surface.raw());
                None
            }
        }
    }

    fn apply(&mut self, ticket: Ticket, action: ComponentAction) {
        if !self.is_current(ticket) {
            debug!(self.logger, "discarding {:?} from replaced {}", action, ticket.menu;
                "viewer" => ticket.viewer.raw());
            return;
        }
        let session = Session { menu: ticket.menu, surface: ticket.surface };
        match action {
            ComponentAction::None => {}
            ComponentAction::CloseMenu => {
                self.close_session(ticket.viewer, session, CloseReason::ProgrammaticClose, true);
            }
            ComponentAction::OpenMenu(menu) => {
                let id = self.store.insert(*menu);
                if let Err(e) = self.focus(id, ticket.viewer) {
                    warn!(self.logger, "could not open menu: {}", e; "viewer" => ticket.viewer.raw());
                    self.store.remove(id);
                }
            }
            ComponentAction::OpenExisting(id) => {
                if let Err(e) = self.focus(id, ticket.viewer) {
                    warn!(self.logger, "could not open menu: {}", e; "viewer" => ticket.viewer.raw());
                }
            }
            ComponentAction::NavigateBack => {
                self.back(ticket.viewer);
            }
            ComponentAction::Refresh => {
                self.flush(session);
            }
        }
    }

    fn focus(&mut self, id: MenuId, viewer: ViewerId) -> Result<SurfaceId, MenuError> {
        match self.store.get(id) {
            None => return Err(MenuError::UnknownMenu(id)),
            Some(menu) => match menu.viewer() {
                Some(other) if other != viewer => return Err(MenuError::MenuInUse { menu: id, viewer: other }),
                _ => {}
            },
        }
        let surface = SurfaceId(self.next_surface);
        self.next_surface += 1;

        {
            let store = &mut self.store;
            let logger = &self.logger;
            self.registry.focus(viewer, Session { menu: id, surface }, |old| {
                let closed = store.get_mut(old.menu)
                    .map_or(false, |m| m.close(viewer, CloseReason::ReplacedByNewMenu));
                if closed {
                    info!(logger, "closed {}", old.menu; "viewer" => viewer.raw(), "reason" => "replaced");
                }
                store.retire(old.menu);
            });
        }

        self.store.revive(id);
        let menu = match self.store.get_mut(id) {
            Some(menu) => menu,
            None => return Err(MenuError::UnknownMenu(id)),
        };
        menu.open(viewer, surface);
        self.renderer.show(viewer, surface, menu.title(), menu.size());
        // the full redraw covers anything that was dirty
        menu.grid_mut().dirty_slots();
        self.renderer.render_full(surface, menu.grid());
        info!(self.logger, "opened {}", id;
            "viewer" => viewer.raw(), "surface" => surface.raw(), "title" => menu.title());
        Ok(surface)
    }

    fn back(&mut self, viewer: ViewerId) -> bool {
        let previous = self.registry.current(viewer)
            .and_then(|s| self.store.get(s.menu))
            .and_then(|m| m.previous());
        match previous {
            Some(previous) if self.store.contains(previous) => match self.focus(previous, viewer) {
                Ok(_) => true,
                Err(e) => {
                    warn!(self.logger, "could not navigate back: {}", e; "viewer" => viewer.raw());
                    false
                }
            },
            _ => false,
        }
    }

    fn close_session(&mut self, viewer: ViewerId, session: Session, reason: CloseReason, dismiss: bool) {
        let closed = self.store.get_mut(session.menu).map_or(false, |m| m.close(viewer, reason));
        if closed {
            info!(self.logger, "closed {}", session.menu; "viewer" => viewer.raw(), "reason" => format!("{:?}", reason));
        } else {
            debug!(self.logger, "suppressed duplicate close of {}", session.menu; "viewer" => viewer.raw());
        }
        self.store.retire(session.menu);
        self.registry.release(viewer, session);
        if dismiss {
            self.renderer.dismiss(viewer, session.surface);
        }
    }

    fn flush(&mut self, session: Session) -> usize {
        let menu = match self.store.get_mut(session.menu) {
            Some(menu) => menu,
            None => return 0,
        };
        let dirty = menu.grid_mut().dirty_slots();
        let count = dirty.len();
        for index in dirty {
            self.renderer.render_slot(session.surface, index, menu.grid().component_at(index).map(|c| c.display()));
        }
        count
    }

    fn collect(&mut self) {
        let dropped = self.store.collect(self.registry.iter().map(|(_, s)| s.menu));
        if dropped > 0 {
            debug!(self.logger, "dropped {} closed menus", dropped);
        }
    }
}
