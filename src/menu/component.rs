use std::fmt;
use std::rc::Rc;

use crate::dispatch::Ticket;
use crate::session::{MenuId, SurfaceId, ViewerId};
use super::pagination::{PaginatedSection, Pager, Section, SectionHandle, SectionId};
use super::{ComponentGrid, Icon, Menu};

pub type ClickCallback = Rc<dyn Fn(&mut ClickContext) -> ComponentAction>;

/// The engine's view of a click. Host click kinds are mapped with [`ClickKind::from_host`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClickKind {
    Left,
    Right,
    Shift,
    Other,
}

impl ClickKind {
    /// Maps a host click type name. Unknown names yield `None` and the click is ignored.
    pub fn from_host(kind: &str) -> Option<ClickKind> {
        match kind {
            "LEFT" => Some(ClickKind::Left),
            "RIGHT" => Some(ClickKind::Right),
            "SHIFT_LEFT" | "SHIFT_RIGHT" => Some(ClickKind::Shift),
            "MIDDLE" | "DROP" | "CONTROL_DROP" | "NUMBER_KEY" | "DOUBLE_CLICK" | "SWAP_OFFHAND"
            | "CREATIVE" | "WINDOW_BORDER_LEFT" | "WINDOW_BORDER_RIGHT" | "UNKNOWN" => Some(ClickKind::Other),
            _ => None,
        }
    }
}

/// What the dispatcher should do after a click callback returns.
#[must_use]
pub enum ComponentAction {
    None,
    CloseMenu,
    /// Close the current menu, then open this one.
    OpenMenu(Box<Menu>),
    /// Like `OpenMenu`, for a menu that already lives in the store.
    OpenExisting(MenuId),
    NavigateBack,
    /// Send every dirty slot to the renderer.
    Refresh,
}

impl fmt::Debug for ComponentAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ComponentAction::None => f.write_str("None"),
            ComponentAction::CloseMenu => f.write_str("CloseMenu"),
            ComponentAction::OpenMenu(ref menu) => write!(f, "OpenMenu({:?})", menu.title()),
            ComponentAction::OpenExisting(id) => write!(f, "OpenExisting({})", id),
            ComponentAction::NavigateBack => f.write_str("NavigateBack"),
            ComponentAction::Refresh => f.write_str("Refresh"),
        }
    }
}

/// One slot's content: an icon and an optional click callback.
///
/// Components are never edited in place; rebind a new one to change a slot.
#[derive(Clone)]
pub struct SlotComponent {
    display: Icon,
    on_click: Option<ClickCallback>,
    cancel_default_action: bool,
    silent: bool,
}

impl SlotComponent {
    /// An inert component that only shows `display`.
    pub fn new(display: Icon) -> Self {
        SlotComponent {
            display,
            on_click: None,
            cancel_default_action: true,
            silent: false,
        }
    }

    pub fn button<F>(display: Icon, on_click: F) -> Self
        where F: Fn(&mut ClickContext) -> ComponentAction + 'static
    {
        SlotComponent::new(display).on_click(on_click)
    }

    pub fn on_click<F>(mut self, on_click: F) -> Self
        where F: Fn(&mut ClickContext) -> ComponentAction + 'static
    {
        self.on_click = Some(Rc::new(on_click));
        self
    }

    /// Lets the host perform its default action, e.g. picking the item up.
    pub fn movable(mut self) -> Self {
        self.cancel_default_action = false;
        self
    }

    /// Suppresses the host's click feedback.
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    pub fn display(&self) -> &Icon {
        &self.display
    }

    pub fn cancels_default_action(&self) -> bool {
        self.cancel_default_action
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn is_clickable(&self) -> bool {
        self.on_click.is_some()
    }

    pub(crate) fn callback(&self) -> Option<ClickCallback> {
        self.on_click.clone()
    }
}

impl fmt::Debug for SlotComponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SlotComponent")
            .field("display", &self.display)
            .field("clickable", &self.on_click.is_some())
            .field("cancel_default_action", &self.cancel_default_action)
            .field("silent", &self.silent)
            .finish()
    }
}

/// Passed to click callbacks. Gives access to the clicked menu only, never
/// to the dispatcher, so callbacks cannot re-enter it.
pub struct ClickContext<'a> {
    ticket: Ticket,
    kind: ClickKind,
    slot: usize,
    menu: &'a mut Menu,
}

impl<'a> ClickContext<'a> {
    pub(crate) fn new(ticket: Ticket, kind: ClickKind, slot: usize, menu: &'a mut Menu) -> Self {
        ClickContext { ticket, kind, slot, menu }
    }

    pub fn viewer(&self) -> ViewerId {
        self.ticket.viewer
    }

    pub fn kind(&self) -> ClickKind {
        self.kind
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn menu_id(&self) -> MenuId {
        self.ticket.menu
    }

    pub fn surface(&self) -> SurfaceId {
        self.ticket.surface
    }

    /// Handle for finishing work later through [`Dispatcher::resume`](crate::Dispatcher::resume).
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn menu(&self) -> &Menu {
        self.menu
    }

    pub fn menu_mut(&mut self) -> &mut Menu {
        self.menu
    }

    pub fn grid_mut(&mut self) -> &mut ComponentGrid {
        self.menu.grid_mut()
    }

    pub fn pager(&mut self, id: SectionId) -> Option<Pager<dyn Section>> {
        self.menu.pager(id)
    }

    pub fn section<T: 'static>(&mut self, handle: SectionHandle<T>) -> Option<Pager<PaginatedSection<T>>> {
        self.menu.section(handle)
    }
}
