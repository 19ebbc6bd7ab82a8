use std::fmt;

use crate::dispatch::Ticket;
use crate::error::MenuError;
use crate::session::{MenuId, SurfaceId, ViewerId};

pub use self::component::{ClickCallback, ClickContext, ClickKind, ComponentAction, SlotComponent};
pub use self::grid::{ComponentGrid, DirtySlots};
pub use self::icon::Icon;
pub use self::pagination::{NavBoundary, NavControls, PaginatedSection, Pager, Section, SectionHandle, SectionId};

mod component;
mod grid;
mod icon;
mod pagination;

/// Standard chest layouts, nine slots per row.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MenuType {
    Rows1,
    Rows2,
    Rows3,
    Rows4,
    Rows5,
    Rows6,
}

impl MenuType {
    pub const WIDTH: usize = 9;

    pub fn rows(self) -> usize {
        match self {
            MenuType::Rows1 => 1,
            MenuType::Rows2 => 2,
            MenuType::Rows3 => 3,
            MenuType::Rows4 => 4,
            MenuType::Rows5 => 5,
            MenuType::Rows6 => 6,
        }
    }

    pub fn size(self) -> usize {
        self.rows() * Self::WIDTH
    }

    /// Slot index of a row/column pair, if it lies inside this layout.
    pub fn slot(self, row: usize, column: usize) -> Option<usize> {
        if row < self.rows() && column < Self::WIDTH {
            Some(row * Self::WIDTH + column)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CloseReason {
    ReplacedByNewMenu,
    ViewerDismissed,
    ViewerDisconnected,
    ProgrammaticClose,
}

/// How clicks that reach no callback are treated.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct ClickPolicy {
    /// Cancel clicks on empty slots and outside the window. `None` uses the dispatcher default.
    pub cancel_unmapped: Option<bool>,
    /// Cancel every click in the viewer's own inventory while the menu is open.
    pub lock_player_inventory: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Phase {
    Idle,
    Open { viewer: ViewerId, surface: SurfaceId },
}

pub struct Menu {
    title: String,
    grid: ComponentGrid,
    sections: Vec<Box<dyn Section>>,
    on_open: Option<Box<dyn FnMut(ViewerId)>>,
    on_close: Option<Box<dyn FnMut(ViewerId, CloseReason)>>,
    previous: Option<MenuId>,
    policy: ClickPolicy,
    phase: Phase,
}

impl Menu {
    pub fn new<S: Into<String>>(title: S, size: usize) -> Result<Self, MenuError> {
        Ok(Menu {
            title: title.into(),
            grid: ComponentGrid::new(size)?,
            sections: Vec::new(),
            on_open: None,
            on_close: None,
            previous: None,
            policy: ClickPolicy::default(),
            phase: Phase::Idle,
        })
    }

    pub fn of_type<S: Into<String>>(title: S, menu_type: MenuType) -> Self {
        match Menu::new(title, menu_type.size()) {
            Ok(menu) => menu,
            Err(_) => unreachable!("menu types are never empty"),
        }
    }

    pub fn on_open<F: FnMut(ViewerId) + 'static>(mut self, f: F) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_close<F: FnMut(ViewerId, CloseReason) + 'static>(mut self, f: F) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn with_previous(mut self, previous: MenuId) -> Self {
        self.previous = Some(previous);
        self
    }

    pub fn with_policy(mut self, policy: ClickPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn grid(&self) -> &ComponentGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut ComponentGrid {
        &mut self.grid
    }

    pub fn bind(&mut self, index: usize, component: SlotComponent) -> Result<Option<SlotComponent>, MenuError> {
        self.grid.bind(index, component)
    }

    /// Binds `background(slot)` into every slot that is still empty.
    pub fn fill_background<F>(&mut self, background: F)
        where F: Fn(usize) -> Option<SlotComponent>
    {
        for slot in 0..self.grid.size() {
            if self.grid.is_empty(slot) {
                if let Some(component) = background(slot) {
                    self.grid.replace(slot, Some(component));
                }
            }
        }
    }

    pub fn previous(&self) -> Option<MenuId> {
        self.previous
    }

    pub fn set_previous(&mut self, previous: Option<MenuId>) {
        self.previous = previous;
    }

    pub fn policy(&self) -> ClickPolicy {
        self.policy
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn viewer(&self) -> Option<ViewerId> {
        match self.phase {
            Phase::Open { viewer, .. } => Some(viewer),
            Phase::Idle => None,
        }
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        match self.phase {
            Phase::Open { surface, .. } => Some(surface),
            Phase::Idle => None,
        }
    }

    /// Attaches a paged list and renders its first page.
    ///
    /// Fails with `SlotConflict` if its item or nav slots overlap a section
    /// that is already attached.
    pub fn attach_section<T: 'static>(&mut self, mut section: PaginatedSection<T>) -> Result<SectionHandle<T>, MenuError> {
        for slot in section.claimed_slots() {
            if self.sections.iter().any(|other| other.claims(slot)) {
                return Err(MenuError::SlotConflict { slot });
            }
        }
        let id = SectionId(self.sections.len());
        section.attach(id, &mut self.grid)?;
        self.sections.push(Box::new(section));
        Ok(SectionHandle::new(id))
    }

    pub fn pager(&mut self, id: SectionId) -> Option<Pager<dyn Section>> {
        let section = self.sections.get_mut(id.0)?;
        Some(Pager::new(&mut **section, &mut self.grid))
    }

    pub fn section<T: 'static>(&mut self, handle: SectionHandle<T>) -> Option<Pager<PaginatedSection<T>>> {
        let section = self.sections.get_mut(handle.id().0)?
            .as_any_mut()
            .downcast_mut::<PaginatedSection<T>>()?;
        Some(Pager::new(section, &mut self.grid))
    }

    pub fn sections(&self) -> impl Iterator<Item=&(dyn Section + 'static)> {
        self.sections.iter().map(|s| &**s)
    }

    pub(crate) fn open(&mut self, viewer: ViewerId, surface: SurfaceId) {
        self.phase = Phase::Open { viewer, surface };
        if let Some(ref mut on_open) = self.on_open {
            on_open(viewer);
        }
    }

    /// Returns `false` without firing `on_close` if the menu is not open for `viewer`.
    pub(crate) fn close(&mut self, viewer: ViewerId, reason: CloseReason) -> bool {
        match self.phase {
            Phase::Open { viewer: v, .. } if v == viewer => {
                self.phase = Phase::Idle;
                if let Some(ref mut on_close) = self.on_close {
                    on_close(viewer, reason);
                }
                true
            }
            _ => false,
        }
    }

    /// Runs the click callback bound at `slot`, if any.
    pub(crate) fn click(&mut self, ticket: Ticket, kind: ClickKind, slot: usize) -> Option<ComponentAction> {
        let callback = self.grid.component_at(slot)?.callback()?;
        let mut ctx = ClickContext::new(ticket, kind, slot, self);
        Some(callback(&mut ctx))
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Menu")
            .field("title", &self.title)
            .field("size", &self.grid.size())
            .field("sections", &self.sections.len())
            .field("previous", &self.previous)
            .field("phase", &self.phase)
            .finish()
    }
}
