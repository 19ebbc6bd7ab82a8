#[macro_use]
extern crate slog;
extern crate slog_term;
#[macro_use]
extern crate lazy_static;

pub use config::DispatcherConfig;
pub use dispatch::{ClickOutcome, Dispatcher, RawClickEvent, RawCloseEvent, RawDisconnectEvent, RawDragEvent, Renderer, Ticket};
pub use error::MenuError;
pub use menu::{
    ClickContext, ClickKind, ClickPolicy, CloseReason, ComponentAction, ComponentGrid, DirtySlots, Icon, Menu,
    MenuType, NavBoundary, NavControls, PaginatedSection, Pager, Section, SectionHandle, SectionId, SlotComponent,
};
pub use session::{MenuId, MenuStore, Session, SessionRegistry, SurfaceId, ViewerId};

pub mod logging;
mod config;
mod dispatch;
mod error;
mod menu;
mod session;
#[cfg(test)]
mod testing;
