//! Errors raised synchronously to host code.
//!
//! Only programming mistakes end up here. Stale events and duplicate closes
//! are absorbed by the dispatcher and logged instead.

use thiserror::Error;

use crate::session::{MenuId, ViewerId};

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("slot {index} is out of bounds for a grid of size {size}")]
    OutOfBounds { index: usize, size: usize },

    #[error("menu size must be positive")]
    InvalidSize,

    #[error("page size must be positive")]
    InvalidPageSize,

    #[error("page size {page_size} does not fit into a slot range of length {range_len}")]
    PageSizeExceedsRange { page_size: usize, range_len: usize },

    #[error("slot range {start}..{end} does not fit into a grid of size {size}")]
    SlotRangeOutOfBounds { start: usize, end: usize, size: usize },

    #[error("slot {slot} is already claimed by another section or nav control")]
    SlotConflict { slot: usize },

    #[error("menu {0} is not in the store")]
    UnknownMenu(MenuId),

    #[error("menu {menu} is already open for viewer {viewer}")]
    MenuInUse { menu: MenuId, viewer: ViewerId },

    #[error("invalid dispatcher config: {0}")]
    Config(#[from] toml::de::Error),
}
