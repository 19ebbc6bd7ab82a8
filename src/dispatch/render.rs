use crate::menu::{ComponentGrid, Icon};
use crate::session::{SurfaceId, ViewerId};

/// The host side that paints surfaces.
///
/// Calls are synchronous and assumed to succeed; failures are the host's concern.
/// Implementations must not call back into the dispatcher.
pub trait Renderer {
    /// Create and show a surface for `viewer`.
    fn show(&mut self, viewer: ViewerId, surface: SurfaceId, title: &str, size: usize);

    /// Repaint one slot. `None` paints it empty.
    fn render_slot(&mut self, surface: SurfaceId, index: usize, display: Option<&Icon>);

    fn render_full(&mut self, surface: SurfaceId, grid: &ComponentGrid);

    /// Close a surface the engine closed on its own.
    fn dismiss(&mut self, viewer: ViewerId, surface: SurfaceId);
}

impl<'a, R: Renderer + ?Sized> Renderer for &'a mut R {
    fn show(&mut self, viewer: ViewerId, surface: SurfaceId, title: &str, size: usize) {
        (**self).show(viewer, surface, title, size)
    }

    fn render_slot(&mut self, surface: SurfaceId, index: usize, display: Option<&Icon>) {
        (**self).render_slot(surface, index, display)
    }

    fn render_full(&mut self, surface: SurfaceId, grid: &ComponentGrid) {
        (**self).render_full(surface, grid)
    }

    fn dismiss(&mut self, viewer: ViewerId, surface: SurfaceId) {
        (**self).dismiss(viewer, surface)
    }
}
