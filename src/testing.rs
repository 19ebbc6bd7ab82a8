use slog::Logger;

use crate::dispatch::Renderer;
use crate::menu::{ComponentGrid, Icon};
use crate::session::{SurfaceId, ViewerId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderCall {
    Show { viewer: ViewerId, surface: SurfaceId, title: String, size: usize },
    Slot { surface: SurfaceId, index: usize, material: Option<String> },
    Full { surface: SurfaceId, occupied: usize },
    Dismiss { viewer: ViewerId, surface: SurfaceId },
}

#[derive(Default, Debug)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn take(&mut self) -> Vec<RenderCall> {
        ::std::mem::replace(&mut self.calls, Vec::new())
    }
}

impl Renderer for RecordingRenderer {
    fn show(&mut self, viewer: ViewerId, surface: SurfaceId, title: &str, size: usize) {
        self.calls.push(RenderCall::Show { viewer, surface, title: title.to_string(), size });
    }

    fn render_slot(&mut self, surface: SurfaceId, index: usize, display: Option<&Icon>) {
        let material = display.map(|icon| icon.material().to_string());
        self.calls.push(RenderCall::Slot { surface, index, material });
    }

    fn render_full(&mut self, surface: SurfaceId, grid: &ComponentGrid) {
        self.calls.push(RenderCall::Full { surface, occupied: grid.iter().count() });
    }

    fn dismiss(&mut self, viewer: ViewerId, surface: SurfaceId) {
        self.calls.push(RenderCall::Dismiss { viewer, surface });
    }
}

pub fn test_logger() -> Logger {
    crate::logging::discard_logger()
}
