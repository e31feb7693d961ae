use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless chart usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is introduced, and keeps the last accepted frame around for
/// inspection.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub container: Option<Viewport>,
    pub frames_rendered: usize,
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_polygon_count: usize,
    pub last_text_count: usize,
    pub last_frame: Option<RenderFrame>,
}

impl NullRenderer {
    /// Renderer that reports `container` as its surface size.
    #[must_use]
    pub fn with_container(container: Viewport) -> Self {
        Self {
            container: Some(container),
            ..Self::default()
        }
    }
}

impl Renderer for NullRenderer {
    fn container_size(&self) -> Option<Viewport> {
        self.container
    }

    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_line_count = frame.lines.len();
        self.last_rect_count = frame.rects.len();
        self.last_polygon_count = frame.polygons.len();
        self.last_text_count = frame.texts.len();
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
