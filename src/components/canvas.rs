use crate::render::{
    Color, LinePrimitive, PolygonPrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

/// Frame writer for one sub-renderer.
///
/// Sub-renderers draw in their own coordinates; the canvas shifts every
/// primitive by `origin` into container coordinates.
#[derive(Debug)]
pub struct LocalCanvas<'a> {
    frame: &'a mut RenderFrame,
    origin: (f64, f64),
}

impl<'a> LocalCanvas<'a> {
    pub fn new(frame: &'a mut RenderFrame, origin: (f64, f64)) -> Self {
        Self { frame, origin }
    }

    #[must_use]
    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    /// Canvas for a nested group placed at `offset` inside this one.
    pub fn nested(&mut self, offset: (f64, f64)) -> LocalCanvas<'_> {
        LocalCanvas {
            origin: (self.origin.0 + offset.0, self.origin.1 + offset.1),
            frame: &mut *self.frame,
        }
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), stroke_width: f64, color: Color) {
        let (ox, oy) = self.origin;
        self.frame.lines.push(LinePrimitive::new(
            from.0 + ox,
            from.1 + oy,
            to.0 + ox,
            to.1 + oy,
            stroke_width,
            color,
        ));
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke_width: f64, color: Color) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], stroke_width, color);
        }
    }

    pub fn rect(&mut self, rect: RectPrimitive) {
        let (ox, oy) = self.origin;
        self.frame.rects.push(RectPrimitive {
            x: rect.x + ox,
            y: rect.y + oy,
            ..rect
        });
    }

    pub fn polygon(&mut self, points: &[(f64, f64)], fill_color: Color) {
        let (ox, oy) = self.origin;
        self.frame.polygons.push(PolygonPrimitive::new(
            points.iter().map(|&(x, y)| (x + ox, y + oy)).collect(),
            fill_color,
        ));
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        at: (f64, f64),
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        let (ox, oy) = self.origin;
        self.frame.texts.push(TextPrimitive::new(
            text,
            at.0 + ox,
            at.1 + oy,
            font_size_px,
            color,
            h_align,
        ));
    }
}

/// Vertices approximating a circle, for point markers and legend bullets.
#[must_use]
pub fn circle_points(center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
    const SEGMENTS: usize = 16;
    (0..SEGMENTS)
        .map(|index| {
            let angle = std::f64::consts::TAU * index as f64 / SEGMENTS as f64;
            (
                center.0 + radius * angle.cos(),
                center.1 + radius * angle.sin(),
            )
        })
        .collect()
}
