use serde::{Deserialize, Serialize};

/// Pixel size of the drawing surface a chart renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Outer spacing between the container edge and the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
            && self.left.is_finite()
    }
}

/// Partial margin update; unset sides keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarginPatch {
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
    #[serde(default)]
    pub left: Option<f64>,
}

impl Margin {
    #[must_use]
    pub fn patched(self, patch: MarginPatch) -> Self {
        Self {
            top: patch.top.unwrap_or(self.top),
            right: patch.right.unwrap_or(self.right),
            bottom: patch.bottom.unwrap_or(self.bottom),
            left: patch.left.unwrap_or(self.left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Margin, MarginPatch, Viewport};

    #[test]
    fn zero_sized_viewport_is_invalid() {
        assert!(Viewport::new(960, 400).is_valid());
        assert!(!Viewport::new(0, 400).is_valid());
        assert!(!Viewport::new(960, 0).is_valid());
    }

    #[test]
    fn margin_patch_keeps_unset_sides() {
        let margin = Margin::new(30.0, 20.0, 50.0, 60.0).patched(MarginPatch {
            bottom: Some(80.0),
            ..MarginPatch::default()
        });
        assert_eq!(margin, Margin::new(30.0, 20.0, 80.0, 60.0));
    }
}
