use crate::interaction::HoverEvent;

/// Pointer-sensitive area recorded while drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Marker found by proximity rather than containment.
    Point { x: f64, y: f64, radius: f64 },
    /// Annular sector; angles run clockwise from twelve o'clock.
    Wedge {
        center: (f64, f64),
        inner_radius: f64,
        outer_radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

impl HitShape {
    #[must_use]
    pub fn contains(self, pos: (f64, f64)) -> bool {
        match self {
            Self::Rect {
                x,
                y,
                width,
                height,
            } => pos.0 >= x && pos.0 <= x + width && pos.1 >= y && pos.1 <= y + height,
            Self::Point { x, y, radius } => distance(pos, (x, y)) <= radius,
            Self::Wedge {
                center,
                inner_radius,
                outer_radius,
                start_angle,
                end_angle,
            } => {
                let radius = distance(pos, center);
                if radius < inner_radius || radius > outer_radius {
                    return false;
                }
                let angle = clockwise_angle(center, pos);
                angle >= start_angle && angle < end_angle
            }
        }
    }
}

/// Angle of `pos` around `center`, clockwise from twelve o'clock in `[0, 2π)`.
#[must_use]
pub fn clockwise_angle(center: (f64, f64), pos: (f64, f64)) -> f64 {
    let angle = (pos.0 - center.0).atan2(center.1 - pos.1);
    if angle < 0.0 {
        angle + std::f64::consts::TAU
    } else {
        angle
    }
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    pub shape: HitShape,
    /// Event reported when the pointer is over this region, in local coordinates.
    pub event: HoverEvent,
}

/// Hit regions of one sub-renderer, in the order they were drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HitLayer {
    regions: Vec<HitRegion>,
}

impl HitLayer {
    pub fn push(&mut self, shape: HitShape, event: HoverEvent) {
        self.regions.push(HitRegion { shape, event });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = &HitRegion> {
        self.regions.iter()
    }

    /// Region under `pos` in local coordinates.
    ///
    /// Areas are matched topmost first (last drawn wins). Point markers are
    /// matched by the smallest distance within their radius.
    #[must_use]
    pub fn hit_test(&self, pos: (f64, f64)) -> Option<&HoverEvent> {
        let mut nearest: Option<(f64, &HoverEvent)> = None;
        for region in self.regions.iter().rev() {
            match region.shape {
                HitShape::Point { x, y, radius } => {
                    let d = distance(pos, (x, y));
                    if d <= radius && nearest.is_none_or(|(best, _)| d < best) {
                        nearest = Some((d, &region.event));
                    }
                }
                shape => {
                    if shape.contains(pos) {
                        return Some(&region.event);
                    }
                }
            }
        }
        nearest.map(|(_, event)| event)
    }
}

#[cfg(test)]
mod tests {
    use super::{HitLayer, HitShape, clockwise_angle};
    use crate::interaction::HoverEvent;
    use crate::render::Color;

    fn event(series_index: usize) -> HoverEvent {
        HoverEvent {
            pos: [0.0, 0.0],
            series_key: format!("s{series_index}"),
            series_index,
            y_axis: None,
            point: None,
            point_index: 0,
            value: 1.0,
            color: Color::rgb(0.0, 0.0, 0.0),
        }
    }

    #[test]
    fn later_rects_shadow_earlier_ones() {
        let mut layer = HitLayer::default();
        let rect = HitShape::Rect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        layer.push(rect, event(0));
        layer.push(rect, event(1));
        assert_eq!(layer.hit_test((5.0, 5.0)).map(|e| e.series_index), Some(1));
        assert!(layer.hit_test((11.0, 5.0)).is_none());
    }

    #[test]
    fn nearest_point_within_radius_wins() {
        let mut layer = HitLayer::default();
        layer.push(
            HitShape::Point {
                x: 0.0,
                y: 0.0,
                radius: 10.0,
            },
            event(0),
        );
        layer.push(
            HitShape::Point {
                x: 8.0,
                y: 0.0,
                radius: 10.0,
            },
            event(1),
        );
        assert_eq!(layer.hit_test((3.0, 0.0)).map(|e| e.series_index), Some(0));
        assert_eq!(layer.hit_test((6.0, 0.0)).map(|e| e.series_index), Some(1));
        assert!(layer.hit_test((30.0, 0.0)).is_none());
    }

    #[test]
    fn angles_run_clockwise_from_top() {
        let center = (0.0, 0.0);
        assert!(clockwise_angle(center, (0.0, -1.0)).abs() <= 1e-12);
        let right = clockwise_angle(center, (1.0, 0.0));
        assert!((right - std::f64::consts::FRAC_PI_2).abs() <= 1e-12);
    }
}
