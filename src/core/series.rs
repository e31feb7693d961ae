use serde::{Deserialize, Serialize};

use crate::core::DataPoint;
use crate::render::Color;

/// Sub-chart family a series is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    #[default]
    Line,
    Bar,
    Area,
}

/// Y-axis assignment. Serialized as `1` (left) or `2` (right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum YAxis {
    #[default]
    Primary,
    Secondary,
}

impl YAxis {
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Primary => 1,
            Self::Secondary => 2,
        }
    }
}

impl TryFrom<u8> for YAxis {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Primary),
            2 => Ok(Self::Secondary),
            other => Err(format!("yAxis must be 1 or 2, got {other}")),
        }
    }
}

impl From<YAxis> for u8 {
    fn from(value: YAxis) -> Self {
        value.number()
    }
}

/// One named dataset of the composite chart plus its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub key: String,
    #[serde(default)]
    pub values: Vec<DataPoint>,
    #[serde(rename = "type", default)]
    pub kind: SeriesKind,
    #[serde(rename = "yAxis", default)]
    pub y_axis: YAxis,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Series {
    #[must_use]
    pub fn new(key: impl Into<String>, kind: SeriesKind, y_axis: YAxis) -> Self {
        Self {
            key: key.into(),
            values: Vec::new(),
            kind,
            y_axis,
            disabled: false,
            color: None,
        }
    }

    #[must_use]
    pub fn with_values(mut self, values: Vec<DataPoint>) -> Self {
        self.values = values;
        self
    }

    #[must_use]
    pub fn with_points(self, points: &[(f64, f64)]) -> Self {
        self.with_values(points.iter().map(|&(x, y)| DataPoint::new(x, y)).collect())
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Label shown by the composite legend.
    ///
    /// Right-axis series are suffixed so both axes can carry equal keys.
    #[must_use]
    pub fn display_key(&self) -> String {
        match self.y_axis {
            YAxis::Primary => self.key.clone(),
            YAxis::Secondary => format!("{} (right axis)", self.key),
        }
    }

    #[must_use]
    pub fn matches(&self, y_axis: YAxis, kind: SeriesKind) -> bool {
        self.y_axis == y_axis && self.kind == kind
    }
}

/// One pie slice record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieDatum {
    #[serde(alias = "key", alias = "x")]
    pub label: String,
    #[serde(alias = "y")]
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default)]
    pub disabled: bool,
}

impl PieDatum {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            color: None,
            disabled: false,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Series, SeriesKind, YAxis};

    #[test]
    fn right_axis_series_display_key_is_suffixed() {
        let left = Series::new("Revenue", SeriesKind::Bar, YAxis::Primary);
        let right = Series::new("Revenue", SeriesKind::Line, YAxis::Secondary);
        assert_eq!(left.display_key(), "Revenue");
        assert_eq!(right.display_key(), "Revenue (right axis)");
        assert_eq!(right.key, "Revenue");
    }

    #[test]
    fn series_deserializes_camel_case_field_names() {
        let json = r#"{"key":"a","type":"area","yAxis":2,"values":[{"x":0,"y":1.5}]}"#;
        let series: Series = serde_json::from_str(json).expect("parse series");
        assert_eq!(series.kind, SeriesKind::Area);
        assert_eq!(series.y_axis, YAxis::Secondary);
        assert!(series.is_enabled());
        assert_eq!(series.values.len(), 1);
    }

    #[test]
    fn unknown_axis_number_is_rejected() {
        let json = r#"{"key":"a","type":"line","yAxis":3,"values":[]}"#;
        assert!(serde_json::from_str::<Series>(json).is_err());
    }
}
