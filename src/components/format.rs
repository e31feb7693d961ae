//! Number and time label formatting shared by axes, pie labels and tooltips.

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Formatter turning an axis or slice value into label text.
pub type ValueFormatterFn = Arc<dyn Fn(f64) -> String + Send + Sync + 'static>;

/// Fixed-precision decimal with `,` thousands grouping (`1,234.50`).
#[must_use]
pub fn format_grouped(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return "NaN".to_owned();
    }
    let text = format!("{:.precision$}", value.abs());
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3 + 1);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let is_zero = text.chars().all(|ch| ch == '0' || ch == '.');
    if value < 0.0 && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Decimals needed to tell ticks `step` apart.
#[must_use]
pub fn precision_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 {
        return 0;
    }
    let digits = -(step.log10() + 0.01).floor();
    if digits <= 0.0 {
        0
    } else {
        digits.min(20.0) as usize
    }
}

/// Grouped decimal formatter with a fixed precision.
#[must_use]
pub fn grouped_formatter(precision: usize) -> ValueFormatterFn {
    Arc::new(move |value| format_grouped(value, precision))
}

/// Formats values as UTC unix seconds with a `chrono` strftime pattern.
#[must_use]
pub fn utc_time_formatter(pattern: impl Into<String>) -> ValueFormatterFn {
    let pattern = pattern.into();
    Arc::new(move |seconds| {
        if !seconds.is_finite() {
            return "NaN".to_owned();
        }
        let millis = (seconds * 1_000.0).round() as i64;
        match DateTime::<Utc>::from_timestamp_millis(millis) {
            Some(time) => time.format(&pattern).to_string(),
            None => format_grouped(seconds, 0),
        }
    })
}
