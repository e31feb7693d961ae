/// Deterministic, backend-independent label width estimate.
#[must_use]
pub fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' | '(' | ')' => 0.42,
            ' ' => 0.33,
            'i' | 'l' | 'j' | '\'' => 0.28,
            'm' | 'w' | 'M' | 'W' => 0.86,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

#[cfg(test)]
mod tests {
    use super::estimate_label_text_width_px;

    #[test]
    fn estimate_grows_with_text_and_font_size() {
        let short = estimate_label_text_width_px("ab", 12.0);
        let long = estimate_label_text_width_px("abcdef", 12.0);
        assert!(long > short);
        assert!(estimate_label_text_width_px("ab", 24.0) > short);
        assert_eq!(estimate_label_text_width_px("", 12.0), 12.0);
    }
}
