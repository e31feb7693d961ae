use chart_compose::api::{LegendMode, MarginBox, tick_count};
use chart_compose::components::{LegendAlign, LegendMetrics, LegendRenderer, pie_arcs, toggle_disabled};
use chart_compose::core::Margin;
use proptest::prelude::*;

proptest! {
    #[test]
    fn bottom_legend_margin_never_accumulates(
        bottom in 0.0f64..200.0,
        heights in proptest::collection::vec(0.0f64..120.0, 1..8)
    ) {
        let mut margin = MarginBox::new(Margin { top: 30.0, right: 20.0, bottom, left: 60.0 });
        for height in heights {
            margin = margin.apply_legend_height(LegendMode::Bottom, height);
            prop_assert!((margin.margin.bottom - (bottom + height)).abs() <= 1e-9);
        }
    }

    #[test]
    fn tick_count_never_exceeds_series_length(target in 0.0f64..100.0, longest in 0usize..50) {
        let count = tick_count(target, longest);
        prop_assert!(count <= longest.max(1));
        prop_assert!(count as f64 <= target.max(0.0));
    }

    #[test]
    fn legend_rows_fit_every_item(
        labels in proptest::collection::vec("[a-zA-Z ]{1,16}", 1..12),
        width in 40.0f64..1200.0
    ) {
        let renderer = LegendRenderer::new(LegendMetrics::default(), LegendAlign::Centre);
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let layout = renderer.measure(&refs, width);

        prop_assert_eq!(layout.item_positions.len(), labels.len());
        prop_assert!(layout.items_per_row >= 1);
        let expected_height = 10.0 + layout.rows() as f64 * 20.0;
        prop_assert!((layout.height - expected_height).abs() <= 1e-9);
    }

    #[test]
    fn legend_toggle_never_leaves_everything_disabled(
        disabled in proptest::collection::vec(any::<bool>(), 1..10),
        pick in 0usize..10,
        radio in any::<bool>()
    ) {
        let index = pick % disabled.len();
        let next = toggle_disabled(&disabled, index, radio);
        prop_assert_eq!(next.len(), disabled.len());
        prop_assert!(next.iter().any(|flag| !flag));
    }

    #[test]
    fn pie_arcs_cover_the_circle(values in proptest::collection::vec(0.01f64..1000.0, 1..20)) {
        let arcs = pie_arcs(&values);
        let total: f64 = arcs.iter().map(|arc| arc.fraction()).sum();
        prop_assert!((total - 1.0).abs() <= 1e-9);
        for pair in arcs.windows(2) {
            prop_assert!((pair[0].end_angle - pair[1].start_angle).abs() <= 1e-12);
        }
    }
}
