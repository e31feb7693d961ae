use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use chart_compose::api::{
    LegendMode, PieChart, PieChartConfig, TooltipGravity, TooltipPresenter, TooltipRequest,
};
use chart_compose::components::SubChart;
use chart_compose::core::PieDatum;
use chart_compose::events::{ChangeStateRequest, ChartEvent, ChartObserver, ChartState};
use chart_compose::render::NullRenderer;

#[derive(Clone, Default)]
struct SharedPresenter {
    shown: Rc<RefCell<Vec<TooltipRequest>>>,
}

impl TooltipPresenter for SharedPresenter {
    fn show(&mut self, request: &TooltipRequest) {
        self.shown.borrow_mut().push(request.clone());
    }

    fn cleanup(&mut self) {}
}

struct EventLog {
    events: Rc<RefCell<Vec<ChartEvent>>>,
}

impl ChartObserver for EventLog {
    fn id(&self) -> &str {
        "event-log"
    }

    fn on_event(&mut self, event: &ChartEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

fn slices() -> Vec<PieDatum> {
    vec![
        PieDatum::new("One", 5.0),
        PieDatum::new("Two", 2.0),
        PieDatum::new("Three", 9.0),
    ]
}

fn chart(mode: LegendMode) -> PieChart<NullRenderer> {
    let config = PieChartConfig::default().with_legend(mode);
    PieChart::new(NullRenderer::default(), config).expect("pie init")
}

#[test]
fn empty_data_renders_placeholder() {
    let mut pie = chart(LegendMode::Top);
    let summary = pie.render().expect("render");
    assert!(summary.no_data);
    assert!(summary.drawn.is_empty());
    assert!(summary.arcs.is_empty());
    let frame = pie.renderer().last_frame.as_ref().expect("frame");
    assert!(frame.find_text("No Data Available.").is_some());
}

#[test]
fn arcs_follow_enabled_values() {
    let mut pie = chart(LegendMode::Hidden);
    pie.set_data(slices());
    let summary = pie.render().expect("render");
    assert_eq!(summary.drawn.as_slice(), &[SubChart::Pie]);
    assert_relative_eq!(summary.arcs[0].fraction(), 5.0 / 16.0, epsilon = 1e-12);
    assert_relative_eq!(summary.arcs[2].fraction(), 9.0 / 16.0, epsilon = 1e-12);

    pie.toggle_slice(2).expect("toggle");
    let summary = pie.render().expect("render");
    assert_relative_eq!(summary.arcs[0].fraction(), 5.0 / 7.0, epsilon = 1e-12);
    assert_relative_eq!(summary.arcs[2].fraction(), 0.0);
}

#[test]
fn state_round_trips_active_flags() {
    let mut pie = chart(LegendMode::Top);
    pie.set_data(vec![PieDatum::new("a", 1.0), PieDatum::new("b", 2.0)]);

    let state = ChartState {
        active: vec![false, true],
    };
    pie.set_state(&state).expect("set state");
    assert_eq!(pie.state(), state);
    assert!(pie.data()[0].disabled);
    assert!(pie.needs_update());
}

#[test]
fn short_state_disables_the_remaining_slices() {
    let mut pie = chart(LegendMode::Top);
    pie.set_data(slices());

    pie.set_state(&ChartState {
        active: vec![true],
    })
    .expect("short state");
    assert_eq!(pie.state().active, vec![true, false, false]);
}

#[test]
fn long_state_ignores_extra_flags() {
    let mut pie = chart(LegendMode::Top);
    pie.set_data(slices());

    pie.set_state(&ChartState {
        active: vec![false, true, true, false, false],
    })
    .expect("long state");
    assert_eq!(pie.state().active, vec![false, true, true]);
}

#[test]
fn short_change_state_enables_the_remaining_slices() {
    let mut pie = chart(LegendMode::Top);
    pie.set_data(slices());
    pie.toggle_slice(2).expect("toggle");

    let request = ChangeStateRequest {
        disabled: Some(vec![true]),
    };
    pie.change_state(request).expect("change state");
    assert_eq!(pie.state().active, vec![false, true, true]);
    assert_eq!(pie.requested_disabled(), Some(&[true][..]));
}

#[test]
fn change_state_applies_and_republishes() {
    let mut pie = chart(LegendMode::Top);
    let events = Rc::new(RefCell::new(Vec::new()));
    pie.register_observer(Box::new(EventLog {
        events: Rc::clone(&events),
    }))
    .expect("register");
    pie.set_data(slices());

    let request = ChangeStateRequest {
        disabled: Some(vec![true, false, true]),
    };
    pie.change_state(request.clone()).expect("change state");

    assert_eq!(pie.state().active, vec![false, true, false]);
    assert_eq!(pie.requested_disabled(), Some(&[true, false, true][..]));
    assert_eq!(
        events.borrow().as_slice(),
        &[ChartEvent::ChangeState(request)]
    );
}

#[test]
fn default_state_is_captured_on_first_render() {
    let mut pie = chart(LegendMode::Top);
    pie.set_data(slices());
    assert!(pie.default_state().is_none());
    pie.render().expect("render");

    pie.toggle_slice(0).expect("toggle");
    pie.render().expect("render");
    assert_eq!(
        pie.default_state().map(|state| state.active.clone()),
        Some(vec![true, true, true])
    );

    assert!(pie.reset_to_default_state().expect("reset"));
    assert!(pie.data().iter().all(|datum| !datum.disabled));
}

#[test]
fn legend_double_click_solos_a_slice() {
    let mut pie = chart(LegendMode::Bottom);
    let events = Rc::new(RefCell::new(Vec::new()));
    pie.register_observer(Box::new(EventLog {
        events: Rc::clone(&events),
    }))
    .expect("register");
    pie.set_data(slices());
    let summary = pie.render().expect("render");

    let legend = summary.legend.expect("legend");
    let origin = summary.legend_origin.expect("legend origin");
    let (item_x, item_y) = legend.item_positions[1];
    let hit = pie
        .legend_double_click(
            summary.margin.left + origin.0 + item_x,
            summary.margin.top + origin.1 + item_y,
        )
        .expect("double click");
    assert_eq!(hit, Some(1));
    assert_eq!(pie.state().active, vec![false, true, false]);
    assert_eq!(
        events.borrow().last(),
        Some(&ChartEvent::StateChange {
            disabled: vec![true, false, true]
        })
    );
}

#[test]
fn bottom_legend_margin_is_idempotent() {
    let mut pie = chart(LegendMode::Bottom);
    pie.set_data(slices());
    let first = pie.render().expect("render");
    let height = first.legend.as_ref().expect("legend").height;
    assert_relative_eq!(first.margin.bottom, 20.0 + height);

    let second = pie.render().expect("render");
    assert_relative_eq!(second.margin.bottom, first.margin.bottom);
}

#[test]
fn tooltip_is_lifted_and_formatted() {
    let mut pie = chart(LegendMode::Hidden);
    let presenter = SharedPresenter::default();
    pie.set_tooltip_presenter(Some(Box::new(presenter.clone())));
    pie.set_container_offset(10.0, 5.0);
    pie.set_data(vec![PieDatum::new("Only", 1234.5)]);
    let summary = pie.render().expect("render");
    assert_eq!(summary.available, (920.0, 350.0));

    // Plot centre plus margin, nudged off the exact centre.
    let event = pie.pointer_move(20.0 + 460.0, 30.0 + 175.0 + 40.0).expect("hover");
    assert_eq!(event.series_index, 0);
    assert_eq!(event.series_key, "Only");

    let shown = presenter.shown.borrow();
    assert_eq!(shown.len(), 1);
    assert_relative_eq!(shown[0].left, event.pos[0] + 10.0);
    assert_relative_eq!(shown[0].top, event.pos[1] + 5.0 - 50.0);
    assert_eq!(shown[0].gravity, TooltipGravity::S);
    assert_eq!(
        shown[0].content,
        "<h3 style=\"background-color: #1f77b4\">Only</h3><p>1,234.50</p>"
    );
}

#[test]
fn pointer_outside_the_pie_ends_the_hover() {
    let mut pie = chart(LegendMode::Hidden);
    pie.set_data(slices());
    pie.render().expect("render");

    assert!(pie.pointer_move(480.0, 245.0).is_some());
    assert!(pie.pointer_move(2.0, 2.0).is_none());
    assert!(pie.hovered().is_none());
}
