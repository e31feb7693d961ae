use std::cell::RefCell;
use std::rc::Rc;

use chart_compose::ChartError;
use chart_compose::events::{ChangeStateRequest, ChartEvent, ChartObserver, EventRelay};

struct Recorder {
    id: &'static str,
    seen: Rc<RefCell<Vec<(&'static str, &'static str)>>>,
}

impl ChartObserver for Recorder {
    fn id(&self) -> &str {
        self.id
    }

    fn on_event(&mut self, event: &ChartEvent) {
        self.seen.borrow_mut().push((self.id, event.topic()));
    }
}

#[test]
fn observers_receive_events_in_registration_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut relay = EventRelay::default();
    for id in ["first", "second"] {
        relay
            .register(Box::new(Recorder {
                id,
                seen: Rc::clone(&seen),
            }))
            .expect("register");
    }

    relay.emit(&ChartEvent::ChangeState(ChangeStateRequest::default()));
    assert_eq!(
        seen.borrow().as_slice(),
        &[("first", "changeState"), ("second", "changeState")]
    );
}

#[test]
fn registration_rules() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut relay = EventRelay::default();
    let recorder = |id| {
        Box::new(Recorder {
            id,
            seen: Rc::clone(&seen),
        })
    };

    assert!(matches!(
        relay.register(recorder("")),
        Err(ChartError::InvalidData(_))
    ));
    relay.register(recorder("a")).expect("register");
    assert!(matches!(
        relay.register(recorder("a")),
        Err(ChartError::DuplicateObserver(id)) if id == "a"
    ));
    assert_eq!(relay.len(), 1);

    assert!(relay.unregister("a"));
    assert!(relay.is_empty());
    relay.emit(&ChartEvent::RenderEnd);
    assert!(seen.borrow().is_empty());
}

#[test]
fn state_change_payload_round_trips_through_json() {
    let event = ChartEvent::StateChange {
        disabled: vec![true, false],
    };
    let json = serde_json::to_string(&event).expect("serialize");
    let back: ChartEvent = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, event);
}
