use futures_util::FutureExt as _;

use super::*;
use crate::selection::model::PlaneSelection;

fn sel(z: u32) -> Selection {
    Selection::new(vec![PlaneSelection::new().with("channel", 0).with("z", z)])
}

fn fields() -> Vec<String> {
    vec!["z".to_string()]
}

#[test]
fn signal_fires_once_across_clones() {
    let (signal, mut rx) = ViewportLoadSignal::channel();
    let clone = signal.clone();
    assert!(signal.is_pending());
    assert!(clone.notify());
    assert!(!signal.notify());
    assert!(!signal.is_pending());
    assert!(rx.try_fired());
    assert!(signal.same_channel(&clone));
}

#[test]
fn receiver_future_reports_dropped_signal() {
    let (signal, rx) = ViewportLoadSignal::channel();
    drop(signal);
    assert_eq!(rx.now_or_never(), Some(false));

    let (signal, rx) = ViewportLoadSignal::channel();
    signal.notify();
    assert_eq!(rx.now_or_never(), Some(true));
}

#[test]
fn first_selection_applies_immediately() {
    let mut t = TransitionState::new(None, fields());
    assert!(!t.begin(sel(1)));
    assert_eq!(t.current(), Some(&sel(1)));
    assert!(!t.is_transitioning());
}

#[test]
fn same_layer_selection_skips_transition() {
    let mut t = TransitionState::new(Some(sel(1)), fields());
    let other_channel = Selection::new(vec![PlaneSelection::new().with("channel", 3).with("z", 1)]);
    assert!(!t.begin(other_channel.clone()));
    assert_eq!(t.current(), Some(&other_channel));
    assert!(t.signal().is_none());
}

#[test]
fn transition_collapses_only_after_signal() {
    let mut t = TransitionState::new(Some(sel(1)), fields());
    assert!(t.begin(sel(2)));
    assert!(t.is_transitioning());
    assert!(!t.poll_complete());

    let signal = t.signal().cloned().unwrap();
    assert!(signal.notify());
    assert!(t.poll_complete());
    assert_eq!(t.current(), Some(&sel(2)));
    assert!(t.incoming().is_none());
    assert!(t.signal().is_none());
}

#[test]
fn superseded_signal_is_ignored() {
    let mut t = TransitionState::new(Some(sel(1)), fields());
    t.begin(sel(2));
    let stale = t.signal().cloned().unwrap();
    t.begin(sel(3));
    assert_eq!(t.incoming(), Some(&sel(3)));

    assert!(!stale.notify());
    assert!(!t.poll_complete());
    assert_eq!(t.current(), Some(&sel(1)));

    t.signal().unwrap().notify();
    assert!(t.poll_complete());
    assert_eq!(t.current(), Some(&sel(3)));
}
