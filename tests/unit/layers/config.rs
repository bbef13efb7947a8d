use super::*;
use crate::test_support::{fields, pyramid_loader, selection};

fn channels() -> ChannelSettings {
    ChannelSettings {
        color_values: vec![Rgb8::new(255, 0, 0), Rgb8::new(0, 255, 0)],
        slider_values: vec![[0.0, 255.0], [10.0, 200.0]],
        channel_is_on: vec![true, false],
    }
}

#[test]
fn channel_settings_validate_alignment_and_ramps() {
    assert!(channels().validate().is_ok());
    assert_eq!(channels().visible_channels().collect::<Vec<_>>(), vec![0]);

    let mut short = channels();
    short.channel_is_on.pop();
    assert!(short.validate().is_err());

    let mut inverted = channels();
    inverted.slider_values[1] = [20.0, 10.0];
    assert!(inverted.validate().is_err());
}

#[test]
fn channel_settings_accept_camel_case_keys() {
    let parsed: ChannelSettings = serde_json::from_str(
        r#"{"colorValues": [[255, 0, 0]], "sliderValues": [[0, 10]], "channelIsOn": [true]}"#,
    )
    .unwrap();
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.slider_values[0], [0.0, 10.0]);
}

#[test]
fn equality_is_by_loader_identity() {
    let loader = pyramid_loader(None);
    let a = LayerConfig::new(loader.clone())
        .with_channels(channels())
        .with_selection(Some(selection(0, 0)))
        .with_transition_fields(fields());
    let b = a.clone();
    assert_eq!(a, b);

    let other_loader = LayerConfig { loader: pyramid_loader(None), ..a.clone() };
    assert_ne!(a, other_loader);

    let (signal, _rx) = ViewportLoadSignal::channel();
    let with_signal = a.clone().with_incoming(Some(selection(1, 0)), Some(signal));
    assert_ne!(a, with_signal);
    assert_eq!(with_signal, with_signal.clone());
}
