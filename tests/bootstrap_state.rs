// tests/bootstrap_state.rs

//! Exercises the descriptor state machine with synthetic events, the same
//! ones the wire listener would produce over a live connection.

use waybridge::outputs::{DisplayDescriptor, OutputEvent, OutputPhase, Subpixel, Transform};
use waybridge_test_utils::builders::{basic_output_events, extended_output_events};

#[test]
fn basic_events_advance_to_geometry_known() {
    let mut descriptor = DisplayDescriptor::new(1);
    assert_eq!(descriptor.phase, OutputPhase::Discovered);

    for event in basic_output_events("Acme", "X1", 1920, 1080) {
        descriptor.apply(event);
    }

    assert_eq!(descriptor.phase, OutputPhase::GeometryKnown);
    assert_eq!(descriptor.make, "Acme");
    assert_eq!(descriptor.model, "X1");
    assert_eq!((descriptor.width, descriptor.height), (1920, 1080));
    assert_eq!(descriptor.scale, 1);
}

#[test]
fn refresh_rate_is_derived_from_milli_hz() {
    let mut descriptor = DisplayDescriptor::new(1);
    descriptor.apply(OutputEvent::Mode {
        width: 1920,
        height: 1080,
        refresh_mhz: 59_940,
    });
    assert!((descriptor.refresh - 59.94).abs() < 0.001);
}

#[test]
fn extended_events_advance_to_extended_known() {
    let mut descriptor = DisplayDescriptor::new(1);
    for event in basic_output_events("Acme", "X1", 1920, 1080) {
        descriptor.apply(event);
    }
    for event in extended_output_events("DP-1", "Acme X1 27\"", 1280, 720) {
        descriptor.apply(event);
    }

    assert_eq!(descriptor.phase, OutputPhase::ExtendedKnown);
    assert_eq!(descriptor.name, "DP-1");
    assert_eq!(descriptor.description, "Acme X1 27\"");
}

#[test]
fn logical_size_overrides_the_mode_size() {
    let mut descriptor = DisplayDescriptor::new(1);
    descriptor.apply(OutputEvent::Mode {
        width: 3840,
        height: 2160,
        refresh_mhz: 60_000,
    });
    descriptor.apply(OutputEvent::LogicalSize {
        width: 1920,
        height: 1080,
    });
    assert_eq!(descriptor.geometry(), "1920x1080");
}

#[test]
fn extended_fields_default_to_zero_without_extended_events() {
    let mut descriptor = DisplayDescriptor::new(1);
    for event in basic_output_events("Acme", "X1", 1920, 1080) {
        descriptor.apply(event);
    }

    // No extended-info capability advertised: not an error, fields stay at
    // their defaults.
    assert_eq!(descriptor.name, "");
    assert_eq!(descriptor.description, "");
    assert_eq!((descriptor.x, descriptor.y), (0, 0));
    assert_eq!(descriptor.phase, OutputPhase::GeometryKnown);
}

#[test]
fn extended_events_never_regress_the_phase() {
    let mut descriptor = DisplayDescriptor::new(1);
    for event in extended_output_events("DP-1", "desc", 1280, 720) {
        descriptor.apply(event);
    }
    // A late basic event must not pull the phase back down.
    descriptor.apply(OutputEvent::Scale { factor: 2 });
    assert_eq!(descriptor.phase, OutputPhase::ExtendedKnown);
    assert_eq!(descriptor.scale, 2);
}

#[test]
fn geometry_event_fills_physical_and_identity_fields() {
    let mut descriptor = DisplayDescriptor::new(1);
    descriptor.apply(OutputEvent::Geometry {
        physical_width: 600,
        physical_height: 340,
        subpixel: Subpixel::HorizontalRgb,
        make: "Acme".to_string(),
        model: "X1".to_string(),
        transform: Transform::Rotated90,
    });

    assert_eq!(descriptor.physical_width, 600);
    assert_eq!(descriptor.physical_height, 340);
    assert_eq!(descriptor.subpixel, Subpixel::HorizontalRgb);
    assert_eq!(descriptor.transform, Transform::Rotated90);
}
