// tests/output_selection.rs

use waybridge::errors::WaybridgeError;
use waybridge::outputs::OutputDirectory;
use waybridge_test_utils::builders::OutputDirectoryBuilder;

fn two_acme_displays() -> OutputDirectory {
    OutputDirectoryBuilder::new()
        .with_output("Acme", "X1", 1920, 1080)
        .with_output("Acme", "X2", 2560, 1440)
        .build()
}

#[test]
fn first_registration_is_the_provisional_default() {
    let directory = two_acme_displays();
    let selected = directory.finalize().unwrap();
    assert_eq!(selected.model, "X1");
}

#[test]
fn make_model_label_selects_the_matching_display() {
    let mut directory = two_acme_displays();
    directory.select("Acme X2");
    assert_eq!(directory.finalize().unwrap().model, "X2");
}

#[test]
fn make_only_label_selects_the_first_in_registration_order() {
    let mut directory = two_acme_displays();
    directory.select("Acme");
    assert_eq!(directory.finalize().unwrap().model, "X1");
}

#[test]
fn unmatched_label_keeps_the_default() {
    let mut directory = two_acme_displays();
    directory.select("Acme X2");
    directory.select("NoSuchVendor");
    assert_eq!(directory.finalize().unwrap().model, "X2");
}

#[test]
fn finalize_fails_when_nothing_was_registered() {
    let directory = OutputDirectory::new();
    match directory.finalize() {
        Err(WaybridgeError::Protocol(msg)) => {
            assert!(msg.contains("no displays"), "message was: {msg}");
        }
        other => panic!("expected Protocol error, got: {other:?}"),
    }
}

#[test]
fn geometry_token_matches_the_selected_display() {
    let directory = two_acme_displays();
    assert_eq!(directory.finalize().unwrap().geometry(), "1920x1080");
}

#[test]
fn registration_order_is_preserved_by_iteration() {
    let directory = two_acme_displays();
    let models: Vec<&str> = directory.iter().map(|d| d.model.as_str()).collect();
    assert_eq!(models, ["X1", "X2"]);
    assert_eq!(directory.len(), 2);
}

#[test]
fn reregistering_an_identity_is_a_no_op() {
    let mut directory = two_acme_displays();
    let first_id = directory.finalize().unwrap().id;
    directory.register(first_id);
    assert_eq!(directory.len(), 2);
}
