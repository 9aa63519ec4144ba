//! Header normalization properties.

use proptest::prelude::*;
use stats19_tidy::frame::{Frame, normalize_header};

#[test]
fn normalize_header_matches_release_spellings() {
    assert_eq!(normalize_header("Accident Index"), "accident_index");
    assert_eq!(normalize_header("  Casualty Severity "), "casualty_severity");
    assert_eq!(normalize_header("Local Authority (District)"), "local_authority_(district)");
}

#[test]
fn normalizing_a_normalized_frame_is_a_no_op() {
    let mut frame = Frame::new(
        vec!["accident_index".to_string(), "vehicle_reference".to_string()],
        vec![vec!["A1".to_string(), "1".to_string()]],
    );
    let before = frame.clone();
    frame.normalize_headers();
    assert_eq!(frame, before);
}

proptest! {
    #[test]
    fn normalize_header_is_idempotent(name in "[ A-Za-z0-9_()/-]{0,24}") {
        let once = normalize_header(&name);
        prop_assert_eq!(normalize_header(&once), once);
    }

    #[test]
    fn normalized_headers_contain_no_spaces_or_uppercase(name in ".{0,24}") {
        let normalized = normalize_header(&name);
        prop_assert!(!normalized.contains(' '));
        prop_assert!(!normalized.chars().any(|c| c.is_ascii_uppercase()));
    }
}
