use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        OverlayError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        OverlayError::unmeasurable("x")
            .to_string()
            .contains("unmeasurable text:")
    );
    assert!(
        OverlayError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        OverlayError::archive("x")
            .to_string()
            .contains("archive error:")
    );
}

#[test]
fn invalid_dimensions_reports_both_sides() {
    let msg = OverlayError::invalid_dimensions(0.0, 600.0).to_string();
    assert_eq!(msg, "invalid image dimensions: 0x600");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = OverlayError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
