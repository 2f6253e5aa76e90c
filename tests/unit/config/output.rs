use super::*;

#[test]
fn default_spec_is_valid_and_matches_stock_layout() {
    let spec = OutputSpec::default();
    spec.validate().unwrap();
    assert_eq!(
        spec.canvas(),
        Canvas {
            width: 1080,
            height: 1620
        }
    );
    assert_eq!(spec.banner.height_fraction, 0.2);
    assert_eq!(spec.text.max_font_size, 80.0);
    assert_eq!(spec.text.min_font_size, 30.0);
    assert_eq!(spec.text.font_size_step, 2.0);
    assert_eq!(spec.text.align, TextAlign::Center);
    assert_eq!(spec.decoration.inset, 15.0);
    assert_eq!(spec.format.mime_type(), "image/png");
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let spec = OutputSpec::from_json_str(
        r##"{
            "width": 720,
            "banner": { "height_fraction": 0.25 },
            "text": { "align": "left", "color": "#ffffff" },
            "format": "jpeg"
        }"##,
    )
    .unwrap();

    assert_eq!(spec.width, 720);
    assert_eq!(spec.height, 1620);
    assert_eq!(spec.banner.height_fraction, 0.25);
    assert!(spec.banner.gradient_overlay);
    assert_eq!(spec.text.align, TextAlign::Left);
    assert_eq!(spec.text.color, Rgba8::rgb(255, 255, 255));
    assert_eq!(spec.text.max_font_size, 80.0);
    assert_eq!(spec.format, OutputFormat::Jpeg);
    assert_eq!(spec.format.extension(), "jpg");
}

#[test]
fn validate_rejects_out_of_range_fraction() {
    for f in [0.0, 1.0, -0.1, f64::NAN] {
        let mut spec = OutputSpec::default();
        spec.banner.height_fraction = f;
        assert!(spec.validate().is_err(), "fraction {f} should be rejected");
    }
}

#[test]
fn validate_rejects_inverted_font_range() {
    let mut spec = OutputSpec::default();
    spec.text.min_font_size = 90.0;
    let err = spec.validate().unwrap_err();
    assert!(err.to_string().contains("max_font_size"));
}

#[test]
fn validate_rejects_zero_step_and_bad_padding() {
    let mut spec = OutputSpec::default();
    spec.text.font_size_step = 0.0;
    assert!(spec.validate().is_err());

    let mut spec = OutputSpec::default();
    spec.banner.padding.left = -1.0;
    assert!(spec.validate().is_err());
}

#[test]
fn from_json_reports_parse_errors_as_validation() {
    let err = OutputSpec::from_json_str("{ \"width\": \"wide\" }").unwrap_err();
    assert!(matches!(err, OverlayError::Validation(_)));

    let err = OutputSpec::from_json_str("{ \"width\": 0 }").unwrap_err();
    assert!(err.to_string().contains("width/height"));
}

#[test]
fn validate_bounds_the_number_of_font_size_steps() {
    let mut spec = OutputSpec::default();
    spec.text.min_font_size = 1.0;
    spec.text.max_font_size = 1.0e9;
    spec.text.font_size_step = 1.0;
    let err = spec.validate().unwrap_err();
    assert!(err.to_string().contains("steps"), "{err}");

    let mut spec = OutputSpec::default();
    spec.text.min_font_size = 10.0;
    spec.text.max_font_size = 110.0;
    spec.text.font_size_step = 0.02;
    assert!(spec.validate().is_ok());
}
