use std::sync::Arc;

use super::*;
use crate::assets::decode::DecodedImage;

#[derive(Default)]
struct Recorder {
    names: Vec<String>,
}

impl ArchiveBuilder for Recorder {
    fn add_entry(&mut self, name: &str, bytes: &[u8]) -> OverlayResult<()> {
        assert!(!bytes.is_empty());
        self.names.push(name.to_string());
        Ok(())
    }

    fn finalize(self) -> OverlayResult<Vec<u8>> {
        Ok(self.names.join("\n").into_bytes())
    }
}

fn small_spec() -> OutputSpec {
    let mut spec = OutputSpec::default();
    spec.width = 60;
    spec.height = 90;
    spec.banner.padding = crate::foundation::core::Edges {
        top: 2.0,
        right: 2.0,
        bottom: 2.0,
        left: 2.0,
    };
    spec
}

fn with_image(id: u64) -> Project {
    let img = DecodedImage::solid(8, 6, [200, 40, 40, 255]).unwrap();
    Project::new(ProjectId::new(id), Some(Arc::new(img)))
}

#[test]
fn entry_names_are_zero_padded() {
    assert_eq!(entry_name(1, OutputFormat::Png), "fantasy-overlay-001.png");
    assert_eq!(entry_name(12, OutputFormat::Jpeg), "fantasy-overlay-012.jpg");
}

#[test]
fn export_without_image_is_rejected() {
    let resolver = ThemedStyles::new(small_spec());
    let project = Project::new(ProjectId::new(1), None);
    let style = resolver.resolve(&project).unwrap();
    let err = export_project(&project, &style, &mut FontBook::new()).unwrap_err();
    assert!(matches!(err, OverlayError::Validation(_)));
}

#[test]
fn export_produces_png_of_canvas_size() {
    let resolver = ThemedStyles::new(small_spec());
    let project = with_image(1);
    let style = resolver.resolve(&project).unwrap();
    let bytes = export_project(&project, &style, &mut FontBook::new()).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (60, 90));
}

#[test]
fn batch_skips_imageless_projects_and_keeps_positions() {
    let projects = [
        with_image(1),
        Project::new(ProjectId::new(2), None),
        with_image(3),
    ];
    let resolver = ThemedStyles::new(small_spec());
    let out = export_batch_into(&projects, &resolver, &mut FontBook::new(), Recorder::default())
        .unwrap();

    assert_eq!(out.written, 2);
    assert_eq!(out.skipped, vec![ProjectId::new(2)]);
    assert_eq!(
        String::from_utf8(out.bytes).unwrap(),
        "fantasy-overlay-001.png\nfantasy-overlay-003.png"
    );
}

#[test]
fn batch_skips_images_too_large_to_paint() {
    let side = 70_000u32;
    let oversized = DecodedImage {
        width: side,
        height: 1,
        rgba8_premul: Arc::new(vec![255; side as usize * 4]),
    };
    let projects = [
        Project::new(ProjectId::new(1), Some(Arc::new(oversized))),
        with_image(2),
    ];
    let resolver = ThemedStyles::new(small_spec());
    let out = export_batch_into(&projects, &resolver, &mut FontBook::new(), Recorder::default())
        .unwrap();

    assert_eq!(out.written, 1);
    assert_eq!(out.skipped, vec![ProjectId::new(1)]);
    assert_eq!(String::from_utf8(out.bytes).unwrap(), "fantasy-overlay-002.png");
}

#[test]
fn resolver_failure_aborts_the_batch() {
    let projects = [with_image(1), with_image(2).with_theme("Nope")];
    let resolver = ThemedStyles::new(small_spec());
    let err = export_batch(&projects, &resolver, &mut FontBook::new()).unwrap_err();
    assert!(matches!(err, OverlayError::Validation(_)));
}

#[test]
fn closures_resolve_styles() {
    let spec = small_spec();
    let resolver = |p: &Project| {
        resolve_style(p, &spec, &ThemeTable::default(), &FontCatalog::default())
    };
    let projects = [with_image(1).with_theme("Noir")];
    let out = export_batch(&projects, &resolver, &mut FontBook::new()).unwrap();
    assert_eq!(out.written, 1);
    assert!(out.skipped.is_empty());
}
