#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use fantasy_overlay::{
    DecodedImage, Edges, FontBook, FontCatalog, FontFace, OutputSpec, Project, ProjectId,
    ThemeTable, ThemedStyles,
};

const FONT_CANDIDATES: &[&str] = &[
    "tests/data/fonts/Cinzel-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

pub fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

/// 216x324 canvas with tight banner padding.
pub fn small_spec() -> OutputSpec {
    let mut spec = OutputSpec::default();
    spec.width = 216;
    spec.height = 324;
    spec.banner.padding = Edges {
        top: 6.0,
        bottom: 6.0,
        left: 8.0,
        right: 8.0,
    };
    spec.decoration.inset = 4.0;
    spec.decoration.corner_length = 8.0;
    spec
}

pub fn solid_project(id: u64, w: u32, h: u32, rgba: [u8; 4]) -> Project {
    let img = DecodedImage::solid(w, h, rgba).unwrap();
    Project::new(ProjectId::new(id), Some(Arc::new(img)))
}

/// A font book holding one real face plus a catalog defaulting to it, or `None` when no
/// font file is available on this machine.
pub fn font_fixture() -> Option<(FontBook, FontCatalog)> {
    let path = std::env::var("FANTASY_OVERLAY_TEST_FONT")
        .ok()
        .map(PathBuf::from)
        .into_iter()
        .chain(FONT_CANDIDATES.iter().map(PathBuf::from))
        .find(|p| p.is_file());
    let Some(path) = path else {
        eprintln!("no test font available; skipping");
        return None;
    };
    let mut fonts = FontBook::new();
    let family = fonts.load_file(&path).unwrap().remove(0);
    let catalog = FontCatalog {
        default: family.clone(),
        available: vec![FontFace {
            name: family.clone(),
            label: family,
            generic: "serif".to_string(),
        }],
    };
    Some((fonts, catalog))
}

pub fn styles_with(spec: OutputSpec, fonts: FontCatalog) -> ThemedStyles {
    ThemedStyles {
        spec,
        themes: ThemeTable::default(),
        fonts,
    }
}
