use super::*;

const CANDIDATES: &[&str] = &[
    "tests/data/fonts/Cinzel-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

fn book_with_any_font() -> Option<(FontBook, String)> {
    let path = std::env::var("FANTASY_OVERLAY_TEST_FONT")
        .ok()
        .map(PathBuf::from)
        .into_iter()
        .chain(CANDIDATES.iter().map(PathBuf::from))
        .find(|p| p.is_file());
    let Some(path) = path else {
        eprintln!("no test font available; skipping");
        return None;
    };
    let mut book = FontBook::new();
    let names = book.load_file(&path).unwrap();
    Some((book, names[0].clone()))
}

#[test]
fn unknown_family_is_unmeasurable() {
    let mut book = FontBook::new();
    let err = book.measure("Hello", "Cinzel", 40.0).unwrap_err();
    assert!(matches!(err, OverlayError::UnmeasurableText(_)));
    assert!(book.shape_line("Hello", "Cinzel", 40.0).is_err());
}

#[test]
fn garbage_bytes_register_nothing() {
    let mut book = FontBook::new();
    assert!(book.register(b"not a font".to_vec()).is_err());
    assert_eq!(book.families().count(), 0);
}

#[test]
fn missing_dir_is_an_error() {
    let mut book = FontBook::new();
    assert!(book.load_dir(Path::new("/definitely/not/here")).is_err());
}

#[test]
fn measure_is_deterministic_and_grows_with_size() {
    let Some((mut book, family)) = book_with_any_font() else {
        return;
    };
    assert!(book.has_family(&family));
    assert!(book.has_family(&family.to_uppercase()));

    let a = book.measure("The Lost Kingdom", &family, 40.0).unwrap();
    let b = book.measure("The Lost Kingdom", &family, 40.0).unwrap();
    let c = book.measure("The Lost Kingdom", &family, 80.0).unwrap();
    assert_eq!(a, b);
    assert!(a > 0.0);
    assert!(c > a * 1.5);

    let longer = book.measure("The Lost Kingdom of Eldoria", &family, 40.0).unwrap();
    assert!(longer > a);
}

#[test]
fn shaped_glyphs_advance_left_to_right() {
    let Some((mut book, family)) = book_with_any_font() else {
        return;
    };
    let line = book.shape_line("Eldoria", &family, 48.0).unwrap();
    let glyphs: Vec<_> = line.glyphs().copied().collect();
    assert_eq!(glyphs.len(), 7);
    assert_eq!(line.font_size, 48.0);
    for pair in glyphs.windows(2) {
        assert!(pair[1].x > pair[0].x);
    }
    assert!(glyphs.iter().all(|g| g.y > 0.0));
    assert!(line.ink_top() < line.baseline && line.ink_bottom() > line.baseline);
    assert_eq!(line.width, book.measure("Eldoria", &family, 48.0).unwrap());
}

#[test]
fn second_weight_does_not_replace_the_painted_face() {
    let dir = Path::new("/usr/share/fonts/truetype/dejavu");
    let (regular, bold) = (dir.join("DejaVuSans.ttf"), dir.join("DejaVuSans-Bold.ttf"));
    if !regular.is_file() || !bold.is_file() {
        eprintln!("DejaVu Sans regular/bold not available; skipping");
        return;
    }
    let regular_len = std::fs::metadata(&regular).unwrap().len() as usize;
    let bold_len = std::fs::metadata(&bold).unwrap().len() as usize;
    assert_ne!(regular_len, bold_len);

    let mut book = FontBook::new();
    let family = book.load_file(&regular).unwrap().remove(0);
    assert_eq!(book.load_file(&bold).unwrap()[0], family);

    let line = book.shape_line("Eldoria", &family, 48.0).unwrap();
    assert!(!line.runs.is_empty());
    for run in &line.runs {
        assert_eq!(run.font.data.data().len(), regular_len);
        assert_eq!(run.font.index, 0);
    }
    assert_eq!(line.width, book.measure("Eldoria", &family, 48.0).unwrap());
}

#[test]
fn shaping_twice_reuses_the_paint_face() {
    let Some((mut book, family)) = book_with_any_font() else {
        return;
    };
    let a = book.shape_line("Eldoria", &family, 40.0).unwrap();
    let b = book.shape_line("Awaits", &family, 60.0).unwrap();
    assert_eq!(book.paint_faces.len(), 1);
    assert_eq!(a.runs[0].font.data.id(), b.runs[0].font.data.id());
}
