use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use fantasy_overlay::{
    FontBook, FontCatalog, OutputSpec, OverlayError, Project, ProjectCollection, ProjectId,
    StyleResolver as _, ThemeTable, ThemedStyles,
};

#[derive(Parser, Debug)]
#[command(name = "fantasy-overlay", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one photo with a caption banner.
    Render(RenderArgs),
    /// Render every project of a manifest into a zip archive.
    Batch(BatchArgs),
    /// List the stock themes.
    Themes,
    /// List the font catalog and which faces are loaded from the fonts directory.
    Fonts(FontsArgs),
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Output spec JSON. Fields it omits keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory scanned for .ttf/.otf/.ttc files before rendering.
    #[arg(long, default_value = "fonts")]
    fonts_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Source photo.
    image: PathBuf,

    /// Caption text.
    #[arg(long, default_value = "")]
    caption: String,

    /// Theme name (see `themes`).
    #[arg(long)]
    theme: Option<String>,

    /// Font family name (see `fonts`).
    #[arg(long)]
    font: Option<String>,

    /// Output file.
    #[arg(long)]
    out: PathBuf,

    /// Render at the preview scale instead of full resolution.
    #[arg(long)]
    preview: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Manifest JSON listing the projects. Image paths are relative to the manifest.
    manifest: PathBuf,

    /// Output zip path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Directory scanned for .ttf/.otf/.ttc files.
    #[arg(long, default_value = "fonts")]
    fonts_dir: PathBuf,
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    projects: Vec<ManifestProject>,
}

#[derive(Debug, serde::Deserialize)]
struct ManifestProject {
    image: PathBuf,
    #[serde(default)]
    caption: String,
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    font: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Themes => cmd_themes(),
        Command::Fonts(args) => cmd_fonts(args),
    }
}

fn load_spec(path: Option<&Path>) -> anyhow::Result<OutputSpec> {
    match path {
        Some(path) => Ok(OutputSpec::from_json_file(path)?),
        None => Ok(OutputSpec::default()),
    }
}

fn load_fonts(dir: &Path) -> anyhow::Result<FontBook> {
    let mut fonts = FontBook::new();
    if dir.is_dir() {
        let n = fonts.load_dir(dir)?;
        tracing::debug!(dir = %dir.display(), faces = n, "loaded fonts");
    } else {
        tracing::warn!(dir = %dir.display(), "fonts directory not found; captions cannot be drawn");
    }
    Ok(fonts)
}

fn read_image(collection: &mut ProjectCollection, path: &Path) -> anyhow::Result<Project> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let id = collection
        .create_from_bytes(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?;
    collection
        .get(id)
        .cloned()
        .with_context(|| format!("project {id} vanished after creation"))
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let styles = ThemedStyles::new(load_spec(args.common.config.as_deref())?);
    let mut fonts = load_fonts(&args.common.fonts_dir)?;

    let mut collection = ProjectCollection::new();
    let mut project = read_image(&mut collection, &args.image)?.with_caption(args.caption);
    project.set_theme(args.theme);
    project.set_font(args.font);

    let style = styles.resolve(&project)?;
    let bytes = if args.preview {
        let surface = fantasy_overlay::render_preview(&project, &style, &mut fonts)?;
        fantasy_overlay::encode_surface(&surface, style.format, style.quality)?
    } else {
        fantasy_overlay::export_project(&project, &style, &mut fonts)?
    };
    write_output(&args.out, &bytes)
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let styles = ThemedStyles::new(load_spec(args.common.config.as_deref())?);
    let mut fonts = load_fonts(&args.common.fonts_dir)?;

    let json = std::fs::read_to_string(&args.manifest)
        .with_context(|| format!("read manifest '{}'", args.manifest.display()))?;
    let manifest: Manifest = serde_json::from_str(&json).with_context(|| "parse manifest JSON")?;
    let root = args.manifest.parent().unwrap_or_else(|| Path::new("."));

    let mut projects = Vec::with_capacity(manifest.projects.len());
    for (i, entry) in manifest.projects.into_iter().enumerate() {
        let path = root.join(&entry.image);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
        // Oversized images stay in the batch without an image so entry numbering is kept.
        let image = match fantasy_overlay::decode_image(&bytes) {
            Ok(image) => Some(Arc::new(image)),
            Err(err @ OverlayError::InvalidImageDimensions { .. }) => {
                tracing::warn!(image = %path.display(), error = %err, "image cannot be rendered");
                None
            }
            Err(err) => {
                return Err(err).with_context(|| format!("decode image '{}'", path.display()));
            }
        };
        let mut project = Project::new(ProjectId::new(i as u64 + 1), image);
        project.set_caption(entry.caption);
        project.set_theme(entry.theme);
        project.set_font(entry.font);
        projects.push(project);
    }

    let out = fantasy_overlay::export_batch(&projects, &styles, &mut fonts)?;
    for id in &out.skipped {
        eprintln!("skipped {id}");
    }
    write_output(&args.out, &out.bytes)?;
    eprintln!("{} image(s) archived", out.written);
    Ok(())
}

fn cmd_themes() -> anyhow::Result<()> {
    for (name, theme) in ThemeTable::default().iter() {
        println!(
            "{name:<10} {:<16} banner {} text {} font {:?}{}",
            theme.label,
            theme.banner,
            theme.text,
            theme.font,
            if theme.border { " border" } else { "" }
        );
    }
    Ok(())
}

fn cmd_fonts(args: FontsArgs) -> anyhow::Result<()> {
    let catalog = FontCatalog::default();
    let fonts = load_fonts(&args.fonts_dir)?;
    for face in &catalog.available {
        let marker = if face.name == catalog.default { "*" } else { " " };
        let loaded = if fonts.has_family(&face.name) {
            "loaded"
        } else {
            "missing"
        };
        println!(
            "{marker} {:<18} {:<18} {:<8} {loaded}",
            face.name, face.label, face.generic
        );
    }
    Ok(())
}
