//! `PlateDXF` CLI: write one DXF label per number in a range.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, bail};
use clap::Parser;
use log::{error, info, warn};

use platedxf_core::{
    Bitmap, FontOutlineSource, LabelConfig, LabelError, TextMode, generate_items, render_batch,
};
use platedxf_fonts::{CompositeFontProvider, FontProvider};

#[derive(Parser)]
#[command(version, about = "PlateDXF: label plates with text and a matrix barcode, as DXF")]
struct Cli {
    /// Prefix text printed before the number
    #[arg(long)]
    prefix: String,

    /// Text placed before each number of the range
    #[arg(long, default_value = "")]
    number_prefix: String,

    /// First number of the range
    #[arg(long, default_value_t = 1)]
    start: u32,

    /// Last number of the range (inclusive); defaults to --start
    #[arg(long)]
    end: Option<u32>,

    /// Output directory for DXF files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// JSON configuration file; unnamed fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// How text is drawn: "outlines" or "literal"
    #[arg(long, value_parser = parse_text_mode)]
    text_mode: Option<TextMode>,

    /// Directory holding one barcode bitmap per label, named "<label>.txt"
    #[arg(long, value_name = "DIR")]
    bitmap_dir: Option<PathBuf>,

    /// Additional directories to search for font files (.otf, .ttf)
    #[arg(long = "font-dir", value_name = "DIR")]
    font_dirs: Vec<PathBuf>,

    /// Font for the prefix
    #[arg(long)]
    prefix_font: Option<String>,

    /// Font for the separator and number
    #[arg(long)]
    number_font: Option<String>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_text_mode(s: &str) -> Result<TextMode, String> {
    match s.to_lowercase().as_str() {
        "outlines" => Ok(TextMode::Outlines),
        "literal" => Ok(TextMode::Literal),
        _ => Err(format!(
            "unknown text mode \"{s}\": expected \"outlines\" or \"literal\""
        )),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<LabelConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => LabelConfig::default(),
    };
    if let Some(mode) = cli.text_mode {
        config.text_mode = mode;
    }
    if let Some(font) = &cli.prefix_font {
        config.prefix_font.clone_from(font);
    }
    if let Some(font) = &cli.number_font {
        config.number_font.clone_from(font);
    }
    Ok(config)
}

/// Build a [`CompositeFontProvider`] with embedded defaults and any
/// custom font directories specified via `--font-dir`. Each font is named
/// after its file stem.
fn build_font_provider(font_dirs: &[PathBuf]) -> anyhow::Result<CompositeFontProvider> {
    let mut provider = CompositeFontProvider::new().context("embedded fonts failed to load")?;

    for dir in font_dirs {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("cannot read font directory {}: {e}", dir.display());
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            if ext != "otf" && ext != "ttf" {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match fs::read(&path) {
                Ok(bytes) => match provider.load_font(name, bytes) {
                    Ok(()) => info!("loaded font {name:?} from {}", path.display()),
                    Err(e) => warn!("failed to load font {}: {e}", path.display()),
                },
                Err(e) => warn!("cannot read font file {}: {e}", path.display()),
            }
        }
    }

    Ok(provider)
}

/// Read `<dir>/<payload>.txt` as a bitmap grid.
fn read_bitmap(dir: Option<&Path>, payload: &str) -> Result<Bitmap, LabelError> {
    let unavailable = |reason: String| LabelError::BitmapUnavailable {
        payload: payload.to_owned(),
        reason,
    };
    let dir = dir.ok_or_else(|| unavailable("no bitmap directory given".into()))?;
    let path = dir.join(format!("{payload}.txt"));
    let text = fs::read_to_string(&path)
        .map_err(|e| unavailable(format!("{}: {e}", path.display())))?;
    Bitmap::parse_text(&text).map_err(|e| unavailable(format!("{}: {e}", path.display())))
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = load_config(&cli)?;
    let end = cli.end.unwrap_or(cli.start);
    let items = generate_items(&cli.prefix, &cli.number_prefix, cli.start, end);
    if items.is_empty() {
        bail!("empty range: --start {} is after --end {end}", cli.start);
    }

    let fonts = build_font_provider(&cli.font_dirs)?;
    if config.text_mode == TextMode::Outlines {
        for name in [&config.prefix_font, &config.number_font] {
            if !fonts.contains(name) {
                warn!("font {name:?} not found; available: {}", fonts.names().join(", "));
            }
        }
    }
    let outlines = FontOutlineSource::new(&fonts);
    let bitmap_dir = cli.bitmap_dir.as_deref();
    let bitmaps = |payload: &str| read_bitmap(bitmap_dir, payload);

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("cannot create {}", cli.output.display()))?;

    let outcome = render_batch(
        &items,
        &config,
        &outlines,
        &bitmaps,
        &AtomicBool::new(false),
    );

    let mut failed = 0usize;
    for label in outcome.successes() {
        let path = cli.output.join(label.file_name());
        match fs::write(&path, label.to_dxf()) {
            Ok(()) => info!("wrote {}", path.display()),
            Err(e) => {
                error!("cannot write {}: {e}", path.display());
                failed += 1;
            }
        }
    }
    failed += outcome.failures().count();

    if failed > 0 {
        error!("{failed} of {} labels failed", items.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
