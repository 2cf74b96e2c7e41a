use std::{fs, process};

use anyhow::{Context, Result, bail};

use lesson_canvas::{
    app,
    catalog::Catalog,
    config::AppConfig,
    explain::ExplainService,
    logging,
    scene::Size,
    surface::MemorySurface,
    visualizer::Visualizer,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const LIST_USAGE: &str = "lesson-canvas list";
const RUN_USAGE: &str = "lesson-canvas run [lesson-id]";
const SNAPSHOT_USAGE: &str = "lesson-canvas snapshot <lesson-id> [WIDTHxHEIGHT]";

const SNAPSHOT_SIZE: Size = Size::new(80, 24);

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config = AppConfig::load();
    if let Err(e) = logging::init(config.log_file.as_deref()) {
        eprintln!("warning: logging disabled: {e}");
    }
    let catalog = load_catalog(&config)?;

    match args.next().as_deref() {
        Some("list") => {
            list(&catalog);
            Ok(())
        }
        Some("run") => play(&config, catalog, args.next().as_deref()),
        Some("snapshot") => {
            let id = args.next().context(SNAPSHOT_USAGE)?;
            let size = match args.next() {
                Some(dims) => parse_size(&dims).with_context(|| SNAPSHOT_USAGE.to_string())?,
                None => SNAPSHOT_SIZE,
            };
            snapshot(&config, &catalog, &id, size)
        }
        _ => bail!(
            "Lesson Canvas — animated programming lessons in the terminal\n\nUsage:\n  {LIST_USAGE}\n  {RUN_USAGE}\n  {SNAPSHOT_USAGE}"
        ),
    }
}

fn load_catalog(config: &AppConfig) -> Result<Catalog> {
    let Some(path) = &config.curriculum else {
        return Ok(Catalog::builtin());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Catalog::from_json(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

fn list(catalog: &Catalog) {
    for module in catalog.modules() {
        println!("{}", module.title);
        for lesson in &module.lessons {
            println!("  {:<18} {}", lesson.id, lesson.title);
        }
    }
}

fn play(config: &AppConfig, mut catalog: Catalog, lesson_id: Option<&str>) -> Result<()> {
    if let Some(id) = lesson_id {
        catalog.select(id).with_context(|| RUN_USAGE.to_string())?;
    }
    app::run(config, catalog, ExplainService::new(None))
}

fn snapshot(config: &AppConfig, catalog: &Catalog, id: &str, size: Size) -> Result<()> {
    let lesson = catalog
        .get_lesson(id)
        .cloned()
        .with_context(|| format!("Unknown lesson `{id}` (see `{LIST_USAGE}`)"))?;
    let visualizer = Visualizer::new(lesson, MemorySurface::new(size), config.timing, config.seed);
    let text = visualizer
        .surface()
        .last_text()
        .context("Nothing was drawn")?;
    print!("{text}");
    Ok(())
}

fn parse_size(dims: &str) -> Result<Size> {
    let (w, h) = dims.split_once('x').context("Expected WIDTHxHEIGHT")?;
    let size = Size::new(
        w.parse().with_context(|| format!("Bad width `{w}`"))?,
        h.parse().with_context(|| format!("Bad height `{h}`"))?,
    );
    if size.is_empty() {
        bail!("Size must be non-zero");
    }
    Ok(size)
}
