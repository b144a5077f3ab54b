use anyhow::Context;
use atelier_grid::session::{GridCommand, GridSession};
use atelier_grid::source::load_source;
use atelier_grid::{GridConfig, GridRenderer};

use crate::args::GridArgs;

pub fn run(args: GridArgs) -> anyhow::Result<()> {
    let mut config = GridConfig::from_env();
    if let Some(font) = &args.font {
        config.label_font = Some(font.clone());
    }
    let renderer = GridRenderer::from_config(&config).context("Failed to load label font")?;
    let mut session = GridSession::new(renderer);

    session.apply(GridCommand::UpdateSettings(args.settings_patch()))?;
    match args.custom_paper {
        Some((width, height)) => session.apply(GridCommand::SetCustomPaper { width, height })?,
        None => session.apply(GridCommand::SelectPaper(args.paper.clone()))?,
    }
    session.apply(GridCommand::SetGrayscale(args.grayscale))?;

    let source = load_source(&args.image)
        .with_context(|| format!("Failed to load {}", args.image.display()))?;
    session.apply(GridCommand::LoadImage(source))?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("Failed to create {}", args.out.display()))?;
    let path = session
        .download(&args.out)?
        .context("No image to export")?;

    let guide = session.printing_guide();
    let paper = session.paper();
    println!("Saved {}", path.display());
    println!(
        "Paper: {} ({} x {} {})",
        paper.name, paper.width, paper.height, paper.unit
    );
    for line in guide.lines_summary(paper, session.settings().show_labels) {
        println!("  - {line}");
    }
    Ok(())
}
