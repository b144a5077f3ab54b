// ============================================================================
// Command-line arguments (clap derive)
// ============================================================================

use std::path::PathBuf;

use atelier_core::grid::{GridSettingsPatch, GridType, MAX_DIVISIONS, MIN_DIVISIONS};
use clap::{Args, Parser, Subcommand};

/// Grid overlays for printing and AI portrait retouching.
#[derive(Parser, Debug)]
#[command(name = "atelier", version)]
pub struct Cli {
    /// Emit logs as JSON lines instead of human-readable text.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Overlay a labelled grid on an image and print the printing guide.
    Grid(GridArgs),
    /// Submit a portrait-retouch job and wait for its result.
    Retouch(RetouchArgs),
    /// List paper formats, beauty options and models.
    Catalog,
}

#[derive(Args, Debug)]
pub struct GridArgs {
    /// Source image (PNG, JPEG or WEBP, at most 15 MB).
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    #[arg(long, value_parser = clap::value_parser!(u32).range(MIN_DIVISIONS as i64..=MAX_DIVISIONS as i64))]
    pub rows: Option<u32>,

    #[arg(long, value_parser = clap::value_parser!(u32).range(MIN_DIVISIONS as i64..=MAX_DIVISIONS as i64))]
    pub columns: Option<u32>,

    /// Line colour as `#rgb` or `#rrggbb`.
    #[arg(long, value_name = "HEX")]
    pub line_color: Option<String>,

    /// Line opacity, 0.1 to 1.0.
    #[arg(long)]
    pub line_opacity: Option<f32>,

    /// Line width in pixels, 1 to 10 in steps of 0.5.
    #[arg(long)]
    pub line_width: Option<f32>,

    /// Do not draw cell labels.
    #[arg(long)]
    pub no_labels: bool,

    /// Use square cells.
    #[arg(long)]
    pub square: bool,

    /// Stretch the image so square cells fit exactly.
    #[arg(long)]
    pub fit: bool,

    /// Convert the image to grayscale before drawing the grid.
    #[arg(long)]
    pub grayscale: bool,

    /// Paper format name (A2, A3, A4, A5, Letter, Legal).
    #[arg(long, default_value = "Letter", conflicts_with = "custom_paper")]
    pub paper: String,

    /// Custom paper size in millimetres, as `WIDTHxHEIGHT`.
    #[arg(long, value_name = "WxH", value_parser = parse_paper_size)]
    pub custom_paper: Option<(f64, f64)>,

    /// Label font (TTF/OTF). Overrides `ATELIER_LABEL_FONT`.
    #[arg(long, value_name = "FONT")]
    pub font: Option<PathBuf>,

    /// Directory to write `grid-image.png` into.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,
}

impl GridArgs {
    pub fn settings_patch(&self) -> GridSettingsPatch {
        GridSettingsPatch {
            rows: self.rows,
            columns: self.columns,
            line_color: self.line_color.clone(),
            line_opacity: self.line_opacity,
            line_width: self.line_width,
            show_labels: Some(!self.no_labels),
            grid_type: Some(if self.square {
                GridType::Square
            } else {
                GridType::Custom
            }),
            adjust_image_to_fit: Some(self.fit),
        }
    }
}

#[derive(Args, Debug)]
pub struct RetouchArgs {
    /// URL of an uploaded source image (1 to 4).
    #[arg(long = "image", value_name = "URL", required = true)]
    pub images: Vec<String>,

    /// Beauty option as `category:id`, e.g. `skin:soft_skin`.
    #[arg(long = "option", value_name = "CATEGORY:ID", value_parser = parse_option_ref)]
    pub options: Vec<(String, String)>,

    /// Free-text instruction.
    #[arg(long, default_value = "")]
    pub prompt: String,

    /// Model id; defaults to the catalog default.
    #[arg(long)]
    pub model: Option<String>,

    /// Remaining credit balance, checked before submitting.
    #[arg(long)]
    pub credits: Option<u32>,

    /// Job API base URL. Overrides `ATELIER_API_URL`.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Download result images into this directory.
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

fn parse_option_ref(value: &str) -> Result<(String, String), String> {
    match value.split_once(':') {
        Some((category, id)) if !category.is_empty() && !id.is_empty() => {
            Ok((category.to_string(), id.to_string()))
        }
        _ => Err(format!("expected CATEGORY:ID, got '{value}'")),
    }
}

fn parse_paper_size(value: &str) -> Result<(f64, f64), String> {
    let invalid = || format!("expected WIDTHxHEIGHT in mm, got '{value}'");
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let w: f64 = w.trim().parse().map_err(|_| invalid())?;
    let h: f64 = h.trim().parse().map_err(|_| invalid())?;
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use atelier_core::beauty::find_option;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("atelier").chain(args.iter().copied()))
    }

    #[test]
    fn grid_defaults() {
        let cli = parse(&["grid", "photo.jpg"]).unwrap();
        let Command::Grid(args) = cli.command else {
            panic!("expected grid command");
        };
        assert_eq!(args.paper, "Letter");
        let patch = args.settings_patch();
        assert_eq!(patch.rows, None);
        assert_eq!(patch.show_labels, Some(true));
        assert_eq!(patch.grid_type, Some(GridType::Custom));
    }

    #[test]
    fn grid_rejects_out_of_range_rows() {
        assert!(parse(&["grid", "p.png", "--rows", "1"]).is_err());
        assert!(parse(&["grid", "p.png", "--rows", "51"]).is_err());
        assert!(parse(&["grid", "p.png", "--rows", "50"]).is_ok());
    }

    #[test]
    fn custom_paper_size_parses() {
        let cli = parse(&["grid", "p.png", "--custom-paper", "300x450.5"]).unwrap();
        assert_matches!(cli.command, Command::Grid(args) if args.custom_paper == Some((300.0, 450.5)));
        assert!(parse(&["grid", "p.png", "--custom-paper", "300"]).is_err());
    }

    #[test]
    fn retouch_options_are_split() {
        let cli = parse(&[
            "retouch",
            "--image",
            "https://cdn/a.png",
            "--option",
            "skin:soft_skin",
            "--option",
            "hair:soft_hair",
        ])
        .unwrap();
        let Command::Retouch(args) = cli.command else {
            panic!("expected retouch command");
        };
        assert_eq!(args.images, ["https://cdn/a.png"]);
        assert_eq!(args.options[1], ("hair".to_string(), "soft_hair".to_string()));
        for (category, id) in &args.options {
            assert!(find_option(category, id).is_ok(), "{category}:{id} is not in the catalog");
        }
        assert!(parse(&["retouch", "--image", "u", "--option", "skin"]).is_err());
    }

    #[test]
    fn retouch_requires_an_image() {
        assert!(parse(&["retouch", "--prompt", "brighten"]).is_err());
    }
}
