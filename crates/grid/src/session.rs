//! Message-driven grid editing.
//!
//! A [`GridSession`] owns the inputs of a render (source, settings, paper,
//! grayscale flag) and re-renders after every [`GridCommand`] that changes
//! them. The render itself stays a pure call into [`GridRenderer`].

use std::path::{Path, PathBuf};

use atelier_core::grid::{GridSettings, GridSettingsPatch};
use atelier_core::paper::{
    default_paper_format, require_paper_format, validate_custom_dimensions, PaperFormat,
};
use atelier_core::printing::PrintingGuide;

use crate::error::GridError;
use crate::render::{GridRender, GridRenderer};
use crate::source::SourceImage;

/// A change to one of the render inputs.
#[derive(Debug, Clone)]
pub enum GridCommand {
    LoadImage(SourceImage),
    ClearImage,
    UpdateSettings(GridSettingsPatch),
    /// Select a catalog format by name.
    SelectPaper(String),
    /// Switch to a custom format with user-supplied dimensions (mm).
    SetCustomPaper { width: f64, height: f64 },
    SetGrayscale(bool),
    ToggleGrayscale,
}

#[derive(Debug)]
pub struct GridSession {
    renderer: GridRenderer,
    source: Option<SourceImage>,
    settings: GridSettings,
    paper: PaperFormat,
    grayscale: bool,
    current: Option<GridRender>,
}

impl GridSession {
    pub fn new(renderer: GridRenderer) -> Self {
        Self {
            renderer,
            source: None,
            settings: GridSettings::default(),
            paper: default_paper_format(),
            grayscale: false,
            current: None,
        }
    }

    /// Apply `command` and re-render if an image is loaded.
    ///
    /// A rejected command (unknown paper, invalid custom size) leaves the
    /// session unchanged.
    pub fn apply(&mut self, command: GridCommand) -> Result<(), GridError> {
        match command {
            GridCommand::LoadImage(source) => {
                self.source = Some(source);
            }
            GridCommand::ClearImage => {
                self.source = None;
                self.current = None;
                return Ok(());
            }
            GridCommand::UpdateSettings(patch) => {
                self.settings = self.settings.apply(patch);
            }
            GridCommand::SelectPaper(name) => {
                self.paper = require_paper_format(&name)?;
            }
            GridCommand::SetCustomPaper { width, height } => {
                validate_custom_dimensions(width, height)?;
                self.paper = PaperFormat::custom(width, height);
            }
            GridCommand::SetGrayscale(on) => {
                self.grayscale = on;
            }
            GridCommand::ToggleGrayscale => {
                self.grayscale = !self.grayscale;
            }
        }
        self.rerender();
        Ok(())
    }

    fn rerender(&mut self) {
        self.current = self.source.as_ref().map(|source| {
            self.renderer
                .render(source, &self.settings, &self.paper, self.grayscale)
        });
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn paper(&self) -> &PaperFormat {
        &self.paper
    }

    pub fn grayscale(&self) -> bool {
        self.grayscale
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    /// The latest composite; `None` without an image.
    pub fn current(&self) -> Option<&GridRender> {
        self.current.as_ref()
    }

    /// Available with or without an image.
    pub fn printing_guide(&self) -> PrintingGuide {
        PrintingGuide::compute(&self.settings, &self.paper)
    }

    /// PNG bytes of the latest composite; `None` without an image.
    pub fn export_png(&self) -> Result<Option<Vec<u8>>, GridError> {
        self.current.as_ref().map(GridRender::encode_png).transpose()
    }

    /// Save the latest composite into `dir`; `None` without an image.
    pub fn download(&self, dir: &Path) -> Result<Option<PathBuf>, GridError> {
        self.current.as_ref().map(|render| render.save(dir)).transpose()
    }
}
