use std::path::{Path, PathBuf};

use egui::{ColorImage, Vec2};
use egui_extras::RetainedImage;
use tracing::info;

use crate::error::{Error, Result};

/// Result of the startup image prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupChoice {
    Open(PathBuf),
    Cancelled,
}

/// Uses the path from the command line, or asks for one with a blocking file
/// dialog before the window opens.
pub fn choose_image(from_args: Option<PathBuf>) -> StartupChoice {
    if let Some(path) = from_args {
        return StartupChoice::Open(path);
    }

    rfd::FileDialog::new()
        .set_title("Open map image")
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .pick_file()
        .map_or(StartupChoice::Cancelled, StartupChoice::Open)
}

pub fn decode_image(path: &Path) -> Result<ColorImage> {
    let image = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    info!(path = %path.display(), width = size[0], height = size[1], "loaded map image");
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// The map, uploaded lazily to the GPU on first draw.
pub struct Background {
    image: RetainedImage,
}

impl Background {
    pub fn load(path: &Path) -> Result<Self> {
        let color_image = decode_image(path)?;
        Ok(Self::from_color_image(&path.display().to_string(), color_image))
    }

    pub fn from_color_image(name: &str, color_image: ColorImage) -> Self {
        Self {
            image: RetainedImage::from_color_image(name, color_image),
        }
    }

    pub fn size(&self) -> Vec2 {
        self.image.size_vec2()
    }

    pub fn texture_id(&self, ctx: &egui::Context) -> egui::TextureId {
        self.image.texture_id(ctx)
    }
}
