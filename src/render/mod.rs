//! Image and text rasterization used by the patch composer.

use image::{ImageFormat, RgbaImage};
use std::path::Path;
use tracing::debug;

use crate::error::ComposeError;
use crate::patch::RgbColor;

pub mod fonts;
pub mod glyph;

pub use fonts::FontLibrary;
pub use glyph::GlyphRenderer;

/// The image that text items are drawn onto.
pub type Canvas = RgbaImage;

/// Text measuring and drawing, keyed by font name and pixel size.
pub trait TextRenderer {
    /// Rendered `(width, height)` of `text` in pixels.
    fn measure_text(
        &mut self,
        text: &str,
        font_name: &str,
        font_size: u32,
    ) -> Result<(u32, u32), ComposeError>;

    /// Draw `text` with its top-left corner at `(x, y)`. Pixels falling
    /// outside the canvas are dropped.
    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        canvas: &mut Canvas,
        x: i32,
        y: i32,
        text: &str,
        color: RgbColor,
        font_name: &str,
        font_size: u32,
    ) -> Result<(), ComposeError>;
}

impl<R: TextRenderer + ?Sized> TextRenderer for &mut R {
    fn measure_text(
        &mut self,
        text: &str,
        font_name: &str,
        font_size: u32,
    ) -> Result<(u32, u32), ComposeError> {
        (**self).measure_text(text, font_name, font_size)
    }

    fn draw_text(
        &mut self,
        canvas: &mut Canvas,
        x: i32,
        y: i32,
        text: &str,
        color: RgbColor,
        font_name: &str,
        font_size: u32,
    ) -> Result<(), ComposeError> {
        (**self).draw_text(canvas, x, y, text, color, font_name, font_size)
    }
}

pub fn load_image(path: impl AsRef<Path>) -> Result<Canvas, ComposeError> {
    let path = path.as_ref();
    debug!("🖼️  Loading background image {}", path.display());
    Ok(image::open(path)?.to_rgba8())
}

pub fn save_image(
    canvas: &Canvas,
    path: impl AsRef<Path>,
    format: ImageFormat,
) -> Result<(), ComposeError> {
    let path = path.as_ref();
    debug!("💾 Saving {:?} image to {}", format, path.display());
    canvas.save_with_format(path, format)?;
    Ok(())
}
