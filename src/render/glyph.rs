use fontdue::layout::{
    CoordinateSystem, GlyphPosition, Layout, LayoutSettings, TextStyle as GlyphStyle,
};
use fontdue::Font;
use image::Rgba;
use std::sync::Arc;

use super::{Canvas, FontLibrary, TextRenderer};
use crate::error::ComposeError;
use crate::patch::RgbColor;

/// [`TextRenderer`] backed by fontdue: glyphs are laid out on a single line
/// and alpha-blended onto the canvas.
pub struct GlyphRenderer {
    fonts: FontLibrary,
    layout: Layout,
}

impl GlyphRenderer {
    pub fn new(fonts: FontLibrary) -> Self {
        Self {
            fonts,
            layout: Layout::new(CoordinateSystem::PositiveYDown),
        }
    }

    pub fn fonts(&self) -> &FontLibrary {
        &self.fonts
    }

    fn lay_out(
        &mut self,
        text: &str,
        font_name: &str,
        font_size: u32,
    ) -> Result<(Arc<Font>, Vec<GlyphPosition>, f32), ComposeError> {
        let font = self.fonts.load(font_name)?;
        self.layout.reset(&LayoutSettings::default());
        self.layout
            .append(&[&*font], &GlyphStyle::new(text, font_size as f32, 0));
        let glyphs = self.layout.glyphs().clone();
        let height = self.layout.height();
        Ok((font, glyphs, height))
    }
}

impl std::fmt::Debug for GlyphRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRenderer")
            .field("fonts", &self.fonts)
            .finish_non_exhaustive()
    }
}

impl TextRenderer for GlyphRenderer {
    fn measure_text(
        &mut self,
        text: &str,
        font_name: &str,
        font_size: u32,
    ) -> Result<(u32, u32), ComposeError> {
        let (font, glyphs, height) = self.lay_out(text, font_name, font_size)?;
        // Spans both the inked bitmaps and the pen advance, so trailing
        // whitespace widens the text.
        let width = glyphs
            .iter()
            .map(|g| {
                let metrics = font.metrics(g.parent, g.key.px);
                let pen_end = g.x - metrics.xmin as f32 + metrics.advance_width;
                (g.x + g.width as f32).max(pen_end)
            })
            .fold(0.0_f32, f32::max);
        Ok((width.ceil() as u32, height.ceil() as u32))
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
        let (font, glyphs, _) = self.lay_out(text, font_name, font_size)?;

        for glyph in glyphs.iter().filter(|g| g.width > 0 && g.height > 0) {
            let (metrics, coverage) = font.rasterize_config(glyph.key);
            let left = x.saturating_add(glyph.x.round() as i32);
            let top = y.saturating_add(glyph.y.round() as i32);

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let alpha = coverage[row * metrics.width + col];
                    if alpha == 0 {
                        continue;
                    }
                    blend_pixel(
                        canvas,
                        left.saturating_add(col as i32),
                        top.saturating_add(row as i32),
                        color,
                        alpha,
                    );
                }
            }
        }

        Ok(())
    }
}

/// Blend `color` at `coverage` onto the pixel at `(x, y)`, ignoring
/// coordinates outside the canvas.
fn blend_pixel(canvas: &mut Canvas, x: i32, y: i32, color: RgbColor, coverage: u8) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }

    let Rgba([r, g, b, a]) = *canvas.get_pixel(x as u32, y as u32);
    let alpha = coverage as u32;
    let mix = |dst: u8, src: u8| ((src as u32 * alpha + dst as u32 * (255 - alpha) + 127) / 255) as u8;

    canvas.put_pixel(
        x as u32,
        y as u32,
        Rgba([
            mix(r, color.r),
            mix(g, color.g),
            mix(b, color.b),
            a.max(coverage),
        ]),
    );
}
