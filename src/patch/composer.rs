use std::path::Path;
use tracing::debug;

use super::{callsign, resolve_origin, selcal, FlightPatch, Rectangle, TextStyle};
use crate::error::ComposeError;
use crate::render::{load_image, Canvas, TextRenderer};

/// Which parts of a patch get drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeFlags {
    pub registration: bool,
    pub sel_cal_code: bool,
    pub callsign: bool,
    pub descriptions: bool,
}

impl ComposeFlags {
    pub fn all() -> Self {
        Self {
            registration: true,
            sel_cal_code: true,
            callsign: true,
            descriptions: true,
        }
    }

    pub fn none() -> Self {
        Self {
            registration: false,
            sel_cal_code: false,
            callsign: false,
            descriptions: false,
        }
    }
}

impl Default for ComposeFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// Draws the text items of a [`FlightPatch`] onto one canvas.
///
/// Items are drawn in a fixed order (registration, SelCal code, callsign,
/// then descriptions) so later items cover earlier ones where they overlap.
pub struct FlightPatchComposer<R> {
    canvas: Canvas,
    renderer: R,
}

impl<R: TextRenderer> FlightPatchComposer<R> {
    pub fn new(canvas: Canvas, renderer: R) -> Self {
        Self { canvas, renderer }
    }

    /// Composer drawing onto the image at `path`.
    pub fn from_image(path: impl AsRef<Path>, renderer: R) -> Result<Self, ComposeError> {
        Ok(Self::new(load_image(path)?, renderer))
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Draw the selected items and hand back the canvas. On error the
    /// canvas is dropped along with the composer.
    pub fn compose(mut self, patch: &FlightPatch, flags: ComposeFlags) -> Result<Canvas, ComposeError> {
        if flags.registration {
            self.draw_text(
                &patch.aircraft_registration,
                &patch.aircraft_registration_style,
                &patch.rectangle,
            )?;
        }

        if flags.sel_cal_code {
            let code = patch.sel_cal_code.full_code(selcal::DEFAULT_DELIMITER);
            self.draw_text(&code, &patch.sel_cal_code_style, &patch.rectangle)?;
        }

        if flags.callsign {
            let value = patch.callsign.full_value(callsign::DEFAULT_DELIMITER);
            self.draw_text(&value, &patch.callsign_style, &patch.rectangle)?;
        }

        if flags.descriptions {
            for description in &patch.descriptions {
                self.draw_text(&description.text, &description.style, &patch.rectangle)?;
            }
        }

        Ok(self.canvas)
    }

    fn draw_text(
        &mut self,
        text: &str,
        style: &TextStyle,
        rectangle: &Rectangle,
    ) -> Result<(), ComposeError> {
        let (width, height) = self
            .renderer
            .measure_text(text, &style.font_name, style.font_size)?;
        let (x, y) = resolve_origin(
            rectangle,
            &style.position,
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );

        debug!("✏️  Drawing '{}' ({}x{}) at ({}, {})", text, width, height, x, y);

        self.renderer.draw_text(
            &mut self.canvas,
            x,
            y,
            text,
            style.text_color,
            &style.font_name,
            style.font_size,
        )
    }
}
