//! Placing rendered text on the display.

use alloc::string::String;
use core::str::FromStr;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::buffer::PixelBuffer;
use crate::clock::Clock;
use crate::driver::FlipDot;
use crate::error::{BufferError, Error, ParseError};
use crate::font::{FontId, GlyphRenderer, NarrowFont};

/// Horizontal placement of a rendered string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Align {
    /// Flush with the left edge
    Left,
    /// Centred, rounding towards the left
    #[default]
    Center,
    /// Flush with the right edge
    Right,
}

impl Align {
    /// Left edge of an item `item_width` wide on a display `display_width`
    /// wide. Negative when the item is wider than the display.
    #[must_use]
    pub fn x_offset(self, display_width: usize, item_width: usize) -> i32 {
        let (display, item) = (display_width as i32, item_width as i32);
        match self {
            Align::Left => 0,
            Align::Center => display / 2 - item / 2,
            Align::Right => display - item,
        }
    }
}

impl FromStr for Align {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Align::Left),
            "center" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            _ => Err(ParseError::UnsupportedAlign),
        }
    }
}

/// How [`FlipDot::draw_text`] lays out and commits a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOptions {
    /// Horizontal placement
    pub align: Align,
    /// Glyph spacing
    pub font: FontId,
    /// Row of the top of the glyphs, may be negative
    pub vpos: i32,
    /// Clear the canvas first
    pub clear: bool,
    /// Commit right away
    pub show: bool,
    /// Shorten text that does not fit and end it with `...`
    pub cutoff: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            align: Align::Center,
            font: FontId::Variable,
            vpos: 0,
            clear: true,
            show: true,
            cutoff: true,
        }
    }
}

/// Render `text`, dropping trailing characters in favour of an ellipsis until
/// it fits `width`. Returns just the ellipsis if no prefix fits.
fn render_fitting<G: GlyphRenderer + ?Sized>(
    renderer: &G,
    text: &str,
    font: FontId,
    width: usize,
) -> Result<PixelBuffer, BufferError> {
    let mut rendered = renderer.render(text, font)?;
    let mut end = text.len();
    let mut shortened = String::with_capacity(text.len() + 3);
    while rendered.width() > width && end > 0 {
        end = text[..end].char_indices().next_back().map_or(0, |(i, _)| i);
        shortened.clear();
        shortened.push_str(&text[..end]);
        shortened.push_str("...");
        rendered = renderer.render(&shortened, font)?;
    }
    Ok(rendered)
}

impl<P, D, C> FlipDot<P, D, C>
where
    P: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Render `text` with `renderer` and place it on the canvas.
    ///
    /// Rendering happens before the canvas is touched, so a failure leaves
    /// it unchanged. Returns the number of flips if `opts.show` commits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Buffer`] if the renderer fails and [`Error::Pin`]
    /// if the commit cannot drive a line.
    pub fn draw_text<G: GlyphRenderer + ?Sized>(
        &mut self,
        renderer: &G,
        text: &str,
        opts: &TextOptions,
    ) -> Result<usize, Error<P::Error>> {
        let rendered = if opts.cutoff {
            render_fitting(renderer, text, opts.font, self.width())?
        } else {
            renderer.render(text, opts.font)?
        };
        if opts.clear {
            self.clear();
        }
        let x = opts.align.x_offset(self.width(), rendered.width());
        self.copy_buffer(&rendered, x, opts.vpos);
        if opts.show {
            self.show()
        } else {
            Ok(0)
        }
    }

    /// [`FlipDot::draw_text`] with the built-in [`NarrowFont`].
    ///
    /// # Errors
    ///
    /// See [`FlipDot::draw_text`].
    pub fn text(&mut self, text: &str, opts: &TextOptions) -> Result<usize, Error<P::Error>> {
        self.draw_text(&NarrowFont::new(), text, opts)
    }
}
