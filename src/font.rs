//! Glyph rendering.
//!
//! The driver only needs something that turns a string into a
//! [`PixelBuffer`] of glyph columns; that seam is [`GlyphRenderer`]. The
//! crate ships [`NarrowFont`], a hand drawn 5 x 7 font covering printable
//! ASCII and a few extra symbols.
//!
//! Glyphs are stored left aligned without trailing blank columns, one byte
//! per column with the least significant bit at the top. That is exactly the
//! [`PixelBuffer`] layout for a 7 dot tall buffer.

use alloc::vec::Vec;
use core::str::FromStr;

use crate::buffer::PixelBuffer;
use crate::error::{BufferError, ParseError};

/// Font selection passed to a [`GlyphRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontId {
    /// Every glyph centred in a fixed-width cell
    Mono,
    /// Glyphs packed at their natural width
    #[default]
    Variable,
}

impl FromStr for FontId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mono" => Ok(FontId::Mono),
            "variable" => Ok(FontId::Variable),
            _ => Err(ParseError::UnsupportedFont),
        }
    }
}

/// Turns text into glyph columns.
pub trait GlyphRenderer {
    /// Render `text` left aligned into a buffer exactly as wide as the text.
    ///
    /// Characters without a glyph render as a blank glyph. Transliterating
    /// them beforehand is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the glyph columns do not form a valid buffer.
    fn render(&self, text: &str, font: FontId) -> Result<PixelBuffer, BufferError>;
}

/// The built-in 5 x 7 font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrowFont {
    /// Blank columns appended after every glyph
    pub padding: usize,
}

impl NarrowFont {
    /// Cell width in mono mode and widest glyph
    pub const WIDTH: usize = 5;
    /// Glyph height in dots
    pub const HEIGHT: usize = 7;

    /// Font with the default one column gap between glyphs.
    #[must_use]
    pub const fn new() -> Self {
        Self { padding: 1 }
    }

    /// Columns of `c`, or `None` if the font has no glyph for it.
    #[must_use]
    pub fn glyph(c: char) -> Option<&'static [u8]> {
        let columns: &'static [u8] = match c {
            ' ' => &[0x00],
            '!' => &[0x5F],
            '"' => &[0x03, 0x00, 0x03],
            '#' => &[0x14, 0x7F, 0x14, 0x7F, 0x14],
            '$' => &[0x46, 0x49, 0x7F, 0x49, 0x31],
            '%' => &[0x63, 0x13, 0x08, 0x64, 0x63],
            '&' => &[0x36, 0x49, 0x55, 0x22, 0x50],
            '\'' => &[0x03],
            '(' => &[0x3E, 0x41],
            ')' => &[0x41, 0x3E],
            '*' => &[0x2A, 0x1C, 0x7F, 0x1C, 0x2A],
            '+' => &[0x08, 0x1C, 0x08],
            ',' => &[0x60],
            '-' => &[0x08, 0x08, 0x08],
            '.' => &[0x40],
            '/' => &[0x60, 0x1C, 0x03],
            '0' => &[0x3E, 0x41, 0x41, 0x3E],
            '1' => &[0x00, 0x42, 0x7F, 0x40],
            '2' => &[0x62, 0x51, 0x49, 0x46],
            '3' => &[0x22, 0x49, 0x49, 0x36],
            '4' => &[0x0F, 0x08, 0x08, 0x7F],
            '5' => &[0x4F, 0x49, 0x49, 0x31],
            '6' => &[0x3E, 0x49, 0x49, 0x32],
            '7' => &[0x01, 0x71, 0x09, 0x07],
            '8' => &[0x36, 0x49, 0x49, 0x36],
            '9' => &[0x26, 0x49, 0x49, 0x3E],
            ':' => &[0x22],
            ';' => &[0x62],
            '<' => &[0x08, 0x14, 0x22],
            '=' => &[0x14, 0x14, 0x14],
            '>' => &[0x22, 0x14, 0x08],
            '?' => &[0x02, 0x01, 0x59, 0x06],
            '@' => &[0x3C, 0x42, 0x5A, 0x5A, 0x4C],
            'A' => &[0x7C, 0x0A, 0x09, 0x0A, 0x7C],
            'B' => &[0x7F, 0x49, 0x49, 0x49, 0x36],
            'C' => &[0x3E, 0x41, 0x41, 0x41],
            'D' => &[0x7F, 0x41, 0x41, 0x41, 0x3E],
            'E' => &[0x7F, 0x49, 0x49, 0x41],
            'F' => &[0x7F, 0x09, 0x09, 0x01],
            'G' => &[0x3E, 0x41, 0x49, 0x49, 0x31],
            'H' => &[0x7F, 0x08, 0x08, 0x7F],
            'I' => &[0x41, 0x7F, 0x41],
            'J' => &[0x30, 0x40, 0x40, 0x3F],
            'K' => &[0x7F, 0x14, 0x22, 0x41],
            'L' => &[0x7F, 0x40, 0x40, 0x40],
            'M' => &[0x7F, 0x02, 0x04, 0x02, 0x7F],
            'N' => &[0x7F, 0x02, 0x1C, 0x20, 0x7F],
            'O' => &[0x3E, 0x41, 0x41, 0x3E],
            'P' => &[0x7F, 0x09, 0x09, 0x06],
            'Q' => &[0x3E, 0x41, 0x51, 0x21, 0x5E],
            'R' => &[0x7F, 0x09, 0x19, 0x29, 0x46],
            'S' => &[0x46, 0x49, 0x49, 0x31],
            'T' => &[0x01, 0x01, 0x7F, 0x01, 0x01],
            'U' => &[0x3F, 0x40, 0x40, 0x40, 0x3F],
            'V' => &[0x1F, 0x20, 0x40, 0x20, 0x1F],
            'W' => &[0x7F, 0x20, 0x10, 0x20, 0x7F],
            'X' => &[0x63, 0x14, 0x08, 0x14, 0x63],
            'Y' => &[0x07, 0x08, 0x70, 0x08, 0x07],
            'Z' => &[0x61, 0x51, 0x49, 0x45, 0x43],
            '[' => &[0x7F, 0x41, 0x41],
            '\\' => &[0x03, 0x1C, 0x60],
            ']' => &[0x41, 0x41, 0x7F],
            '^' => &[0x04, 0x02, 0x01, 0x02, 0x04],
            '_' => &[0x40, 0x40, 0x40],
            '`' => &[0x01, 0x02],
            'a' => &[0x34, 0x54, 0x78],
            'b' => &[0x7F, 0x44, 0x38],
            'c' => &[0x38, 0x44, 0x44],
            'd' => &[0x38, 0x44, 0x7F],
            'e' => &[0x38, 0x54, 0x58],
            'f' => &[0x04, 0x7E, 0x05],
            'g' | 'η' => &[0x48, 0x54, 0x3C],
            'h' | 'θ' => &[0x7F, 0x04, 0x78],
            'i' => &[0x7A],
            'j' => &[0x20, 0x40, 0x3A],
            'k' => &[0x7F, 0x10, 0x68],
            'l' => &[0x3F, 0x40],
            'm' | 'µ' => &[0x7C, 0x04, 0x78, 0x04, 0x78],
            'n' | 'ν' => &[0x7C, 0x04, 0x78],
            'o' => &[0x38, 0x44, 0x38],
            'p' => &[0x7C, 0x14, 0x08],
            'q' => &[0x08, 0x14, 0x7C],
            'r' => &[0x7C, 0x08, 0x04],
            's' => &[0x48, 0x54, 0x24],
            't' => &[0x3F, 0x44, 0x44],
            'u' => &[0x3C, 0x40, 0x7C],
            'v' => &[0x3C, 0x40, 0x20, 0x1C],
            'w' => &[0x3C, 0x40, 0x20, 0x40, 0x3C],
            'x' => &[0x6C, 0x10, 0x6C],
            'y' => &[0x4C, 0x50, 0x3C],
            'z' => &[0x64, 0x54, 0x4C],
            '{' => &[0x08, 0x36, 0x41, 0x41],
            '|' => &[0x7F],
            '}' => &[0x41, 0x41, 0x36, 0x08],
            '~' => &[0x08, 0x04, 0x08, 0x10, 0x08],
            '€' => &[0x14, 0x3E, 0x55, 0x55, 0x41],
            'Ä' => &[0x79, 0x14, 0x12, 0x14, 0x79],
            'ä' => &[0x35, 0x54, 0x54, 0x7D],
            'Ö' => &[0x3D, 0x42, 0x42, 0x42, 0x3D],
            'ö' => &[0x39, 0x44, 0x44, 0x39],
            'Ü' => &[0x3D, 0x40, 0x40, 0x40, 0x3D],
            'ü' => &[0x3D, 0x40, 0x40, 0x3D],
            'ß' => &[0x7E, 0x01, 0x25, 0x1A],
            '°' => &[0x02, 0x05, 0x02],
            '™' => &[0x01, 0x0F, 0x01, 0x00, 0x0F, 0x02, 0x0F],
            '♥' => &[0x0C, 0x12, 0x22, 0x44, 0x22, 0x12, 0x0C],
            'α' => &[0x38, 0x44, 0x44, 0x3C, 0x40],
            'β' => &[0x7F, 0x15, 0x0A],
            'γ' => &[0x0C, 0x70, 0x0C],
            'δ' => &[0x33, 0x4D, 0x49, 0x31],
            'ε' => &[0x28, 0x54, 0x44, 0x28],
            'ζ' => &[0x19, 0x25, 0x23, 0x61],
            'ι' => &[0x3C, 0x40],
            'κ' => &[0x7C, 0x10, 0x6C],
            'π' => &[0x04, 0x7C, 0x04, 0x3C, 0x44],
            // known but not drawn yet, only the gap is rendered
            'λ' | 'ξ' | 'ο' | 'ρ' | 'σ' | 'ς' | 'ϲ' | 'τ' | 'υ' | 'φ' | 'χ' | 'ψ' | 'ω' => &[],
            _ => return None,
        };
        Some(columns)
    }

    fn push_glyph(&self, columns: &mut Vec<u8>, c: char, mono: bool) {
        let glyph = Self::glyph(c).unwrap_or(&[0x00]);
        if mono && glyph.len() < Self::WIDTH {
            let start = columns.len();
            columns.resize(start + (Self::WIDTH - glyph.len()) / 2, 0);
            columns.extend_from_slice(glyph);
            columns.resize(start + Self::WIDTH, 0);
        } else {
            columns.extend_from_slice(glyph);
        }
        columns.resize(columns.len() + self.padding, 0);
    }
}

impl Default for NarrowFont {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphRenderer for NarrowFont {
    fn render(&self, text: &str, font: FontId) -> Result<PixelBuffer, BufferError> {
        let mono = font == FontId::Mono;
        let mut columns = Vec::with_capacity(text.len() * (Self::WIDTH + self.padding));
        for c in text.chars() {
            self.push_glyph(&mut columns, c, mono);
        }
        PixelBuffer::from_bytes(columns.len(), Self::HEIGHT, columns)
    }
}
