//! Error types for buffer access, display configuration and the driver.

use core::fmt;

/// Errors raised by [`PixelBuffer`](crate::buffer::PixelBuffer) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferError {
    /// A coordinate fell outside `[0, width) x [0, height)`.
    OutOfRange {
        /// Requested column
        x: usize,
        /// Requested row
        y: usize,
        /// Width of the buffer
        width: usize,
        /// Height of the buffer
        height: usize,
    },
    /// Pre-filled backing storage did not match the computed buffer size.
    SizeMismatch {
        /// Size in bytes required by the buffer geometry
        expected: usize,
        /// Size in bytes of the storage that was supplied
        actual: usize,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::OutOfRange {
                x,
                y,
                width,
                height,
            } => write!(f, "pixel ({x}, {y}) is outside {width}x{height}"),
            BufferError::SizeMismatch { expected, actual } => {
                write!(f, "buffer must be {expected} bytes, got {actual}")
            }
        }
    }
}

/// Display geometry the selector hardware cannot address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width, height or panel count is zero.
    Empty,
    /// The width does not split into equal-width panels.
    UnevenPanels,
    /// Only four panel enable lines exist.
    TooManyPanels,
    /// A column driver addresses at most 4 groups of 7 columns.
    PanelTooWide,
    /// The row decoder has three address lines.
    TooManyRows,
    /// The configured dead pixel is not on the display.
    DeadPixelOutOfRange,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigError::Empty => "display has no dots",
            ConfigError::UnevenPanels => "width is not a multiple of the panel count",
            ConfigError::TooManyPanels => "at most 4 panels are supported",
            ConfigError::PanelTooWide => "panels are at most 28 columns wide",
            ConfigError::TooManyRows => "at most 8 rows are supported",
            ConfigError::DeadPixelOutOfRange => "dead pixel is outside the display",
        })
    }
}

/// A textual alignment or font identifier was not recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Not one of `left`, `center` or `right`.
    UnsupportedAlign,
    /// Not a font the glyph renderer provides.
    UnsupportedFont,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseError::UnsupportedAlign => "align must be left, center or right",
            ParseError::UnsupportedFont => "unsupported font",
        })
    }
}

/// Errors returned by the [`FlipDot`](crate::driver::FlipDot) driver.
///
/// `E` is the error type of the underlying output pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Writing to a signal line failed. Not retried.
    Pin(E),
    /// A buffer operation failed.
    Buffer(BufferError),
    /// The display configuration was rejected.
    Config(ConfigError),
    /// An alignment or font identifier could not be parsed.
    Parse(ParseError),
}

impl<E> From<BufferError> for Error<E> {
    fn from(e: BufferError) -> Self {
        Error::Buffer(e)
    }
}

impl<E> From<ParseError> for Error<E> {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Pin(e) => write!(f, "pin error: {e:?}"),
            Error::Buffer(e) => write!(f, "buffer error: {e}"),
            Error::Config(e) => write!(f, "invalid configuration: {e}"),
            Error::Parse(e) => fmt::Display::fmt(e, f),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Pin(_e) => defmt::write!(f, "Pin error"),
            Error::Buffer(e) => defmt::write!(f, "Buffer error: {}", e),
            Error::Config(e) => defmt::write!(f, "Config error: {}", e),
            Error::Parse(e) => defmt::write!(f, "Parse error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::*;

    #[test]
    fn test_buffer_error_display() {
        let e = BufferError::OutOfRange {
            x: 84,
            y: 0,
            width: 84,
            height: 7,
        };
        assert_eq!(e.to_string(), "pixel (84, 0) is outside 84x7");

        let e = BufferError::SizeMismatch {
            expected: 84,
            actual: 83,
        };
        assert_eq!(e.to_string(), "buffer must be 84 bytes, got 83");
    }

    #[test]
    fn test_error_from_conversions() {
        let e: Error<()> = BufferError::SizeMismatch {
            expected: 1,
            actual: 2,
        }
        .into();
        assert!(matches!(e, Error::Buffer(BufferError::SizeMismatch { .. })));

        let e: Error<()> = ConfigError::TooManyPanels.into();
        assert_eq!(e, Error::Config(ConfigError::TooManyPanels));

        let e: Error<()> = ParseError::UnsupportedFont.into();
        assert_eq!(e, Error::Parse(ParseError::UnsupportedFont));
    }

    #[test]
    fn test_parse_error_propagates_into_driver_error() {
        fn align_of(name: &str) -> Result<crate::text::Align, Error<()>> {
            Ok(name.parse()?)
        }
        assert_eq!(align_of("right"), Ok(crate::text::Align::Right));
        assert_eq!(align_of("middle"), Err(Error::Parse(ParseError::UnsupportedAlign)));
    }

    #[test]
    fn test_error_display() {
        let e: Error<()> = ConfigError::PanelTooWide.into();
        assert_eq!(e.to_string(), "invalid configuration: panels are at most 28 columns wide");

        let e: Error<()> = ParseError::UnsupportedAlign.into();
        assert_eq!(e.to_string(), "align must be left, center or right");

        let e: Error<&str> = Error::Pin("stuck");
        assert_eq!(e.to_string(), "pin error: \"stuck\"");
    }
}
