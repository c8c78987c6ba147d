//! Framebuffer and driver for electromechanical flip-dot displays.
//!
//! ## How Flip-Dot Displays Work
//!
//! A flip-dot display is a grid of small discs, black on one side and bright
//! on the other, each sitting on a tiny electromagnet. A short current pulse
//! through a dot's coil flips the disc to one side; the direction of the
//! current decides which. Without current the disc stays where it is, so the
//! display is bistable: an image costs nothing to hold, only to change.
//!
//! ### Signal names
//! - **Row A0 A1 A2** – Row address for the 3-to-8 row decoder
//! - **Row Enable** – Row driver enable (active LOW)
//! - **Row Select** – Polarity of the row drivers
//! - **Col A0 A1 A2 / B0 B1** – Column segment and column group address for the column driver
//! - **Data** – Polarity of the column driver
//! - **Enable 0–3** – Fires the column driver of one panel
//! - **Supply Enable** – Switches the flip supply for the coil drivers
//!
//! ### Flipping one dot
//! 1. Switch on the supply, then enable the row drivers.
//! 2. Program the column address (group and segment) and the row address.
//! 3. With the row drivers disabled, set row polarity and data to the
//!    wanted colour, then enable the row drivers again.
//! 4. Raise the enable line of the panel holding the dot for about 250 µs.
//!    Shorter pulses may not flip the disc, longer ones heat the drivers.
//!
//! Address and polarity lines are shared by all panels, so after the first
//! dot of a column and row only the panel enable has to change.
//!
//! ### Implications for software
//! - Every changed dot costs a pulse of a few hundred microseconds. A full
//!   84 x 7 redraw takes well over a tenth of a second and is clearly
//!   audible.
//! - Dots should only be flipped when they actually change. The driver keeps
//!   a shadow copy of what the display shows and commits only the
//!   difference.
//! - The coil supply draws current while idle and should be switched off
//!   between updates.
//!
//! ## Crate Layout
//!
//! - [`buffer::PixelBuffer`]: bit-packed canvas with strict bounds checks,
//!   blitting, scrolling and an `embedded-graphics`
//!   [`DrawTarget`](embedded_graphics::draw_target::DrawTarget) impl.
//! - [`driver::FlipDot`]: owns the [`pins::PinBank`], commits the canvas
//!   with minimal flips, caches address lines and handles supply power.
//! - [`transition`]: scroll, dissolve and ticker animations.
//! - [`text`] and [`font`]: string layout on top of a [`font::GlyphRenderer`],
//!   with the bundled [`font::NarrowFont`].
//!
//! The driver is generic over an [`embedded_hal::digital::OutputPin`], an
//! [`embedded_hal::delay::DelayNs`] and a [`clock::Clock`], so it runs on a
//! microcontroller as well as on a Linux board with GPIO access.
//!
//! ## Available Feature Flags
//!
//! ### `std` Feature
//! Adds [`clock::StdClock`], a [`clock::Clock`] backed by
//! `std::time::Instant`.
//!
//! ### `defmt` Feature
//! Implements `defmt::Format` for the public types and logs display
//! start-up, supply power changes, dead-pixel shifts and transitions with
//! `defmt`.
//!
//! ```toml
//! [dependencies]
//! flipdot-framebuffer = { version = "0.1.0", features = ["defmt"] }
//! ```
#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod address;
pub mod buffer;
pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod font;
pub mod pins;
pub mod text;
pub mod transition;

#[cfg(test)]
pub(crate) mod testing;

pub use buffer::PixelBuffer;
pub use config::FlipDotConfig;
pub use driver::{FlipDot, PowerState, ShowOptions};
pub use error::{BufferError, ConfigError, Error, ParseError};

/// Computes the number of bytes one column of `height` dots occupies
///
/// # Arguments
///
/// * `height` - Number of rows in the display
///
/// # Returns
///
/// Bytes per column in a [`PixelBuffer`]
#[must_use]
pub const fn compute_bytes_per_column(height: usize) -> usize {
    height.div_ceil(8)
}

/// Computes the size in bytes of a [`PixelBuffer`]
#[must_use]
pub const fn compute_buffer_size(width: usize, height: usize) -> usize {
    width * compute_bytes_per_column(height)
}
