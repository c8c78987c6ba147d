//! Minimal-diff flip-dot driver.
//!
//! [`FlipDot`] owns two [`PixelBuffer`]s: the canvas callers draw on and a
//! shadow copy of what the dots physically show. A commit walks the display,
//! compares both and pulses only the dots that differ, so a static image
//! costs nothing to re-commit and wear on the mechanics stays minimal.
//!
//! Address lines are cached between flips. The commit loop visits every
//! panel for a fixed column and row before moving on, which means the
//! column and row lines are programmed once and only the panel enable
//! changes.
//!
//! The flip supply is switched on lazily by the first flip and switched off
//! again by [`FlipDot::poll`] once the display has been idle for
//! [`FlipDotConfig::power_timeout`]. The driver has no timer of its own; call
//! `poll` from the main loop.
//!
//! # Example
//! ```rust,ignore
//! use flipdot_framebuffer::{FlipDot, FlipDotConfig, ShowOptions};
//!
//! let mut display = FlipDot::new(bank, delay, clock, FlipDotConfig::default())?;
//! display.set_pixel(3, 2, true)?;
//! display.show()?;
//! loop {
//!     display.poll()?;
//! }
//! ```

use core::convert::Infallible;
use core::time::Duration;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{OriginDimensions, Size};
use embedded_graphics::Pixel;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::address::{ColumnAddress, PhysicalAddress, RowAddress};
use crate::buffer::PixelBuffer;
use crate::clock::{busy_wait_until, Clock};
use crate::config::FlipDotConfig;
use crate::error::{BufferError, ConfigError, Error};
use crate::pins::{PinBank, Signal};

/// State of the flip supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Supply and row drivers are off
    Unpowered,
    /// Supply is on and row drivers are enabled
    Powered,
}

/// Options for [`FlipDot::show_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowOptions {
    /// Flip every dot, ignoring what the display is believed to show
    pub keyframe: bool,
    /// Shift the canvas away from the dead pixel before committing
    pub avoid_dead: bool,
    /// Pause [`FlipDotConfig::slow_flip_delay`] after every flip
    pub slow: bool,
}

impl Default for ShowOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowOptions {
    /// Differential commit with dead-pixel avoidance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keyframe: false,
            avoid_dead: true,
            slow: false,
        }
    }

    /// Set [`ShowOptions::keyframe`].
    #[must_use]
    pub const fn keyframe(mut self, keyframe: bool) -> Self {
        self.keyframe = keyframe;
        self
    }

    /// Set [`ShowOptions::avoid_dead`].
    #[must_use]
    pub const fn avoid_dead(mut self, avoid_dead: bool) -> Self {
        self.avoid_dead = avoid_dead;
        self
    }

    /// Set [`ShowOptions::slow`].
    #[must_use]
    pub const fn slow(mut self, slow: bool) -> Self {
        self.slow = slow;
        self
    }
}

/// Flip-dot display session.
///
/// `P` is the output pin type, `D` the blocking delay and `C` the monotonic
/// clock. The driver is the only owner of the pins for its whole life; get
/// them back with [`FlipDot::shutdown`].
pub struct FlipDot<P, D, C> {
    config: FlipDotConfig,
    pins: PinBank<P>,
    pub(crate) delay: D,
    clock: C,
    pub(crate) current: PixelBuffer,
    pub(crate) last_shown: PixelBuffer,
    last_row: Option<RowAddress>,
    last_column: Option<ColumnAddress>,
    last_color: Option<bool>,
    power: PowerState,
    last_flip_us: u64,
}

impl<P, D, C> FlipDot<P, D, C> {
    /// Geometry and timing of this display.
    #[must_use]
    pub fn config(&self) -> &FlipDotConfig {
        &self.config
    }

    /// Width in dots.
    #[must_use]
    pub fn width(&self) -> usize {
        self.config.width
    }

    /// Height in dots.
    #[must_use]
    pub fn height(&self) -> usize {
        self.config.height
    }

    /// Current state of the flip supply.
    #[must_use]
    pub fn power_state(&self) -> PowerState {
        self.power
    }

    /// The canvas that the next commit will show.
    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.current
    }

    /// Mutable access to the canvas.
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.current
    }

    /// See [`PixelBuffer::set_pixel`].
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] for coordinates outside the
    /// display.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: bool) -> Result<(), BufferError> {
        self.current.set_pixel(x, y, color)
    }

    /// See [`PixelBuffer::get_pixel`].
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::OutOfRange`] for coordinates outside the
    /// display.
    pub fn get_pixel(&self, x: usize, y: usize) -> Result<bool, BufferError> {
        self.current.get_pixel(x, y)
    }

    /// Set every dot of the canvas to `color`.
    pub fn fill(&mut self, color: bool) {
        self.current.fill(color);
    }

    /// Clear the canvas.
    pub fn clear(&mut self) {
        self.current.fill(false);
    }

    /// See [`PixelBuffer::copy_buffer`].
    pub fn copy_buffer(&mut self, source: &PixelBuffer, x0: i32, y0: i32) {
        self.current.copy_buffer(source, x0, y0);
    }

    /// See [`PixelBuffer::scroll`].
    pub fn scroll(&mut self, dx: i32, dy: i32) {
        self.current.scroll(dx, dy);
    }

    /// Shift the canvas one column away from the dead pixel if it is set.
    ///
    /// Moves right when the left neighbour is clear, otherwise left when the
    /// right neighbour is clear. A neighbour past the display edge counts as
    /// set. Returns whether the canvas moved.
    pub fn avoid_dead_pixel(&mut self) -> bool {
        let Some((x, y)) = self.config.dead_pixel else {
            return false;
        };
        if !self.current.read(x, y) {
            return false;
        }
        let left_set = x == 0 || self.current.read(x - 1, y);
        let right_set = x + 1 >= self.current.width() || self.current.read(x + 1, y);
        let dx = match (left_set, right_set) {
            (false, _) => 1,
            (true, false) => -1,
            (true, true) => return false,
        };
        #[cfg(feature = "defmt")]
        defmt::debug!("shifting canvas by {} to spare dead pixel ({}, {})", dx, x, y);
        self.current.scroll(dx, 0);
        true
    }

    // Logical coordinate of physical dot `(x, y)`.
    fn logical(&self, x: usize, y: usize) -> (usize, usize) {
        if self.config.upside_down {
            (self.config.width - 1 - x, self.config.height - 1 - y)
        } else {
            (x, y)
        }
    }
}

impl<P, D, C> FlipDot<P, D, C>
where
    P: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Take over the display.
    ///
    /// Validates `config`, drives every line to its idle level and clears the
    /// display with a full commit. The shadow buffer starts out all set, so
    /// every dot is flipped once regardless of what it showed before.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for geometry the hardware cannot address and
    /// [`Error::Pin`] if a line cannot be driven.
    pub fn new(
        pins: PinBank<P>,
        delay: D,
        clock: C,
        config: FlipDotConfig,
    ) -> Result<Self, Error<P::Error>> {
        config.validate()?;
        let mut last_shown = PixelBuffer::new(config.width, config.height);
        last_shown.fill(true);
        let mut display = Self {
            config,
            pins,
            delay,
            clock,
            current: PixelBuffer::new(config.width, config.height),
            last_shown,
            last_row: None,
            last_column: None,
            last_color: None,
            power: PowerState::Unpowered,
            last_flip_us: 0,
        };
        display.pins.configure().map_err(Error::Pin)?;
        display.show()?;
        #[cfg(feature = "defmt")]
        defmt::info!(
            "flip-dot display ready: {}x{} on {} panels",
            display.config.width,
            display.config.height,
            display.config.panels
        );
        Ok(display)
    }

    /// Commit the canvas with the default [`ShowOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven.
    pub fn show(&mut self) -> Result<usize, Error<P::Error>> {
        self.show_with(ShowOptions::new())
    }

    /// Commit the canvas to the dots and return the number of flips issued.
    ///
    /// Each dot is flipped at most once, and only if it differs from what the
    /// display shows (or for every dot on a keyframe). The shadow buffer is
    /// synced afterwards even if nothing changed, and the idle power-off
    /// check runs at the end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven. The shadow buffer
    /// keeps the dots flipped so far.
    pub fn show_with(&mut self, opts: ShowOptions) -> Result<usize, Error<P::Error>> {
        if opts.avoid_dead {
            self.avoid_dead_pixel();
        }
        let panel_width = self.config.panel_width();
        let slow_us = duration_as_us(self.config.slow_flip_delay);
        let mut flips = 0;
        for column in 0..panel_width {
            for row in 0..self.config.height {
                for panel in 0..self.config.panels {
                    let (x, y) = self.logical(panel * panel_width + column, row);
                    let color = self.current.read(x, y);
                    if opts.keyframe || color != self.last_shown.read(x, y) {
                        self.flip(x, y, color)?;
                        flips += 1;
                        if opts.slow {
                            self.delay.delay_us(slow_us);
                        }
                    }
                }
            }
        }
        self.last_shown.clone_from(&self.current);
        self.poll()?;
        Ok(flips)
    }

    /// Flip the dot at logical `(x, y)` to `color`, powering up if needed.
    ///
    /// Only the address lines that differ from the previous flip are
    /// reprogrammed. The canvas is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Buffer`] for coordinates outside the display and
    /// [`Error::Pin`] if a line cannot be driven.
    pub fn flip(&mut self, x: usize, y: usize, color: bool) -> Result<(), Error<P::Error>> {
        if x >= self.config.width || y >= self.config.height {
            return Err(BufferError::OutOfRange {
                x,
                y,
                width: self.config.width,
                height: self.config.height,
            }
            .into());
        }
        self.power_on()?;
        let address = PhysicalAddress::resolve(x, y, &self.config);
        self.select_column(address.column)?;
        self.select_row(address.row)?;
        self.select_color(color)?;
        self.pulse(address.panel)?;
        self.last_shown.write(x, y, color);
        self.last_flip_us = self.clock.now_us();
        Ok(())
    }

    /// Enable the flip supply, then the row drivers. No-op when powered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven.
    pub fn power_on(&mut self) -> Result<(), Error<P::Error>> {
        if self.power == PowerState::Powered {
            return Ok(());
        }
        self.set(Signal::SupplyEnable, true)?;
        self.set(Signal::RowEnable, false)?;
        self.power = PowerState::Powered;
        self.last_flip_us = self.clock.now_us();
        #[cfg(feature = "defmt")]
        defmt::debug!("flip supply on");
        Ok(())
    }

    /// Disable the row drivers, then the flip supply. No-op when unpowered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven.
    pub fn power_off(&mut self) -> Result<(), Error<P::Error>> {
        if self.power == PowerState::Unpowered {
            return Ok(());
        }
        // A partial sequence must be redone in full by the next power_on.
        self.power = PowerState::Unpowered;
        self.set(Signal::RowEnable, true)?;
        self.set(Signal::SupplyEnable, false)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("flip supply off");
        Ok(())
    }

    /// Power off once the display has been idle for longer than
    /// [`FlipDotConfig::power_timeout`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven.
    pub fn poll(&mut self) -> Result<(), Error<P::Error>> {
        if self.power == PowerState::Unpowered {
            return Ok(());
        }
        let idle = self.clock.now_us().saturating_sub(self.last_flip_us);
        if idle > duration_as_us_u64(self.config.power_timeout) {
            self.power_off()?;
        }
        Ok(())
    }

    /// Clear the display, switch off the supply and hand back the pins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven.
    pub fn shutdown(mut self) -> Result<PinBank<P>, Error<P::Error>> {
        self.current.fill(false);
        self.show_with(ShowOptions::new().avoid_dead(false))?;
        self.power_off()?;
        #[cfg(feature = "defmt")]
        defmt::info!("flip-dot display shut down");
        Ok(self.pins)
    }

    fn set(&mut self, signal: Signal, level: bool) -> Result<(), Error<P::Error>> {
        self.pins.set(signal, level).map_err(Error::Pin)
    }

    fn select_column(&mut self, column: ColumnAddress) -> Result<(), Error<P::Error>> {
        if self.last_column == Some(column) {
            return Ok(());
        }
        self.last_column = None;
        self.set(Signal::ColA0, column.a0())?;
        self.set(Signal::ColA1, column.a1())?;
        self.set(Signal::ColA2, column.a2())?;
        self.set(Signal::ColB0, column.b0())?;
        self.set(Signal::ColB1, column.b1())?;
        self.last_column = Some(column);
        Ok(())
    }

    fn select_row(&mut self, row: RowAddress) -> Result<(), Error<P::Error>> {
        if self.last_row == Some(row) {
            return Ok(());
        }
        self.last_row = None;
        self.set(Signal::RowA0, row.a0())?;
        self.set(Signal::RowA1, row.a1())?;
        self.set(Signal::RowA2, row.a2())?;
        self.last_row = Some(row);
        Ok(())
    }

    // Polarity must only change while the row drivers are disabled.
    fn select_color(&mut self, color: bool) -> Result<(), Error<P::Error>> {
        if self.last_color == Some(color) {
            return Ok(());
        }
        self.last_color = None;
        self.set(Signal::RowEnable, true)?;
        self.set(Signal::RowSelect, !color)?;
        self.set(Signal::Data, color)?;
        self.set(Signal::RowEnable, false)?;
        self.last_color = Some(color);
        Ok(())
    }

    fn pulse(&mut self, panel: usize) -> Result<(), Error<P::Error>> {
        let enable = Signal::panel_enable(panel).ok_or(Error::Config(ConfigError::TooManyPanels))?;
        self.set(enable, true)?;
        let deadline = self
            .clock
            .now_us()
            .saturating_add(duration_as_us_u64(self.config.pulse_width));
        busy_wait_until(&self.clock, deadline);
        self.set(enable, false)
    }
}

/// Saturating conversion for [`DelayNs::delay_us`].
pub(crate) fn duration_as_us(d: Duration) -> u32 {
    u32::try_from(d.as_micros()).unwrap_or(u32::MAX)
}

fn duration_as_us_u64(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

impl<P, D, C> OriginDimensions for FlipDot<P, D, C> {
    fn size(&self) -> Size {
        self.current.size()
    }
}

impl<P, D, C> DrawTarget for FlipDot<P, D, C> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.current.draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.current.clear(color)
    }
}
