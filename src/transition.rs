//! Animated changes between what the display shows and the canvas.
//!
//! Every frame of an animation costs real flips, so the transitions here are
//! built from the same minimal-diff commit as a plain
//! [`FlipDot::show`](crate::driver::FlipDot::show). All of them block until
//! they are finished and return the number of flips they issued.

use alloc::vec::Vec;
use core::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::buffer::PixelBuffer;
use crate::clock::Clock;
use crate::driver::{duration_as_us, FlipDot, ShowOptions};
use crate::error::Error;
use crate::font::{FontId, GlyphRenderer};

/// Pause between dissolve flips when no timing is requested.
pub const DEFAULT_DISSOLVE_DELAY: Duration = Duration::from_millis(10);

/// Timing of [`FlipDot::dissolve_transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DissolveOptions {
    /// Shortest pause after each flip
    pub min_pixel_delay: Option<Duration>,
    /// Time budget spread evenly over the changed dots
    pub total_time: Option<Duration>,
}

impl DissolveOptions {
    /// Pause after each flip when `changed` dots differ.
    ///
    /// A total budget is divided by `changed` and never undercuts the
    /// minimum. Without either setting the pause is
    /// [`DEFAULT_DISSOLVE_DELAY`].
    #[must_use]
    pub fn pixel_delay(&self, changed: usize) -> Duration {
        let share = |total: Duration| {
            if changed == 0 {
                Duration::ZERO
            } else {
                total / u32::try_from(changed).unwrap_or(u32::MAX)
            }
        };
        match (self.min_pixel_delay, self.total_time) {
            (Some(min), None) => min,
            (None, Some(total)) => share(total),
            (Some(min), Some(total)) => min.max(share(total)),
            (None, None) => DEFAULT_DISSOLVE_DELAY,
        }
    }
}

impl<P, D, C> FlipDot<P, D, C>
where
    P: OutputPin,
    D: DelayNs,
    C: Clock,
{
    /// Slide the canvas in vertically, replacing what is shown.
    ///
    /// The canvas is moved off the dead pixel first, as by a normal commit.
    ///
    /// The shown frame and the canvas are stacked with a blank row between
    /// them and moved past the display one row per commit, upwards by
    /// default or downwards if `reverse` is set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven.
    pub fn scroll_transition(&mut self, reverse: bool) -> Result<usize, Error<P::Error>> {
        self.avoid_dead_pixel();
        let stride = self.height() + 1;
        let target = self.current.clone();

        // [new][old][new], each followed by a blank row
        let mut strip = PixelBuffer::new(self.width(), 3 * stride);
        strip.copy_buffer(&target, 0, 0);
        strip.copy_buffer(&self.last_shown, 0, stride as i32);
        strip.copy_buffer(&target, 0, 2 * stride as i32);

        #[cfg(feature = "defmt")]
        defmt::debug!("scroll transition over {} rows", stride);

        let step = if reverse { -1 } else { 1 };
        let mut top = stride as i32;
        let mut flips = 0;
        for _ in 0..stride {
            top += step;
            self.current.fill(false);
            self.current.copy_buffer(&strip, 0, -top);
            flips += self.show_with(ShowOptions::new().avoid_dead(false))?;
        }
        Ok(flips)
    }

    /// Flip every dot that differs from the canvas once, in random order.
    ///
    /// Dead-pixel avoidance runs first. The order is a uniform shuffle of all
    /// coordinates drawn from `rng`.
    /// After each flip the driver pauses for
    /// [`DissolveOptions::pixel_delay`]. With nothing to change it returns
    /// right away.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if a line cannot be driven.
    pub fn dissolve_transition<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        opts: DissolveOptions,
    ) -> Result<usize, Error<P::Error>> {
        self.avoid_dead_pixel();
        let changed = self.current.diff(&self.last_shown);
        #[cfg(feature = "defmt")]
        defmt::debug!("dissolve transition over {} dots", changed);
        if changed == 0 {
            self.last_shown.clone_from(&self.current);
            return Ok(0);
        }

        let (width, height) = (self.width(), self.height());
        let mut order: Vec<(usize, usize)> = (0..width)
            .flat_map(|x| (0..height).map(move |y| (x, y)))
            .collect();
        order.shuffle(rng);

        let delay_us = duration_as_us(opts.pixel_delay(changed));
        let mut flips = 0;
        for (x, y) in order {
            let color = self.current.read(x, y);
            if color != self.last_shown.read(x, y) {
                self.flip(x, y, color)?;
                flips += 1;
                self.delay.delay_us(delay_us);
            }
        }
        self.last_shown.clone_from(&self.current);
        self.poll()?;
        Ok(flips)
    }

    /// Run `text` across the display from the right edge until it has left
    /// on the left.
    ///
    /// Each step clears the canvas and commits it with the text moved one
    /// column to the left. The canvas ends up blank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Buffer`] if the renderer fails and [`Error::Pin`]
    /// if a line cannot be driven.
    pub fn ticker<G: GlyphRenderer + ?Sized>(
        &mut self,
        renderer: &G,
        text: &str,
        font: FontId,
    ) -> Result<usize, Error<P::Error>> {
        let rendered = renderer.render(text, font)?;
        let mut flips = 0;
        for x in (-(rendered.width() as i32)..self.width() as i32).rev() {
            self.current.fill(false);
            self.current.copy_buffer(&rendered, x, 0);
            flips += self.show_with(ShowOptions::new().avoid_dead(false))?;
        }
        self.current.fill(false);
        flips += self.show_with(ShowOptions::new().avoid_dead(false))?;
        Ok(flips)
    }
}
