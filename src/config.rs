//! Display geometry and timing.

use core::time::Duration;

use crate::address::{MAX_PANELS, MAX_PANEL_WIDTH, MAX_ROWS};
use crate::error::ConfigError;

/// Width of the enable pulse that flips a dot.
///
/// 250 µs flips reliably. Shorter pulses under-flip and longer ones stress
/// the drivers.
pub const DEFAULT_PULSE_WIDTH: Duration = Duration::from_micros(250);

/// How long the supply stays on after the last flip.
pub const DEFAULT_POWER_TIMEOUT: Duration = Duration::from_millis(2000);

/// Pause after each flip of a slow commit.
pub const DEFAULT_SLOW_FLIP_DELAY: Duration = Duration::from_millis(10);

/// Known unreliable dot on the reference display.
pub const DEFAULT_DEAD_PIXEL: (usize, usize) = (45, 5);

/// Description of one physical flip-dot display.
///
/// The default matches a 84 x 7 display built from three 28 column panels
/// that is mounted upside down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipDotConfig {
    /// Total width in dots
    pub width: usize,
    /// Height in dots
    pub height: usize,
    /// Number of equal-width panels tiled left to right
    pub panels: usize,
    /// Display is rotated by 180 degrees
    pub upside_down: bool,
    /// Width of the panel enable pulse
    pub pulse_width: Duration,
    /// Idle time after the last flip before the supply is switched off
    pub power_timeout: Duration,
    /// Pause after every flip when committing slowly
    pub slow_flip_delay: Duration,
    /// Logical coordinate of a dot that should be kept clear if possible
    pub dead_pixel: Option<(usize, usize)>,
}

impl Default for FlipDotConfig {
    fn default() -> Self {
        Self {
            width: 84,
            height: 7,
            panels: 3,
            upside_down: true,
            pulse_width: DEFAULT_PULSE_WIDTH,
            power_timeout: DEFAULT_POWER_TIMEOUT,
            slow_flip_delay: DEFAULT_SLOW_FLIP_DELAY,
            dead_pixel: Some(DEFAULT_DEAD_PIXEL),
        }
    }
}

impl FlipDotConfig {
    /// Width of a single panel in dots.
    #[must_use]
    pub const fn panel_width(&self) -> usize {
        self.width / self.panels
    }

    /// Check that the geometry can be driven by the selector hardware.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 || self.panels == 0 {
            return Err(ConfigError::Empty);
        }
        if self.panels > MAX_PANELS {
            return Err(ConfigError::TooManyPanels);
        }
        if self.width % self.panels != 0 {
            return Err(ConfigError::UnevenPanels);
        }
        if self.panel_width() > MAX_PANEL_WIDTH {
            return Err(ConfigError::PanelTooWide);
        }
        if self.height > MAX_ROWS {
            return Err(ConfigError::TooManyRows);
        }
        if let Some((x, y)) = self.dead_pixel {
            if x >= self.width || y >= self.height {
                return Err(ConfigError::DeadPixelOutOfRange);
            }
        }
        Ok(())
    }
}
