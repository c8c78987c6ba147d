//! Signal lines of the flip-dot controller.
//!
//! The driver talks to sixteen digital outputs. They are held in a
//! [`PinBank`] indexed by [`Signal`], so a missing or misspelled line is a
//! compile error rather than a runtime lookup failure.
//!
//! # Example
//! ```rust,ignore
//! use flipdot_framebuffer::pins::{FlipDotPins, PinBank};
//!
//! let bank: PinBank<_> = FlipDotPins {
//!     row_a0: gpio19, row_a1: gpio16, row_a2: gpio26,
//!     row_enable: gpio20, row_select: gpio21,
//!     col_a0: gpio13, col_a1: gpio12, col_a2: gpio6,
//!     col_b0: gpio7, col_b1: gpio8, data: gpio5,
//!     enable0: gpio10, enable1: gpio9, enable2: gpio25, enable3: gpio23,
//!     supply_enable: gpio24,
//! }
//! .into();
//! ```

use embedded_hal::digital::OutputPin;

/// Number of signal lines
pub const SIGNAL_COUNT: usize = 16;

/// A named signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Signal {
    /// Row decoder address bit 0
    RowA0,
    /// Row decoder address bit 1
    RowA1,
    /// Row decoder address bit 2
    RowA2,
    /// Row driver enable, active low
    RowEnable,
    /// Row driver polarity select
    RowSelect,
    /// Column segment address bit 0
    ColA0,
    /// Column segment address bit 1
    ColA1,
    /// Column segment address bit 2
    ColA2,
    /// Column group address bit 0
    ColB0,
    /// Column group address bit 1
    ColB1,
    /// Column driver data (dot polarity)
    Data,
    /// Enable line of panel 0
    Enable0,
    /// Enable line of panel 1
    Enable1,
    /// Enable line of panel 2
    Enable2,
    /// Enable line of panel 3
    Enable3,
    /// Flip supply (Vs) enable
    SupplyEnable,
}

impl Signal {
    /// All signals in index order.
    pub const ALL: [Signal; SIGNAL_COUNT] = [
        Signal::RowA0,
        Signal::RowA1,
        Signal::RowA2,
        Signal::RowEnable,
        Signal::RowSelect,
        Signal::ColA0,
        Signal::ColA1,
        Signal::ColA2,
        Signal::ColB0,
        Signal::ColB1,
        Signal::Data,
        Signal::Enable0,
        Signal::Enable1,
        Signal::Enable2,
        Signal::Enable3,
        Signal::SupplyEnable,
    ];

    /// Position of this signal in a [`PinBank`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Enable line of `panel`. Panels past the fourth map to `None`.
    #[must_use]
    pub const fn panel_enable(panel: usize) -> Option<Signal> {
        match panel {
            0 => Some(Signal::Enable0),
            1 => Some(Signal::Enable1),
            2 => Some(Signal::Enable2),
            3 => Some(Signal::Enable3),
            _ => None,
        }
    }

    /// Level the line is driven to before the driver takes over.
    ///
    /// Everything starts low except the active-low row enable, which starts
    /// high so the row drivers are off.
    #[must_use]
    pub const fn initial_level(self) -> bool {
        matches!(self, Signal::RowEnable)
    }
}

/// Named pins, in the order they are wired on the controller board.
///
/// Convert into a [`PinBank`] with `into()`.
#[allow(missing_docs)]
pub struct FlipDotPins<P> {
    pub row_a0: P,
    pub row_a1: P,
    pub row_a2: P,
    pub row_enable: P,
    pub row_select: P,
    pub col_a0: P,
    pub col_a1: P,
    pub col_a2: P,
    pub col_b0: P,
    pub col_b1: P,
    pub data: P,
    pub enable0: P,
    pub enable1: P,
    pub enable2: P,
    pub enable3: P,
    pub supply_enable: P,
}

impl<P> From<FlipDotPins<P>> for PinBank<P> {
    fn from(p: FlipDotPins<P>) -> Self {
        PinBank::new([
            p.row_a0,
            p.row_a1,
            p.row_a2,
            p.row_enable,
            p.row_select,
            p.col_a0,
            p.col_a1,
            p.col_a2,
            p.col_b0,
            p.col_b1,
            p.data,
            p.enable0,
            p.enable1,
            p.enable2,
            p.enable3,
            p.supply_enable,
        ])
    }
}

/// Exclusive owner of every signal line.
///
/// Apart from the pins themselves the bank only remembers the level each
/// line was last driven to.
pub struct PinBank<P> {
    pins: [P; SIGNAL_COUNT],
    levels: [bool; SIGNAL_COUNT],
}

impl<P> PinBank<P> {
    /// Take ownership of `pins`, ordered as [`Signal::ALL`].
    ///
    /// No line is touched until [`PinBank::configure`] is called.
    pub fn new(pins: [P; SIGNAL_COUNT]) -> Self {
        Self {
            pins,
            levels: [false; SIGNAL_COUNT],
        }
    }

    /// Level `signal` was last driven to.
    #[must_use]
    pub fn level(&self, signal: Signal) -> bool {
        self.levels[signal.index()]
    }

    /// Give the pins back.
    pub fn release(self) -> [P; SIGNAL_COUNT] {
        self.pins
    }
}

impl<P: OutputPin> PinBank<P> {
    /// Drive every line to its [`Signal::initial_level`].
    ///
    /// # Errors
    ///
    /// Returns the first pin error.
    pub fn configure(&mut self) -> Result<(), P::Error> {
        for signal in Signal::ALL {
            self.set(signal, signal.initial_level())?;
        }
        Ok(())
    }

    /// Drive `signal` to `level`.
    ///
    /// # Errors
    ///
    /// Returns the pin error.
    #[inline]
    pub fn set(&mut self, signal: Signal, level: bool) -> Result<(), P::Error> {
        let pin = &mut self.pins[signal.index()];
        if level {
            pin.set_high()?;
        } else {
            pin.set_low()?;
        }
        self.levels[signal.index()] = level;
        Ok(())
    }

    /// Drive `signal` high.
    ///
    /// # Errors
    ///
    /// Returns the pin error.
    #[inline]
    pub fn set_high(&mut self, signal: Signal) -> Result<(), P::Error> {
        self.set(signal, true)
    }

    /// Drive `signal` low.
    ///
    /// # Errors
    ///
    /// Returns the pin error.
    #[inline]
    pub fn set_low(&mut self, signal: Signal) -> Result<(), P::Error> {
        self.set(signal, false)
    }
}
