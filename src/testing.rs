//! Recording doubles for pins, time and delays.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error, ErrorKind, ErrorType, OutputPin};

use crate::clock::Clock;
use crate::config::FlipDotConfig;
use crate::driver::FlipDot;
use crate::pins::{PinBank, Signal, SIGNAL_COUNT};

#[derive(Default)]
struct History {
    writes: Vec<(Signal, bool)>,
    start: usize,
    fail_in: Option<usize>,
}

/// Shared log of every pin write, in order.
///
/// `clear` only hides earlier writes from the queries; pulse decoding still
/// sees them so cached address lines resolve correctly.
#[derive(Clone, Default)]
pub(crate) struct SignalLog(Rc<RefCell<History>>);

/// Line levels captured at the rising edge of a panel enable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pulse {
    pub(crate) panel: usize,
    pub(crate) column: u8,
    pub(crate) row: u8,
    pub(crate) data: bool,
}

impl SignalLog {
    fn push(&self, signal: Signal, level: bool) -> Result<(), PinFault> {
        let mut history = self.0.borrow_mut();
        match history.fail_in {
            Some(0) => {
                history.fail_in = None;
                return Err(PinFault);
            }
            Some(n) => history.fail_in = Some(n - 1),
            None => {}
        }
        history.writes.push((signal, level));
        Ok(())
    }

    /// Let `ok` more writes through, then fail the one after. A failed
    /// write leaves the line unchanged and is not logged.
    pub(crate) fn fail_after(&self, ok: usize) {
        self.0.borrow_mut().fail_in = Some(ok);
    }

    pub(crate) fn entries(&self) -> Vec<(Signal, bool)> {
        let history = self.0.borrow();
        history.writes[history.start..].to_vec()
    }

    pub(crate) fn len(&self) -> usize {
        let history = self.0.borrow();
        history.writes.len() - history.start
    }

    pub(crate) fn clear(&self) {
        let mut history = self.0.borrow_mut();
        history.start = history.writes.len();
    }

    /// Number of writes to `signal`.
    pub(crate) fn writes(&self, signal: Signal) -> usize {
        self.entries().iter().filter(|(s, _)| *s == signal).count()
    }

    /// Number of times `signal` was driven high.
    pub(crate) fn rises(&self, signal: Signal) -> usize {
        self.entries()
            .iter()
            .filter(|&&(s, level)| s == signal && level)
            .count()
    }

    /// Number of enable pulses on any panel, i.e. physical flips.
    pub(crate) fn flips(&self) -> usize {
        [Signal::Enable0, Signal::Enable1, Signal::Enable2, Signal::Enable3]
            .into_iter()
            .map(|s| self.rises(s))
            .sum()
    }

    /// Every enable pulse since the last `clear`, with the address lines
    /// decoded from the full write history.
    pub(crate) fn pulses(&self) -> Vec<Pulse> {
        let history = self.0.borrow();
        let mut levels = [false; SIGNAL_COUNT];
        let mut pulses = Vec::new();
        for (i, &(signal, level)) in history.writes.iter().enumerate() {
            levels[signal.index()] = level;
            if i < history.start || !level {
                continue;
            }
            let panel = match signal {
                Signal::Enable0 => 0,
                Signal::Enable1 => 1,
                Signal::Enable2 => 2,
                Signal::Enable3 => 3,
                _ => continue,
            };
            let word = |lines: &[Signal]| {
                lines
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (bit, s)| acc | (u8::from(levels[s.index()]) << bit))
            };
            pulses.push(Pulse {
                panel,
                column: word(&[
                    Signal::ColA0,
                    Signal::ColA1,
                    Signal::ColA2,
                    Signal::ColB0,
                    Signal::ColB1,
                ]),
                row: word(&[Signal::RowA0, Signal::RowA1, Signal::RowA2]),
                data: levels[Signal::Data.index()],
            });
        }
        pulses
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PinFault;

impl Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub(crate) struct MockPin {
    signal: Signal,
    log: SignalLog,
}

impl MockPin {
    pub(crate) fn bank(log: &SignalLog) -> [MockPin; SIGNAL_COUNT] {
        Signal::ALL.map(|signal| MockPin {
            signal,
            log: log.clone(),
        })
    }
}

impl ErrorType for MockPin {
    type Error = PinFault;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.push(self.signal, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.push(self.signal, true)
    }
}

/// Microsecond clock that moves forward by `step` on every read.
#[derive(Clone)]
pub(crate) struct MockClock {
    now: Rc<Cell<u64>>,
    step: u64,
}

impl MockClock {
    pub(crate) fn advance_us(&self, us: u64) {
        self.now.set(self.now.get().saturating_add(us));
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        let t = self.now.get();
        self.now.set(t.saturating_add(self.step));
        t
    }
}

/// Delay that only moves the mock clock and remembers each request.
pub(crate) struct MockDelay {
    now: Rc<Cell<u64>>,
    requests: Rc<RefCell<Vec<u32>>>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.requests.borrow_mut().push(ns);
        self.now.set(self.now.get().saturating_add(u64::from(ns / 1000)));
    }
}

pub(crate) type MockDisplay = FlipDot<MockPin, MockDelay, MockClock>;

/// Handles to observe a [`MockDisplay`] from a test.
pub(crate) struct Probe {
    pub(crate) log: SignalLog,
    pub(crate) clock: MockClock,
    delays: Rc<RefCell<Vec<u32>>>,
}

impl Probe {
    /// Delays requested since the last reset, in nanoseconds.
    pub(crate) fn delays(&self) -> Vec<u32> {
        self.delays.borrow().clone()
    }

    pub(crate) fn reset(&self) {
        self.log.clear();
        self.delays.borrow_mut().clear();
    }
}

/// Mock hardware that has not been handed to a driver yet.
pub(crate) fn mock_parts() -> (PinBank<MockPin>, MockDelay, MockClock, Probe) {
    let log = SignalLog::default();
    let now = Rc::new(Cell::new(0));
    let delays = Rc::new(RefCell::new(Vec::new()));
    let clock = MockClock {
        now: now.clone(),
        step: 10,
    };
    let delay = MockDelay {
        now,
        requests: delays.clone(),
    };
    let bank = PinBank::new(MockPin::bank(&log));
    let probe = Probe {
        log,
        clock: clock.clone(),
        delays,
    };
    (bank, delay, clock, probe)
}

/// Build a display on mock hardware. The constructor's initial clear is
/// already done and removed from the log.
pub(crate) fn mock_display(config: FlipDotConfig) -> (MockDisplay, Probe) {
    let (bank, delay, clock, probe) = mock_parts();
    let display = FlipDot::new(bank, delay, clock, config).unwrap();
    probe.reset();
    (display, probe)
}

/// Logical coordinate flipped by `pulse` on an upright display.
pub(crate) fn upright_coordinate(pulse: &Pulse, config: &FlipDotConfig) -> (usize, usize) {
    let panel_width = config.panel_width();
    let column = (0..panel_width)
        .find(|&c| crate::address::ColumnAddress::for_column(c).bits() == pulse.column)
        .unwrap();
    (pulse.panel * panel_width + column, usize::from(pulse.row))
}
