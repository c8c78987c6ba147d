//! Physical addressing of the selector hardware.
//!
//! Each panel carries one column driver (FP2800A) whose outputs are split
//! into 4 groups ("digits", B0..B1) of 7 segments (A0..A2). Segment 0 does
//! not exist on the decoder, so segments are numbered 1..=7. All column
//! drivers share the same address lines and a panel is selected by pulsing
//! its enable line. Rows go through a 3-to-8 decoder (74HCT238) that is
//! shared by all panels.
//!
//! [`PhysicalAddress::resolve`] maps a logical canvas coordinate onto those
//! lines, including the 180 degree remap for panels mounted upside down.

use bitfield::bitfield;

use crate::config::FlipDotConfig;

/// Number of column groups on one column driver
pub const COLUMN_GROUPS: usize = 4;

/// Number of segments in one column group
pub const SEGMENTS_PER_GROUP: usize = 7;

/// Widest panel a single column driver can address
pub const MAX_PANEL_WIDTH: usize = COLUMN_GROUPS * SEGMENTS_PER_GROUP;

/// Number of panel enable lines
pub const MAX_PANELS: usize = 4;

/// Number of rows the 3-bit row decoder can select
pub const MAX_ROWS: usize = 8;

bitfield! {
    /// 5-bit word driven onto the column driver address lines.
    ///
    /// The bit layout is as follows:
    /// - Bits 4-3: Group (B1, B0)
    /// - Bits 2-0: Segment (A2, A1, A0), never 0
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct ColumnAddress(u8);
    impl Debug;
    u8;
    pub group, set_group: 4, 3;
    pub segment, set_segment: 2, 0;
    pub b1, _: 4;
    pub b0, _: 3;
    pub a2, _: 2;
    pub a1, _: 1;
    pub a0, _: 0;
}

impl ColumnAddress {
    /// Address of column `column` counted from the left edge of its panel.
    #[must_use]
    pub fn for_column(column: usize) -> Self {
        let mut address = Self(0);
        address.set_group((column / SEGMENTS_PER_GROUP) as u8);
        address.set_segment((column % SEGMENTS_PER_GROUP + 1) as u8);
        address
    }

    /// The raw 5-bit word, B1 in bit 4 down to A0 in bit 0.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

bitfield! {
    /// 3-bit word driven onto the row decoder address lines.
    #[derive(Clone, Copy, Default, PartialEq, Eq)]
    #[repr(transparent)]
    pub struct RowAddress(u8);
    impl Debug;
    u8;
    pub row, set_row: 2, 0;
    pub a2, _: 2;
    pub a1, _: 1;
    pub a0, _: 0;
}

impl RowAddress {
    /// Address of physical row `row`.
    #[must_use]
    pub fn for_row(row: usize) -> Self {
        let mut address = Self(0);
        address.set_row(row as u8);
        address
    }

    /// The raw 3-bit word.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Everything needed to pulse one dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalAddress {
    /// Panel whose enable line is pulsed
    pub panel: usize,
    /// Column driver address inside the panel
    pub column: ColumnAddress,
    /// Row decoder address
    pub row: RowAddress,
}

impl PhysicalAddress {
    /// Resolve logical coordinate `(x, y)` for the display described by
    /// `config`. The coordinate must already be within the display.
    #[must_use]
    pub fn resolve(x: usize, y: usize, config: &FlipDotConfig) -> Self {
        let (x, y) = if config.upside_down {
            (config.width - 1 - x, config.height - 1 - y)
        } else {
            (x, y)
        };
        let panel_width = config.panel_width();
        Self {
            panel: x / panel_width,
            column: ColumnAddress::for_column(x % panel_width),
            row: RowAddress::for_row(y),
        }
    }
}
