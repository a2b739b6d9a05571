//! Definitions of measures, ticks and the time signature of each measure.
//!
//! A measure at the 1.0 time signature is [`DEFAULT_MEASURE_SIZE`] ticks long, and a quarter
//! note is [`QUARTER_NOTE_TICKS`] ticks. A note data line divides its measure into equal slots,
//! see [`slot_tick`].

use std::collections::HashMap;

use strict_num_extended::PositiveF64;

use super::{
    RenoteWarning, RenoteWarningWithRange,
    channel::ChannelId,
    lex::{Line, LineWithRange, ValueLine},
    mixin::SourceRangeMixinExt,
};

/// The tick length of a measure with no time signature.
pub const DEFAULT_MEASURE_SIZE: u64 = 960;
/// The tick length of a quarter note.
pub const QUARTER_NOTE_TICKS: u64 = 240;

/// A measure number of a record, from `000` to `999`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measure(pub u16);

impl Measure {
    /// The last measure addressable by 3 digits.
    pub const MAX: Self = Self(999);

    /// Returns the following measure, or `None` past [`Measure::MAX`].
    #[must_use]
    pub fn next(self) -> Option<Self> {
        (self < Self::MAX).then_some(Self(self.0 + 1))
    }
}

impl std::fmt::Display for Measure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Returns the tick where the slot `index` of `slots` equal slots in a measure starts.
///
/// Ticks are rounded half up, so `slot_tick(1, 3, 1000)` is `333` and `slot_tick(1, 6, 1000)` is `167`.
#[must_use]
pub const fn slot_tick(index: usize, slots: usize, measure_size: u64) -> u64 {
    let slots = slots as u64;
    (2 * index as u64 * measure_size + slots) / (2 * slots)
}

/// The tick length of each measure, set by the time signature channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSignatureTable {
    sizes: HashMap<Measure, u64>,
}

/// Output of [`TimeSignatureTable::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSignatureScan {
    /// The collected table.
    pub table: TimeSignatureTable,
    /// Warnings about the time signature lines ignored.
    pub warnings: Vec<RenoteWarningWithRange>,
}

impl TimeSignatureTable {
    /// Collects the time signatures from the value lines on the time signature channel.
    ///
    /// A later line for the same measure wins. A value which is not a positive number, or which
    /// makes the measure shorter than a tick, is ignored with a
    /// [`RenoteWarning::InvalidTimeSignature`].
    #[must_use]
    pub fn scan(lines: &[LineWithRange<'_>]) -> TimeSignatureScan {
        let mut table = Self::default();
        let mut warnings = vec![];
        for line in lines {
            let Line::Value(ValueLine {
                measure,
                channel,
                raw_value,
            }) = line.content()
            else {
                continue;
            };
            if *channel != ChannelId::TIME_SIGNATURE {
                continue;
            }
            match measure_size_of(raw_value) {
                Some(size) => {
                    table.sizes.insert(*measure, size);
                }
                None => warnings.push(
                    RenoteWarning::InvalidTimeSignature {
                        measure: *measure,
                        value: String::from_utf8_lossy(raw_value).into_owned(),
                    }
                    .into_wrapper(line),
                ),
            }
        }
        TimeSignatureScan { table, warnings }
    }

    /// Sets the tick length of the measure.
    pub fn set(&mut self, measure: Measure, size: u64) {
        self.sizes.insert(measure, size.max(1));
    }

    /// Returns the tick length of the measure, [`DEFAULT_MEASURE_SIZE`] if not specified.
    #[must_use]
    pub fn measure_size(&self, measure: Measure) -> u64 {
        self.sizes
            .get(&measure)
            .copied()
            .unwrap_or(DEFAULT_MEASURE_SIZE)
    }
}

fn measure_size_of(raw_value: &[u8]) -> Option<u64> {
    let multiplier: f64 = std::str::from_utf8(raw_value).ok()?.trim().parse().ok()?;
    let multiplier = PositiveF64::try_from(multiplier).ok()?;
    let size = (DEFAULT_MEASURE_SIZE as f64 * multiplier.as_f64()).round();
    (size.is_finite() && size >= 1.0 && size <= u32::MAX as f64).then_some(size as u64)
}
