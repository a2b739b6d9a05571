//! Relocation of notes in BMS charts.
//!
//! The engine works in phases over the raw bytes of a chart:
//!
//! 1. [`lex`] splits the buffer into records and classifies each of them as a note data line,
//!    a scalar value line or an opaque raw line, applying directive substitutions on the way.
//! 2. [`remap::normalize_autokeysounds`] moves every playable channel onto the autoplay channel.
//! 3. [`time::TimeSignatureTable`] collects the tick length of each measure.
//! 4. [`remap::remap`] consumes the overrides of a [`RenoteRequest`], zeroing the matched source
//!    slots and recording them into a [`writer::NewNotesWriter`].
//! 5. [`writer::NewNotesWriter`] rebuilds one line for each measure and destination channel.
//! 6. [`unparse`] joins everything back with CRLF terminators.
//!
//! Nothing is kept between calls, so [`renote`] can be run from many threads at once.
//!
//! In detail, our policies are:
//!
//! - Work on bytes, not on strings. Charts encoded in Shift_JIS pass through untouched.
//! - Never reject a chart. Unrecognized lines are kept verbatim and suspicious data is reported
//!   as a [`RenoteWarning`].
//! - Reject only a structurally invalid request, such as a malformed time key.

pub mod channel;
pub mod lex;
pub mod math;
pub mod mixin;
pub mod prelude;
pub mod remap;
pub mod request;
pub mod time;
pub mod unparse;
pub mod writer;

use thiserror::Error;

use self::{
    channel::{ChannelId, ObjId, TargetKey},
    lex::{LexOutput, lex_lines},
    mixin::SourceRangeMixin,
    remap::{normalize_autokeysounds, remap},
    time::{Measure, TimeSignatureTable},
    unparse::assemble,
    writer::NewNotesWriter,
};

pub use self::request::{NoteOverride, RenoteRequest, TimeKey};

/// A non-fatal problem found while renoting.
///
/// Renoting never fails on chart data, these are reported alongside the output instead.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RenoteWarning {
    /// The time signature value could not be used as a positive multiplier, so the line was ignored.
    #[error("time signature `{value}` of measure {measure} is not a positive number")]
    InvalidTimeSignature {
        /// The measure the line belongs to.
        measure: Measure,
        /// The raw value, decoded lossily.
        value: String,
    },
    /// No source slot matched the override, so it was dropped.
    #[error("no note `{value}` found at measure {measure} tick {tick} for key {key}")]
    UnmatchedOverride {
        /// The measure of the override.
        measure: Measure,
        /// The tick of the override.
        tick: u64,
        /// The key the note would have moved to.
        key: TargetKey,
        /// The token searched for.
        value: ObjId,
    },
    /// A note would land after the last addressable measure, so it was left in place.
    #[error("note on channel {channel} overflows past the last measure from measure {measure}")]
    MeasureOutOfRange {
        /// The measure where the note started.
        measure: Measure,
        /// The destination channel of the note.
        channel: ChannelId,
    },
    /// A note would land on a tick already taken on its destination channel, so it was left in
    /// place.
    #[error("tick {tick} of measure {measure} on channel {channel} is already taken by `{existing}`")]
    NoteCollision {
        /// The measure of the taken tick.
        measure: Measure,
        /// The taken tick.
        tick: u64,
        /// The destination channel of the note.
        channel: ChannelId,
        /// The token already placed there.
        existing: ObjId,
    },
}

/// A [`RenoteWarning`] with the byte range of the source line it came from.
///
/// Warnings about the request itself point at the empty range at the end of the source.
pub type RenoteWarningWithRange = SourceRangeMixin<RenoteWarning>;

/// Output of renoting a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenoteOutput {
    /// The rewritten chart, every line terminated with CRLF.
    pub bytes: Vec<u8>,
    /// Warnings that occurred during renoting.
    pub warnings: Vec<RenoteWarningWithRange>,
}

/// Renotes the BMS chart in `source` as described by `request`.
///
/// # Example
///
/// ```
/// use bms_renote::renote::prelude::*;
///
/// let request: RenoteRequest = serde_json::from_str(r#"{
///     "newNotes": { "1:0": { "K1": { "value": "01", "length": 240 } } }
/// }"#).unwrap();
/// let RenoteOutput { bytes, .. } = renote(b"#00115:01\n", &request);
/// assert_eq!(bytes, b"#00101:00\r\n#LNTYPE 1\r\n#00151:01010000\r\n");
/// ```
#[must_use]
pub fn renote(source: &[u8], request: &RenoteRequest) -> RenoteOutput {
    let LexOutput { mut lines } = lex_lines(source, &request.replace);

    normalize_autokeysounds(&mut lines);

    let scan = TimeSignatureTable::scan(&lines);
    let mut warnings = scan.warnings;

    let mut writer = NewNotesWriter::new();
    warnings.extend(remap(
        &mut lines,
        &scan.table,
        &request.new_notes,
        &mut writer,
        source.len(),
    ));

    let bytes = assemble(
        &lines,
        &writer,
        &scan.table,
        request.add_subartist.as_deref(),
    );
    RenoteOutput { bytes, warnings }
}
