//! Accumulator and serializer of the note lines synthesized by renoting.

use std::{collections::BTreeMap, num::NonZeroU64};

use thiserror::Error;

use super::{
    channel::{ChannelId, ObjId},
    lex::NoteDataLine,
    math::grid_step,
    time::{Measure, TimeSignatureTable},
};

/// Error when a note cannot be placed onto its destination channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PlaceNoteError {
    /// The note lands after [`Measure::MAX`].
    #[error("the note lands after the last measure")]
    OverflowPastLastMeasure,
    /// The tick of the channel is already taken by another note.
    #[error("tick {tick} of measure {measure} is already taken by `{existing}`")]
    Occupied {
        /// The measure of the taken tick.
        measure: Measure,
        /// The taken tick.
        tick: u64,
        /// The token already placed there.
        existing: ObjId,
    },
}

/// Collects notes by measure and destination channel, then writes one line for each of them.
///
/// Buckets are kept in the order of their `#<measure><channel>:` prefix, so the lines come out
/// sorted by measure and then by channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewNotesWriter {
    buckets: BTreeMap<(Measure, ChannelId), BTreeMap<u64, ObjId>>,
    has_long_notes: bool,
}

/// Moves `tick` forward through the following measures, each with its own size from `table`,
/// until it fits in one. A tick exactly at the size of a measure is the head of the next one.
fn resolve(
    table: &TimeSignatureTable,
    mut measure: Measure,
    mut tick: u64,
) -> Result<(Measure, u64), PlaceNoteError> {
    loop {
        let size = table.measure_size(measure);
        if tick < size {
            return Ok((measure, tick));
        }
        tick -= size;
        measure = measure
            .next()
            .ok_or(PlaceNoteError::OverflowPastLastMeasure)?;
    }
}

impl NewNotesWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn existing(&self, measure: Measure, tick: u64, channel: ChannelId) -> Option<ObjId> {
        self.buckets
            .get(&(measure, channel))
            .and_then(|notes| notes.get(&tick))
            .copied()
    }

    /// Records a note at `tick` of the measure. A tick at or after the end of the measure is
    /// carried into the following measures.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceNoteError`] without recording anything if the note lands after the measure
    /// 999, or if another token is already placed at the same tick and channel. Placing the same
    /// token twice is not an error.
    pub fn add_note(
        &mut self,
        measure: Measure,
        tick: u64,
        channel: ChannelId,
        value: ObjId,
        table: &TimeSignatureTable,
    ) -> Result<(), PlaceNoteError> {
        let (measure, tick) = resolve(table, measure, tick)?;
        match self.existing(measure, tick, channel) {
            Some(existing) if existing != value => Err(PlaceNoteError::Occupied {
                measure,
                tick,
                existing,
            }),
            _ => {
                self.buckets
                    .entry((measure, channel))
                    .or_default()
                    .insert(tick, value);
                Ok(())
            }
        }
    }

    /// Records a long note from `tick` for `length` ticks, with `value` on both of its ends.
    ///
    /// Both ends are carried through the following measures like [`Self::add_note`], so a long
    /// note may span several measures.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceNoteError`] without recording anything if the end lands after the measure
    /// 999, or if either end falls on a tick already taken on the channel. Any token there counts,
    /// since the start and end of long notes are paired in order.
    pub fn add_long_note(
        &mut self,
        measure: Measure,
        tick: u64,
        length: NonZeroU64,
        channel: ChannelId,
        value: ObjId,
        table: &TimeSignatureTable,
    ) -> Result<(), PlaceNoteError> {
        let start = resolve(table, measure, tick)?;
        let end = resolve(table, measure, tick.saturating_add(length.get()))?;
        for (measure, tick) in [start, end] {
            if let Some(existing) = self.existing(measure, tick, channel) {
                return Err(PlaceNoteError::Occupied {
                    measure,
                    tick,
                    existing,
                });
            }
        }
        for (measure, tick) in [start, end] {
            self.buckets
                .entry((measure, channel))
                .or_default()
                .insert(tick, value);
        }
        self.has_long_notes = true;
        Ok(())
    }

    /// Returns whether any long note was recorded, which requires `#LNTYPE 1` in the chart.
    #[must_use]
    pub const fn has_long_notes(&self) -> bool {
        self.has_long_notes
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Builds the lines, each on the coarsest grid that holds all of its ticks.
    pub fn lines<'a>(
        &'a self,
        table: &'a TimeSignatureTable,
    ) -> impl Iterator<Item = NoteDataLine> + 'a {
        self.buckets.iter().map(|(&(measure, channel), notes)| {
            let measure_size = table.measure_size(measure);
            let step = grid_step(measure_size, notes.keys().copied());
            let objects = (0..measure_size / step)
                .map(|slot| {
                    notes
                        .get(&(slot * step))
                        .copied()
                        .unwrap_or(ObjId::EMPTY)
                })
                .collect();
            NoteDataLine {
                measure,
                channel,
                objects,
                remainder: None,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renote::channel::TargetKey;

    fn obj(s: &str) -> ObjId {
        s.parse().unwrap()
    }

    fn len(ticks: u64) -> NonZeroU64 {
        NonZeroU64::new(ticks).unwrap()
    }

    fn rendered(writer: &NewNotesWriter, table: &TimeSignatureTable) -> Vec<String> {
        writer
            .lines(table)
            .map(|line| {
                let tokens: String = line.objects.iter().map(ObjId::to_string).collect();
                format!("#{}{}:{}", line.measure, line.channel, tokens)
            })
            .collect()
    }

    #[test]
    fn lines_are_sorted_by_prefix() {
        let table = TimeSignatureTable::default();
        let mut writer = NewNotesWriter::new();
        for (measure, tick, key, value) in [
            (2, 0, TargetKey::Scratch, "FF"),
            (1, 480, TargetKey::Key7, "BB"),
            (1, 240, TargetKey::Key1, "CC"),
        ] {
            writer
                .add_note(Measure(measure), tick, key.channel(), obj(value), &table)
                .unwrap();
        }
        assert_eq!(
            rendered(&writer, &table),
            ["#00111:00CC0000", "#00119:00BB", "#00216:FF"].map(String::from)
        );
    }

    #[test]
    fn grid_fits_every_tick() {
        let table = TimeSignatureTable::default();
        let mut writer = NewNotesWriter::new();
        let channel = TargetKey::Key2.channel();
        for (tick, value) in [(0, "01"), (320, "02"), (720, "03")] {
            writer
                .add_note(Measure(0), tick, channel, obj(value), &table)
                .unwrap();
        }
        let lines: Vec<_> = writer.lines(&table).collect();
        assert_eq!(lines.len(), 1);
        let objects = &lines[0].objects;
        assert_eq!(objects.len(), 12);
        assert_eq!(objects[0], obj("01"));
        assert_eq!(objects[4], obj("02"));
        assert_eq!(objects[9], obj("03"));
        assert_eq!(objects.iter().filter(|o| !o.is_empty()).count(), 3);
    }

    #[test]
    fn note_at_end_of_measure_is_carried_to_next_head() {
        let mut table = TimeSignatureTable::default();
        table.set(Measure(1), 1);
        let mut writer = NewNotesWriter::new();
        writer
            .add_note(Measure(1), 1, TargetKey::Key1.channel(), obj("01"), &table)
            .unwrap();
        assert_eq!(rendered(&writer, &table), ["#00211:01"]);
        assert_eq!(
            writer.add_note(Measure::MAX, 960, TargetKey::Key1.channel(), obj("01"), &table),
            Err(PlaceNoteError::OverflowPastLastMeasure)
        );
    }

    #[test]
    fn different_token_on_taken_tick_is_rejected() {
        let table = TimeSignatureTable::default();
        let mut writer = NewNotesWriter::new();
        let channel = TargetKey::Key1.channel();
        writer
            .add_note(Measure(1), 0, channel, obj("01"), &table)
            .unwrap();
        writer
            .add_note(Measure(1), 0, channel, obj("01"), &table)
            .unwrap();
        assert_eq!(
            writer.add_note(Measure(1), 0, channel, obj("02"), &table),
            Err(PlaceNoteError::Occupied {
                measure: Measure(1),
                tick: 0,
                existing: obj("01"),
            })
        );
        assert_eq!(rendered(&writer, &table), ["#00111:01"]);
    }

    #[test]
    fn long_note_within_measure() {
        let table = TimeSignatureTable::default();
        let mut writer = NewNotesWriter::new();
        writer
            .add_long_note(
                Measure(1),
                0,
                len(240),
                TargetKey::Key1.long_channel(),
                obj("01"),
                &table,
            )
            .unwrap();
        assert!(writer.has_long_notes());
        assert_eq!(rendered(&writer, &table), ["#00151:01010000"]);
    }

    #[test]
    fn long_note_overflows_across_measures() {
        let mut table = TimeSignatureTable::default();
        table.set(Measure(1), 120);
        table.set(Measure(2), 240);
        let mut writer = NewNotesWriter::new();
        writer
            .add_long_note(
                Measure(1),
                0,
                len(600),
                TargetKey::Key1.long_channel(),
                obj("01"),
                &table,
            )
            .unwrap();
        // 600 - 120 - 240 = 240 ticks into measure 3.
        assert_eq!(
            rendered(&writer, &table),
            ["#00151:01", "#00351:00010000"].map(String::from)
        );
    }

    #[test]
    fn long_note_ending_on_bar_line_moves_to_next_head() {
        let table = TimeSignatureTable::default();
        let mut writer = NewNotesWriter::new();
        writer
            .add_long_note(
                Measure(0),
                480,
                len(480),
                TargetKey::Key3.long_channel(),
                obj("0Z"),
                &table,
            )
            .unwrap();
        assert_eq!(
            rendered(&writer, &table),
            ["#00053:000Z", "#00153:0Z"].map(String::from)
        );
    }

    #[test]
    fn long_note_sharing_an_end_is_rejected() {
        let table = TimeSignatureTable::default();
        let mut writer = NewNotesWriter::new();
        let channel = TargetKey::Key1.long_channel();
        writer
            .add_long_note(Measure(1), 0, len(240), channel, obj("01"), &table)
            .unwrap();
        // Starts where the former ends, even with the same token.
        for value in ["02", "01"] {
            assert_eq!(
                writer.add_long_note(Measure(1), 240, len(240), channel, obj(value), &table),
                Err(PlaceNoteError::Occupied {
                    measure: Measure(1),
                    tick: 240,
                    existing: obj("01"),
                })
            );
        }
        assert_eq!(rendered(&writer, &table), ["#00151:01010000"]);
    }

    #[test]
    fn long_note_past_last_measure_is_rejected() {
        let table = TimeSignatureTable::default();
        let mut writer = NewNotesWriter::new();
        assert_eq!(
            writer.add_long_note(
                Measure::MAX,
                0,
                len(960),
                TargetKey::Key1.long_channel(),
                obj("01"),
                &table,
            ),
            Err(PlaceNoteError::OverflowPastLastMeasure)
        );
        assert!(writer.is_empty());
        assert!(!writer.has_long_notes());
    }
}
