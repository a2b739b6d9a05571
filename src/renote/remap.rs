//! Relocation of notes from the autoplay channel into playable channels.

use std::collections::HashMap;

use itertools::Itertools;

use super::{
    RenoteWarning, RenoteWarningWithRange,
    channel::{ChannelId, ObjId},
    lex::{Line, LineWithRange},
    mixin::SourceRangeMixinExt,
    request::NewNotes,
    time::{Measure, TimeSignatureTable, slot_tick},
    writer::{NewNotesWriter, PlaceNoteError},
};

/// Moves every note on a playable channel to the autoplay channel, so that all notes start as
/// keysounds and only the requested ones are promoted back.
pub fn normalize_autokeysounds(lines: &mut [LineWithRange<'_>]) {
    for line in lines {
        if let Line::NoteData(note_line) = line.content_mut()
            && note_line.channel.is_playable()
        {
            note_line.channel = ChannelId::AUTOPLAY;
        }
    }
}

/// Applies the overrides to the note lines, and records the moved notes into `writer`.
///
/// Every slot of a note line in the measure whose tick and token equal the override is zeroed,
/// so duplicated notes on split lines move together as one note. A slot whose tick rounds to the
/// end of the measure is placed at the head of the next one.
///
/// Overrides matching nothing are reported as [`RenoteWarning::UnmatchedOverride`] at
/// `source_len..source_len`. A note which cannot be placed, because it lands after the last
/// measure or on a tick already taken, stays in its source slots and is reported at the first of
/// them.
pub fn remap(
    lines: &mut [LineWithRange<'_>],
    table: &TimeSignatureTable,
    new_notes: &NewNotes,
    writer: &mut NewNotesWriter,
    source_len: usize,
) -> Vec<RenoteWarningWithRange> {
    let mut lines_by_measure: HashMap<Measure, Vec<usize>> = HashMap::new();
    for (index, line) in lines.iter().enumerate() {
        if let Line::NoteData(note_line) = line.content()
            && note_line.channel.is_note_bearing()
        {
            lines_by_measure
                .entry(note_line.measure)
                .or_default()
                .push(index);
        }
    }

    let mut warnings = vec![];
    for (time_key, overrides) in new_notes {
        let measure = time_key.measure;
        let measure_size = table.measure_size(measure);
        let candidates = lines_by_measure
            .get(&measure)
            .map_or(&[][..], Vec::as_slice);
        for (&key, note) in overrides {
            let hits = candidates
                .iter()
                .flat_map(|&index| {
                    let Line::NoteData(note_line) = lines[index].content() else {
                        return vec![];
                    };
                    let slots = note_line.objects.len();
                    note_line
                        .objects
                        .iter()
                        .positions(|&obj| obj == note.value)
                        .filter(|&slot| slot_tick(slot, slots, measure_size) == time_key.tick)
                        .map(|slot| (index, slot))
                        .collect_vec()
                })
                .collect_vec();
            let Some(&(first, _)) = hits.first() else {
                warnings.push(
                    RenoteWarning::UnmatchedOverride {
                        measure,
                        tick: time_key.tick,
                        key,
                        value: note.value,
                    }
                    .into_wrapper_manual(source_len, source_len),
                );
                continue;
            };

            let channel = match note.length {
                None => key.channel(),
                Some(_) => key.long_channel(),
            };
            let placed = match note.length {
                None => writer.add_note(measure, time_key.tick, channel, note.value, table),
                Some(length) => writer.add_long_note(
                    measure,
                    time_key.tick,
                    length,
                    channel,
                    note.value,
                    table,
                ),
            };
            let warning = match placed {
                Ok(()) => {
                    for (index, slot) in hits {
                        if let Line::NoteData(note_line) = lines[index].content_mut() {
                            note_line.objects[slot] = ObjId::EMPTY;
                        }
                    }
                    continue;
                }
                Err(PlaceNoteError::OverflowPastLastMeasure) => {
                    RenoteWarning::MeasureOutOfRange { measure, channel }
                }
                Err(PlaceNoteError::Occupied {
                    measure,
                    tick,
                    existing,
                }) => RenoteWarning::NoteCollision {
                    measure,
                    tick,
                    channel,
                    existing,
                },
            };
            let (start, end) = lines[first].as_span();
            warnings.push(warning.into_wrapper_manual(start, end));
        }
    }
    warnings
}
