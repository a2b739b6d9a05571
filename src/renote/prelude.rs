//! Prelude module for the renoting engine.
//!
//! You can use `use bms_renote::renote::prelude::*;` to import all the types at once.

#[cfg(feature = "diagnostics")]
pub use crate::diagnostics::{SimpleSource, ToAriadne, emit_renote_warnings};

#[cfg(feature = "json")]
pub use super::request::RequestError;
pub use super::{
    RenoteOutput, RenoteWarning, RenoteWarningWithRange,
    channel::{ChannelId, ObjId, TargetKey, TwoCharParseError, UnknownTargetKey},
    lex::{LexOutput, Line, LineWithRange, NoteDataLine, ValueLine, lex_lines},
    math::grid_step,
    mixin::{SourceRangeMixin, SourceRangeMixinExt},
    remap::{normalize_autokeysounds, remap},
    renote,
    request::{NewNotes, NoteOverride, RenoteRequest, TimeKey, TimeKeyParseError},
    time::{
        DEFAULT_MEASURE_SIZE, Measure, QUARTER_NOTE_TICKS, TimeSignatureScan, TimeSignatureTable,
        slot_tick,
    },
    unparse::{LINE_TERMINATOR, LN_TYPE_1, assemble},
    writer::{NewNotesWriter, PlaceNoteError},
};
