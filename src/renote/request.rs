//! Definitions of renoting requests.
//!
//! A request is usually written by an editor as JSON:
//!
//! ```json
//! {
//!   "newNotes": {
//!     "1:480": { "K1": { "value": "BB" } },
//!     "2:0": { "SC": { "value": "FF", "length": 240 } }
//!   },
//!   "replace": { "TITLE": "Song [Renoted]" },
//!   "addSubartist": "renote: someone"
//! }
//! ```

use std::{collections::BTreeMap, num::NonZeroU64, str::FromStr};

use thiserror::Error;

use super::{
    channel::{ObjId, TargetKey},
    time::Measure,
};

/// A position in a chart, written as `"<measure>:<tick>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct TimeKey {
    /// The measure.
    pub measure: Measure,
    /// The tick from the start of the measure.
    pub tick: u64,
}

/// Error type for parsing [`TimeKey`] from string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum TimeKeyParseError {
    /// The separator `:` was not found.
    #[error("time key `{0}` must be formatted as `<measure>:<tick>`")]
    MissingSeparator(String),
    /// The measure was not a number from 0 to 999.
    #[error("measure of time key `{0}` must be a number from 0 to 999")]
    InvalidMeasure(String),
    /// The tick was not a non-negative integer.
    #[error("tick of time key `{0}` must be a non-negative integer")]
    InvalidTick(String),
}

impl FromStr for TimeKey {
    type Err = TimeKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (measure, tick) = s
            .split_once(':')
            .ok_or_else(|| TimeKeyParseError::MissingSeparator(s.to_string()))?;
        let measure = measure
            .trim()
            .parse::<u16>()
            .ok()
            .map(Measure)
            .filter(|&measure| measure <= Measure::MAX)
            .ok_or_else(|| TimeKeyParseError::InvalidMeasure(s.to_string()))?;
        let tick = tick
            .trim()
            .parse()
            .map_err(|_| TimeKeyParseError::InvalidTick(s.to_string()))?;
        Ok(Self { measure, tick })
    }
}

impl std::fmt::Display for TimeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.measure.0, self.tick)
    }
}

impl TryFrom<String> for TimeKey {
    type Error = TimeKeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeKey> for String {
    fn from(value: TimeKey) -> Self {
        value.to_string()
    }
}

/// Which note to move onto a key, and whether it becomes a long note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteOverride {
    /// The token of the note to move.
    pub value: ObjId,
    /// The length in ticks if the note becomes a long note. A long note of no length has no end,
    /// so `0` is rejected.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub length: Option<NonZeroU64>,
}

impl NoteOverride {
    /// Creates an override moving a normal note.
    #[must_use]
    pub const fn new(value: ObjId) -> Self {
        Self {
            value,
            length: None,
        }
    }

    /// Creates an override moving a note as a long note of `length` ticks.
    #[must_use]
    pub const fn long(value: ObjId, length: NonZeroU64) -> Self {
        Self {
            value,
            length: Some(length),
        }
    }
}

/// The overrides of notes, keyed by position and then by key.
pub type NewNotes = BTreeMap<TimeKey, BTreeMap<TargetKey, NoteOverride>>;

/// Everything to change in a chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RenoteRequest {
    /// Notes to move from the autoplay channel.
    #[cfg_attr(feature = "serde", serde(default))]
    pub new_notes: NewNotes,
    /// Header commands to rewrite, from the command name to the new value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub replace: BTreeMap<String, String>,
    /// A `#SUBARTIST` to append.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub add_subartist: Option<String>,
}

impl RenoteRequest {
    /// Adds an override, replacing the previous one for the same position and key.
    pub fn add_note(&mut self, at: TimeKey, key: TargetKey, note: NoteOverride) -> &mut Self {
        self.new_notes.entry(at).or_default().insert(key, note);
        self
    }

    /// Loads a request from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] with the path to the offending element if the text is not a valid
    /// request, such as a malformed time key or an unknown key name.
    #[cfg(feature = "json")]
    #[cfg_attr(docsrs, doc(cfg(feature = "json")))]
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        let deserializer = &mut serde_json::Deserializer::from_str(json);
        serde_path_to_error::deserialize(deserializer).map_err(|err| RequestError {
            path: err.path().to_string(),
            message: err.inner().to_string(),
        })
    }
}

/// An error occurred when loading a [`RenoteRequest`].
#[cfg(feature = "json")]
#[cfg_attr(docsrs, doc(cfg(feature = "json")))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("invalid renote request at `{path}`: {message}")]
pub struct RequestError {
    /// The path to the element that failed.
    pub path: String,
    /// The description of the failure.
    pub message: String,
}
