//! Definitions of channels, object tokens and the logical keys notes can be moved to.
//!
//! For the channel layout of playable keys, please see [BMS command memo#KEYMAP Table](https://hitkey.bms.ms/cmds.htm#KEYMAP-TABLE)

use std::str::FromStr;

use thiserror::Error;

/// Error type for parsing [`ChannelId`] or [`ObjId`] from string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum TwoCharParseError {
    /// The value must be exactly 2 ascii characters.
    #[error("expected exactly 2 ascii characters, got `{0}`")]
    ExpectedTwoAsciiChars(String),
}

fn two_ascii_chars(value: &str) -> Result<[u8; 2], TwoCharParseError> {
    match value.as_bytes() {
        &[a, b] if a.is_ascii() && b.is_ascii() => Ok([a, b]),
        _ => Err(TwoCharParseError::ExpectedTwoAsciiChars(value.to_string())),
    }
}

/// A channel code of a record, such as `01` or `11`.
///
/// Codes are compared as byte strings, so `1A` sorts between `19` and `20`. Letters are always
/// kept in uppercase.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct ChannelId([u8; 2]);

impl ChannelId {
    /// The channel for the notes auto-played as keysounds.
    pub const AUTOPLAY: Self = Self(*b"01");
    /// The channel for the section length (time signature) multiplier.
    pub const TIME_SIGNATURE: Self = Self(*b"02");
    /// The lowest code of the playable channels.
    pub const PLAYABLE_LOW: Self = Self(*b"11");
    /// The highest code of the playable channels.
    pub const PLAYABLE_HIGH: Self = Self(*b"59");

    /// The decimal distance between a visible note channel and its long note channel.
    pub const LONG_NOTE_OFFSET: u8 = 40;

    /// Creates a channel from the 2 bytes of a record, converting letters into uppercase.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self([bytes[0].to_ascii_uppercase(), bytes[1].to_ascii_uppercase()])
    }

    /// Returns the raw 2 bytes of the code.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 2] {
        self.0
    }

    /// Returns whether the channel is one of the playable channels `11` through `59`.
    #[must_use]
    pub fn is_playable(self) -> bool {
        (Self::PLAYABLE_LOW..=Self::PLAYABLE_HIGH).contains(&self)
    }

    /// Returns whether the channel carries note tokens rather than a scalar value.
    #[must_use]
    pub fn is_note_bearing(self) -> bool {
        self == Self::AUTOPLAY || self.is_playable()
    }

    /// Returns the long note channel paired with this channel, if the code is decimal and the
    /// pair stays within 2 digits.
    ///
    /// ```
    /// use bms_renote::renote::channel::ChannelId;
    ///
    /// let key1: ChannelId = "11".parse().unwrap();
    /// assert_eq!(key1.long_note_pair(), Some("51".parse().unwrap()));
    /// ```
    #[must_use]
    pub const fn long_note_pair(self) -> Option<Self> {
        let [tens, ones] = self.0;
        if !tens.is_ascii_digit() || !ones.is_ascii_digit() {
            return None;
        }
        let paired = (tens - b'0') * 10 + (ones - b'0') + Self::LONG_NOTE_OFFSET;
        if paired < 100 {
            Some(Self([b'0' + paired / 10, b'0' + paired % 10]))
        } else {
            None
        }
    }
}

impl std::fmt::Debug for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ChannelId").field(&self.to_string()).finish()
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
    }
}

impl FromStr for ChannelId {
    type Err = TwoCharParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        two_ascii_chars(s).map(Self::from_bytes)
    }
}

impl TryFrom<String> for ChannelId {
    type Error = TwoCharParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChannelId> for String {
    fn from(value: ChannelId) -> Self {
        value.to_string()
    }
}

/// A 2 byte object token in a note data line, such as `AA` or `01`.
///
/// Tokens are compared exactly, without case folding. The token `00` means an empty slot.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct ObjId([u8; 2]);

impl ObjId {
    /// The token of an empty slot.
    pub const EMPTY: Self = Self(*b"00");

    /// Creates a token from the raw bytes of a slot.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 2 bytes of the token.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 2] {
        self.0
    }

    /// Returns whether the token is `00`.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

impl std::fmt::Debug for ObjId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ObjId").field(&self.to_string()).finish()
    }
}

impl std::fmt::Display for ObjId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl FromStr for ObjId {
    type Err = TwoCharParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        two_ascii_chars(s).map(Self)
    }
}

impl TryFrom<String> for ObjId {
    type Error = TwoCharParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjId> for String {
    fn from(value: ObjId) -> Self {
        value.to_string()
    }
}

/// A logical key which a note can be relocated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetKey {
    /// The scratch turntable, `SC`.
    #[cfg_attr(feature = "serde", serde(rename = "SC"))]
    Scratch,
    /// The key 1, `K1`.
    #[cfg_attr(feature = "serde", serde(rename = "K1"))]
    Key1,
    /// The key 2, `K2`.
    #[cfg_attr(feature = "serde", serde(rename = "K2"))]
    Key2,
    /// The key 3, `K3`.
    #[cfg_attr(feature = "serde", serde(rename = "K3"))]
    Key3,
    /// The key 4, `K4`.
    #[cfg_attr(feature = "serde", serde(rename = "K4"))]
    Key4,
    /// The key 5, `K5`.
    #[cfg_attr(feature = "serde", serde(rename = "K5"))]
    Key5,
    /// The key 6, `K6`.
    #[cfg_attr(feature = "serde", serde(rename = "K6"))]
    Key6,
    /// The key 7, `K7`.
    #[cfg_attr(feature = "serde", serde(rename = "K7"))]
    Key7,
}

impl TargetKey {
    /// All the keys, in the order of their names.
    pub const ALL: [Self; 8] = [
        Self::Scratch,
        Self::Key1,
        Self::Key2,
        Self::Key3,
        Self::Key4,
        Self::Key5,
        Self::Key6,
        Self::Key7,
    ];

    /// Returns the short name used in requests, such as `K1`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scratch => "SC",
            Self::Key1 => "K1",
            Self::Key2 => "K2",
            Self::Key3 => "K3",
            Self::Key4 => "K4",
            Self::Key5 => "K5",
            Self::Key6 => "K6",
            Self::Key7 => "K7",
        }
    }

    /// Returns the player 1 channel of visible notes for the key.
    #[must_use]
    pub const fn channel(self) -> ChannelId {
        ChannelId(match self {
            Self::Scratch => *b"16",
            Self::Key1 => *b"11",
            Self::Key2 => *b"12",
            Self::Key3 => *b"13",
            Self::Key4 => *b"14",
            Self::Key5 => *b"15",
            Self::Key6 => *b"18",
            Self::Key7 => *b"19",
        })
    }

    /// Returns the player 1 channel of long notes for the key.
    #[must_use]
    pub const fn long_channel(self) -> ChannelId {
        LONG_CHANNELS[self as usize]
    }
}

/// [`TargetKey::long_channel`] by the declaration order of the keys.
const LONG_CHANNELS: [ChannelId; 8] = {
    let mut channels = [ChannelId::AUTOPLAY; 8];
    let mut i = 0;
    while i < channels.len() {
        channels[i] = match TargetKey::ALL[i].channel().long_note_pair() {
            Some(channel) => channel,
            None => panic!("visible channels of keys must have a long note pair"),
        };
        i += 1;
    }
    channels
};

impl std::fmt::Display for TargetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for parsing [`TargetKey`] from string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("unknown key name `{0}`, expected one of SC, K1 to K7")]
pub struct UnknownTargetKey(pub String);

impl FromStr for TargetKey {
    type Err = UnknownTargetKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| UnknownTargetKey(s.to_string()))
    }
}
