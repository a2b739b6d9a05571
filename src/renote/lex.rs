//! Line classifier of BMS charts.
//!
//! Raw bytes == [`lex_lines`] ==> [`Line`]s (in [`LexOutput`]) == [`super::unparse`] ==> raw bytes
//!
//! A record is classified by the shape `#<3 digits><2 chars>:`. Records on a note bearing channel
//! become [`NoteDataLine`]s, the other records become [`ValueLine`]s, and anything else is kept as
//! an opaque [`Line::Raw`].

use std::{borrow::Cow, collections::BTreeMap};

use super::{
    channel::{ChannelId, ObjId},
    mixin::{SourceRangeMixin, SourceRangeMixinExt},
    time::Measure,
};

/// A record carrying note tokens, on the autoplay or a playable channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteDataLine {
    /// The measure of the record.
    pub measure: Measure,
    /// The channel of the record.
    pub channel: ChannelId,
    /// The tokens dividing the measure into equal slots.
    pub objects: Vec<ObjId>,
    /// The last byte of data with an odd length, kept as is.
    pub remainder: Option<u8>,
}

/// A record carrying a scalar value, such as a time signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ValueLine<'a> {
    /// The measure of the record.
    pub measure: Measure,
    /// The channel of the record.
    pub channel: ChannelId,
    /// The bytes after `:`.
    pub raw_value: &'a [u8],
}

/// A classified line of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Line<'a> {
    /// A record of note tokens.
    NoteData(NoteDataLine),
    /// A record of a scalar value.
    Value(ValueLine<'a>),
    /// Any other line, such as a header command or a comment.
    Raw(Cow<'a, [u8]>),
}

/// A [`Line`] with the byte range of its content in the source, excluding the terminator.
pub type LineWithRange<'a> = SourceRangeMixin<Line<'a>>;

/// Lex parsing results, the classified lines in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexOutput<'a> {
    /// lines
    pub lines: Vec<LineWithRange<'a>>,
}

/// Splits the source into lines and classifies them.
///
/// Lines end with LF, and a CR right before it is trimmed. The last line is emitted even without
/// a terminator, but an input ending with a terminator has no empty line after it.
///
/// Header commands whose name is a key of `replace` have their value replaced with the mapped one.
/// An empty mapped value leaves the command as is.
#[must_use]
pub fn lex_lines<'a>(source: &'a [u8], replace: &BTreeMap<String, String>) -> LexOutput<'a> {
    let mut lines = vec![];
    let mut start = 0;
    while start < source.len() {
        let (end, next_start) = match source[start..].iter().position(|&b| b == b'\n') {
            Some(lf) => {
                let lf = start + lf;
                let end = if lf > start && source[lf - 1] == b'\r' {
                    lf - 1
                } else {
                    lf
                };
                (end, lf + 1)
            }
            None => (source.len(), source.len()),
        };
        lines.push(classify(&source[start..end], replace).into_wrapper_manual(start, end));
        start = next_start;
    }
    LexOutput { lines }
}

/// Classifies a line without its terminator.
#[must_use]
pub fn classify<'a>(line: &'a [u8], replace: &BTreeMap<String, String>) -> Line<'a> {
    if let Some(record) = classify_record(line) {
        return record;
    }
    if let Some((name, head)) = directive(line)
        && let Some(value) = replace.get(name).filter(|value| !value.is_empty())
    {
        let mut replaced = head.to_vec();
        replaced.extend_from_slice(value.as_bytes());
        return Line::Raw(Cow::Owned(replaced));
    }
    Line::Raw(Cow::Borrowed(line))
}

fn classify_record(line: &[u8]) -> Option<Line<'_>> {
    let &[b'#', m0, m1, m2, c0, c1, b':', ref data @ ..] = line else {
        return None;
    };
    if ![m0, m1, m2].iter().all(u8::is_ascii_digit) {
        return None;
    }
    let measure = Measure(
        u16::from(m0 - b'0') * 100 + u16::from(m1 - b'0') * 10 + u16::from(m2 - b'0'),
    );
    let channel = ChannelId::from_bytes([c0, c1]);
    if !channel.is_note_bearing() {
        return Some(Line::Value(ValueLine {
            measure,
            channel,
            raw_value: data,
        }));
    }
    let chunks = data.chunks_exact(2);
    let remainder = chunks.remainder().first().copied();
    let objects = chunks
        .map(|pair| ObjId::from_bytes([pair[0], pair[1]]))
        .collect();
    Some(Line::NoteData(NoteDataLine {
        measure,
        channel,
        objects,
        remainder,
    }))
}

/// Matches `#<word><whitespace>`, returning the word and the matched head including the whitespace.
fn directive(line: &[u8]) -> Option<(&str, &[u8])> {
    let rest = line.strip_prefix(b"#")?;
    let name_len = rest
        .iter()
        .position(|&b| !(b.is_ascii_alphanumeric() || b == b'_'))?;
    if name_len == 0 || !rest[name_len].is_ascii_whitespace() {
        return None;
    }
    let name = std::str::from_utf8(&rest[..name_len]).ok()?;
    Some((name, &line[..name_len + 2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_replace() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn contents<'a>(output: &LexOutput<'a>) -> Vec<Line<'a>> {
        output.lines.iter().map(|line| line.content().clone()).collect()
    }

    #[test]
    fn splits_lf_and_crlf() {
        let output = lex_lines(b"#TITLE a\r\n#ARTIST b\n*comment", &no_replace());
        assert_eq!(
            contents(&output),
            vec![
                Line::Raw(Cow::Borrowed(b"#TITLE a".as_slice())),
                Line::Raw(Cow::Borrowed(b"#ARTIST b".as_slice())),
                Line::Raw(Cow::Borrowed(b"*comment".as_slice())),
            ]
        );
        let spans: Vec<_> = output.lines.iter().map(|line| line.as_span()).collect();
        assert_eq!(spans, vec![(0, 8), (10, 19), (20, 28)]);
    }

    #[test]
    fn trailing_terminator_adds_no_line() {
        assert_eq!(lex_lines(b"#00101:01\r\n", &no_replace()).lines.len(), 1);
        assert_eq!(lex_lines(b"a\n\nb\n", &no_replace()).lines.len(), 3);
        assert!(lex_lines(b"", &no_replace()).lines.is_empty());
    }

    #[test]
    fn classifies_records() {
        let output = lex_lines(b"#00111:AA0b\n#00102:0.75\n#0010a:AA00", &no_replace());
        assert_eq!(
            contents(&output),
            vec![
                Line::NoteData(NoteDataLine {
                    measure: Measure(1),
                    channel: "11".parse().unwrap(),
                    objects: vec!["AA".parse().unwrap(), "0b".parse().unwrap()],
                    remainder: None,
                }),
                Line::Value(ValueLine {
                    measure: Measure(1),
                    channel: ChannelId::TIME_SIGNATURE,
                    raw_value: b"0.75",
                }),
                Line::Value(ValueLine {
                    measure: Measure(1),
                    channel: "0A".parse().unwrap(),
                    raw_value: b"AA00",
                }),
            ]
        );
    }

    #[test]
    fn odd_data_keeps_remainder() {
        let output = lex_lines(b"#99901:AAB", &no_replace());
        assert_eq!(
            contents(&output),
            vec![Line::NoteData(NoteDataLine {
                measure: Measure(999),
                channel: ChannelId::AUTOPLAY,
                objects: vec!["AA".parse().unwrap()],
                remainder: Some(b'B'),
            })]
        );
    }

    #[test]
    fn malformed_records_are_raw() {
        for line in [b"#0A101:AA".as_slice(), b"#00101AA", b"#001", b"00101:AA"] {
            assert_eq!(classify(line, &no_replace()), Line::Raw(Cow::Borrowed(line)));
        }
    }

    #[test]
    fn replaces_directive_values() {
        let replace = BTreeMap::from([("TITLE".to_string(), "New Title".to_string())]);
        assert_eq!(
            classify(b"#TITLE Old Title", &replace),
            Line::Raw(Cow::Owned(b"#TITLE New Title".to_vec()))
        );
        assert_eq!(
            classify(b"#TITLE\tOld", &replace),
            Line::Raw(Cow::Owned(b"#TITLE\tNew Title".to_vec()))
        );
        // Names are case sensitive and matched as a whole word.
        for line in [b"#title Old".as_slice(), b"#TITLEX Old", b"#TITLE"] {
            assert_eq!(classify(line, &replace), Line::Raw(Cow::Borrowed(line)));
        }
    }

    #[test]
    fn empty_replacement_keeps_directive() {
        let replace = BTreeMap::from([("TITLE".to_string(), String::new())]);
        let line = b"#TITLE Old Title".as_slice();
        assert_eq!(classify(line, &replace), Line::Raw(Cow::Borrowed(line)));
    }
}
