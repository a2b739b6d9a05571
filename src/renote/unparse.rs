//! Unparse classified lines back into the bytes of a chart.

use super::{
    lex::{Line, LineWithRange, NoteDataLine, ValueLine},
    time::TimeSignatureTable,
    writer::NewNotesWriter,
};

/// The line terminator of BMS charts.
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// The header command switching long notes to the paired start and end tokens.
pub const LN_TYPE_1: &[u8] = b"#LNTYPE 1";

impl NoteDataLine {
    /// Writes the line without its terminator.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        write_prefix(self.measure.0, self.channel.as_bytes(), out);
        for obj in &self.objects {
            out.extend_from_slice(&obj.as_bytes());
        }
        out.extend(self.remainder);
    }
}

impl ValueLine<'_> {
    /// Writes the line without its terminator.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        write_prefix(self.measure.0, self.channel.as_bytes(), out);
        out.extend_from_slice(self.raw_value);
    }
}

impl Line<'_> {
    /// Writes the line without its terminator.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Line::NoteData(line) => line.write_to(out),
            Line::Value(line) => line.write_to(out),
            Line::Raw(bytes) => out.extend_from_slice(bytes),
        }
    }
}

fn write_prefix(measure: u16, channel: [u8; 2], out: &mut Vec<u8>) {
    out.push(b'#');
    out.extend_from_slice(format!("{measure:03}").as_bytes());
    out.extend_from_slice(&channel);
    out.push(b':');
}

/// Joins the chart back together.
///
/// The order is: the source lines, `#LNTYPE 1` if any long note was written, the synthesized
/// lines, and `#SUBARTIST` if `add_subartist` is given and not empty. Every line ends with CRLF, whatever the
/// terminator of the source was.
#[must_use]
pub fn assemble(
    lines: &[LineWithRange<'_>],
    writer: &NewNotesWriter,
    table: &TimeSignatureTable,
    add_subartist: Option<&str>,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(lines.iter().map(|line| line.range().len() + 2).sum());
    for line in lines {
        line.content().write_to(&mut out);
        out.extend_from_slice(LINE_TERMINATOR);
    }
    if writer.has_long_notes() {
        out.extend_from_slice(LN_TYPE_1);
        out.extend_from_slice(LINE_TERMINATOR);
    }
    for line in writer.lines(table) {
        line.write_to(&mut out);
        out.extend_from_slice(LINE_TERMINATOR);
    }
    if let Some(sub_artist) = add_subartist.filter(|sub_artist| !sub_artist.is_empty()) {
        out.extend_from_slice(b"#SUBARTIST ");
        out.extend_from_slice(sub_artist.as_bytes());
        out.extend_from_slice(LINE_TERMINATOR);
    }
    out
}
