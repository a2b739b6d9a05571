//! Fancy diagnostics support using `ariadne`.
//!
//! Renoting reports [`RenoteWarningWithRange`]s carrying byte ranges of the source chart. This
//! module converts them into `ariadne::Report`s, which handle row/column calculations from the
//! byte offsets.
//!
//! Charts are often encoded in Shift_JIS. When the source is not valid UTF-8, every non-ASCII byte
//! is shown as `?`, which keeps the byte ranges pointing at the same records.
//!
//! # Usage Example
//!
//! ```rust
//! use bms_renote::renote::prelude::*;
//!
//! let source = b"#00102:abc\r\n#00101:01\r\n";
//! let output = renote(source, &RenoteRequest::default());
//!
//! // Output all warnings
//! emit_renote_warnings("test.bms", source, &output.warnings);
//! ```

use std::borrow::Cow;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::renote::{RenoteWarning, RenoteWarningWithRange};

/// Simple source container that holds the filename and source text.
pub struct SimpleSource<'a> {
    /// Name of the source file.
    name: &'a str,
    /// Source text content.
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting positioned errors to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert error to ariadne Report.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

impl ToAriadne for RenoteWarningWithRange {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let (start, end) = self.as_span();
        let filename = src.name().to_string();
        let color = match self.content() {
            RenoteWarning::UnmatchedOverride { .. } => Color::Yellow,
            _ => Color::Blue,
        };
        Report::build(ReportKind::Warning, (filename.clone(), start..end))
            .with_config(Config::default().with_index_type(IndexType::Byte))
            .with_message("renote: ".to_string() + &self.content().to_string())
            .with_label(Label::new((filename, start..end)).with_color(color))
            .finish()
    }
}

/// Convenience method: batch render the warnings of renoting `source`.
pub fn emit_renote_warnings<'a>(
    name: &'a str,
    source: &'a [u8],
    warnings: impl IntoIterator<Item = &'a RenoteWarningWithRange>,
) {
    let text = display_text(source);
    let simple = SimpleSource::new(name, &text);
    let ariadne_source = Source::from(&*text);
    for w in warnings {
        let report = w.to_report(&simple);
        let _ = report.print((name.to_string(), ariadne_source.clone()));
    }
}

/// Returns the source as text of the same byte length.
fn display_text(source: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(source) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(
            source
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
        ),
    }
}
