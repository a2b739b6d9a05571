//! Charts in Shift_JIS pass through byte for byte.

use bms_renote::renote::prelude::*;
use encoding_rs::SHIFT_JIS;
use pretty_assertions::assert_eq;

fn sjis(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
    assert!(!had_errors);
    bytes.into_owned()
}

#[test]
fn header_bytes_are_untouched() {
    let source = sjis("#TITLE 夜明けの歌\r\n#ARTIST 作曲者\r\n#WAV01 ド.wav\r\n#00111:01\r\n");
    let mut request = RenoteRequest::default();
    request.add_note(
        "1:0".parse().unwrap(),
        TargetKey::Key2,
        NoteOverride::new("01".parse().unwrap()),
    );
    let RenoteOutput { bytes, warnings } = renote(&source, &request);
    assert_eq!(warnings, vec![]);

    let expected = sjis("#TITLE 夜明けの歌\r\n#ARTIST 作曲者\r\n#WAV01 ド.wav\r\n#00101:00\r\n#00112:01\r\n");
    assert_eq!(bytes, expected);
}

#[test]
fn replacement_and_subartist_are_written_as_given() {
    let source = sjis("#TITLE 夜明けの歌\r\n");
    let request = RenoteRequest {
        replace: [("TITLE".to_string(), "Dawn [renoted]".to_string())].into(),
        add_subartist: Some("obj: someone".to_string()),
        ..Default::default()
    };
    let RenoteOutput { bytes, .. } = renote(&source, &request);
    assert_eq!(bytes, b"#TITLE Dawn [renoted]\r\n#SUBARTIST obj: someone\r\n");
}
