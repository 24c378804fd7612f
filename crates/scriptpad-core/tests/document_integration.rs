// Integration tests for documents opened from disk.
//
// These follow the scripted editing session a client drives: open a file,
// select, replace a line, insert, append, undo after each step, save.

use scriptpad_core::{char_to_pos, pos_to_char, Document, DocumentOptions, LineEnding, OutOfRange};

const TEST_FILE: &str = "//**EXAMPLE FILE**\n\nint main() {\n\treturn 0;\n}\n";

fn open_fixture(contents: &[u8]) -> (tempfile::TempDir, Document) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test_file");
    std::fs::write(&path, contents).unwrap();
    let doc = Document::open(&path, &DocumentOptions::default()).unwrap();
    (dir, doc)
}

#[test]
fn test_scripted_session_undoes_everything() {
    let (_dir, mut doc) = open_fixture(TEST_FILE.as_bytes());

    doc.set_selection(2, 8).unwrap();
    assert_eq!(doc.selected_text().unwrap(), "**EXAMPL");

    doc.set_line(2, "\t\tThis is a new line\n").unwrap();
    assert_eq!(doc.line_text(2).unwrap(), "\t\tThis is a new line\n");
    doc.undo().unwrap();
    assert_eq!(doc.line_text(2).unwrap(), "int main() {\n");

    doc.insert_text(12, "**NEW TEXT**").unwrap();
    doc.set_selection(12, "**NEW TEXT**".chars().count()).unwrap();
    assert_eq!(doc.selected_text().unwrap(), "**NEW TEXT**");
    doc.undo().unwrap();

    doc.append_text("\n**NEW LINE**").unwrap();
    let last = doc.line_count() - 1;
    assert_eq!(doc.line_text(last).unwrap(), "**NEW LINE**");
    doc.undo().unwrap();

    assert_eq!(doc.full_text(), TEST_FILE);
    assert!(!doc.is_modified());
    assert!(doc.file_path.is_some());
}

#[test]
fn test_offsets_roundtrip_on_opened_file() {
    let (_dir, doc) = open_fixture("héllo\r\nwörld 🌍\r\n\r\nend".as_bytes());
    for offset in 0..=doc.buffer.len_chars() {
        let pos = char_to_pos(&doc.buffer, offset).unwrap();
        assert_eq!(pos_to_char(&doc.buffer, pos).unwrap(), offset);
    }
    let err = char_to_pos(&doc.buffer, doc.buffer.len_chars() + 1).unwrap_err();
    assert!(err.downcast_ref::<OutOfRange>().is_some());
}

#[test]
fn test_edit_save_reopen_keeps_encoding_and_endings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bom.txt");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(b"first\r\nsecond\r\n");
    std::fs::write(&path, &bytes).unwrap();

    let mut doc = Document::open(&path, &DocumentOptions::default()).unwrap();
    doc.set_line(1, "2nd\n").unwrap();
    doc.save().unwrap();

    let saved = std::fs::read(&path).unwrap();
    assert_eq!(&saved[..3], &[0xEF, 0xBB, 0xBF]);
    assert_eq!(&saved[3..], b"first\r\n2nd\r\n");

    let reopened = Document::open(&path, &DocumentOptions::default()).unwrap();
    assert_eq!(reopened.full_text(), "first\n2nd\n");
    assert_eq!(reopened.line_ending, LineEnding::CrLf);
    assert!(reopened.encoding.bom);
}

#[test]
fn test_every_single_edit_undoes_byte_for_byte() {
    let (_dir, mut doc) = open_fixture(TEST_FILE.as_bytes());
    let before = doc.full_text();

    doc.set_line(0, "// header\n").unwrap();
    doc.undo().unwrap();
    assert_eq!(doc.full_text(), before);

    doc.replace_range(20, 3, "long").unwrap();
    doc.undo().unwrap();
    assert_eq!(doc.full_text(), before);

    doc.insert_text(0, "\n\n").unwrap();
    doc.undo().unwrap();
    assert_eq!(doc.full_text(), before);

    let len = doc.info().text_length;
    doc.replace_range(0, len, "").unwrap();
    assert_eq!(doc.line_count(), 1);
    doc.undo().unwrap();
    assert_eq!(doc.full_text(), before);
}
