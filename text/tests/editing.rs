//! End-to-end editing sessions through the public API.
//!
//! Each test drives a buffer and cursor the way an editor front end would and
//! checks the text, caret and history afterwards.

use gapedit_text::{
    parse_script, range::transposed, test_helpers::TestEditor, BufferOptions, Edit, HistoryOptions,
    TextBuffer, TextBufferKind,
};

fn scratch(text: &str) -> TextBuffer {
    TextBuffer::from_text(
        TextBufferKind::Scratch,
        text.as_bytes(),
        "scratch",
        &BufferOptions::default(),
    )
    .unwrap()
}

fn text_of(buffer: &TextBuffer) -> String {
    String::from_utf8(buffer.write_to_vec()).unwrap()
}

#[test]
fn insert_then_undo_restores_caret() {
    let mut e = TestEditor::new("|abc\ndef");
    e.cursor.insert(&mut e.buffer, 'X', 1).unwrap();
    e.assert_notation("X|abc\ndef");
    e.cursor.undo(&mut e.buffer).unwrap();
    e.assert_notation("|abc\ndef");
}

#[test]
fn move_line_down_twice_stops_at_last_line() {
    let mut e = TestEditor::new("line1\nlin|e2\nline3");
    assert!(e.cursor.move_line_down(&mut e.buffer, 1).unwrap());
    e.assert_notation("line1\nline3\nlin|e2");
    assert!(!e.cursor.move_line_down(&mut e.buffer, 1).unwrap());
    e.assert_notation("line1\nline3\nlin|e2");
}

#[test]
fn typing_burst_is_one_undo_step() {
    let mut e = TestEditor::new("|");
    for ch in ['a', 'b', 'c'] {
        e.cursor.insert(&mut e.buffer, ch, 1).unwrap();
    }
    let history = e.buffer.history();
    assert_eq!(history.committed().len(), 1);
    let edit = &history.committed()[0];
    assert!(matches!(edit, Edit::Insert { range, .. } if *range == (0..3)));
    assert_eq!(history.payload(edit), b"abc");

    e.cursor.undo(&mut e.buffer).unwrap();
    e.assert_notation("|");
    assert!(!e.buffer.history().can_undo());
}

#[test]
fn undo_all_then_redo_all_walks_every_state() {
    let mut e = TestEditor::new("|fn main() {}");
    let mut states = vec![e.text()];

    e.cursor.insert_string(&mut e.buffer, b"// entry\n").unwrap();
    states.push(e.text());
    e.pause();
    e.cursor.end_of_line(&e.buffer);
    e.cursor.delete_backward(&mut e.buffer, 3).unwrap();
    states.push(e.text());
    e.pause();
    e.cursor.move_line_up(&mut e.buffer, 1).unwrap();
    states.push(e.text());
    e.pause();
    e.cursor.duplicate_line(&mut e.buffer, 2).unwrap();
    states.push(e.text());

    for expected in states.iter().rev().skip(1) {
        assert!(e.cursor.undo(&mut e.buffer).unwrap());
        assert_eq!(&e.text(), expected);
    }
    assert!(!e.cursor.undo(&mut e.buffer).unwrap());

    for expected in states.iter().skip(1) {
        assert!(e.cursor.redo(&mut e.buffer).unwrap());
        assert_eq!(&e.text(), expected);
    }
    assert!(!e.cursor.redo(&mut e.buffer).unwrap());
}

#[test]
fn new_edit_after_undo_discards_redo() {
    let mut e = TestEditor::new("|");
    e.cursor.insert_string(&mut e.buffer, b"one").unwrap();
    e.pause();
    e.cursor.insert_string(&mut e.buffer, b" two").unwrap();
    e.cursor.undo(&mut e.buffer).unwrap();
    assert!(e.buffer.history().can_redo());

    e.pause();
    e.cursor.insert_string(&mut e.buffer, b"!").unwrap();
    assert!(!e.buffer.history().can_redo());
    assert!(e.buffer.history().redoable().is_empty());
    assert_eq!(e.buffer.history().committed().len(), 2);
    assert!(!e.cursor.redo(&mut e.buffer).unwrap());
    e.assert_notation("one!|");
}

#[test]
fn coalescing_only_changes_undo_granularity() {
    let keys = "let x = 1;";

    let mut fast = TestEditor::new("|");
    let mut slow = TestEditor::new("|");
    for ch in keys.chars() {
        fast.cursor.insert(&mut fast.buffer, ch, 1).unwrap();
        slow.cursor.insert(&mut slow.buffer, ch, 1).unwrap();
        slow.pause();
    }

    assert_eq!(fast.text(), slow.text());
    assert_eq!(fast.buffer.history().committed().len(), 1);
    assert_eq!(slow.buffer.history().committed().len(), keys.len());
}

#[test]
fn backspaces_merge_only_when_enabled() {
    let options = HistoryOptions {
        coalesce_deletions: true,
        ..HistoryOptions::default()
    };
    let mut merged = TestEditor::with_options("hello|", options);
    let mut split = TestEditor::new("hello|");
    for _ in 0..3 {
        merged.cursor.delete_backward(&mut merged.buffer, 1).unwrap();
        split.cursor.delete_backward(&mut split.buffer, 1).unwrap();
    }
    assert_eq!(merged.text(), "he");
    assert_eq!(split.text(), "he");
    assert_eq!(merged.buffer.history().committed().len(), 1);
    assert_eq!(split.buffer.history().committed().len(), 3);

    merged.cursor.undo(&mut merged.buffer).unwrap();
    assert_eq!(merged.text(), "hello");
}

#[test]
fn transpose_argument_order_does_not_matter() {
    let mut a = scratch("alpha beta gamma");
    let mut b = scratch("alpha beta gamma");
    a.transpose(0..5, 11..16).unwrap();
    b.transpose(11..16, 0..5).unwrap();
    assert_eq!(text_of(&a), "gamma beta alpha");
    assert_eq!(text_of(&a), text_of(&b));
}

#[test]
fn transposing_the_swapped_ranges_restores_text() {
    let mut buffer = scratch("one\ntwo\nthree");
    let first = 0..3;
    let second = 8..13;
    buffer.transpose(first.clone(), second.clone()).unwrap();
    assert_eq!(text_of(&buffer), "three\ntwo\none");

    let (second_now, first_now) = transposed(&first, &second);
    assert_eq!(second_now, 0..5);
    assert_eq!(first_now, 10..13);
    buffer.transpose(second_now, first_now).unwrap();
    assert_eq!(text_of(&buffer), "one\ntwo\nthree");
}

#[test]
fn commands_at_buffer_edges_do_nothing() {
    let mut e = TestEditor::new("|");
    assert!(!e.cursor.move_left(&e.buffer, 1));
    assert!(!e.cursor.move_right(&e.buffer, 1));
    assert!(!e.cursor.move_up(&e.buffer, 1));
    assert!(!e.cursor.move_down(&e.buffer, 1));
    assert!(!e.cursor.delete_backward(&mut e.buffer, 1).unwrap());
    assert!(!e.cursor.delete_line(&mut e.buffer).unwrap());
    assert!(!e.cursor.undo(&mut e.buffer).unwrap());
    assert!(!e.cursor.redo(&mut e.buffer).unwrap());
    assert!(!e.buffer.history().can_undo());
    e.assert_notation("|");
}

#[test]
fn dirty_range_tracks_edits_until_cleared() {
    let mut buffer = scratch("0123456789");
    assert_eq!(buffer.dirty_range(), None);
    buffer.insert(2, b"ab").unwrap();
    buffer.insert(8, b"c").unwrap();
    assert_eq!(buffer.dirty_range(), Some(2..9));
    buffer.clear_dirty();
    assert_eq!(buffer.dirty_range(), None);
}

#[test]
fn script_drives_a_session() {
    let script = r#"
        # rename the function and duplicate its body line
        right_snake_word
        delete_backward_snake_word
        insert "run"
        down
        duplicate_line
        undo
        redo
    "#;
    let mut e = TestEditor::new("|main() {\n    work();\n}");
    for command in parse_script(script).unwrap() {
        e.cursor
            .execute(&command, &mut e.buffer, &mut e.clipboard, 4)
            .unwrap();
    }
    assert_eq!(e.text(), "run() {\n    work();\n    work();\n}");
}
