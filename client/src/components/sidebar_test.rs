use super::*;

#[test]
fn count_label_hidden_for_empty_threads() {
    assert_eq!(message_count_label(0), None);
}

#[test]
fn count_label_shows_message_total() {
    assert_eq!(message_count_label(6).as_deref(), Some("Messages: 6"));
}
