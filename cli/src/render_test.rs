use super::*;

fn summary(id: &str, heading: Option<&str>, count: usize) -> ThreadSummary {
    ThreadSummary { thread_id: id.to_owned(), heading: heading.map(str::to_owned), message_count: count }
}

#[test]
fn thread_list_marks_selection_and_counts() {
    let items = vec![summary("t1", Some("Orders"), 4), summary("t2", None, 0)];
    let out = render_thread_list(&items, Some("t2"));
    assert_eq!(out, "   1. Orders  [Messages: 4]  (t1)\n*  2. New Chat  (t2)\n");
}

#[test]
fn empty_thread_list_says_so() {
    assert_eq!(render_thread_list(&[], None), "No conversations yet.\n");
}

#[test]
fn pending_message_renders_placeholder() {
    let line = render_message(&Message::pending("10:02"));
    assert_eq!(line, "[10:02] assistant: Thinking...");
}

#[test]
fn conversation_falls_back_to_untitled_heading() {
    let mut state = ConversationState::default();
    state.messages = vec![Message::user("hi", "09:00"), Message::assistant("hello", "09:01")];
    state.error = Some("Failed to load conversation.".to_owned());
    let out = render_conversation(&state);
    assert_eq!(
        out,
        "== New Conversation ==\n[09:00] you: hi\n[09:01] assistant: hello\n! Failed to load conversation.\n"
    );
}

#[test]
fn field_errors_list_in_form_order() {
    let errors = FieldErrors {
        db_type: Some("Database type is required"),
        connection_uri: Some("Connection URL is required"),
        ..FieldErrors::default()
    };
    assert_eq!(render_field_errors(&errors), "- Database type is required\n- Connection URL is required\n");
}
