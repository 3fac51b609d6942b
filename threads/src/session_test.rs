use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;

use super::*;
use crate::test_support::{MockService, reply, summary};
use crate::timeline::fixed_clock;
use crate::wire::RawThread;

type TestSession = ChatSession<Rc<MockService>, Rc<RefCell<ConversationState>>, Rc<RefCell<ThreadListState>>>;

fn session(service: &Rc<MockService>) -> TestSession {
    ChatSession::new(
        Rc::clone(service),
        Rc::new(RefCell::new(ConversationState::default())),
        Rc::new(RefCell::new(ThreadListState::default())),
        fixed_clock(1_704_110_400_000),
    )
}

#[test]
fn thread_route_formats_path() {
    assert_eq!(thread_route("abc"), "/chat/abc");
}

#[test]
fn start_without_route_opens_most_recent() {
    let service = Rc::new(
        MockService::default()
            .with_thread("t1", Ok(RawThread::from_pairs(["hi"], ["hello"])))
            .with_thread("t2", Ok(RawThread::default())),
    );
    service.push_list(Ok(vec![summary("t1", Some("Latest")), summary("t2", None)]));
    let session = session(&service);

    block_on(session.start(None));

    assert_eq!(session.threads().state().borrow().selected_index(), Some(0));
    let conversation = session.conversation().state().borrow();
    assert_eq!(conversation.thread_id.as_deref(), Some("t1"));
    assert_eq!(conversation.messages.len(), 2);
}

#[test]
fn start_without_threads_stays_on_welcome() {
    let service = Rc::new(MockService::default());
    service.push_list(Ok(Vec::new()));
    let session = session(&service);

    block_on(session.start(None));

    assert!(service.loaded.borrow().is_empty());
    assert!(session.conversation().state().borrow().show_welcome());
}

#[test]
fn start_with_route_opens_that_thread() {
    let service = Rc::new(MockService::default().with_thread("t2", Ok(RawThread::from_pairs(["q"], ["a"]))));
    service.push_list(Ok(vec![summary("t1", None), summary("t2", None)]));
    let session = session(&service);

    block_on(session.start(Some("t2")));

    assert_eq!(*service.loaded.borrow(), vec!["t2".to_owned()]);
    assert_eq!(session.threads().state().borrow().selected_index(), Some(1));
}

#[test]
fn select_new_resets_without_server_call() {
    let service = Rc::new(MockService::default().with_thread("t1", Ok(RawThread::from_pairs(["q"], ["a"]))));
    service.push_list(Ok(vec![summary("t1", None)]));
    let session = session(&service);
    block_on(session.start(None));
    let list_calls = *service.list_calls.borrow();

    session.select_new();

    assert_eq!(*service.list_calls.borrow(), list_calls);
    assert_eq!(service.loaded.borrow().len(), 1);
    assert!(session.threads().state().borrow().selected_id.is_none());
    assert!(session.conversation().state().borrow().messages.is_empty());
}

#[test]
fn select_index_out_of_range_loads_nothing() {
    let service = Rc::new(MockService::default());
    let session = session(&service);
    assert!(block_on(session.select_index(3)).is_none());
    assert!(service.loaded.borrow().is_empty());
}

#[test]
fn first_send_creates_thread_and_refreshes_list() {
    let service = Rc::new(MockService::default());
    service.push_reply(Ok(reply(Some("srv-1"), "Here are the totals.")));
    service.push_list(Ok(vec![summary("srv-1", Some("Totals"))]));
    let session = session(&service);

    let event = block_on(session.send("totals?")).unwrap();

    assert_eq!(event, SessionEvent::ThreadCreated("srv-1".to_owned()));
    assert_eq!(thread_route("srv-1"), "/chat/srv-1");
    assert_eq!(session.conversation().state().borrow().thread_id.as_deref(), Some("srv-1"));
    let threads = session.threads().state().borrow();
    assert_eq!(threads.selected_index(), Some(0));
    assert_eq!(threads.items[0].display_heading(), "Totals");
}

#[test]
fn send_on_existing_thread_does_not_refresh() {
    let service = Rc::new(MockService::default().with_thread("t1", Ok(RawThread::from_pairs(["q"], ["a"]))));
    service.push_reply(Ok(reply(Some("t1"), "more")));
    let session = session(&service);
    block_on(session.open_thread("t1"));

    let event = block_on(session.send("again")).unwrap();

    assert_eq!(event, SessionEvent::Replied);
    assert_eq!(*service.list_calls.borrow(), 0);
}

#[test]
fn failed_send_reports_failure() {
    let service = Rc::new(MockService::default());
    service.push_reply(Err(ApiError::Server { status: 500, message: "boom".to_owned() }));
    let session = session(&service);

    let event = block_on(session.send("hi")).unwrap();

    assert!(matches!(event, SessionEvent::Failed(ApiError::Server { status: 500, .. })));
    let conversation = session.conversation().state().borrow();
    assert!(!conversation.sending);
    assert!(conversation.thread_id.is_none());
}

#[test]
fn blank_send_is_rejected() {
    let service = Rc::new(MockService::default());
    let session = session(&service);
    assert!(block_on(session.send("  ")).is_none());
}

#[test]
fn routed_start_marks_conversation_loading_before_the_list_arrives() {
    let service = Rc::new(MockService::default());
    let list_gate = service.gate_list();
    let thread_gate = service.gate_thread("t2");
    let session = session(&service);

    let ((), (during, sent)) = block_on(async {
        futures::join!(session.start(Some("t2")), async {
            let during = session
                .conversation()
                .state()
                .with(|s| (s.thread_id.clone(), s.loading, s.show_welcome()))
                .unwrap();
            let sent = session.send("typed while loading").await;
            assert!(list_gate.send(Ok(vec![summary("t1", None), summary("t2", None)])).is_ok());
            assert!(thread_gate.send(Ok(RawThread::from_pairs(["q"], ["a"]))).is_ok());
            (during, sent)
        })
    });

    assert_eq!(during, (Some("t2".to_owned()), true, false));
    assert!(sent.is_none());
    assert!(service.posted.borrow().is_empty());
    let conversation = session.conversation().state().borrow();
    assert_eq!(conversation.thread_id.as_deref(), Some("t2"));
    assert_eq!(conversation.messages.len(), 2);
    assert_eq!(session.threads().state().borrow().selected_index(), Some(1));
}

#[test]
fn send_after_routed_start_posts_to_routed_thread() {
    let service = Rc::new(MockService::default().with_thread("t2", Ok(RawThread::from_pairs(["q"], ["a"]))));
    service.push_list(Ok(vec![summary("t2", None)]));
    service.push_reply(Ok(reply(Some("t2"), "more")));
    let session = session(&service);

    block_on(session.start(Some("t2")));
    let event = block_on(session.send("follow up")).unwrap();

    assert_eq!(event, SessionEvent::Replied);
    assert_eq!(*service.posted.borrow(), vec![(Some("t2".to_owned()), "follow up".to_owned())]);
}

#[test]
fn created_thread_left_during_refresh_is_not_announced() {
    let service = Rc::new(MockService::default().with_thread("B", Ok(RawThread::from_pairs(["b"], ["bb"]))));
    service.push_reply(Ok(reply(Some("srv-1"), "hi back")));
    let list_gate = service.gate_list();
    let session = session(&service);

    let (event, ()) = block_on(async {
        futures::join!(session.send("hi"), async {
            session.open_thread("B").await;
            assert!(list_gate.send(Ok(vec![summary("srv-1", None), summary("B", None)])).is_ok());
        })
    });

    assert_eq!(event, Some(SessionEvent::Superseded));
    assert_eq!(session.conversation().state().borrow().thread_id.as_deref(), Some("B"));
    assert_eq!(session.threads().state().borrow().selected_id.as_deref(), Some("B"));
    assert_eq!(session.threads().state().borrow().items.len(), 2);
}

#[test]
fn rename_updates_header_and_sidebar_locally() {
    let service = Rc::new(MockService::default().with_thread("t1", Ok(RawThread::from_pairs(["q"], ["a"]))));
    service.push_list(Ok(vec![summary("t1", Some("Old"))]));
    let session = session(&service);
    block_on(session.start(None));
    let list_calls = *service.list_calls.borrow();

    assert!(session.rename("  Q3 revenue "));

    assert_eq!(session.conversation().state().borrow().heading.as_deref(), Some("Q3 revenue"));
    assert_eq!(session.threads().state().borrow().items[0].display_heading(), "Q3 revenue");
    assert_eq!(*service.list_calls.borrow(), list_calls);
    assert!(service.posted.borrow().is_empty());
}

#[test]
fn blank_rename_is_ignored() {
    let service = Rc::new(MockService::default());
    let session = session(&service);
    assert!(!session.rename("   "));
    assert!(session.conversation().state().borrow().heading.is_none());
}
