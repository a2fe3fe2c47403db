//! Messaging through the shell with the scripted assistant on a paused clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use tutor_hub::catalog::{Fixtures, Role};
use tutor_hub::config::AppConfig;
use tutor_hub::messaging::{ChatEvent, Sender};
use tutor_hub::navigation::{Navigator, Screen};
use tutor_hub::registration::LogSink;
use tutor_hub::shell::{Outcome, Shell};

fn shell() -> Shell {
    let fixtures = Fixtures::embedded().unwrap();
    let today = fixtures.anchor.date_naive();
    let config = AppConfig {
        role: Role::Student,
        ..AppConfig::default()
    };
    let (fixtures, sink) = (Arc::new(fixtures), Arc::new(LogSink));
    Shell::new(Navigator::new(config, fixtures, sink, today).unwrap())
}

async fn run(shell: &mut Shell, line: &str) -> String {
    match shell.run_line(line).await {
        Ok(Outcome::Output(text)) => text,
        Ok(Outcome::Quit) => panic!("unexpected quit on {line:?}"),
        Err(e) => panic!("{line:?} failed: {e}"),
    }
}

/// Drain whatever is buffered on `rx` right now.
fn drain(rx: &mut broadcast::Receiver<ChatEvent>) -> Vec<ChatEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn is_assistant_reply(event: &ChatEvent) -> bool {
    match event {
        ChatEvent::MessageAdded { message, .. } => message.sender == Sender::Assistant,
        _ => false,
    }
}

fn is_cancellation(event: &ChatEvent) -> bool {
    matches!(event, ChatEvent::ReplyCancelled { .. })
}

fn assistant_replies(events: &[ChatEvent]) -> usize {
    events.iter().filter(|e| is_assistant_reply(e)).count()
}

#[tokio::test(start_paused = true)]
async fn assistant_replies_after_delay() {
    let mut shell = shell();
    let out = run(&mut shell, "go student/messages").await;
    assert!(out.contains("> [buze]"));
    let mut rx = shell.subscribe().unwrap();

    run(&mut shell, "say Can you help with derivatives?").await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(assistant_replies(&drain(&mut rx)), 0);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(assistant_replies(&drain(&mut rx)), 1);

    let out = run(&mut shell, "show").await;
    assert!(out.contains("Can you help with derivatives?"));
}

#[tokio::test(start_paused = true)]
async fn switching_contacts_keeps_reply_alive() {
    let mut shell = shell();
    run(&mut shell, "go student/messages").await;
    let mut rx = shell.subscribe().unwrap();

    run(&mut shell, "say first").await;
    let out = run(&mut shell, "open 1").await;
    assert!(out.contains("> [1] Dr. Sarah Miller"));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(assistant_replies(&drain(&mut rx)), 1);

    // Human contacts never answer on their own.
    let out = run(&mut shell, "say See you tomorrow").await;
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(assistant_replies(&drain(&mut rx)), 0);
    assert!(out.contains("See you tomorrow"));
}

#[tokio::test(start_paused = true)]
async fn leaving_the_assistant_page_cancels_reply() {
    let mut shell = shell();
    run(&mut shell, "go student/assistant").await;
    let mut rx = shell.subscribe().unwrap();

    run(&mut shell, "say one").await;
    run(&mut shell, "say two").await;
    let Screen::Assistant(view) = shell.navigator().screen() else {
        panic!("expected assistant");
    };
    assert_eq!(view.chat.pending_replies(), 2);

    run(&mut shell, "go student/find-tutor").await;
    assert!(shell.subscribe().is_none());
    tokio::time::sleep(Duration::from_secs(5)).await;

    let events = drain(&mut rx);
    assert_eq!(assistant_replies(&events), 0);
    assert!(events.iter().any(is_cancellation));
}

#[tokio::test(start_paused = true)]
async fn dashboard_chat_opens_on_first_message() {
    let mut shell = shell();
    let out = run(&mut shell, "show").await;
    assert!(out.contains("Welcome back, Alex Johnson!"));
    assert!(out.contains("say something to start"));
    let mut rx = shell.subscribe().unwrap();

    let out = run(&mut shell, "say Any tips for my exam?").await;
    assert!(out.contains("Chat with Buze AI Assistant:"));
    assert!(out.contains("You: Any tips for my exam?"));
    assert!(!out.contains("say something to start"));

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(assistant_replies(&drain(&mut rx)), 1);
    let Screen::StudentDashboard(view) = shell.navigator().screen() else {
        panic!("expected student dashboard");
    };
    assert_eq!(view.chat.pending_replies(), 0);
}

#[tokio::test(start_paused = true)]
async fn leaving_the_dashboard_cancels_its_reply() {
    let mut shell = shell();
    let mut rx = shell.subscribe().unwrap();
    run(&mut shell, "say Quick question").await;
    run(&mut shell, "go student/sessions").await;
    tokio::time::sleep(Duration::from_secs(3)).await;

    let events = drain(&mut rx);
    assert_eq!(assistant_replies(&events), 0);
    assert!(events.iter().any(is_cancellation));

    // Coming back starts a fresh, closed chat.
    let out = run(&mut shell, "go student/dashboard").await;
    assert!(!out.contains("Quick question"));
}

#[tokio::test(start_paused = true)]
async fn blank_messages_are_ignored() {
    let mut shell = shell();
    run(&mut shell, "go student/assistant").await;
    run(&mut shell, "say").await;
    run(&mut shell, "say    ").await;
    let Screen::Assistant(view) = shell.navigator().screen() else {
        panic!("expected assistant");
    };
    assert_eq!(view.chat.pending_replies(), 0);
    assert_eq!(view.chat.len().await, 3);
}

#[tokio::test]
async fn pinning_moves_the_assistant() {
    let mut shell = shell();
    run(&mut shell, "go student/messages").await;
    run(&mut shell, "pin").await;
    let Screen::Messages(inbox) = shell.navigator().screen() else {
        panic!("expected messages");
    };
    let order: Vec<_> = inbox
        .contacts()
        .visible()
        .iter()
        .map(|c| c.id.clone())
        .collect();
    assert_eq!(order, vec!["1", "3", "2", "buze"]);
}
