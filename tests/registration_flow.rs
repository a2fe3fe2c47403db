//! Tutor registration driven through the shell, with and without step checks.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tutor_hub::catalog::{Fixtures, Role};
use tutor_hub::config::AppConfig;
use tutor_hub::error::{Error, RegistrationError};
use tutor_hub::navigation::{Navigator, Screen};
use tutor_hub::registration::{ApplicationSink, ApplicationSubmission};
use tutor_hub::shell::{Outcome, Shell};

/// Keeps every submission it receives.
#[derive(Default)]
struct Recorder {
    received: Mutex<Vec<ApplicationSubmission>>,
}

#[async_trait]
impl ApplicationSink for Recorder {
    async fn submit(&self, submission: &ApplicationSubmission) -> Result<(), RegistrationError> {
        self.received.lock().await.push(submission.clone());
        Ok(())
    }
}

fn shell(validate_steps: bool, sink: Arc<Recorder>) -> Shell {
    let fixtures = Fixtures::embedded().unwrap();
    let today = fixtures.anchor.date_naive();
    let config = AppConfig {
        role: Role::Tutor,
        validate_steps,
        ..AppConfig::default()
    };
    let fixtures = Arc::new(fixtures);
    Shell::new(Navigator::new(config, fixtures, sink, today).unwrap())
}

async fn run(shell: &mut Shell, line: &str) -> String {
    match shell.run_line(line).await {
        Ok(Outcome::Output(text)) => text,
        Ok(Outcome::Quit) => panic!("unexpected quit on {line:?}"),
        Err(e) => panic!("{line:?} failed: {e}"),
    }
}

#[tokio::test]
async fn gated_wizard_walks_every_step() {
    let sink = Arc::new(Recorder::default());
    let mut shell = shell(true, Arc::clone(&sink));
    run(&mut shell, "go tutor/registration").await;

    let err = shell.run_line("next").await.unwrap_err();
    assert!(matches!(
        err,
        Error::Registration(RegistrationError::Incomplete { .. })
    ));

    for line in [
        "set first_name Grace",
        "set last_name Hopper",
        "set email grace@example.com",
        "set phone +1 555 010 2030",
        "next",
        "set degree phd",
        "set institution Yale",
        "set field Mathematics",
        "set year 1934",
        "next",
        "set subject Computer Science",
        "set proficiency Programming expert",
        "next",
        "set language English native",
        "next",
        "set day tuesday",
        "set slot tuesday morning",
        "set rate 60",
        "next",
        "set date 2024-05-24",
        "set time 2024-05-24 2",
        "set time 2024-05-24 Late evening",
    ] {
        run(&mut shell, line).await;
    }

    let out = run(&mut shell, "submit").await;
    assert!(out.starts_with("Application submitted"), "{out}");

    let received = sink.received.lock().await;
    assert_eq!(received.len(), 1);
    let submission = &received[0];
    assert_eq!(submission.application.full_name(), "Grace Hopper");
    assert_eq!(submission.weekly_availability.len(), 1);
    assert_eq!(submission.open_schedule.slot_count(), 2);
    assert_eq!(
        shell.navigator().tutor_profile().basic.email,
        "grace@example.com"
    );
}

#[tokio::test]
async fn ungated_wizard_submits_empty_form() {
    let sink = Arc::new(Recorder::default());
    let mut shell = shell(false, Arc::clone(&sink));
    run(&mut shell, "go tutor/registration").await;

    for _ in 0..5 {
        run(&mut shell, "next").await;
    }
    // Next past the end is the submit action, never a seventh step.
    run(&mut shell, "next").await;
    run(&mut shell, "next").await;
    assert_eq!(sink.received.lock().await.len(), 2);

    let Screen::Registration(wizard) = shell.navigator().screen() else {
        panic!("expected registration");
    };
    assert_eq!(wizard.controller().index(), 5);
    assert_eq!(wizard.submissions().len(), 2);
}

#[tokio::test]
async fn prev_keeps_entered_fields() {
    let sink = Arc::new(Recorder::default());
    let mut shell = shell(false, sink);
    run(&mut shell, "go tutor/registration").await;
    run(&mut shell, "set first_name Ada").await;
    run(&mut shell, "next").await;
    let out = run(&mut shell, "prev").await;
    assert!(out.contains("step 1 of 6"), "{out}");
    assert!(out.contains("Ada"));

    // Leaving the view discards the draft.
    run(&mut shell, "go tutor/dashboard").await;
    let out = run(&mut shell, "go tutor/registration").await;
    assert!(!out.contains("Ada"));
}
