//! RegistrationWizard: coordinates the step controller, the application
//! draft, and hand-off of the finished application.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::availability::{DayPart, RecurringAvailability};
use super::model::TutorApplication;
use super::schedule::ScheduleState;
use super::state::{PrimaryAction, WizardController, WizardStep};
use super::validation::{AcceptAll, StepValidator};
use crate::error::RegistrationError;

/// The steps of the tutor registration form, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    BasicInformation,
    Qualifications,
    SubjectExpertise,
    Languages,
    Availability,
    OpenSchedule,
}

impl RegistrationStep {
    pub const ALL: [RegistrationStep; 6] = [
        Self::BasicInformation,
        Self::Qualifications,
        Self::SubjectExpertise,
        Self::Languages,
        Self::Availability,
        Self::OpenSchedule,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BasicInformation => "Basic Information",
            Self::Qualifications => "Qualifications & Credentials",
            Self::SubjectExpertise => "Subject Expertise",
            Self::Languages => "Languages",
            Self::Availability => "Availability Settings",
            Self::OpenSchedule => "Open Schedule",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::BasicInformation => "Tell us about yourself",
            Self::Qualifications => "Your education and certifications",
            Self::SubjectExpertise => "What subjects can you teach?",
            Self::Languages => "What languages do you speak?",
            Self::Availability => "Set your weekly availability",
            Self::OpenSchedule => "Choose specific dates and times",
        }
    }

    pub fn to_wizard_step(&self) -> WizardStep {
        WizardStep::new(self.title(), self.description())
    }
}

/// Wizard steps for tutor registration.
pub fn registration_steps() -> Vec<WizardStep> {
    RegistrationStep::ALL
        .iter()
        .map(RegistrationStep::to_wizard_step)
        .collect()
}

/// Everything the user has entered so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationDraft {
    pub application: TutorApplication,
    pub availability: RecurringAvailability,
    pub schedule: ScheduleState,
}

/// Payload handed to the submission collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub application: TutorApplication,
    /// Day key mapped to the day parts that are on (only for days that are on).
    pub weekly_availability: BTreeMap<String, Vec<DayPart>>,
    pub open_schedule: ScheduleState,
}

impl ApplicationSubmission {
    pub fn from_draft(draft: &RegistrationDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            application: draft.application.clone(),
            weekly_availability: draft
                .availability
                .effective()
                .into_iter()
                .map(|(day, parts)| (day.to_string(), parts))
                .collect(),
            open_schedule: draft.schedule.clone(),
        }
    }
}

/// Receives submitted applications. Whatever happens next is its business.
#[async_trait]
pub trait ApplicationSink: Send + Sync {
    async fn submit(&self, submission: &ApplicationSubmission) -> Result<(), RegistrationError>;
}

/// Sink that only records the submission in the log.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl ApplicationSink for LogSink {
    async fn submit(&self, submission: &ApplicationSubmission) -> Result<(), RegistrationError> {
        info!(
            submission_id = %submission.id,
            tutor = %submission.application.full_name(),
            subjects = submission.application.expertise.subjects.len(),
            open_dates = submission.open_schedule.len(),
            "Tutor application submitted"
        );
        Ok(())
    }
}

/// What pressing the primary button did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryOutcome {
    /// Moved to the step at this index.
    Advanced(usize),
    /// Handed the application to the sink.
    Submitted(Uuid),
}

/// Tutor registration wizard: one per mounted registration view.
pub struct RegistrationWizard {
    controller: WizardController,
    draft: RegistrationDraft,
    validator: Box<dyn StepValidator>,
    gated: bool,
    sink: Arc<dyn ApplicationSink>,
    submitted: Vec<Uuid>,
}

impl RegistrationWizard {
    /// Ungated wizard: any step can be left with empty fields.
    pub fn new(sink: Arc<dyn ApplicationSink>) -> Result<Self, RegistrationError> {
        Ok(Self {
            controller: WizardController::new(registration_steps())?,
            draft: RegistrationDraft::default(),
            validator: Box::new(AcceptAll),
            gated: false,
            sink,
            submitted: Vec::new(),
        })
    }

    /// Gate the primary action (and submission) on `validator`.
    pub fn with_validator(mut self, validator: impl StepValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self.gated = true;
        self
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut RegistrationDraft {
        &mut self.draft
    }

    pub fn is_gated(&self) -> bool {
        self.gated
    }

    pub fn current_step(&self) -> RegistrationStep {
        // The controller is built from RegistrationStep::ALL, so the index is in range.
        RegistrationStep::from_index(self.controller.index())
            .unwrap_or(RegistrationStep::OpenSchedule)
    }

    pub fn primary_action(&self) -> PrimaryAction {
        self.controller.primary_action()
    }

    /// Move forward without validation.
    pub fn advance(&mut self) -> bool {
        let moved = self.controller.advance();
        if moved {
            info!(step = self.current_step().title(), "Registration advanced");
        }
        moved
    }

    pub fn retreat(&mut self) -> bool {
        let moved = self.controller.retreat();
        if moved {
            info!(step = self.current_step().title(), "Registration went back");
        }
        moved
    }

    /// Whether the step at `index` passes the configured validator.
    /// Out-of-range indices are never valid.
    pub fn validate_step(&self, index: usize) -> bool {
        RegistrationStep::from_index(index)
            .is_some_and(|step| self.validator.validate_step(step, &self.draft))
    }

    /// Validate the current step, reporting why it fails.
    pub fn check_current(&self) -> Result<(), RegistrationError> {
        self.validator.validate(self.current_step(), &self.draft)
    }

    /// Next on every step but the last; submit on the last.
    pub async fn press_primary(&mut self) -> Result<PrimaryOutcome, RegistrationError> {
        match self.primary_action() {
            PrimaryAction::Submit => self.submit().await.map(PrimaryOutcome::Submitted),
            PrimaryAction::Next => {
                if self.gated {
                    if let Err(e) = self.check_current() {
                        warn!(step = self.current_step().title(), error = %e, "Step incomplete");
                        return Err(e);
                    }
                }
                self.advance();
                Ok(PrimaryOutcome::Advanced(self.controller.index()))
            }
        }
    }

    /// Hand the application to the sink. Only valid on the final step.
    ///
    /// The wizard stays where it is afterwards; submitting again sends a new
    /// submission.
    pub async fn submit(&mut self) -> Result<Uuid, RegistrationError> {
        if !self.controller.is_terminal() {
            return Err(RegistrationError::NotTerminal {
                index: self.controller.index(),
            });
        }
        if self.gated {
            for step in RegistrationStep::ALL {
                self.validator.validate(step, &self.draft)?;
            }
        }

        let submission = ApplicationSubmission::from_draft(&self.draft);
        self.sink.submit(&submission).await?;
        self.submitted.push(submission.id);
        Ok(submission.id)
    }

    /// Ids of submissions accepted by the sink during this session.
    pub fn submissions(&self) -> &[Uuid] {
        &self.submitted
    }

    /// Select a date on the open schedule. Dates before `today` are refused.
    pub fn select_open_date(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<bool, RegistrationError> {
        if date < today {
            debug!(%date, %today, "Refusing past date");
            return Err(RegistrationError::PastDate { date });
        }
        Ok(self.draft.schedule.select_date(date))
    }
}

impl std::fmt::Debug for RegistrationWizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationWizard")
            .field("step", &self.controller.index())
            .field("gated", &self.gated)
            .field("submitted", &self.submitted.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::Mutex;

    use super::*;
    use crate::registration::validation::RequiredFields;

    /// Sink that keeps every submission it receives.
    #[derive(Default)]
    struct RecordingSink {
        received: Mutex<Vec<ApplicationSubmission>>,
    }

    #[async_trait]
    impl ApplicationSink for RecordingSink {
        async fn submit(
            &self,
            submission: &ApplicationSubmission,
        ) -> Result<(), RegistrationError> {
            self.received.lock().await.push(submission.clone());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl ApplicationSink for FailingSink {
        async fn submit(&self, _: &ApplicationSubmission) -> Result<(), RegistrationError> {
            Err(RegistrationError::SubmitFailed("backend down".into()))
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn steps_match_form() {
        let steps = registration_steps();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0].title, "Basic Information");
        assert_eq!(steps[5].description, "Choose specific dates and times");
    }

    #[tokio::test]
    async fn ungated_wizard_walks_to_submit_with_empty_fields() {
        let sink = Arc::new(RecordingSink::default());
        let mut wizard = RegistrationWizard::new(sink.clone()).unwrap();

        for expected in 1..6 {
            let outcome = wizard.press_primary().await.unwrap();
            assert_eq!(outcome, PrimaryOutcome::Advanced(expected));
        }
        assert_eq!(wizard.current_step(), RegistrationStep::OpenSchedule);
        assert_eq!(wizard.primary_action(), PrimaryAction::Submit);

        let outcome = wizard.press_primary().await.unwrap();
        let PrimaryOutcome::Submitted(id) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert_eq!(wizard.submissions(), &[id]);
        assert_eq!(sink.received.lock().await.len(), 1);
        // Still on the last step.
        assert_eq!(wizard.controller().index(), 5);
    }

    #[tokio::test]
    async fn submit_before_last_step_is_refused() {
        let mut wizard = RegistrationWizard::new(Arc::new(LogSink)).unwrap();
        wizard.advance();
        let err = wizard.submit().await.unwrap_err();
        assert!(matches!(err, RegistrationError::NotTerminal { index: 1 }));
    }

    #[tokio::test]
    async fn gated_wizard_blocks_incomplete_step() {
        let mut wizard = RegistrationWizard::new(Arc::new(LogSink))
            .unwrap()
            .with_validator(RequiredFields);
        let err = wizard.press_primary().await.unwrap_err();
        assert!(matches!(err, RegistrationError::Incomplete { .. }));
        assert_eq!(wizard.controller().index(), 0);

        // Plain navigation is never gated.
        assert!(wizard.advance());
        assert_eq!(wizard.controller().index(), 1);
    }

    #[tokio::test]
    async fn gated_submit_checks_every_step() {
        let mut wizard = RegistrationWizard::new(Arc::new(LogSink))
            .unwrap()
            .with_validator(RequiredFields);
        while wizard.advance() {}
        let err = wizard.submit().await.unwrap_err();
        let RegistrationError::Incomplete { step, .. } = err else {
            panic!("expected an incomplete step");
        };
        assert_eq!(step, "Basic Information");
        assert!(wizard.submissions().is_empty());
    }

    #[tokio::test]
    async fn sink_failure_is_reported_and_not_recorded() {
        let mut wizard = RegistrationWizard::new(Arc::new(FailingSink)).unwrap();
        while wizard.advance() {}
        let err = wizard.press_primary().await.unwrap_err();
        assert!(matches!(err, RegistrationError::SubmitFailed(_)));
        assert!(wizard.submissions().is_empty());
    }

    #[tokio::test]
    async fn submission_carries_effective_availability_and_schedule() {
        use chrono::Weekday;

        let sink = Arc::new(RecordingSink::default());
        let mut wizard = RegistrationWizard::new(sink.clone()).unwrap();
        {
            let draft = wizard.draft_mut();
            draft.application.basic.first_name = "Emma".into();
            let days = &mut draft.availability;
            days.toggle_day(Weekday::Tue);
            days.toggle_day_slot(Weekday::Tue, DayPart::Afternoon);
            days.toggle_day_slot(Weekday::Sun, DayPart::Morning);
        }
        wizard.select_open_date(day(20), day(10)).unwrap();
        let schedule = &mut wizard.draft_mut().schedule;
        schedule.add_slot(day(20), "2:00 PM - 3:00 PM");
        while wizard.advance() {}
        wizard.submit().await.unwrap();

        let received = sink.received.lock().await;
        let submission = &received[0];
        assert_eq!(submission.application.basic.first_name, "Emma");
        assert_eq!(
            submission.weekly_availability.get("tuesday"),
            Some(&vec![DayPart::Afternoon])
        );
        assert!(!submission.weekly_availability.contains_key("sunday"));
        assert_eq!(
            submission.open_schedule.slots(day(20)),
            Some(&["2:00 PM - 3:00 PM".to_string()][..])
        );

        let json = serde_json::to_value(submission).unwrap();
        assert_eq!(json["weekly_availability"]["tuesday"][0], "afternoon");
    }

    #[test]
    fn past_dates_are_refused() {
        let mut wizard = RegistrationWizard::new(Arc::new(LogSink)).unwrap();
        let err = wizard.select_open_date(day(9), day(10)).unwrap_err();
        assert!(matches!(err, RegistrationError::PastDate { .. }));
        assert!(wizard.select_open_date(day(10), day(10)).unwrap());
        assert!(!wizard.select_open_date(day(10), day(10)).unwrap());
    }

    #[test]
    fn validate_step_hook_reports_per_index() {
        let wizard = RegistrationWizard::new(Arc::new(LogSink))
            .unwrap()
            .with_validator(RequiredFields);
        assert!(!wizard.validate_step(0));
        assert!(wizard.validate_step(5));
        assert!(!wizard.validate_step(42));
    }
}
