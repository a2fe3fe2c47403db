//! Tutor registration: the multi-step application form.
//!
//! A linear wizard walks the tutor through six steps. The form data, the
//! recurring weekly availability and the open schedule of specific dates are
//! collected into a draft, which is handed to an `ApplicationSink` on submit.

pub mod availability;
pub mod manager;
pub mod model;
pub mod schedule;
pub mod state;
pub mod validation;

pub use availability::{DayPart, RecurringAvailability};
pub use manager::{
    ApplicationSink, ApplicationSubmission, LogSink, PrimaryOutcome, RegistrationDraft,
    RegistrationStep, RegistrationWizard, registration_steps,
};
pub use model::TutorApplication;
pub use schedule::ScheduleState;
pub use state::{PrimaryAction, WizardController, WizardStep};
pub use validation::{AcceptAll, RequiredFields, StepValidator};
