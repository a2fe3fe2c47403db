//! Per-step validation, kept apart from navigation.
//!
//! The wizard never consults a validator on its own; `RegistrationWizard`
//! only does so when built with one.

use std::sync::LazyLock;

use regex::Regex;

use super::manager::{RegistrationDraft, RegistrationStep};
use super::model::Certification;
use crate::error::RegistrationError;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[0-9\s().\-]{7,20}$").expect("phone pattern compiles")
});

/// Decides whether a step's fields are complete enough to move on.
pub trait StepValidator: Send + Sync {
    fn validate(
        &self,
        step: RegistrationStep,
        draft: &RegistrationDraft,
    ) -> Result<(), RegistrationError>;

    fn validate_step(&self, step: RegistrationStep, draft: &RegistrationDraft) -> bool {
        self.validate(step, draft).is_ok()
    }
}

/// Accepts every step. Matches the unguarded form.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl StepValidator for AcceptAll {
    fn validate(
        &self,
        _: RegistrationStep,
        _: &RegistrationDraft,
    ) -> Result<(), RegistrationError> {
        Ok(())
    }
}

/// Requires the fields a tutor profile cannot go live without.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFields;

impl StepValidator for RequiredFields {
    fn validate(
        &self,
        step: RegistrationStep,
        draft: &RegistrationDraft,
    ) -> Result<(), RegistrationError> {
        let app = &draft.application;
        let fail = |reason: &str| -> Result<(), RegistrationError> {
            Err(RegistrationError::Incomplete {
                step: step.title().to_string(),
                reason: reason.to_string(),
            })
        };

        match step {
            RegistrationStep::BasicInformation => {
                if app.basic.first_name.trim().is_empty() || app.basic.last_name.trim().is_empty() {
                    return fail("first and last name are required");
                }
                if !EMAIL.is_match(app.basic.email.trim()) {
                    return fail("a valid email address is required");
                }
                let phone = app.basic.phone.trim();
                if !phone.is_empty() && !PHONE.is_match(phone) {
                    return fail("phone number is not valid");
                }
                Ok(())
            }
            RegistrationStep::Qualifications => {
                if app.qualifications.degree.is_none() {
                    return fail("select your highest degree");
                }
                if app.qualifications.institution.trim().is_empty() {
                    return fail("institution is required");
                }
                let certs = &app.qualifications.certifications;
                if !certs.iter().all(Certification::is_complete) {
                    return fail("every certification needs a name and issuing organization");
                }
                if certs.iter().any(Certification::expires_before_issue) {
                    return fail("a certification expires before it was issued");
                }
                Ok(())
            }
            RegistrationStep::SubjectExpertise => {
                if app.expertise.is_empty() {
                    return fail("pick at least one subject");
                }
                Ok(())
            }
            RegistrationStep::Languages => {
                if app.languages.languages.is_empty()
                    && app.languages.other_languages.trim().is_empty()
                {
                    return fail("pick at least one language");
                }
                Ok(())
            }
            RegistrationStep::Availability => {
                if app.preferences.formats.is_empty() {
                    return fail("offer online or in-person sessions");
                }
                if app.preferences.hourly_rate <= rust_decimal::Decimal::ZERO {
                    return fail("hourly rate must be positive");
                }
                if draft.availability.effective().values().all(Vec::is_empty) {
                    return fail("choose at least one weekly time slot");
                }
                Ok(())
            }
            // Specific dates are optional on top of the weekly schedule.
            RegistrationStep::OpenSchedule => Ok(()),
        }
    }
}
