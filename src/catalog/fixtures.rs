//! Mock data the views are built from.
//!
//! The default set is compiled in from `data/fixtures.json`; a file named by
//! configuration replaces it. Timestamps in the data are written relative to
//! an `anchor` day and are moved forward by whole days with [`Fixtures::rebased`],
//! so "today's sessions" stay today.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::model::{Resource, Role, Session, Student, Tutor};
use crate::config::AppConfig;
use crate::error::CatalogError;
use crate::messaging::model::{ChatMessage, Contact, Sender};
use crate::registration::model::TutorApplication;

/// The compiled-in fixture set.
pub const EMBEDDED_FIXTURES: &str = include_str!("../../data/fixtures.json");

/// A transcript line as stored in fixture files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedMessage {
    pub sender: Sender,
    pub text: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixtures {
    /// The day the data was written for.
    pub anchor: DateTime<Utc>,
    pub student_name: String,
    pub tutor_name: String,
    pub tutors: Vec<Tutor>,
    /// The signed-in tutor's roster.
    pub students: Vec<Student>,
    pub student_sessions: Vec<Session>,
    pub tutor_sessions: Vec<Session>,
    /// The signed-in student's progress per subject, in percent.
    #[serde(default)]
    pub student_progress: BTreeMap<String, f64>,
    pub resources: Vec<Resource>,
    pub student_contacts: Vec<Contact>,
    pub tutor_contacts: Vec<Contact>,
    #[serde(default)]
    pub assistant_history: Vec<SeedMessage>,
    /// The signed-in tutor's profile as last submitted.
    #[serde(default)]
    pub tutor_profile: TutorApplication,
}

impl Fixtures {
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_FIXTURES)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a fixture file from disk.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Read {
                path: path.display().to_string(),
                source,
            })?;
        let fixtures = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            tutors = fixtures.tutors.len(),
            students = fixtures.students.len(),
            "Fixtures loaded from file"
        );
        Ok(fixtures)
    }

    /// The configured fixture file, or the embedded set when none is configured.
    pub async fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        match &config.fixtures_path {
            Some(path) => Self::load(path).await,
            None => {
                debug!("Using embedded fixtures");
                Self::embedded()
            }
        }
    }

    /// Move every date forward (or back) so the anchor day becomes `today`.
    pub fn rebased(mut self, today: NaiveDate) -> Self {
        let days = (today - self.anchor.date_naive()).num_days();
        if days == 0 {
            return self;
        }
        let delta = TimeDelta::days(days);
        let shift = |at: DateTime<Utc>| at.checked_add_signed(delta).unwrap_or(at);

        self.anchor = shift(self.anchor);
        for tutor in &mut self.tutors {
            for open in &mut tutor.open_schedule {
                open.date = open.date.checked_add_signed(delta).unwrap_or(open.date);
            }
            for review in &mut tutor.reviews {
                review.date = review.date.checked_add_signed(delta).unwrap_or(review.date);
            }
        }
        for student in &mut self.students {
            for at in &mut student.session_history {
                *at = shift(*at);
            }
        }
        for session in self
            .student_sessions
            .iter_mut()
            .chain(self.tutor_sessions.iter_mut())
        {
            session.starts_at = shift(session.starts_at);
        }
        for contact in self
            .student_contacts
            .iter_mut()
            .chain(self.tutor_contacts.iter_mut())
        {
            contact.last_message_at = shift(contact.last_message_at);
        }
        for seed in &mut self.assistant_history {
            seed.at = shift(seed.at);
        }

        debug!(days, "Fixtures rebased");
        self
    }

    pub fn tutor(&self, id: &str) -> Result<&Tutor, CatalogError> {
        self.tutors
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CatalogError::NotFound {
                entity: "tutor".to_string(),
                id: id.to_string(),
            })
    }

    pub fn sessions(&self, role: Role) -> &[Session] {
        match role {
            Role::Student => &self.student_sessions,
            Role::Tutor => &self.tutor_sessions,
        }
    }

    pub fn contacts(&self, role: Role) -> Vec<Contact> {
        match role {
            Role::Student => self.student_contacts.clone(),
            Role::Tutor => self.tutor_contacts.clone(),
        }
    }

    pub fn resources(&self, role: Role) -> Vec<Resource> {
        self.resources
            .iter()
            .filter(|r| r.audience == role)
            .cloned()
            .collect()
    }

    /// The assistant transcript with fresh message ids.
    pub fn assistant_history(&self) -> Vec<ChatMessage> {
        self.assistant_history
            .iter()
            .map(|s| ChatMessage::at(s.sender, s.text.clone(), s.at))
            .collect()
    }

    pub fn display_name(&self, role: Role) -> &str {
        match role {
            Role::Student => &self.student_name,
            Role::Tutor => &self.tutor_name,
        }
    }
}
