//! Dashboard summaries derived from the catalog.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::model::{Session, SessionStatus, Student};
use crate::registration::manager::{RegistrationDraft, RegistrationStep};
use crate::registration::model::TutorApplication;
use crate::registration::validation::{RequiredFields, StepValidator};

/// Upcoming sessions, soonest first.
pub fn upcoming(sessions: &[Session]) -> Vec<&Session> {
    let mut out: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.status == SessionStatus::Upcoming)
        .collect();
    out.sort_by_key(|s| s.starts_at);
    out
}

/// Non-cancelled sessions starting on `day`, in start order.
pub fn sessions_on(sessions: &[Session], day: NaiveDate) -> Vec<&Session> {
    let mut out: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.status != SessionStatus::Cancelled && s.starts_at.date_naive() == day)
        .collect();
    out.sort_by_key(|s| s.starts_at);
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentDashboard {
    pub name: String,
    pub upcoming: Vec<Session>,
    /// Subject and percent, in subject order.
    pub progress: Vec<(String, f64)>,
    /// Mean over all subjects; `None` with no progress recorded.
    pub overall_progress: Option<f64>,
    pub completed_sessions: usize,
}

impl StudentDashboard {
    pub fn build(
        name: impl Into<String>,
        sessions: &[Session],
        progress: &BTreeMap<String, f64>,
    ) -> Self {
        let overall_progress = if progress.is_empty() {
            None
        } else {
            Some(progress.values().sum::<f64>() / progress.len() as f64)
        };
        Self {
            name: name.into(),
            upcoming: upcoming(sessions).into_iter().cloned().collect(),
            progress: progress.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            overall_progress,
            completed_sessions: sessions
                .iter()
                .filter(|s| s.status == SessionStatus::Completed)
                .count(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TutorDashboard {
    pub name: String,
    pub today: Vec<Session>,
    pub upcoming_count: usize,
    pub roster: Vec<Student>,
    pub profile_completion: u8,
}

impl TutorDashboard {
    pub fn build(
        name: impl Into<String>,
        sessions: &[Session],
        roster: &[Student],
        profile: &TutorApplication,
        today: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            today: sessions_on(sessions, today)
                .into_iter()
                .filter(|s| s.status == SessionStatus::Upcoming)
                .cloned()
                .collect(),
            upcoming_count: upcoming(sessions).len(),
            roster: roster.to_vec(),
            profile_completion: profile_completion(profile),
        }
    }
}

/// Share of the profile sections that are filled in, in percent.
///
/// The four form steps count when they would pass [`RequiredFields`]; the
/// bio counts on its own.
pub fn profile_completion(profile: &TutorApplication) -> u8 {
    const SECTIONS: [RegistrationStep; 4] = [
        RegistrationStep::BasicInformation,
        RegistrationStep::Qualifications,
        RegistrationStep::SubjectExpertise,
        RegistrationStep::Languages,
    ];

    let draft = RegistrationDraft {
        application: profile.clone(),
        ..RegistrationDraft::default()
    };
    let done = SECTIONS
        .iter()
        .filter(|step| RequiredFields.validate_step(**step, &draft))
        .count()
        + usize::from(!profile.basic.bio.trim().is_empty());
    let total = SECTIONS.len() + 1;
    (done * 100 / total) as u8
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::catalog::fixtures::Fixtures;
    use crate::catalog::model::StudentStatus;

    fn session(id: &str, day: u32, hour: u32, status: SessionStatus) -> Session {
        Session {
            id: id.into(),
            counterpart: "Alex Chen".into(),
            subject: "Physics".into(),
            starts_at: Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap(),
            duration_minutes: 60,
            status,
            rating: None,
            notes: None,
        }
    }

    #[test]
    fn upcoming_is_chronological_and_excludes_others() {
        let sessions = vec![
            session("late", 22, 10, SessionStatus::Upcoming),
            session("done", 1, 10, SessionStatus::Completed),
            session("soon", 20, 16, SessionStatus::Upcoming),
            session("off", 21, 10, SessionStatus::Cancelled),
        ];
        let ids: Vec<_> = upcoming(&sessions).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["soon", "late"]);
    }

    #[test]
    fn student_dashboard_summarises_progress() {
        let progress: BTreeMap<String, f64> = [
            ("Mathematics", 75.0),
            ("Chemistry", 60.0),
            ("History", 85.0),
            ("Physics", 45.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let sessions = vec![
            session("1", 20, 16, SessionStatus::Upcoming),
            session("2", 5, 15, SessionStatus::Completed),
            session("3", 3, 15, SessionStatus::Completed),
        ];
        let dash = StudentDashboard::build("Alex Johnson", &sessions, &progress);
        assert_eq!(dash.overall_progress, Some(66.25));
        assert_eq!(dash.progress[0].0, "Chemistry");
        assert_eq!(dash.upcoming.len(), 1);
        assert_eq!(dash.completed_sessions, 2);
    }

    #[test]
    fn empty_progress_has_no_mean() {
        let dash = StudentDashboard::build("New Student", &[], &BTreeMap::new());
        assert!(dash.overall_progress.is_none());
        assert!(dash.upcoming.is_empty());
    }

    #[test]
    fn tutor_dashboard_today_only() {
        let sessions = vec![
            session("today", 20, 15, SessionStatus::Upcoming),
            session("tomorrow", 21, 13, SessionStatus::Upcoming),
            session("cancelled", 20, 18, SessionStatus::Cancelled),
        ];
        let roster = vec![Student::new("1", "Alex Chen", StudentStatus::Active)];
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let dash = TutorDashboard::build(
            "Dr. Sarah Johnson",
            &sessions,
            &roster,
            &TutorApplication::default(),
            today,
        );
        assert_eq!(dash.today.len(), 1);
        assert_eq!(dash.today[0].id, "today");
        assert_eq!(dash.upcoming_count, 2);
        assert_eq!(dash.roster.len(), 1);
        assert_eq!(dash.profile_completion, 0);
    }

    #[test]
    fn fixture_profile_is_mostly_complete() {
        let fixtures = Fixtures::embedded().unwrap();
        // Everything but the bio.
        assert_eq!(profile_completion(&fixtures.tutor_profile), 80);

        let mut profile = fixtures.tutor_profile.clone();
        profile.basic.bio = "Ten years of teaching calculus.".into();
        assert_eq!(profile_completion(&profile), 100);
    }
}
