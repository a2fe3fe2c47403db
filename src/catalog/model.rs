//! Catalog data model: tutors, students, sessions and study resources.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the marketplace a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Tutor,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Tutor => write!(f, "tutor"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "tutor" => Ok(Self::Tutor),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A specific date a tutor has opened, with its slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDate {
    pub date: NaiveDate,
    pub time_slots: Vec<String>,
}

/// A student's review shown on a tutor's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub student_name: String,
    /// Stars, 1 to 5.
    pub rating: u8,
    pub comment: String,
    pub date: NaiveDate,
    pub subject: String,
}

/// A tutor listed in the finder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tutor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub rating: f64,
    pub subjects: Vec<String>,
    pub languages: Vec<String>,
    pub hourly_rate: Decimal,
    /// Human-readable availability summary, e.g. "Weekdays, Evenings".
    pub availability: String,
    pub description: String,
    #[serde(default)]
    pub years_experience: u32,
    /// Weekday name mapped to day parts.
    #[serde(default)]
    pub weekly_availability: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub open_schedule: Vec<OpenDate>,
    #[serde(default)]
    pub session_formats: Vec<String>,
    #[serde(default)]
    pub session_durations: Vec<String>,
    /// Headline count; `reviews` holds only the most recent ones.
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub achievements: Vec<String>,
    /// Newest first.
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Tutor {
    pub fn speaks(&self, language: &str) -> bool {
        self.languages
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language.trim()))
    }
}

/// Enrollment status of a student on a tutor's roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Active,
    Paused,
    Inactive,
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Paused => write!(f, "paused"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for StudentStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("Unknown student status: {}", s)),
        }
    }
}

/// A student on a tutor's roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub subjects: Vec<String>,
    pub status: StudentStatus,
    /// Subject mapped to progress in percent.
    #[serde(default)]
    pub progress: BTreeMap<String, f64>,
    /// Start times of past sessions, in any order.
    #[serde(default)]
    pub session_history: Vec<DateTime<Utc>>,
}

impl Student {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: StudentStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: String::new(),
            subjects: Vec::new(),
            status,
            progress: BTreeMap::new(),
            session_history: Vec::new(),
        }
    }

    /// Builder: record progress for a subject.
    pub fn with_progress(mut self, subject: impl Into<String>, percent: f64) -> Self {
        self.progress.insert(subject.into(), percent);
        self
    }

    /// Builder: record a past session.
    pub fn with_session(mut self, at: DateTime<Utc>) -> Self {
        self.session_history.push(at);
        self
    }

    /// Mean of all progress values; `None` when there are none.
    pub fn mean_progress(&self) -> Option<f64> {
        if self.progress.is_empty() {
            return None;
        }
        let total: f64 = self.progress.values().sum();
        Some(total / self.progress.len() as f64)
    }

    pub fn last_session(&self) -> Option<DateTime<Utc>> {
        self.session_history.iter().max().copied()
    }

    pub fn sessions_count(&self) -> usize {
        self.session_history.len()
    }
}

/// Lifecycle of a booked session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upcoming => write!(f, "upcoming"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown session status: {}", s)),
        }
    }
}

/// A tutoring session as seen by one participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// The other participant: the tutor for students, the student for tutors.
    pub counterpart: String,
    pub subject: String,
    pub starts_at: DateTime<Utc>,
    pub duration_minutes: u16,
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Kind of study or teaching material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    StudyGuide,
    Video,
    Article,
    PracticeTest,
    Flashcards,
    LessonPlan,
    Worksheet,
    Quiz,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::StudyGuide => "study_guide",
            Self::Video => "video",
            Self::Article => "article",
            Self::PracticeTest => "practice_test",
            Self::Flashcards => "flashcards",
            Self::LessonPlan => "lesson_plan",
            Self::Worksheet => "worksheet",
            Self::Quiz => "quiz",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "study_guide" => Ok(Self::StudyGuide),
            "video" => Ok(Self::Video),
            "article" => Ok(Self::Article),
            "practice_test" => Ok(Self::PracticeTest),
            "flashcards" => Ok(Self::Flashcards),
            "lesson_plan" => Ok(Self::LessonPlan),
            "worksheet" => Ok(Self::Worksheet),
            "quiz" => Ok(Self::Quiz),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}

/// Difficulty of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown difficulty: {}", s)),
        }
    }
}

/// An AI-curated resource shown on the assistant pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub kind: ResourceKind,
    pub subject: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub estimated_minutes: u16,
    /// Which side of the marketplace sees this resource.
    pub audience: Role,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn mean_progress_averages_subjects() {
        let student = Student::new("1", "Alex Chen", StudentStatus::Active)
            .with_progress("Mathematics", 75.0)
            .with_progress("Chemistry", 60.0)
            .with_progress("History", 85.0)
            .with_progress("Physics", 40.0);
        assert_eq!(student.mean_progress(), Some(65.0));
    }

    #[test]
    fn mean_progress_empty_is_none() {
        let student = Student::new("1", "Alex Chen", StudentStatus::Active);
        assert!(student.mean_progress().is_none());
    }

    #[test]
    fn last_session_is_latest_regardless_of_order() {
        let early = Utc.with_ymd_and_hms(2024, 3, 1, 15, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap();
        let student = Student::new("1", "Jamie Smith", StudentStatus::Paused)
            .with_session(late)
            .with_session(early);
        assert_eq!(student.last_session(), Some(late));
        assert_eq!(student.sessions_count(), 2);
    }

    #[test]
    fn status_enums_roundtrip_through_strings() {
        for status in [
            StudentStatus::Active,
            StudentStatus::Paused,
            StudentStatus::Inactive,
        ] {
            assert_eq!(
                status.to_string().parse::<StudentStatus>().unwrap(),
                status
            );
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
        assert_eq!(
            "canceled".parse::<SessionStatus>().unwrap(),
            SessionStatus::Cancelled
        );
        assert_eq!(
            "practice_test".parse::<ResourceKind>().unwrap(),
            ResourceKind::PracticeTest
        );
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Tutor".parse::<Role>().unwrap(), Role::Tutor);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn tutor_language_match_ignores_case() {
        let tutor: Tutor = serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "Dr. Sarah Johnson",
            "rating": 4.9,
            "subjects": ["Mathematics"],
            "languages": ["English", "Spanish"],
            "hourly_rate": "45",
            "availability": "Weekdays",
            "description": "PhD in Mathematics"
        }))
        .unwrap();
        assert!(tutor.speaks("spanish"));
        assert!(!tutor.speaks("French"));
        assert!(tutor.open_schedule.is_empty());
        assert!(tutor.reviews.is_empty());
        assert_eq!(tutor.total_reviews, 0);
    }

    #[test]
    fn reviews_and_profile_details_deserialize() {
        let tutor: Tutor = serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "Dr. Sarah Johnson",
            "rating": 4.9,
            "subjects": ["Mathematics"],
            "languages": ["English"],
            "hourly_rate": "45",
            "availability": "Weekdays",
            "description": "PhD in Mathematics",
            "total_reviews": 127,
            "education": "PhD in Mathematics from MIT",
            "achievements": ["Published researcher"],
            "reviews": [
                {
                    "id": "r1",
                    "student_name": "Alex Chen",
                    "rating": 5,
                    "comment": "Calculus finally makes sense.",
                    "date": "2024-05-01",
                    "subject": "Calculus"
                },
                {
                    "id": "r2",
                    "student_name": "Maria Garcia",
                    "rating": 4,
                    "comment": "Clear and patient.",
                    "date": "2024-04-20",
                    "subject": "Statistics"
                }
            ]
        }))
        .unwrap();
        assert_eq!(tutor.total_reviews, 127);
        assert_eq!(tutor.reviews.len(), 2);
        assert_eq!(tutor.reviews[1].rating, 4);
        assert!(tutor.location.is_empty());
    }
}
