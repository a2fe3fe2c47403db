//! Per-view state. A screen is built when its view is entered and dropped when
//! the user leaves, taking any search text, filters and pending replies with it.

use crate::catalog::filter::{SessionCriteria, StudentCriteria};
use crate::catalog::finder::{ResourceQuery, TutorQuery, resource_subjects};
use crate::catalog::model::{Resource, Role, Session, Student, Tutor};
use crate::dashboard::{StudentDashboard, TutorDashboard};
use crate::messaging::{ChatSession, Inbox};
use crate::registration::RegistrationWizard;

/// Student dashboard with the floating assistant chat, closed until used.
#[derive(Debug)]
pub struct StudentDashboardView {
    pub summary: StudentDashboard,
    pub chat: ChatSession,
    pub chat_open: bool,
}

impl StudentDashboardView {
    pub fn new(summary: StudentDashboard, chat: ChatSession) -> Self {
        Self {
            summary,
            chat,
            chat_open: false,
        }
    }
}

/// Find-a-tutor view.
#[derive(Debug)]
pub struct FindTutorView {
    tutors: Vec<Tutor>,
    pub query: TutorQuery,
}

impl FindTutorView {
    pub fn new(tutors: Vec<Tutor>, query: TutorQuery) -> Self {
        Self { tutors, query }
    }

    pub fn results(&self) -> Vec<&Tutor> {
        self.query.apply(&self.tutors)
    }
}

/// Session history for either role.
#[derive(Debug)]
pub struct SessionsView {
    role: Role,
    sessions: Vec<Session>,
    pub criteria: SessionCriteria,
}

impl SessionsView {
    pub fn new(role: Role, sessions: Vec<Session>) -> Self {
        Self {
            role,
            sessions,
            criteria: SessionCriteria::default(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn visible(&self) -> Vec<&Session> {
        self.criteria.apply(&self.sessions)
    }
}

/// AI assistant page: curated resources next to a chat with the assistant.
#[derive(Debug)]
pub struct AssistantView {
    role: Role,
    resources: Vec<Resource>,
    pub query: ResourceQuery,
    pub chat: ChatSession,
}

impl AssistantView {
    pub fn new(role: Role, resources: Vec<Resource>, chat: ChatSession) -> Self {
        Self {
            role,
            resources,
            query: ResourceQuery::default(),
            chat,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn visible(&self) -> Vec<&Resource> {
        self.query.apply(&self.resources)
    }

    /// Subjects offered in the subject filter.
    pub fn subjects(&self) -> Vec<&str> {
        resource_subjects(&self.resources)
    }
}

/// Tutor dashboard with a searchable roster.
#[derive(Debug)]
pub struct TutorDashboardView {
    pub summary: TutorDashboard,
    pub roster: StudentCriteria,
}

impl TutorDashboardView {
    pub fn new(summary: TutorDashboard) -> Self {
        Self {
            summary,
            roster: StudentCriteria::default(),
        }
    }

    pub fn students(&self) -> Vec<&Student> {
        self.roster.apply(&self.summary.roster)
    }
}

#[derive(Debug)]
pub enum Screen {
    Home,
    StudentDashboard(StudentDashboardView),
    FindTutor(FindTutorView),
    TutorProfile(Box<Tutor>),
    Assistant(AssistantView),
    Messages(Inbox),
    Sessions(SessionsView),
    TutorDashboard(TutorDashboardView),
    Registration(Box<RegistrationWizard>),
}

impl Screen {
    /// Short name used in messages about the current view.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::StudentDashboard(_) => "student dashboard",
            Self::FindTutor(_) => "find tutor",
            Self::TutorProfile(_) => "tutor profile",
            Self::Assistant(_) => "assistant",
            Self::Messages(_) => "messages",
            Self::Sessions(_) => "sessions",
            Self::TutorDashboard(_) => "tutor dashboard",
            Self::Registration(_) => "registration",
        }
    }
}
