//! View paths.

use serde::{Deserialize, Serialize};

use crate::catalog::model::Role;
use crate::error::ShellError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum View {
    Home,
    StudentDashboard,
    FindTutor,
    /// A tutor's public profile, by tutor id.
    TutorProfile(String),
    StudentAssistant,
    StudentMessages,
    StudentSessions,
    TutorDashboard,
    TutorSessions,
    TutorAssistant,
    TutorRegistration,
    TutorMessages,
}

impl View {
    /// Every view that takes no parameter.
    pub const STATIC: [View; 11] = [
        View::Home,
        View::StudentDashboard,
        View::FindTutor,
        View::StudentAssistant,
        View::StudentMessages,
        View::StudentSessions,
        View::TutorDashboard,
        View::TutorSessions,
        View::TutorAssistant,
        View::TutorRegistration,
        View::TutorMessages,
    ];

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::StudentDashboard => "/student/dashboard".to_string(),
            Self::FindTutor => "/student/find-tutor".to_string(),
            Self::TutorProfile(id) => format!("/student/tutor/{id}"),
            Self::StudentAssistant => "/student/assistant".to_string(),
            Self::StudentMessages => "/student/messages".to_string(),
            Self::StudentSessions => "/student/sessions".to_string(),
            Self::TutorDashboard => "/tutor/dashboard".to_string(),
            Self::TutorSessions => "/tutor/sessions".to_string(),
            Self::TutorAssistant => "/tutor/assistant".to_string(),
            Self::TutorRegistration => "/tutor/registration".to_string(),
            Self::TutorMessages => "/tutor/messages".to_string(),
        }
    }

    /// The side of the marketplace the view belongs to; `None` for home.
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Home => None,
            Self::StudentDashboard
            | Self::FindTutor
            | Self::TutorProfile(_)
            | Self::StudentAssistant
            | Self::StudentMessages
            | Self::StudentSessions => Some(Role::Student),
            Self::TutorDashboard
            | Self::TutorSessions
            | Self::TutorAssistant
            | Self::TutorRegistration
            | Self::TutorMessages => Some(Role::Tutor),
        }
    }

    pub fn dashboard(role: Role) -> Self {
        match role {
            Role::Student => Self::StudentDashboard,
            Role::Tutor => Self::TutorDashboard,
        }
    }

    pub fn messages(role: Role) -> Self {
        match role {
            Role::Student => Self::StudentMessages,
            Role::Tutor => Self::TutorMessages,
        }
    }

    pub fn sessions(role: Role) -> Self {
        match role {
            Role::Student => Self::StudentSessions,
            Role::Tutor => Self::TutorSessions,
        }
    }

    pub fn assistant(role: Role) -> Self {
        match role {
            Role::Student => Self::StudentAssistant,
            Role::Tutor => Self::TutorAssistant,
        }
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl std::str::FromStr for View {
    type Err = ShellError;

    /// Accepts paths with or without the leading slash.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('/');
        if trimmed.is_empty() || trimmed == "home" {
            return Ok(Self::Home);
        }
        if let Some(id) = trimmed.strip_prefix("student/tutor/") {
            if !id.is_empty() && !id.contains('/') {
                return Ok(Self::TutorProfile(id.to_string()));
            }
        }
        Self::STATIC
            .into_iter()
            .find(|v| v.path().trim_start_matches('/') == trimmed)
            .ok_or_else(|| ShellError::UnknownView(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_parse_back() {
        for view in View::STATIC {
            assert_eq!(view.path().parse::<View>().unwrap(), view);
        }
        let profile = View::TutorProfile("3".into());
        assert_eq!(profile.path().parse::<View>().unwrap(), profile);
    }

    #[test]
    fn leading_slash_is_optional() {
        let view: View = "tutor/registration".parse().unwrap();
        assert_eq!(view, View::TutorRegistration);
        assert_eq!("home".parse::<View>().unwrap(), View::Home);
        assert_eq!("/".parse::<View>().unwrap(), View::Home);
    }

    #[test]
    fn unknown_paths_rejected() {
        assert!(matches!(
            "/admin".parse::<View>(),
            Err(ShellError::UnknownView(_))
        ));
        assert!("/student/tutor/".parse::<View>().is_err());
        assert!("/student/tutor/1/reviews".parse::<View>().is_err());
    }

    #[test]
    fn roles_follow_path_prefix() {
        for view in View::STATIC {
            let expected = match view.path().split('/').nth(1) {
                Some("student") => Some(Role::Student),
                Some("tutor") => Some(Role::Tutor),
                _ => None,
            };
            assert_eq!(view.role(), expected, "{view}");
        }
    }
}
