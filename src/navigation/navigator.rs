//! Owns the current view and rebuilds its state on every transition.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::route::View;
use super::screen::{
    AssistantView, FindTutorView, Screen, SessionsView, StudentDashboardView, TutorDashboardView,
};
use crate::catalog::finder::{PriceRange, TutorQuery};
use crate::catalog::fixtures::Fixtures;
use crate::catalog::model::Role;
use crate::config::AppConfig;
use crate::dashboard::{StudentDashboard, TutorDashboard};
use crate::error::{Result, ShellError};
use crate::messaging::{ChatSession, Inbox, ScriptedAssistant};
use crate::registration::model::TutorApplication;
use crate::registration::{ApplicationSink, PrimaryOutcome, RegistrationWizard, RequiredFields};

/// Contact id used for the assistant chat when the fixtures have no assistant contact.
const ASSISTANT_ID: &str = "assistant";

pub struct Navigator {
    config: AppConfig,
    fixtures: Arc<Fixtures>,
    assistant: Arc<ScriptedAssistant>,
    sink: Arc<dyn ApplicationSink>,
    tutor_profile: TutorApplication,
    today: NaiveDate,
    view: View,
    screen: Screen,
    history: Vec<View>,
    mounts: u64,
}

impl Navigator {
    /// Start on the dashboard for the configured role.
    pub fn new(
        config: AppConfig,
        fixtures: Arc<Fixtures>,
        sink: Arc<dyn ApplicationSink>,
        today: NaiveDate,
    ) -> Result<Self> {
        let assistant = Arc::new(ScriptedAssistant::from_config(&config));
        let tutor_profile = fixtures.tutor_profile.clone();
        let view = View::dashboard(config.role);

        let mut navigator = Self {
            config,
            fixtures,
            assistant,
            sink,
            tutor_profile,
            today,
            view: View::Home,
            screen: Screen::Home,
            history: Vec::new(),
            mounts: 0,
        };
        navigator.screen = navigator.mount(&view)?;
        navigator.view = view;
        navigator.mounts = 1;
        Ok(navigator)
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Number of screens mounted so far. Changes whenever the screen is
    /// rebuilt, including re-entering the same view.
    pub fn mounts(&self) -> u64 {
        self.mounts
    }

    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// The signed-in tutor's profile, replaced by each accepted submission.
    pub fn tutor_profile(&self) -> &TutorApplication {
        &self.tutor_profile
    }

    /// Role of the current view, falling back to the configured one on home.
    pub fn role(&self) -> Role {
        self.view.role().unwrap_or(self.config.role)
    }

    /// Leave the current view and enter `view` with fresh state.
    ///
    /// When the new view cannot be built (an unknown tutor id, say) the
    /// current view stays as it was.
    pub fn navigate(&mut self, view: View) -> Result<&Screen> {
        let screen = self.mount(&view)?;
        let previous = std::mem::replace(&mut self.view, view);
        info!(from = %previous, to = %self.view, "Navigated");
        self.history.push(previous);
        // Dropping the old screen cancels anything it still had in flight.
        self.screen = screen;
        self.mounts += 1;
        Ok(&self.screen)
    }

    /// Return to the previous view. Returns `false` when there is none.
    pub fn back(&mut self) -> Result<bool> {
        let Some(previous) = self.history.pop() else {
            debug!("No previous view");
            return Ok(false);
        };
        let screen = self.mount(&previous)?;
        info!(from = %self.view, to = %previous, "Navigated back");
        self.view = previous;
        self.screen = screen;
        self.mounts += 1;
        Ok(true)
    }

    /// Press the registration wizard's primary button.
    pub async fn registration_primary(&mut self) -> Result<PrimaryOutcome> {
        let current = self.screen.name();
        let Screen::Registration(wizard) = &mut self.screen else {
            return Err(ShellError::WrongView {
                command: "next".to_string(),
                view: current.to_string(),
            }
            .into());
        };
        let outcome = wizard.press_primary().await?;
        if let PrimaryOutcome::Submitted(_) = outcome {
            self.tutor_profile = wizard.draft().application.clone();
        }
        Ok(outcome)
    }

    fn mount(&self, view: &View) -> Result<Screen> {
        let fixtures = &self.fixtures;
        let screen = match view {
            View::Home => Screen::Home,
            View::StudentDashboard => {
                let summary = StudentDashboard::build(
                    fixtures.display_name(Role::Student),
                    fixtures.sessions(Role::Student),
                    &fixtures.student_progress,
                );
                let chat = self.assistant_chat(Role::Student);
                Screen::StudentDashboard(StudentDashboardView::new(summary, chat))
            }
            View::FindTutor => {
                let price = PriceRange::new(self.config.price_min, self.config.price_max)?;
                Screen::FindTutor(FindTutorView::new(
                    fixtures.tutors.clone(),
                    TutorQuery::with_price(price),
                ))
            }
            View::TutorProfile(id) => Screen::TutorProfile(Box::new(fixtures.tutor(id)?.clone())),
            View::StudentAssistant | View::TutorAssistant => {
                let role = view.role().unwrap_or(self.config.role);
                Screen::Assistant(AssistantView::new(
                    role,
                    fixtures.resources(role),
                    self.assistant_chat(role),
                ))
            }
            View::StudentMessages | View::TutorMessages => {
                let role = view.role().unwrap_or(self.config.role);
                Screen::Messages(Inbox::new(
                    fixtures.contacts(role),
                    Arc::clone(&self.assistant),
                    fixtures.assistant_history(),
                ))
            }
            View::StudentSessions | View::TutorSessions => {
                let role = view.role().unwrap_or(self.config.role);
                Screen::Sessions(SessionsView::new(role, fixtures.sessions(role).to_vec()))
            }
            View::TutorDashboard => Screen::TutorDashboard(TutorDashboardView::new(
                TutorDashboard::build(
                    fixtures.display_name(Role::Tutor),
                    fixtures.sessions(Role::Tutor),
                    &fixtures.students,
                    &self.tutor_profile,
                    self.today,
                ),
            )),
            View::TutorRegistration => {
                let wizard = RegistrationWizard::new(Arc::clone(&self.sink))?;
                let wizard = if self.config.validate_steps {
                    wizard.with_validator(RequiredFields)
                } else {
                    wizard
                };
                Screen::Registration(Box::new(wizard))
            }
        };
        Ok(screen)
    }

    fn assistant_chat(&self, role: Role) -> ChatSession {
        let id = self
            .fixtures
            .contacts(role)
            .into_iter()
            .find(|c| c.assistant)
            .map(|c| c.id)
            .unwrap_or_else(|| ASSISTANT_ID.to_string());
        ChatSession::standalone(id)
            .with_assistant(Arc::clone(&self.assistant))
            .with_history(self.fixtures.assistant_history())
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("view", &self.view)
            .field("screen", &self.screen.name())
            .field("history", &self.history.len())
            .finish()
    }
}
