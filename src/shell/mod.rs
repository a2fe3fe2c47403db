//! Line-oriented shell over the navigator.
//!
//! Each input line parses into a [`Command`], which is applied to whichever
//! screen is mounted. Commands that only make sense on another view fail with
//! [`ShellError::WrongView`] and leave the state untouched.

pub mod command;
pub mod feed;
pub mod render;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tracing::debug;

pub use command::{Command, HELP};
pub use feed::ChatFeed;

use crate::catalog::filter::StatusFilter;
use crate::catalog::finder::PriceRange;
use crate::error::{Error, Result, ShellError};
use crate::messaging::ChatEvent;
use crate::navigation::{Navigator, Screen, View};
use crate::registration::availability::parse_day;
use crate::registration::model::{Certification, Degree, Fluency, Proficiency, SessionFormat};
use crate::registration::schedule::PREDEFINED_SLOTS;
use crate::registration::{DayPart, PrimaryOutcome, RegistrationWizard};
use command::invalid;

const CERT_USAGE: &str = "expected name | organization [| issued [| expires]]";

/// What the caller should do after a command ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Output(String),
    Quit,
}

#[derive(Debug)]
pub struct Shell {
    navigator: Navigator,
}

impl Shell {
    pub fn new(navigator: Navigator) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// Chat events of the mounted screen, if it has a conversation.
    pub fn subscribe(&self) -> Option<broadcast::Receiver<ChatEvent>> {
        match self.navigator.screen() {
            Screen::Messages(inbox) => Some(inbox.subscribe()),
            Screen::Assistant(view) => Some(view.chat.subscribe()),
            Screen::StudentDashboard(view) => Some(view.chat.subscribe()),
            _ => None,
        }
    }

    /// Render the mounted screen.
    pub async fn render(&mut self) -> String {
        let name = self.navigator.config().assistant_name.clone();
        render::screen(self.navigator.screen_mut(), &name).await
    }

    /// Parse and run one line of input. Blank lines produce no output.
    pub async fn run_line(&mut self, line: &str) -> Result<Outcome> {
        if line.trim().is_empty() {
            return Ok(Outcome::Output(String::new()));
        }
        let command = Command::parse(line)?;
        self.execute(command).await
    }

    pub async fn execute(&mut self, command: Command) -> Result<Outcome> {
        debug!(?command, view = %self.navigator.view(), "Executing command");
        match command {
            Command::Help => return Ok(Outcome::Output(HELP.to_string())),
            Command::Views => return Ok(Outcome::Output(render::views())),
            Command::Quit => return Ok(Outcome::Quit),
            Command::Show => {}
            Command::Go(view) => {
                self.navigator.navigate(view)?;
            }
            Command::Back => {
                if !self.navigator.back()? {
                    return Ok(Outcome::Output("Already at the first view.".to_string()));
                }
            }
            Command::Search(text) => self.search(text)?,
            Command::Status(value) => self.status(&value)?,
            Command::Sort(value) => self.sort(&value)?,
            Command::Price(min, max) => self.price(min, max)?,
            Command::Language(language) => match self.navigator.screen_mut() {
                Screen::FindTutor(view) => view.query.language = language,
                other => return Err(wrong_view("lang", other)),
            },
            Command::Subject(value) => match self.navigator.screen_mut() {
                Screen::Assistant(view) => {
                    view.query.subject = match value.parse::<StatusFilter<String>>() {
                        Ok(filter) => filter,
                        Err(never) => match never {},
                    }
                }
                other => return Err(wrong_view("subject", other)),
            },
            Command::Kind(value) => match self.navigator.screen_mut() {
                Screen::Assistant(view) => {
                    view.query.kind = value.parse().map_err(|e: String| invalid("kind", &e))?
                }
                other => return Err(wrong_view("kind", other)),
            },
            Command::Level(value) => match self.navigator.screen_mut() {
                Screen::Assistant(view) => {
                    view.query.difficulty =
                        value.parse().map_err(|e: String| invalid("level", &e))?
                }
                other => return Err(wrong_view("level", other)),
            },
            Command::Open(id) => return self.open(id).await,
            Command::Pin => match self.navigator.screen_mut() {
                Screen::Messages(inbox) => {
                    inbox.contacts_mut().toggle_pin();
                }
                other => return Err(wrong_view("pin", other)),
            },
            Command::Say(text) => self.say(&text).await?,
            Command::Next => return self.next().await,
            Command::Prev => match self.navigator.screen_mut() {
                Screen::Registration(wizard) => {
                    wizard.retreat();
                }
                other => return Err(wrong_view("prev", other)),
            },
            Command::Set { field, value } => {
                let today = self.navigator.today();
                let note = match self.navigator.screen_mut() {
                    Screen::Registration(wizard) => set_field(wizard, today, &field, &value)?,
                    other => return Err(wrong_view("set", other)),
                };
                let screen = self.render().await;
                return Ok(Outcome::Output(format!("{note}\n\n{screen}")));
            }
        }
        Ok(Outcome::Output(self.render().await))
    }

    fn search(&mut self, text: String) -> Result<()> {
        match self.navigator.screen_mut() {
            Screen::FindTutor(view) => view.query.search_text = text,
            Screen::Sessions(view) => view.criteria.search_text = text,
            Screen::Assistant(view) => view.query.search_text = text,
            Screen::TutorDashboard(view) => view.roster.search_text = text,
            Screen::Messages(inbox) => inbox.contacts_mut().set_search(text),
            other => return Err(wrong_view("search", other)),
        }
        Ok(())
    }

    fn status(&mut self, value: &str) -> Result<()> {
        match self.navigator.screen_mut() {
            Screen::Sessions(view) => {
                view.criteria.status = value.parse().map_err(|e: String| invalid("status", &e))?
            }
            Screen::TutorDashboard(view) => {
                view.roster.status = value.parse().map_err(|e: String| invalid("status", &e))?
            }
            other => return Err(wrong_view("status", other)),
        }
        Ok(())
    }

    fn sort(&mut self, value: &str) -> Result<()> {
        match self.navigator.screen_mut() {
            Screen::FindTutor(view) => {
                view.query.sort = value.parse().map_err(|e: String| invalid("sort", &e))?
            }
            Screen::Sessions(view) => {
                view.criteria.sort_key = value.parse().map_err(|e: String| invalid("sort", &e))?
            }
            Screen::TutorDashboard(view) => {
                view.roster.sort_key = value.parse().map_err(|e: String| invalid("sort", &e))?
            }
            other => return Err(wrong_view("sort", other)),
        }
        Ok(())
    }

    fn price(&mut self, min: Decimal, max: Decimal) -> Result<()> {
        match self.navigator.screen_mut() {
            Screen::FindTutor(view) => view.query.price = PriceRange::new(min, max)?,
            other => return Err(wrong_view("price", other)),
        }
        Ok(())
    }

    async fn open(&mut self, id: String) -> Result<Outcome> {
        if let Screen::FindTutor(_) = self.navigator.screen() {
            self.navigator.navigate(View::TutorProfile(id))?;
        } else {
            match self.navigator.screen_mut() {
                Screen::Messages(inbox) => {
                    inbox.select(&id)?;
                }
                other => return Err(wrong_view("open", other)),
            }
        }
        Ok(Outcome::Output(self.render().await))
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        match self.navigator.screen_mut() {
            Screen::Messages(inbox) => {
                inbox.send(text).await?;
            }
            Screen::Assistant(view) => {
                view.chat.send(text).await;
            }
            Screen::StudentDashboard(view) => {
                view.chat_open = true;
                view.chat.send(text).await;
            }
            other => return Err(wrong_view("say", other)),
        }
        Ok(())
    }

    async fn next(&mut self) -> Result<Outcome> {
        let note = match self.navigator.registration_primary().await? {
            PrimaryOutcome::Advanced(_) => None,
            PrimaryOutcome::Submitted(id) => Some(format!("Application submitted ({id}).")),
        };
        let screen = self.render().await;
        Ok(Outcome::Output(match note {
            Some(note) => format!("{note}\n\n{screen}"),
            None => screen,
        }))
    }
}

fn wrong_view(command: &str, screen: &Screen) -> Error {
    ShellError::WrongView {
        command: command.to_string(),
        view: screen.name().to_string(),
    }
    .into()
}

fn date(command: &str, raw: &str) -> std::result::Result<NaiveDate, ShellError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(command, &format!("{raw} is not a YYYY-MM-DD date")))
}

/// Split `"<head> <last word>"`, keeping spaces inside the head.
fn split_last<'a>(
    command: &str,
    value: &'a str,
) -> std::result::Result<(&'a str, &'a str), ShellError> {
    value
        .rsplit_once(char::is_whitespace)
        .map(|(head, last)| (head.trim(), last))
        .filter(|(head, _)| !head.is_empty())
        .ok_or_else(|| invalid(command, "expected two values"))
}

/// Apply one `set <field> <value>` to the wizard draft. Returns a short note.
fn set_field(
    wizard: &mut RegistrationWizard,
    today: NaiveDate,
    field: &str,
    value: &str,
) -> Result<String> {
    let draft = wizard.draft_mut();
    let app = &mut draft.application;
    let note = match field {
        "first_name" => {
            app.basic.first_name = value.to_string();
            format!("First name set to {value}.")
        }
        "last_name" => {
            app.basic.last_name = value.to_string();
            format!("Last name set to {value}.")
        }
        "email" => {
            app.basic.email = value.to_string();
            format!("Email set to {value}.")
        }
        "phone" => {
            app.basic.phone = value.to_string();
            format!("Phone set to {value}.")
        }
        "bio" => {
            app.basic.bio = value.to_string();
            "Bio updated.".to_string()
        }
        "degree" => {
            let degree: Degree = value.parse()?;
            app.qualifications.degree = Some(degree);
            format!("Degree set to {degree}.")
        }
        "institution" => {
            app.qualifications.institution = value.to_string();
            format!("Institution set to {value}.")
        }
        "field" => {
            app.qualifications.field_of_study = value.to_string();
            format!("Field of study set to {value}.")
        }
        "year" => {
            if value.is_empty() {
                app.qualifications.graduation_year = None;
                "Graduation year cleared.".to_string()
            } else {
                let year: u16 = value
                    .parse()
                    .map_err(|_| invalid("set year", &format!("{value} is not a year")))?;
                app.qualifications.graduation_year = Some(year);
                format!("Graduation year set to {year}.")
            }
        }
        "cert" => {
            let parts: Vec<&str> = value.split('|').map(str::trim).collect();
            let (name, organization, issued, expires) = match parts.as_slice() {
                [name, org] => (*name, *org, None, None),
                [name, org, issued] => (*name, *org, Some(*issued), None),
                [name, org, issued, expires] => (*name, *org, Some(*issued), Some(*expires)),
                _ => return Err(invalid("set cert", CERT_USAGE).into()),
            };
            if name.is_empty() || organization.is_empty() {
                return Err(invalid("set cert", "needs a name and organization").into());
            }
            let certification = Certification {
                name: name.to_string(),
                issuing_organization: organization.to_string(),
                issued_on: issued.map(|d| date("set cert", d)).transpose()?,
                expires_on: expires.map(|d| date("set cert", d)).transpose()?,
            };
            app.qualifications.certifications.push(certification);
            format!("Added certification {name}.")
        }
        "subject" => {
            if app.expertise.toggle_subject(value)? {
                format!("Subject {value} selected.")
            } else {
                format!("Subject {value} removed.")
            }
        }
        "proficiency" => {
            let (subcategory, level) = split_last("set proficiency", value)?;
            let level: Proficiency = level.parse()?;
            app.expertise.set_proficiency(subcategory, level)?;
            format!("{subcategory}: {level}.")
        }
        "language" => {
            let (language, level) = split_last("set language", value)?;
            if level.eq_ignore_ascii_case("none") {
                if app.languages.remove(language) {
                    format!("Removed {language}.")
                } else {
                    format!("{language} was not listed.")
                }
            } else {
                let level: Fluency = level.parse()?;
                app.languages.set_fluency(language, level)?;
                format!("{language}: {level}.")
            }
        }
        "other_subjects" => {
            app.expertise.other_subjects = value.to_string();
            "Other subjects updated.".to_string()
        }
        "other_languages" => {
            app.languages.other_languages = value.to_string();
            "Other languages updated.".to_string()
        }
        "format" => {
            let format: SessionFormat = value.parse()?;
            if app.preferences.toggle_format(format) {
                format!("Offering {format} sessions.")
            } else {
                format!("No longer offering {format} sessions.")
            }
        }
        "duration" => {
            let minutes: u16 = value
                .trim_end_matches("min")
                .trim()
                .parse()
                .map_err(|_| invalid("set duration", &format!("{value} is not in minutes")))?;
            app.preferences.set_duration(minutes)?;
            format!("Session length set to {minutes} minutes.")
        }
        "rate" => {
            let rate: Decimal = value
                .trim_start_matches('$')
                .parse()
                .map_err(|_| invalid("set rate", &format!("{value} is not a number")))?;
            if rate.is_sign_negative() {
                return Err(invalid("set rate", "rate cannot be negative").into());
            }
            app.preferences.hourly_rate = rate;
            format!("Hourly rate set to ${rate}.")
        }
        "day" => {
            let day = parse_day(value)?;
            let on = draft.availability.toggle_day(day);
            format!("{value} {}.", if on { "on" } else { "off" })
        }
        "slot" => {
            let (day, part) = split_last("set slot", value)?;
            let day = parse_day(day)?;
            let part: DayPart = part.parse()?;
            let on = draft.availability.toggle_day_slot(day, part);
            format!("{} {}.", part.label(), if on { "on" } else { "off" })
        }
        "date" => {
            let day = date("set date", value)?;
            if wizard.select_open_date(day, today)? {
                format!("Selected {day}.")
            } else {
                format!("{day} was already selected.")
            }
        }
        "undate" => {
            let day = date("set undate", value)?;
            if draft.schedule.remove_date(day) {
                format!("Removed {day}.")
            } else {
                format!("{day} was not selected.")
            }
        }
        "time" => {
            let (raw_date, slot) = value
                .split_once(char::is_whitespace)
                .ok_or_else(|| invalid("set time", "expected <date> <slot>"))?;
            let day = date("set time", raw_date)?;
            let slot = slot_label(slot.trim());
            if !draft.schedule.contains_date(day) {
                return Err(invalid("set time", &format!("{day} is not chosen")).into());
            }
            draft.schedule.toggle_slot(day, &slot);
            if draft.schedule.has_slot(day, &slot) {
                format!("{day}: added {slot}.")
            } else {
                format!("{day}: removed {slot}.")
            }
        }
        other => return Err(invalid("set", &format!("unknown field {other}")).into()),
    };
    Ok(note)
}

/// A 1-based index into the predefined slots, or a custom label as typed.
fn slot_label(raw: &str) -> String {
    raw.parse::<usize>()
        .ok()
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| PREDEFINED_SLOTS.get(i))
        .map(|s| s.to_string())
        .unwrap_or_else(|| raw.to_string())
}
