//! Plain-text rendering of each screen.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::catalog::model::{Session, Tutor};
use crate::messaging::{ChatMessage, Inbox, Sender};
use crate::navigation::View;
use crate::navigation::screen::{
    AssistantView, FindTutorView, Screen, SessionsView, StudentDashboardView, TutorDashboardView,
};
use crate::registration::availability::{WEEK, day_key};
use crate::registration::state::StepMarker;
use crate::registration::{RegistrationStep, RegistrationWizard};

pub async fn screen(screen: &mut Screen, assistant_name: &str) -> String {
    match screen {
        Screen::Home => home(),
        Screen::StudentDashboard(view) => student_dashboard(view, assistant_name).await,
        Screen::FindTutor(view) => find_tutor(view),
        Screen::TutorProfile(tutor) => tutor_profile(tutor),
        Screen::Assistant(view) => assistant(view, assistant_name).await,
        Screen::Messages(inbox) => messages(inbox, assistant_name).await,
        Screen::Sessions(view) => sessions(view),
        Screen::TutorDashboard(view) => tutor_dashboard(view),
        Screen::Registration(wizard) => registration(wizard),
    }
}

pub fn views() -> String {
    let mut out = String::from("Views:\n");
    for view in View::STATIC {
        let _ = writeln!(out, "  {view}");
    }
    out.push_str("  /student/tutor/<id>");
    out
}

fn home() -> String {
    format!("Tutor Hub\n\n{}", views())
}

pub fn when(at: &DateTime<Utc>) -> String {
    at.format("%a %b %-d, %-I:%M %p").to_string()
}

fn session_line(session: &Session) -> String {
    let mut line = format!(
        "  {}  {} with {} ({} min) [{}]",
        when(&session.starts_at),
        session.subject,
        session.counterpart,
        session.duration_minutes,
        session.status
    );
    if let Some(rating) = session.rating {
        let _ = write!(line, " {}", "*".repeat(rating.into()));
    }
    line
}

async fn student_dashboard(view: &StudentDashboardView, assistant_name: &str) -> String {
    let dash = &view.summary;
    let mut out = format!("Welcome back, {}!\n\nUpcoming sessions:\n", dash.name);
    if dash.upcoming.is_empty() {
        out.push_str("  (none)\n");
    }
    for session in &dash.upcoming {
        let _ = writeln!(out, "{}", session_line(session));
    }
    out.push_str("\nLearning progress:\n");
    for (subject, percent) in &dash.progress {
        let _ = writeln!(out, "  {subject:<16} {percent:>5.1}%");
    }
    match dash.overall_progress {
        Some(mean) => {
            let _ = writeln!(out, "  {:<16} {:>5.1}%", "Overall", mean);
        }
        None => out.push_str("  (no progress recorded)\n"),
    }
    let _ = writeln!(out, "\nCompleted sessions: {}", dash.completed_sessions);
    if view.chat_open {
        let _ = writeln!(out, "\nChat with {assistant_name}:");
        let messages = view.chat.messages().await;
        transcript_lines(&mut out, &messages, assistant_name, assistant_name);
    } else {
        let _ = writeln!(out, "\nChat with {assistant_name}: say something to start.");
    }
    out.trim_end().to_string()
}

fn tutor_line(tutor: &Tutor) -> String {
    format!(
        "  [{}] {}  {:.1}  ${}/hr  {}  ({})",
        tutor.id,
        tutor.name,
        tutor.rating,
        tutor.hourly_rate,
        tutor.subjects.join(", "),
        tutor.languages.join(", ")
    )
}

fn find_tutor(view: &FindTutorView) -> String {
    let results = view.results();
    let query = &view.query;
    let mut out = format!(
        "Find a tutor: {} result(s)\n  search \"{}\"  price {}  language {}  sort {}\n",
        results.len(),
        query.search_text,
        query.price,
        query.language.as_deref().unwrap_or("all"),
        query.sort
    );
    if results.is_empty() {
        out.push_str("  No tutors match these filters.");
    }
    for tutor in results {
        let _ = writeln!(out, "{}", tutor_line(tutor));
    }
    out.trim_end().to_string()
}

fn tutor_profile(tutor: &Tutor) -> String {
    let (name, rating) = (&tutor.name, tutor.rating);
    let (reviews, rate) = (tutor.total_reviews, tutor.hourly_rate);
    let mut out = format!("{name}  {rating:.1} ({reviews} reviews)  ${rate}/hr\n");
    if !tutor.education.is_empty() {
        let _ = writeln!(out, "{}", tutor.education);
    }
    if !tutor.location.is_empty() {
        let _ = writeln!(out, "Location: {}", tutor.location);
    }
    if tutor.years_experience > 0 {
        let _ = writeln!(out, "Experience: {} years", tutor.years_experience);
    }
    let _ = write!(
        out,
        "{}\n\nSubjects: {}\nLanguages: {}\nAvailability: {}\n",
        tutor.description,
        tutor.subjects.join(", "),
        tutor.languages.join(", "),
        tutor.availability
    );
    if !tutor.weekly_availability.is_empty() {
        out.push_str("\nWeekly schedule:\n");
        for day in WEEK {
            if let Some(parts) = tutor.weekly_availability.get(day_key(day)) {
                let _ = writeln!(out, "  {:<10} {}", day_key(day), parts.join(", "));
            }
        }
    }
    if !tutor.open_schedule.is_empty() {
        out.push_str("\nOpen dates:\n");
        for open in &tutor.open_schedule {
            let _ = writeln!(
                out,
                "  {}  {}",
                open.date.format("%a %b %-d"),
                open.time_slots.join(", ")
            );
        }
    }
    if !tutor.session_formats.is_empty() {
        let _ = writeln!(out, "\nFormats: {}", tutor.session_formats.join(", "));
    }
    if !tutor.session_durations.is_empty() {
        let _ = writeln!(out, "Durations: {}", tutor.session_durations.join(", "));
    }
    if !tutor.achievements.is_empty() {
        out.push_str("\nAchievements & Credentials:\n");
        for achievement in &tutor.achievements {
            let _ = writeln!(out, "  * {achievement}");
        }
    }
    if !tutor.reviews.is_empty() {
        let _ = writeln!(out, "\nStudent Reviews ({}):", tutor.total_reviews);
        for review in &tutor.reviews {
            let (name, subject) = (&review.student_name, &review.subject);
            let stars = stars(review.rating);
            let _ = writeln!(out, "  {name} [{subject}]  {stars}  {}", review.date);
            let _ = writeln!(out, "    {}", review.comment);
        }
    }
    out.trim_end().to_string()
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "*".repeat(filled), ".".repeat(5 - filled))
}

fn transcript_lines(out: &mut String, messages: &[ChatMessage], contact: &str, assistant: &str) {
    for message in messages {
        let who = match message.sender {
            Sender::User => "You",
            Sender::Contact => contact,
            Sender::Assistant => assistant,
        };
        let _ = writeln!(
            out,
            "  [{}] {}: {}",
            message.timestamp.format("%H:%M"),
            who,
            message.text
        );
    }
}

pub fn chat_message(message: &ChatMessage, assistant_name: &str) -> String {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Contact => "Contact",
        Sender::Assistant => assistant_name,
    };
    format!("{who}: {}", message.text)
}

async fn assistant(view: &AssistantView, assistant_name: &str) -> String {
    let query = &view.query;
    let resources = view.visible();
    let mut out = format!(
        "AI resources ({} role): {} shown\n",
        view.role(),
        resources.len()
    );
    let (subject, kind, level) = (&query.subject, &query.kind, &query.difficulty);
    let _ = writeln!(
        out,
        "  search \"{}\"  subject {subject}  kind {kind}  level {level}",
        query.search_text
    );
    let _ = writeln!(out, "  subjects: {}", view.subjects().join(", "));
    for r in resources {
        let _ = writeln!(
            out,
            "  [{}] {}  ({}, {}, {}, {} min)",
            r.id, r.title, r.subject, r.kind, r.difficulty, r.estimated_minutes
        );
    }
    let _ = writeln!(out, "\nChat with {assistant_name}:");
    let messages = view.chat.messages().await;
    transcript_lines(&mut out, &messages, assistant_name, assistant_name);
    out.trim_end().to_string()
}

async fn messages(inbox: &mut Inbox, assistant_name: &str) -> String {
    let selected = inbox.selected_contact().map(|c| c.id.clone());
    let mut out = format!(
        "Messages  search \"{}\"  assistant {}\n",
        inbox.contacts().search_text(),
        if inbox.contacts().is_assistant_pinned() {
            "pinned"
        } else {
            "unpinned"
        }
    );
    for contact in inbox.contacts().visible() {
        let marker = if Some(&contact.id) == selected.as_ref() {
            ">"
        } else {
            " "
        };
        let unread = if contact.unread_count > 0 {
            format!(" ({} unread)", contact.unread_count)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "{marker} [{}] {}{}{}  {}",
            contact.id,
            contact.name,
            if contact.online { " *" } else { "" },
            unread,
            contact.last_message
        );
    }

    let contact_name = inbox
        .selected_contact()
        .map(|c| c.name.clone())
        .unwrap_or_default();
    if let Ok(transcript) = inbox.transcript().await {
        let _ = writeln!(out, "\nConversation with {contact_name}:");
        transcript_lines(&mut out, &transcript, &contact_name, assistant_name);
    }
    out.trim_end().to_string()
}

fn sessions(view: &SessionsView) -> String {
    let visible = view.visible();
    let criteria = &view.criteria;
    let mut out = format!(
        "My sessions ({}): {} shown\n  search \"{}\"  status {}  sort {:?}\n",
        view.role(),
        visible.len(),
        criteria.search_text,
        criteria.status,
        criteria.sort_key
    );
    for session in visible {
        let _ = writeln!(out, "{}", session_line(session));
        if let Some(notes) = &session.notes {
            let _ = writeln!(out, "      {notes}");
        }
    }
    out.trim_end().to_string()
}

fn tutor_dashboard(view: &TutorDashboardView) -> String {
    let dash = &view.summary;
    let mut out = format!(
        "Welcome back, {}!\nProfile {}% complete  |  {} upcoming session(s)\n\nToday:\n",
        dash.name, dash.profile_completion, dash.upcoming_count
    );
    if dash.today.is_empty() {
        out.push_str("  No sessions scheduled for this day\n");
    }
    for session in &dash.today {
        let _ = writeln!(out, "{}", session_line(session));
    }
    let roster = &view.roster;
    let _ = writeln!(
        out,
        "\nStudents  search \"{}\"  status {}  sort {:?}",
        roster.search_text, roster.status, roster.sort_key
    );
    for student in view.students() {
        let progress = student
            .mean_progress()
            .map(|p| format!("{p:.0}%"))
            .unwrap_or_else(|| "-".to_string());
        let last = student
            .last_session()
            .map(|at| when(&at))
            .unwrap_or_else(|| "never".to_string());
        let _ = writeln!(
            out,
            "  {:<14} {:<8} {} session(s), last {}, progress {}",
            student.name,
            student.status,
            student.sessions_count(),
            last,
            progress
        );
    }
    out.trim_end().to_string()
}

fn registration(wizard: &RegistrationWizard) -> String {
    let controller = wizard.controller();
    let step = controller.current();
    let mut out = format!(
        "Tutor registration: step {} of {} ({:.0}%)\n",
        controller.index() + 1,
        controller.len(),
        controller.progress_percent()
    );
    for (i, s) in controller.steps().iter().enumerate() {
        let mark = match controller.marker(i) {
            StepMarker::Done => "x",
            StepMarker::Current => ">",
            StepMarker::Pending => " ",
        };
        let _ = writeln!(out, "  [{mark}] {}", s.title);
    }
    let _ = writeln!(out, "\n{}: {}", step.title, step.description);

    let draft = wizard.draft();
    let app = &draft.application;
    match wizard.current_step() {
        RegistrationStep::BasicInformation => {
            let b = &app.basic;
            let _ = writeln!(out, "  name   {} {}", b.first_name, b.last_name);
            let _ = writeln!(out, "  email  {}", b.email);
            let _ = writeln!(out, "  phone  {}", b.phone);
            let _ = writeln!(out, "  bio    {}", b.bio);
        }
        RegistrationStep::Qualifications => {
            let q = &app.qualifications;
            let degree = q.degree.map(|d| d.to_string()).unwrap_or_default();
            let _ = writeln!(out, "  degree       {degree}");
            let _ = writeln!(out, "  institution  {}", q.institution);
            let _ = writeln!(out, "  field        {}", q.field_of_study);
            let year = q.graduation_year.map(|y| y.to_string()).unwrap_or_default();
            let _ = writeln!(out, "  year         {year}");
            for c in &q.certifications {
                let (name, org) = (&c.name, &c.issuing_organization);
                let _ = writeln!(out, "  cert         {name} ({org})");
            }
        }
        RegistrationStep::SubjectExpertise => {
            let e = &app.expertise;
            let _ = writeln!(out, "  subjects  {}", e.subjects.join(", "));
            for (sub, level) in &e.subcategories {
                let _ = writeln!(out, "    {sub}: {level}");
            }
            if !e.other_subjects.is_empty() {
                let _ = writeln!(out, "  other     {}", e.other_subjects);
            }
        }
        RegistrationStep::Languages => {
            for (lang, fluency) in &app.languages.languages {
                let _ = writeln!(out, "  {lang}: {fluency}");
            }
            if !app.languages.other_languages.is_empty() {
                let _ = writeln!(out, "  other  {}", app.languages.other_languages);
            }
        }
        RegistrationStep::Availability => {
            for day in WEEK {
                let on = draft.availability.is_day_on(day);
                let mark = if on { "x" } else { " " };
                let _ = write!(out, "  [{mark}] {:<10}", day_key(day));
                for (part, slot_on) in draft.availability.visible_slots(day) {
                    let mark = if slot_on { "x" } else { " " };
                    let _ = write!(out, " [{mark}] {}", part.key());
                }
                out.push('\n');
            }
            let p = &app.preferences;
            let formats: Vec<String> = p.formats.iter().map(|f| f.to_string()).collect();
            let _ = writeln!(out, "  formats   {}", formats.join(", "));
            let _ = writeln!(out, "  duration  {} min", p.duration_minutes);
            let _ = writeln!(out, "  rate      ${}/hr", p.hourly_rate);
        }
        RegistrationStep::OpenSchedule => {
            if draft.schedule.is_empty() {
                out.push_str("  (no dates selected)\n");
            }
            for (date, slots) in draft.schedule.iter() {
                let _ = writeln!(out, "  {}  {}", date.format("%a %b %-d"), slots.join(", "));
            }
        }
    }
    let _ = write!(out, "\n[{}]", wizard.primary_action());
    if wizard.is_gated() {
        out.push_str(" (fields are checked before moving on)");
    }
    out
}
