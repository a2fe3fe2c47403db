//! Tutor application data: the fields collected across the registration steps.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;

/// Subject areas offered on the expertise step, with their subcategories.
pub const SUBJECT_CATALOG: [(&str, &[&str]); 5] = [
    (
        "Mathematics",
        &["Algebra", "Calculus", "Statistics", "Geometry"],
    ),
    (
        "Science",
        &["Physics", "Chemistry", "Biology", "Earth Science"],
    ),
    ("English", &["Literature", "Writing", "Grammar", "ESL"]),
    (
        "History",
        &[
            "World History",
            "US History",
            "European History",
            "Ancient History",
        ],
    ),
    (
        "Computer Science",
        &[
            "Programming",
            "Web Development",
            "Data Science",
            "Algorithms",
        ],
    ),
];

/// Languages offered on the languages step.
pub const LANGUAGE_CATALOG: [&str; 8] = [
    "English",
    "Spanish",
    "French",
    "German",
    "Chinese (Mandarin)",
    "Japanese",
    "Arabic",
    "Russian",
];

/// Session lengths a tutor can offer, in minutes.
pub const SESSION_DURATIONS: [u16; 4] = [30, 60, 90, 120];

/// Generates a snake_case enum with `Display` and a case-insensitive `FromStr`.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])* $name:ident, $kind:literal
        { $($variant:ident => $key:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $key)),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = RegistrationError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
                    $($key => Ok(Self::$variant),)+
                    _ => Err(RegistrationError::UnknownOption {
                        kind: $kind.to_string(),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

choice_enum!(
    /// Highest completed degree.
    Degree, "degree" {
        Bachelor => "bachelor",
        Master => "master",
        Phd => "phd",
        Other => "other",
    }
);

choice_enum!(
    /// Self-assessed level in a subcategory.
    Proficiency, "proficiency" {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
        Expert => "expert",
    }
);

choice_enum!(
    /// Self-assessed level in a language.
    Fluency, "fluency" {
        Basic => "basic",
        Conversational => "conversational",
        Fluent => "fluent",
        Native => "native",
    }
);

choice_enum!(
    /// Where sessions take place.
    SessionFormat, "session format" {
        Online => "online",
        InPerson => "in_person",
    }
);

/// Basic information step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub bio: String,
}

/// One certification entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuing_organization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,
}

impl Certification {
    /// Name and issuing organization are both filled in.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.issuing_organization.trim().is_empty()
    }

    pub fn expires_before_issue(&self) -> bool {
        match (self.issued_on, self.expires_on) {
            (Some(issued), Some(expires)) => expires < issued,
            _ => false,
        }
    }
}

/// Qualifications & credentials step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifications {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<Degree>,
    pub institution: String,
    pub field_of_study: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<u16>,
    pub certifications: Vec<Certification>,
}

/// Subject expertise step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectExpertise {
    /// Subject areas ticked at the top level.
    pub subjects: Vec<String>,
    /// Subcategory name mapped to proficiency.
    pub subcategories: BTreeMap<String, Proficiency>,
    pub other_subjects: String,
}

impl SubjectExpertise {
    /// Tick or untick a subject area. Returns the new state.
    pub fn toggle_subject(&mut self, subject: &str) -> Result<bool, RegistrationError> {
        let name = catalog_subject(subject)?;
        if let Some(pos) = self.subjects.iter().position(|s| s == name) {
            self.subjects.remove(pos);
            Ok(false)
        } else {
            self.subjects.push(name.to_string());
            Ok(true)
        }
    }

    /// Record a proficiency for a subcategory, replacing any previous value.
    pub fn set_proficiency(
        &mut self,
        subcategory: &str,
        level: Proficiency,
    ) -> Result<(), RegistrationError> {
        let name = catalog_subcategory(subcategory)?;
        self.subcategories.insert(name.to_string(), level);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
            && self.subcategories.is_empty()
            && self.other_subjects.trim().is_empty()
    }
}

/// Languages step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSkills {
    pub languages: BTreeMap<String, Fluency>,
    pub other_languages: String,
}

impl LanguageSkills {
    pub fn set_fluency(&mut self, language: &str, level: Fluency) -> Result<(), RegistrationError> {
        let name = LANGUAGE_CATALOG
            .iter()
            .find(|l| l.eq_ignore_ascii_case(language.trim()))
            .ok_or_else(|| RegistrationError::UnknownOption {
                kind: "language".to_string(),
                value: language.to_string(),
            })?;
        self.languages.insert(name.to_string(), level);
        Ok(())
    }

    pub fn remove(&mut self, language: &str) -> bool {
        let key = self
            .languages
            .keys()
            .find(|l| l.eq_ignore_ascii_case(language.trim()))
            .cloned();
        key.is_some_and(|k| self.languages.remove(&k).is_some())
    }
}

/// Session preferences captured alongside recurring availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPreferences {
    pub formats: Vec<SessionFormat>,
    pub duration_minutes: u16,
    pub hourly_rate: Decimal,
}

impl Default for SessionPreferences {
    fn default() -> Self {
        Self {
            formats: vec![SessionFormat::Online],
            duration_minutes: 60,
            hourly_rate: dec!(45),
        }
    }
}

impl SessionPreferences {
    /// Tick or untick a format. Returns the new state.
    pub fn toggle_format(&mut self, format: SessionFormat) -> bool {
        if let Some(pos) = self.formats.iter().position(|f| *f == format) {
            self.formats.remove(pos);
            false
        } else {
            self.formats.push(format);
            true
        }
    }

    pub fn set_duration(&mut self, minutes: u16) -> Result<(), RegistrationError> {
        if !SESSION_DURATIONS.contains(&minutes) {
            return Err(RegistrationError::UnknownOption {
                kind: "session duration".to_string(),
                value: minutes.to_string(),
            });
        }
        self.duration_minutes = minutes;
        Ok(())
    }
}

/// Everything entered on the form steps (schedules live next to it).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorApplication {
    pub basic: BasicInfo,
    pub qualifications: Qualifications,
    pub expertise: SubjectExpertise,
    pub languages: LanguageSkills,
    pub preferences: SessionPreferences,
}

impl TutorApplication {
    pub fn full_name(&self) -> String {
        let first = self.basic.first_name.trim();
        let last = self.basic.last_name.trim();
        format!("{first} {last}").trim().to_string()
    }
}

fn catalog_subject(subject: &str) -> Result<&'static str, RegistrationError> {
    SUBJECT_CATALOG
        .iter()
        .map(|(name, _)| *name)
        .find(|name| name.eq_ignore_ascii_case(subject.trim()))
        .ok_or_else(|| RegistrationError::UnknownOption {
            kind: "subject".to_string(),
            value: subject.to_string(),
        })
}

fn catalog_subcategory(subcategory: &str) -> Result<&'static str, RegistrationError> {
    SUBJECT_CATALOG
        .iter()
        .flat_map(|(_, subs)| subs.iter().copied())
        .find(|name| name.eq_ignore_ascii_case(subcategory.trim()))
        .ok_or_else(|| RegistrationError::UnknownOption {
            kind: "subcategory".to_string(),
            value: subcategory.to_string(),
        })
}
