//! Search, status filter and sort over read-only entity slices.
//!
//! Every list view works the same way: keep the entities whose searchable
//! text contains the query and whose status matches, then sort what is left.
//! Results borrow from the input; nothing is cloned or mutated.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Resource, Session, SessionStatus, Student, StudentStatus, Tutor};

/// Text fields an entity exposes to the search box.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;
}

/// Entities with a status a list can be narrowed to.
pub trait HasStatus {
    type Status: PartialEq;
    fn status(&self) -> &Self::Status;
}

/// An ordering over entities of type `T`.
pub trait SortKey<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Case-insensitive substring match across all searchable fields.
/// Empty text matches everything.
pub fn matches_search<T: Searchable + ?Sized>(entity: &T, text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let needle = text.to_lowercase();
    entity
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// A status filter: either everything, or one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        Self::All
    }
}

impl<S: PartialEq> StatusFilter<S> {
    pub fn matches(&self, value: &S) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<S: std::fmt::Display> std::fmt::Display for StatusFilter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(s) => write!(f, "{s}"),
        }
    }
}

impl<S: std::str::FromStr> std::str::FromStr for StatusFilter<S> {
    type Err = S::Err;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

pub fn matches_status<T: HasStatus>(entity: &T, filter: &StatusFilter<T::Status>) -> bool {
    filter.matches(entity.status())
}

/// What a list view is currently showing. Reset whenever the view changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria<S, K> {
    pub search_text: String,
    pub status: StatusFilter<S>,
    pub sort_key: K,
}

impl<S, K: Default> Default for FilterCriteria<S, K> {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            status: StatusFilter::All,
            sort_key: K::default(),
        }
    }
}

impl<S, K> FilterCriteria<S, K> {
    pub fn new(search_text: impl Into<String>, status: StatusFilter<S>, sort_key: K) -> Self {
        Self {
            search_text: search_text.into(),
            status,
            sort_key,
        }
    }

    /// Apply to `items`: filter first, then a stable sort of the survivors.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> Vec<&'a T>
    where
        T: Searchable + HasStatus<Status = S>,
        S: PartialEq,
        K: SortKey<T>,
    {
        let mut out: Vec<&T> = items
            .iter()
            .filter(|e| matches_search(*e, &self.search_text))
            .filter(|e| matches_status(*e, &self.status))
            .collect();
        out.sort_by(|a, b| self.sort_key.compare(*a, *b));
        out
    }
}

/// Case-insensitive first, exact as a tiebreak, so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

impl Searchable for Student {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }
}

impl HasStatus for Student {
    type Status = StudentStatus;
    fn status(&self) -> &StudentStatus {
        &self.status
    }
}

/// Roster orderings on the tutor side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentSort {
    /// Alphabetical.
    Name,
    /// Highest mean progress first. Students with no progress go last.
    Progress,
    /// Most recent session first. Students with no sessions go last.
    #[default]
    Recent,
}

impl SortKey<Student> for StudentSort {
    fn compare(&self, a: &Student, b: &Student) -> Ordering {
        match self {
            Self::Name => compare_names(&a.name, &b.name),
            Self::Progress => match (a.mean_progress(), b.mean_progress()) {
                (Some(x), Some(y)) => y.total_cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::Recent => {
                let last = |s: &Student| s.last_session().unwrap_or(DateTime::<Utc>::MIN_UTC);
                last(b).cmp(&last(a))
            }
        }
    }
}

impl std::str::FromStr for StudentSort {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "progress" => Ok(Self::Progress),
            "recent" => Ok(Self::Recent),
            _ => Err(format!("Unknown sort: {}", s)),
        }
    }
}

pub type StudentCriteria = FilterCriteria<StudentStatus, StudentSort>;

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

impl Searchable for Session {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.counterpart.as_str(), self.subject.as_str()]
    }
}

impl HasStatus for Session {
    type Status = SessionStatus;
    fn status(&self) -> &SessionStatus {
        &self.status
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSort {
    /// Soonest first.
    #[default]
    StartTime,
    Subject,
}

impl SortKey<Session> for SessionSort {
    fn compare(&self, a: &Session, b: &Session) -> Ordering {
        match self {
            Self::StartTime => a.starts_at.cmp(&b.starts_at),
            Self::Subject => {
                compare_names(&a.subject, &b.subject).then_with(|| a.starts_at.cmp(&b.starts_at))
            }
        }
    }
}

impl std::str::FromStr for SessionSort {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "start_time" | "date" => Ok(Self::StartTime),
            "subject" => Ok(Self::Subject),
            _ => Err(format!("Unknown sort: {}", s)),
        }
    }
}

pub type SessionCriteria = FilterCriteria<SessionStatus, SessionSort>;

// ---------------------------------------------------------------------------
// Tutors and resources only need search; their filters live elsewhere.
// ---------------------------------------------------------------------------

impl Searchable for Tutor {
    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.subjects.iter().map(String::as_str))
            .collect()
    }
}

impl Searchable for Resource {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}
