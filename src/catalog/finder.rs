//! Tutor discovery and AI resource browsing.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::filter::{StatusFilter, compare_names, matches_search};
use super::model::{Difficulty, Resource, ResourceKind, Tutor};
use crate::error::CatalogError;

/// Inclusive hourly price bounds in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    min: Decimal,
    max: Decimal,
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: dec!(20),
            max: dec!(100),
        }
    }
}

impl PriceRange {
    pub fn new(min: Decimal, max: Decimal) -> Result<Self, CatalogError> {
        if min > max {
            return Err(CatalogError::InvalidPriceRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    pub fn contains(&self, rate: Decimal) -> bool {
        rate >= self.min && rate <= self.max
    }
}

impl std::fmt::Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${} - ${}", self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TutorSort {
    /// Highest rated first.
    #[default]
    Rating,
    PriceLow,
    PriceHigh,
    /// Most years of experience first.
    Experience,
}

impl TutorSort {
    fn compare(&self, a: &Tutor, b: &Tutor) -> Ordering {
        let primary = match self {
            Self::Rating => b.rating.total_cmp(&a.rating),
            Self::PriceLow => a.hourly_rate.cmp(&b.hourly_rate),
            Self::PriceHigh => b.hourly_rate.cmp(&a.hourly_rate),
            Self::Experience => b.years_experience.cmp(&a.years_experience),
        };
        primary.then_with(|| compare_names(&a.name, &b.name))
    }
}

impl std::fmt::Display for TutorSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rating => write!(f, "rating"),
            Self::PriceLow => write!(f, "price_low"),
            Self::PriceHigh => write!(f, "price_high"),
            Self::Experience => write!(f, "experience"),
        }
    }
}

impl std::str::FromStr for TutorSort {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "rating" => Ok(Self::Rating),
            "price_low" => Ok(Self::PriceLow),
            "price_high" => Ok(Self::PriceHigh),
            "experience" => Ok(Self::Experience),
            _ => Err(format!("Unknown sort: {}", s)),
        }
    }
}

/// State of the find-a-tutor view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorQuery {
    pub search_text: String,
    pub price: PriceRange,
    /// `None` shows tutors regardless of language.
    pub language: Option<String>,
    pub sort: TutorSort,
}

impl TutorQuery {
    pub fn with_price(price: PriceRange) -> Self {
        Self {
            price,
            ..Self::default()
        }
    }

    pub fn matches(&self, tutor: &Tutor) -> bool {
        matches_search(tutor, &self.search_text)
            && self.price.contains(tutor.hourly_rate)
            && self.language.as_deref().is_none_or(|l| tutor.speaks(l))
    }

    pub fn apply<'a>(&self, tutors: &'a [Tutor]) -> Vec<&'a Tutor> {
        let mut out: Vec<&Tutor> = tutors.iter().filter(|t| self.matches(t)).collect();
        out.sort_by(|a, b| self.sort.compare(a, b));
        out
    }
}

/// State of the AI resources view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceQuery {
    pub search_text: String,
    pub subject: StatusFilter<String>,
    pub kind: StatusFilter<ResourceKind>,
    pub difficulty: StatusFilter<Difficulty>,
}

impl ResourceQuery {
    pub fn matches(&self, resource: &Resource) -> bool {
        matches_search(resource, &self.search_text)
            && self.subject.matches(&resource.subject)
            && self.kind.matches(&resource.kind)
            && self.difficulty.matches(&resource.difficulty)
    }

    /// Matching resources in input order.
    pub fn apply<'a>(&self, resources: &'a [Resource]) -> Vec<&'a Resource> {
        resources.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Distinct subjects across `resources`, for the subject picker.
pub fn resource_subjects(resources: &[Resource]) -> Vec<&str> {
    let set: std::collections::BTreeSet<&str> =
        resources.iter().map(|r| r.subject.as_str()).collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Role;

    fn tutor(name: &str, rating: f64, rate: Decimal, years: u32) -> Tutor {
        Tutor {
            id: name.to_lowercase(),
            name: name.into(),
            avatar: String::new(),
            rating,
            subjects: Vec::new(),
            languages: vec!["English".into()],
            hourly_rate: rate,
            availability: "Weekdays".into(),
            description: String::new(),
            years_experience: years,
            weekly_availability: Default::default(),
            open_schedule: Vec::new(),
            session_formats: Vec::new(),
            session_durations: Vec::new(),
            total_reviews: 0,
            education: String::new(),
            location: String::new(),
            achievements: Vec::new(),
            reviews: Vec::new(),
        }
    }

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn roster() -> Vec<Tutor> {
        let mut sarah = tutor("Dr. Sarah Johnson", 4.9, dec!(45), 12);
        sarah.subjects = owned(&["Mathematics", "Physics"]);
        let mut michael = tutor("Prof. Michael Chen", 4.7, dec!(55), 15);
        michael.subjects = owned(&["Computer Science"]);
        let mut emma = tutor("Emma Rodriguez", 4.8, dec!(35), 6);
        emma.subjects = owned(&["Literature", "Writing"]);
        emma.languages.push("Spanish".into());
        let mut david = tutor("David Kim", 4.5, dec!(60), 4);
        david.subjects = owned(&["Music Theory", "Piano"]);
        vec![sarah, michael, emma, david]
    }

    fn names<'a>(list: &[&'a Tutor]) -> Vec<&'a str> {
        list.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn inverted_price_range_rejected() {
        assert!(matches!(
            PriceRange::new(dec!(80), dec!(20)),
            Err(CatalogError::InvalidPriceRange { .. })
        ));
    }

    #[test]
    fn price_range_is_inclusive() {
        let range = PriceRange::new(dec!(35), dec!(55)).unwrap();
        assert!(range.contains(dec!(35)));
        assert!(range.contains(dec!(55)));
        assert!(!range.contains(dec!(55.01)));
    }

    #[test]
    fn default_query_sorts_by_rating() {
        let tutors = roster();
        let out = TutorQuery::default().apply(&tutors);
        let expected = [
            "Dr. Sarah Johnson",
            "Emma Rodriguez",
            "Prof. Michael Chen",
            "David Kim",
        ];
        assert_eq!(names(&out), expected);
    }

    #[test]
    fn search_covers_subjects() {
        let tutors = roster();
        let query = TutorQuery {
            search_text: "physics".into(),
            ..Default::default()
        };
        assert_eq!(names(&query.apply(&tutors)), vec!["Dr. Sarah Johnson"]);
    }

    #[test]
    fn price_sorts_and_range_narrow() {
        let tutors = roster();
        let mut query = TutorQuery::with_price(PriceRange::new(dec!(40), dec!(60)).unwrap());
        query.sort = TutorSort::PriceLow;
        assert_eq!(
            names(&query.apply(&tutors)),
            vec!["Dr. Sarah Johnson", "Prof. Michael Chen", "David Kim"]
        );
        query.sort = TutorSort::PriceHigh;
        assert_eq!(
            names(&query.apply(&tutors)),
            vec!["David Kim", "Prof. Michael Chen", "Dr. Sarah Johnson"]
        );
    }

    #[test]
    fn experience_sort_most_years_first() {
        let tutors = roster();
        let query = TutorQuery {
            sort: TutorSort::Experience,
            ..Default::default()
        };
        assert_eq!(names(&query.apply(&tutors))[0], "Prof. Michael Chen");
    }

    #[test]
    fn language_filter() {
        let tutors = roster();
        let query = TutorQuery {
            language: Some("spanish".into()),
            ..Default::default()
        };
        assert_eq!(names(&query.apply(&tutors)), vec!["Emma Rodriguez"]);
    }

    #[test]
    fn sort_parses_dashes_and_underscores() {
        let low: TutorSort = "price-low".parse().unwrap();
        assert_eq!(low, TutorSort::PriceLow);
        let high: TutorSort = "PRICE_HIGH".parse().unwrap();
        assert_eq!(high, TutorSort::PriceHigh);
        assert!("cheapest".parse::<TutorSort>().is_err());
    }

    #[test]
    fn resource_filters_compose() {
        use Difficulty::{Advanced, Beginner, Intermediate};
        use ResourceKind::{PracticeTest, StudyGuide, Video};

        let resource = |id: &str, subject: &str, kind, difficulty| Resource {
            id: id.into(),
            title: format!("{subject} {id}"),
            kind,
            subject: subject.into(),
            description: "Practice material".into(),
            difficulty,
            estimated_minutes: 30,
            audience: Role::Student,
        };
        let resources = vec![
            resource("1", "Mathematics", StudyGuide, Intermediate),
            resource("2", "Chemistry", Video, Beginner),
            resource("3", "Mathematics", PracticeTest, Advanced),
        ];

        let all = ResourceQuery::default();
        assert_eq!(all.apply(&resources).len(), 3);

        let maths = ResourceQuery {
            subject: StatusFilter::Only("Mathematics".into()),
            ..Default::default()
        };
        let found = maths.apply(&resources);
        let ids: Vec<_> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);

        let advanced_maths = ResourceQuery {
            difficulty: StatusFilter::Only(Advanced),
            ..maths
        };
        assert_eq!(advanced_maths.apply(&resources).len(), 1);

        let searched = ResourceQuery {
            search_text: "chemistry".into(),
            kind: StatusFilter::Only(Video),
            ..Default::default()
        };
        assert_eq!(searched.apply(&resources)[0].id, "2");

        let subjects = resource_subjects(&resources);
        assert_eq!(subjects, vec!["Chemistry", "Mathematics"]);
    }
}
