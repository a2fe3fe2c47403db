//! Read-only catalog data and the list views over it.

pub mod filter;
pub mod finder;
pub mod fixtures;
pub mod model;

pub use filter::{
    FilterCriteria, SessionCriteria, SessionSort, SortKey, StatusFilter, StudentCriteria,
    StudentSort,
};
pub use finder::{PriceRange, ResourceQuery, TutorQuery, TutorSort};
pub use fixtures::Fixtures;
pub use model::{Resource, Role, Session, SessionStatus, Student, StudentStatus, Tutor};
