//! Tutor Hub: view-model core of a tutoring marketplace.

pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod messaging;
pub mod navigation;
pub mod registration;
pub mod shell;
