//! Views and the transitions between them.

pub mod navigator;
pub mod route;
pub mod screen;

pub use navigator::Navigator;
pub use route::View;
pub use screen::Screen;
