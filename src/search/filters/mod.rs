//! Built-in search filters
//!
//! - [`VisibilityFilter`] - hidden (dot-prefixed) files and folders
//! - [`SharabilityFilter`] - generated files: `.gitignore` rules plus known build/cache folders
//! - [`PathFilter`] - user-supplied glob exclusions
//! - [`SizeFilter`] - data files above a size limit

pub mod path;
pub mod sharability;
pub mod size;
pub mod visibility;

pub use path::PathFilter;
pub use sharability::SharabilityFilter;
pub use size::SizeFilter;
pub use visibility::VisibilityFilter;
