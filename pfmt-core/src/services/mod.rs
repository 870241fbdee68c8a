// Service layer modules
pub mod projects;

pub use projects::{ListOptions, Pagination, ProjectPage, ProjectService};
