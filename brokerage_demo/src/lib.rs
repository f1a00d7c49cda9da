pub mod blog;
pub mod submission;
