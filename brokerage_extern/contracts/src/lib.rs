pub mod cms;
pub mod submission;
