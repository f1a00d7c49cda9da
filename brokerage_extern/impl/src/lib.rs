pub mod cms;
pub mod http;
pub mod submission;
