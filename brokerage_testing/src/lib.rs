//! Fake versions of the external services the brokerage backend talks to.

pub mod cms;
pub mod smtp;
