use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A bare email address (`local@domain`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress(pub lettre::Address);

/// An email address with an optional display name (`Name <local@domain>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddressWithName(pub lettre::message::Mailbox);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    pub fn with_name(self, name: impl Into<String>) -> EmailAddressWithName {
        EmailAddressWithName(lettre::message::Mailbox::new(Some(name.into()), self.0))
    }

    pub fn without_name(self) -> EmailAddressWithName {
        EmailAddressWithName(lettre::message::Mailbox::new(None, self.0))
    }
}

impl EmailAddressWithName {
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    pub fn email(&self) -> &str {
        self.0.email.as_ref()
    }

    pub fn into_email_address(self) -> EmailAddress {
        EmailAddress(self.0.email)
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for EmailAddressWithName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EmailAddress {
    type Err = <lettre::Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl FromStr for EmailAddressWithName {
    type Err = <lettre::message::Mailbox as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_name() {
        let address = "Operator <ipv4@example.com>"
            .parse::<EmailAddressWithName>()
            .unwrap();
        assert_eq!(address.name(), Some("Operator"));
        assert_eq!(address.email(), "ipv4@example.com");
    }

    #[test]
    fn attach_name() {
        let address = "jane@example.com".parse::<EmailAddress>().unwrap();
        let address = address.with_name("Jane Doe");
        assert_eq!(address.name(), Some("Jane Doe"));
        assert_eq!(address.into_email_address().as_str(), "jane@example.com");
    }

    #[test]
    fn reject_invalid() {
        assert!("not an address".parse::<EmailAddress>().is_err());
    }
}
