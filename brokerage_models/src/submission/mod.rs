use std::{
    collections::{BTreeMap, BTreeSet},
    str::FromStr,
};

use nutype::nutype;
use serde::{Deserialize, Serialize};

pub use self::validation::{validate, validate_field, ValidationRules};

pub mod validation;

/// The page a submission originates from. Each variant has its own set of
/// fields and required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    Contact,
    Buy,
    Sell,
    Lease,
}

impl FormVariant {
    pub const ALL: [Self; 4] = [Self::Contact, Self::Buy, Self::Sell, Self::Lease];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::Lease => "lease",
        }
    }

    /// Human readable name used in mail subjects and bodies.
    pub fn title(self) -> &'static str {
        match self {
            Self::Contact => "Contact",
            Self::Buy => "Buy IPv4",
            Self::Sell => "Sell IPv4",
            Self::Lease => "Lease IPv4",
        }
    }

    /// The fields that make up the shape of this variant.
    pub fn fields(self) -> &'static [SubmissionField] {
        use SubmissionField::*;
        match self {
            Self::Contact => &[Name, Email, Phone, Service, Message],
            Self::Buy | Self::Sell => &[Name, Email, IpBlock, Message],
            Self::Lease => &[Name, Email, IpBlock, LeaseDuration, Message],
        }
    }

    pub fn has_field(self, field: SubmissionField) -> bool {
        self.fields().contains(&field)
    }
}

impl std::fmt::Display for FormVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormVariant(pub String);

impl std::fmt::Display for UnknownFormVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown form variant {:?}", self.0)
    }
}

impl std::error::Error for UnknownFormVariant {}

impl FromStr for FormVariant {
    type Err = UnknownFormVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFormVariant(s.into()))
    }
}

/// Closed set of field identifiers a submission can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionField {
    Name,
    Email,
    Phone,
    IpBlock,
    LeaseDuration,
    Service,
    Message,
}

impl SubmissionField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::IpBlock => "ipBlock",
            Self::LeaseDuration => "leaseDuration",
            Self::Service => "service",
            Self::Message => "message",
        }
    }
}

impl std::fmt::Display for SubmissionField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw, untrusted form input. Every field may be missing or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub ip_block: Option<String>,
    pub lease_duration: Option<String>,
    pub service: Vec<String>,
    pub message: Option<String>,
}

impl SubmissionDraft {
    pub fn text(&self, field: SubmissionField) -> Option<&str> {
        match field {
            SubmissionField::Name => self.name.as_deref(),
            SubmissionField::Email => self.email.as_deref(),
            SubmissionField::Phone => self.phone.as_deref(),
            SubmissionField::IpBlock => self.ip_block.as_deref(),
            SubmissionField::LeaseDuration => self.lease_duration.as_deref(),
            SubmissionField::Message => self.message.as_deref(),
            SubmissionField::Service => None,
        }
    }

    /// Returns the trimmed value of the given field, or `None` if it is
    /// missing or blank.
    pub fn trimmed(&self, field: SubmissionField) -> Option<&str> {
        self.text(field).map(str::trim).filter(|x| !x.is_empty())
    }
}

/// A validated submission, built from the trimmed field values of a
/// [`SubmissionDraft`]. Fields outside the variant's shape are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRecord {
    pub variant: FormVariant,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub ip_block: Option<String>,
    pub lease_duration: Option<String>,
    pub services: BTreeSet<ServiceLabel>,
    pub message: Option<String>,
}

impl SubmissionRecord {
    pub fn from_draft(
        draft: &SubmissionDraft,
        variant: FormVariant,
        rules: ValidationRules,
    ) -> Result<Self, FieldErrors> {
        let errors = validate(draft, variant, rules);
        if !errors.is_empty() {
            return Err(errors);
        }

        let field = |field| {
            variant
                .has_field(field)
                .then(|| draft.trimmed(field))
                .flatten()
                .map(str::to_owned)
        };

        let services = if variant.has_field(SubmissionField::Service) {
            draft
                .service
                .iter()
                .filter_map(|x| ServiceLabel::try_new(x.clone()).ok())
                .collect()
        } else {
            BTreeSet::new()
        };

        Ok(Self {
            variant,
            name: field(SubmissionField::Name).unwrap_or_default(),
            email: field(SubmissionField::Email).unwrap_or_default(),
            phone: field(SubmissionField::Phone),
            ip_block: field(SubmissionField::IpBlock),
            lease_duration: field(SubmissionField::LeaseDuration),
            services,
            message: field(SubmissionField::Message),
        })
    }
}

/// A selected service, e.g. "IPv4 Buy" or "Lease IPv4".
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        TryFrom,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct ServiceLabel(String);

/// Error messages of all fields that failed validation. A field without an
/// entry passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<SubmissionField, &'static str>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: SubmissionField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: SubmissionField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: SubmissionField, message: &'static str) {
        self.0.insert(field, message);
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubmissionField, &'static str)> + '_ {
        self.0.iter().map(|(&field, &message)| (field, message))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Opaque identifier of an accepted delivery, as reported by the mail
/// server.
#[nutype(derive(Debug, Clone, PartialEq, Eq, Display, Deref, From, Serialize, Deserialize))]
pub struct DeliveryId(String);
