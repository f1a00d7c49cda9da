use std::sync::LazyLock;

use regex::Regex;

use super::{FieldErrors, FormVariant, SubmissionDraft, SubmissionField};

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email";
pub const PHONE_REQUIRED: &str = "Phone number is required";
pub const PHONE_INVALID: &str = "Please enter a valid phone number";
pub const IP_BLOCK_REQUIRED: &str = "IP block is required";
pub const IP_BLOCK_INVALID: &str = "Please enter a valid IP block (e.g., 192.168.1.0/24)";
pub const LEASE_DURATION_REQUIRED: &str = "Lease duration is required";

pub static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Syntactic `a.b.c.d/n` check only: octets up to 999 and prefix lengths up
/// to 99 are accepted.
pub static IP_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}/[0-9]{1,2}$").unwrap()
});

pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationRules {
    /// Require phone numbers to consist of 10 to 15 digits (ignoring any
    /// separators) instead of just being present.
    pub strict_phone: bool,
}

/// Checks every field of the variant's shape and collects the error
/// messages of those that fail.
pub fn validate(
    draft: &SubmissionDraft,
    variant: FormVariant,
    rules: ValidationRules,
) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for &field in variant.fields() {
        if let Some(message) = validate_field(draft, variant, field, rules) {
            errors.insert(field, message);
        }
    }
    errors
}

/// Checks a single field. Fields outside the variant's shape always pass.
pub fn validate_field(
    draft: &SubmissionDraft,
    variant: FormVariant,
    field: SubmissionField,
    rules: ValidationRules,
) -> Option<&'static str> {
    if !variant.has_field(field) {
        return None;
    }

    let value = draft.trimmed(field);
    match field {
        SubmissionField::Name => value.is_none().then_some(NAME_REQUIRED),
        SubmissionField::Email => match value {
            None => Some(EMAIL_REQUIRED),
            Some(email) if !EMAIL_REGEX.is_match(email) => Some(EMAIL_INVALID),
            Some(_) => None,
        },
        SubmissionField::Phone => match value {
            None => Some(PHONE_REQUIRED),
            Some(phone) if rules.strict_phone && !is_valid_phone(phone) => Some(PHONE_INVALID),
            Some(_) => None,
        },
        SubmissionField::IpBlock => match value {
            None => Some(IP_BLOCK_REQUIRED),
            Some(ip_block) if !IP_BLOCK_REGEX.is_match(ip_block) => Some(IP_BLOCK_INVALID),
            Some(_) => None,
        },
        SubmissionField::LeaseDuration => value.is_none().then_some(LEASE_DURATION_REQUIRED),
        SubmissionField::Service | SubmissionField::Message => None,
    }
}

fn is_valid_phone(phone: &str) -> bool {
    let digits = phone
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    PHONE_REGEX.is_match(&digits)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn buy_draft() -> SubmissionDraft {
        SubmissionDraft {
            name: Some("Jane Doe".into()),
            email: Some("jane@example.com".into()),
            ip_block: Some("192.168.1.0/24".into()),
            ..Default::default()
        }
    }

    #[test]
    fn well_formed_record_passes() {
        let result = validate(&buy_draft(), FormVariant::Buy, Default::default());
        assert!(result.is_empty(), "{result}");
    }

    #[test]
    fn missing_email() {
        let draft = SubmissionDraft {
            email: None,
            ..buy_draft()
        };

        let result = validate(&draft, FormVariant::Buy, Default::default());

        assert_eq!(result.get(SubmissionField::Email), Some(EMAIL_REQUIRED));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn blank_fields_are_missing() {
        let draft = SubmissionDraft {
            name: Some("   ".into()),
            email: Some("\t".into()),
            ip_block: Some("".into()),
            ..Default::default()
        };

        let result = validate(&draft, FormVariant::Sell, Default::default());

        assert_eq!(result.get(SubmissionField::Name), Some(NAME_REQUIRED));
        assert_eq!(result.get(SubmissionField::Email), Some(EMAIL_REQUIRED));
        assert_eq!(result.get(SubmissionField::IpBlock), Some(IP_BLOCK_REQUIRED));
    }

    #[test]
    fn email_format() {
        for (email, ok) in [
            ("jane@example.com", true),
            ("j.doe+ipv4@mail.example.co.uk", true),
            ("bad", false),
            ("jane@example", false),
            ("jane doe@example.com", false),
            ("@example.com", false),
            ("jane@@example.com", false),
        ] {
            let draft = SubmissionDraft {
                email: Some(email.into()),
                ..buy_draft()
            };
            let result =
                validate_field(&draft, FormVariant::Buy, SubmissionField::Email, Default::default());
            assert_eq!(result.is_none(), ok, "{email}");
        }
    }

    #[test]
    fn ip_block_is_only_checked_syntactically() {
        for (ip_block, ok) in [
            ("10.0.0.0/8", true),
            ("256.1.1.1/33", true),
            ("999.999.999.999/99", true),
            ("10.0.0.0", false),
            ("10.0.0/8", false),
            ("10.0.0.0/123", false),
            ("1000.0.0.0/8", false),
            ("a.b.c.d/8", false),
        ] {
            let draft = SubmissionDraft {
                ip_block: Some(ip_block.into()),
                ..buy_draft()
            };
            let result = validate_field(
                &draft,
                FormVariant::Lease,
                SubmissionField::IpBlock,
                Default::default(),
            );
            let expected = (!ok).then_some(IP_BLOCK_INVALID);
            assert_eq!(result, expected, "{ip_block}");
        }
    }

    #[test]
    fn contact_requires_phone() {
        let draft = SubmissionDraft {
            name: Some("Jane".into()),
            email: Some("jane@example.com".into()),
            ..Default::default()
        };

        let result = validate(&draft, FormVariant::Contact, Default::default());

        assert_eq!(result.get(SubmissionField::Phone), Some(PHONE_REQUIRED));
        assert!(!result.contains(SubmissionField::IpBlock));
    }

    #[test]
    fn lenient_phone_accepts_any_text() {
        let draft = SubmissionDraft {
            phone: Some("call me".into()),
            ..Default::default()
        };

        let result = validate_field(
            &draft,
            FormVariant::Contact,
            SubmissionField::Phone,
            ValidationRules::default(),
        );

        assert_eq!(result, None);
    }

    #[test]
    fn strict_phone() {
        let rules = ValidationRules { strict_phone: true };
        for (phone, ok) in [
            ("+49 (170) 123-4567", true),
            ("555 010 0100", true),
            ("123456789012345", true),
            ("555-0100", false),
            ("1234567890123456", false),
            ("call me", false),
        ] {
            let draft = SubmissionDraft {
                phone: Some(phone.into()),
                ..Default::default()
            };
            let result =
                validate_field(&draft, FormVariant::Contact, SubmissionField::Phone, rules);
            let expected = (!ok).then_some(PHONE_INVALID);
            assert_eq!(result, expected, "{phone}");
        }
    }

    #[test]
    fn lease_requires_duration() {
        let result = validate(&buy_draft(), FormVariant::Lease, Default::default());
        assert_eq!(
            result.get(SubmissionField::LeaseDuration),
            Some(LEASE_DURATION_REQUIRED)
        );
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn fields_outside_shape_are_ignored() {
        let draft = SubmissionDraft {
            ip_block: Some("not a block".into()),
            ..buy_draft()
        };

        let result = validate_field(
            &draft,
            FormVariant::Contact,
            SubmissionField::IpBlock,
            Default::default(),
        );

        assert_eq!(result, None);
    }

    #[test]
    fn validation_is_idempotent() {
        let draft = SubmissionDraft {
            name: Some("".into()),
            email: Some("bad".into()),
            ..Default::default()
        };

        let first = validate(&draft, FormVariant::Lease, Default::default());
        let second = validate(&draft, FormVariant::Lease, Default::default());

        assert_eq!(first, second);
    }

    #[test]
    fn validate_field_agrees_with_validate() {
        let draft = SubmissionDraft {
            name: Some("Jane".into()),
            email: Some("bad".into()),
            phone: Some("".into()),
            ..Default::default()
        };

        let errors = validate(&draft, FormVariant::Contact, Default::default());

        for &field in FormVariant::Contact.fields() {
            assert_eq!(
                validate_field(&draft, FormVariant::Contact, field, Default::default()),
                errors.get(field),
                "{field}"
            );
        }
    }
}
