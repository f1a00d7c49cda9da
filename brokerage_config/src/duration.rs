use std::ops::Deref;

use serde::Deserialize;

/// Duration in a compact notation like `1h 30m 10s` or `250ms`. A number
/// without a unit is read as seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.split_whitespace()
            .try_fold(std::time::Duration::default(), |out, part| {
                parse_part(part).map(|x| out + x)
            })
            .map(Self)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid duration {s:?}")))
    }
}

fn parse_part(part: &str) -> Option<std::time::Duration> {
    let unit_start = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    let (value, unit) = part.split_at(unit_start);
    let value = value.parse::<u64>().ok()?;

    let duration = match unit {
        "ms" => std::time::Duration::from_millis(value),
        "" | "s" => std::time::Duration::from_secs(value),
        "m" => std::time::Duration::from_secs(value.checked_mul(60)?),
        "h" => std::time::Duration::from_secs(value.checked_mul(3600)?),
        "d" => std::time::Duration::from_secs(value.checked_mul(24 * 3600)?),
        _ => return None,
    };
    Some(duration)
}
