use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ulid::Ulid;

/// Stable identifier of a driver record.
///
/// New ids are ULIDs: unique independently of the driver's name and sorted
/// by creation time, so ordering by id is ordering by arrival.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverId(String);

impl DriverId {
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DriverId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DriverId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// Years of experience as stored: a number, or the raw form text.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredYears {
    Number(u64),
    Text(String),
}

fn experience_years<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let years = match StoredYears::deserialize(deserializer)? {
        StoredYears::Number(n) => n,
        StoredYears::Text(s) if s.trim().is_empty() => 0,
        StoredYears::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| D::Error::custom(format!("experience is not a number: {s:?}")))?,
    };
    u8::try_from(years).map_err(|_| D::Error::custom(format!("experience out of range: {years}")))
}

/// The questionnaire document stored for one driver.
///
/// Field names follow the stored document shape (camelCase). Every field
/// has a serde default so that partially filled legacy documents still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRecord {
    pub full_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub pesel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default)]
    pub bank_account: String,
    #[serde(default, deserialize_with = "experience_years")]
    pub experience: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<EmergencyContact>,
}

impl DriverRecord {
    /// Full name with every whitespace run replaced by `_`.
    /// Used as the stem of exported file names.
    pub fn name_slug(&self) -> String {
        let mut out = String::with_capacity(self.full_name.len());
        let mut in_space = false;
        for c in self.full_name.chars() {
            if c.is_whitespace() {
                if !in_space {
                    out.push('_');
                }
                in_space = true;
            } else {
                out.push(c);
                in_space = false;
            }
        }
        out
    }

    /// Case-insensitive substring match on the full name.
    pub fn matches(&self, term: &str) -> bool {
        term.is_empty()
            || self
                .full_name
                .to_lowercase()
                .contains(&term.to_lowercase())
    }
}

/// A record together with its store key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,
    #[serde(flatten)]
    pub record: DriverRecord,
}

impl Driver {
    pub fn new(id: impl Into<DriverId>, record: DriverRecord) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }
}
