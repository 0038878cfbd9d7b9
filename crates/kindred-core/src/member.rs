//! Member (person record) types and snapshot parsing

use crate::error::Result;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;

/// Opaque unique identifier for a member
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for MemberId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MemberId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Recorded gender, used only for relationship-label wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "m", alias = "M", alias = "Male", alias = "MALE")]
    Male,
    #[serde(alias = "f", alias = "F", alias = "Female", alias = "FEMALE")]
    Female,
    #[serde(other)]
    Other,
}

/// A person record in the family graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique identifier (unique within a snapshot)
    pub id: MemberId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Recorded gender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Parent ids in recorded order; empty for a founding member
    #[serde(default, deserialize_with = "deserialize_parents")]
    pub parents: Vec<MemberId>,

    /// Birth date, None when unknown
    #[serde(
        default,
        deserialize_with = "deserialize_birth_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_date: Option<NaiveDate>,

    /// Generation number (lower = older)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation: Option<i32>,

    /// Any other display attributes carried by the record
    #[serde(flatten)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl Member {
    /// Create a founding member with no parents and no optional data
    pub fn new(id: impl Into<MemberId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            gender: None,
            parents: Vec::new(),
            birth_date: None,
            generation: None,
            attributes: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Add a parent reference; a repeated id is ignored
    pub fn with_parent(mut self, parent: impl Into<MemberId>) -> Self {
        let parent = parent.into();
        if !self.parents.contains(&parent) {
            self.parents.push(parent);
        }
        self
    }

    pub fn born(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn with_generation(mut self, generation: i32) -> Self {
        self.generation = Some(generation);
        self
    }

    /// True when the member has no recorded parents
    pub fn is_founder(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if `id` is one of this member's recorded parents
    pub fn has_parent(&self, id: &str) -> bool {
        self.parents.iter().any(|p| p.as_str() == id)
    }

    /// Name if recorded, otherwise the id
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// Parse a birth date as it arrives from upstream records.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp. Empty, `unknown` and
/// unparseable values yield None.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("unknown") {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    tracing::warn!("Unparseable birth date {:?}, treating as unknown", raw);
    None
}

fn deserialize_birth_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(raw)) => Ok(parse_birth_date(&raw)),
        Some(other) => {
            tracing::warn!("Non-text birth date {}, treating as unknown", other);
            Ok(None)
        }
    }
}

fn deserialize_parents<'de, D>(deserializer: D) -> std::result::Result<Vec<MemberId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<MemberId>> = Option::deserialize(deserializer)?;
    let mut parents: Vec<MemberId> = Vec::new();
    for parent in raw.unwrap_or_default() {
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }
    Ok(parents)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotDocument {
    Members(Vec<Member>),
    Wrapped { members: Vec<Member> },
}

/// Parse a member snapshot: either a JSON array of members or an object
/// with a `members` array.
pub fn parse_snapshot(json: &str) -> Result<Vec<Member>> {
    let members = match serde_json::from_str::<SnapshotDocument>(json)? {
        SnapshotDocument::Members(members) => members,
        SnapshotDocument::Wrapped { members } => members,
    };
    tracing::debug!("Parsed snapshot with {} members", members.len());
    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_creation() {
        let member = Member::new("C")
            .with_name("Carol")
            .with_gender(Gender::Female)
            .with_parent("A")
            .with_parent("B")
            .with_parent("A");

        assert_eq!(member.id.as_str(), "C");
        assert_eq!(member.parents, vec![MemberId::from("A"), MemberId::from("B")]);
        assert!(member.has_parent("B"));
        assert!(!member.is_founder());
        assert_eq!(member.display_name(), "Carol");
        assert_eq!(Member::new("X").display_name(), "X");
    }

    #[test]
    fn test_deserialize_camel_case_record() {
        let json = r#"{
            "id": "m1",
            "name": "Ada",
            "gender": "F",
            "parents": ["p1", "p2", "p1"],
            "birthDate": "1815-12-10",
            "generation": 2,
            "avatarUrl": "https://example.org/ada.png"
        }"#;
        let member: Member = serde_json::from_str(json).unwrap();

        assert_eq!(member.gender, Some(Gender::Female));
        assert_eq!(member.parents.len(), 2);
        assert_eq!(member.birth_date, NaiveDate::from_ymd_opt(1815, 12, 10));
        assert_eq!(member.generation, Some(2));
        assert_eq!(
            member.attributes.get("avatarUrl"),
            Some(&serde_json::Value::from("https://example.org/ada.png"))
        );
    }

    #[test]
    fn test_unknown_values_are_tolerated() {
        let json = r#"{"id": "m2", "gender": "nonbinary", "parents": null, "birthDate": "unknown"}"#;
        let member: Member = serde_json::from_str(json).unwrap();

        assert_eq!(member.gender, Some(Gender::Other));
        assert!(member.is_founder());
        assert_eq!(member.birth_date, None);
    }

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(parse_birth_date("1990-03-04"), NaiveDate::from_ymd_opt(1990, 3, 4));
        assert_eq!(
            parse_birth_date("1990-03-04T08:30:00Z"),
            NaiveDate::from_ymd_opt(1990, 3, 4)
        );
        assert_eq!(parse_birth_date(""), None);
        assert_eq!(parse_birth_date("Unknown"), None);
        assert_eq!(parse_birth_date("sometime in spring"), None);
    }

    #[test]
    fn test_non_text_birth_date_is_unknown() {
        let members =
            parse_snapshot(r#"[{"id": "A", "birthDate": 19900101}, {"id": "B", "parents": ["A"]}]"#)
                .unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].birth_date, None);

        let member: Member =
            serde_json::from_str(r#"{"id": "C", "birthDate": {"year": 1990}}"#).unwrap();
        assert_eq!(member.birth_date, None);
    }

    #[test]
    fn test_parse_snapshot_forms() {
        let plain = parse_snapshot(r#"[{"id": "A"}, {"id": "B", "parents": ["A"]}]"#).unwrap();
        assert_eq!(plain.len(), 2);

        let wrapped = parse_snapshot(r#"{"members": [{"id": "A"}]}"#).unwrap();
        assert_eq!(wrapped.len(), 1);

        assert!(parse_snapshot("{\"people\": 3}").is_err());
    }

    #[test]
    fn test_serialize_skips_unknowns() {
        let member = Member::new("A").with_parent("B");
        let json = serde_json::to_value(&member).unwrap();

        assert_eq!(json["id"], "A");
        assert_eq!(json["parents"][0], "B");
        assert!(json.get("birthDate").is_none());
        assert!(json.get("gender").is_none());
    }
}
