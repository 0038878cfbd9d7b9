//! Output formatting utilities

use kindred_core::Member;
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn is_known(s: &str) -> bool {
        matches!(s.to_lowercase().as_str(), "table" | "json")
    }
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Pretty JSON for any serializable result
pub fn to_json<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// One table line per member: id, name, birth date, generation
pub fn member_row(member: &Member) -> String {
    let mut row = format!("  {}", member.id);
    if !member.name.is_empty() {
        row.push_str(&format!("  {}", member.name));
    }
    if let Some(born) = member.birth_date {
        row.push_str(&format!("  b. {}", born));
    }
    if let Some(generation) = member.generation {
        row.push_str(&format!("  (gen {})", generation));
    }
    row
}
