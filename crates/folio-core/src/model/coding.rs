use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub percent: u32,
}

/// Coding-time widget payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingSummary {
    pub is_active: bool,
    pub hours: String,
    pub top_languages: Vec<LanguageShare>,
}

impl CodingSummary {
    /// Static reply for missing keys, upstream errors, and empty windows.
    pub fn inactive() -> Self {
        Self {
            is_active: false,
            hours: format_hours(0),
            top_languages: Vec::new(),
        }
    }
}

/// Render a second count the way the widget shows it.
///
/// `"{h}.{tenths} hrs"` when there is at least one hour, `"{m} min"` when there
/// is at least one minute, `"0 hrs"` otherwise. Tenths are truncated, not rounded.
pub fn format_hours(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;

    if hours > 0 {
        format!("{hours}.{} hrs", minutes * 10 / 60)
    } else if minutes > 0 {
        format!("{minutes} min")
    } else {
        "0 hrs".to_string()
    }
}
