use serde::{Deserialize, Deserializer, Serialize};

/// Severity of a single finding.
///
/// The server reports severities as free-form strings. Parsing is
/// case-insensitive and anything absent or unrecognized is treated as
/// [`Severity::Low`] rather than failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "high" => Severity::High,
            "medium" => Severity::Medium,
            _ => Severity::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Low
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Severity::parse(&raw))
    }
}

/// One finding reported by the scan service.
///
/// Every field except `severity` is optional on the wire; which ones are
/// present depends on the finding type (dependency findings carry
/// `package`/`version`, site findings carry `file` or `header`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vulnerability {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Vulnerability {
    /// Human-readable finding type: underscores become spaces, and a
    /// finding without a type shows as "Issue".
    pub fn display_kind(&self) -> String {
        self.kind
            .as_deref()
            .unwrap_or("Issue")
            .replace('_', " ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse_case_insensitive() {
        assert_eq!(Severity::parse("high"), Severity::High);
        assert_eq!(Severity::parse("HIGH"), Severity::High);
        assert_eq!(Severity::parse("Medium"), Severity::Medium);
        assert_eq!(Severity::parse("low"), Severity::Low);
    }

    #[test]
    fn test_severity_parse_unrecognized_is_low() {
        assert_eq!(Severity::parse("critical"), Severity::Low);
        assert_eq!(Severity::parse(""), Severity::Low);
        assert_eq!(Severity::parse("severe"), Severity::Low);
    }

    #[test]
    fn test_severity_deserialize_lenient() {
        let v: Vulnerability =
            serde_json::from_str(r#"{"type": "missing_header", "severity": "HIGH"}"#).unwrap();
        assert_eq!(v.severity, Severity::High);

        let v: Vulnerability = serde_json::from_str(r#"{"severity": "whatever"}"#).unwrap();
        assert_eq!(v.severity, Severity::Low);
    }

    #[test]
    fn test_severity_defaults_to_low_when_absent() {
        let v: Vulnerability = serde_json::from_str(r#"{"type": "mixed_content"}"#).unwrap();
        assert_eq!(v.severity, Severity::Low);
    }

    #[test]
    fn test_display_kind() {
        let v = Vulnerability {
            kind: Some("outdated_dependency".to_string()),
            ..Default::default()
        };
        assert_eq!(v.display_kind(), "outdated dependency");

        let v = Vulnerability::default();
        assert_eq!(v.display_kind(), "Issue");
    }

    #[test]
    fn test_deserialize_full_finding() {
        let v: Vulnerability = serde_json::from_str(
            r#"{
                "type": "outdated_dependency",
                "package": "axios",
                "version": "0.19.2",
                "severity": "high",
                "description": "Known SSRF vulnerability",
                "recommendation": "Update to >= 0.21.1"
            }"#,
        )
        .unwrap();
        assert_eq!(v.package.as_deref(), Some("axios"));
        assert_eq!(v.version.as_deref(), Some("0.19.2"));
        assert_eq!(v.severity, Severity::High);
        assert!(v.file.is_none());
        assert!(v.header.is_none());
    }
}
