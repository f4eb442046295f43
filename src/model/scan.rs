use serde::{Deserialize, Serialize};

use crate::model::{Severity, Vulnerability};

/// What kind of target a scan job inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Repository,
    Website,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Repository => "repository",
            ScanType::Website => "website",
        }
    }
}

impl std::fmt::Display for ScanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Server-side lifecycle state of a scan job.
///
/// Only the server advances this; the client observes it by polling.
/// Unrecognized values deserialize to [`JobStatus::Unknown`] so a new
/// server-side state never breaks the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body for creating a scan job.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRequest {
    pub url: String,
    pub scan_type: ScanType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ScanRequest {
    pub fn new(url: impl Into<String>, scan_type: ScanType) -> Self {
        Self {
            url: url.into(),
            scan_type,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// One scan job as returned by `GET /api/scan/{job_id}`.
///
/// The server is lenient about which fields it fills in at each stage of
/// the job lifecycle, so everything here is optional. Display fallbacks
/// and severity-count resolution live on this type, not at render sites.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ScanResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<AiSummary>,
}

impl ScanRecord {
    /// Findings in the order the server reported them.
    pub fn vulnerabilities(&self) -> &[Vulnerability] {
        self.results
            .as_ref()
            .map(|r| r.vulnerabilities.as_slice())
            .unwrap_or(&[])
    }

    /// Resolved severity counts.
    ///
    /// Per-severity counts default to 0 when the server omits them; the
    /// total falls back to the length of the vulnerability list.
    pub fn severity_summary(&self) -> SeveritySummary {
        let counts = self.results.as_ref().and_then(|r| r.summary.as_ref());
        let fallback_total = self.vulnerabilities().len() as u64;
        match counts {
            Some(c) => SeveritySummary {
                high: c.high_severity.unwrap_or(0),
                medium: c.medium_severity.unwrap_or(0),
                low: c.low_severity.unwrap_or(0),
                total: c.total.unwrap_or(fallback_total),
            },
            None => SeveritySummary {
                high: 0,
                medium: 0,
                low: 0,
                total: fallback_total,
            },
        }
    }

    /// Scan name, falling back to the target URL.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or("")
    }

    /// Target URL, falling back to the per-type URL inside the results.
    pub fn display_url(&self) -> &str {
        self.url
            .as_deref()
            .or_else(|| self.results.as_ref().and_then(|r| r.repo_url.as_deref()))
            .or_else(|| self.results.as_ref().and_then(|r| r.site_url.as_deref()))
            .unwrap_or("")
    }

    pub fn display_scan_type(&self) -> &str {
        self.scan_type.as_deref().unwrap_or("")
    }

    pub fn display_status(&self) -> &str {
        self.status.map(|s| s.as_str()).unwrap_or("completed")
    }
}

/// The `results` payload of a completed (or partially completed) scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanResults {
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SeverityCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
}

/// Severity counts as the server sends them; any field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCounts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_severity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium_severity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_severity: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl SeverityCounts {
    /// Counts computed from a finding list, every field filled in.
    pub fn tally(vulnerabilities: &[Vulnerability]) -> Self {
        let count = |severity: Severity| {
            Some(
                vulnerabilities
                    .iter()
                    .filter(|v| v.severity == severity)
                    .count() as u64,
            )
        };
        Self {
            high_severity: count(Severity::High),
            medium_severity: count(Severity::Medium),
            low_severity: count(Severity::Low),
            total: Some(vulnerabilities.len() as u64),
        }
    }
}

/// Resolved severity counts, ready for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeveritySummary {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
    pub total: u64,
}

/// AI-generated narrative attached to a scan; sections may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSummary {
    pub overview: String,
    pub key_findings: String,
    pub recommendations: String,
    pub risk_assessment: String,
}

impl AiSummary {
    pub fn is_empty(&self) -> bool {
        self.overview.is_empty()
            && self.key_findings.is_empty()
            && self.recommendations.is_empty()
            && self.risk_assessment.is_empty()
    }
}

/// The logged-in user, as reported by `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_unrecognized_is_unknown() {
        let status: JobStatus = serde_json::from_str(r#""queued""#).unwrap();
        assert_eq!(status, JobStatus::Unknown);

        let status: JobStatus = serde_json::from_str(r#""running""#).unwrap();
        assert_eq!(status, JobStatus::Running);
    }

    #[test]
    fn test_scan_request_body_shape() {
        let request = ScanRequest::new("https://example.com", ScanType::Website)
            .with_name("Nightly scan");
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "url": "https://example.com",
                "scan_type": "website",
                "name": "Nightly scan"
            })
        );
    }

    #[test]
    fn test_scan_record_deserialize_sparse() {
        let record: ScanRecord = serde_json::from_str(r#"{"status": "pending"}"#).unwrap();
        assert_eq!(record.status, Some(JobStatus::Pending));
        assert!(record.vulnerabilities().is_empty());
        assert_eq!(record.display_status(), "pending");

        let record: ScanRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record.status, None);
        assert_eq!(record.display_status(), "completed");
    }

    #[test]
    fn test_severity_summary_prefers_server_counts() {
        let record: ScanRecord = serde_json::from_str(
            r#"{
                "status": "completed",
                "results": {
                    "vulnerabilities": [{"type": "a", "severity": "high"}],
                    "summary": {"high_severity": 3, "medium_severity": 1, "low_severity": 0, "total": 4}
                }
            }"#,
        )
        .unwrap();
        let summary = record.severity_summary();
        assert_eq!(summary.high, 3);
        assert_eq!(summary.medium, 1);
        assert_eq!(summary.low, 0);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn test_severity_summary_total_falls_back_to_list_length() {
        let record: ScanRecord = serde_json::from_str(
            r#"{
                "results": {
                    "vulnerabilities": [
                        {"type": "a", "severity": "high"},
                        {"type": "b", "severity": "medium"}
                    ]
                }
            }"#,
        )
        .unwrap();
        let summary = record.severity_summary();
        assert_eq!(summary.high, 0);
        assert_eq!(summary.medium, 0);
        assert_eq!(summary.low, 0);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_severity_summary_partial_server_counts() {
        let record: ScanRecord = serde_json::from_str(
            r#"{
                "results": {
                    "vulnerabilities": [{"type": "a", "severity": "high"}],
                    "summary": {"high_severity": 1}
                }
            }"#,
        )
        .unwrap();
        let summary = record.severity_summary();
        assert_eq!(summary.high, 1);
        assert_eq!(summary.medium, 0);
        // total missing from the server summary: falls back to list length
        assert_eq!(summary.total, 1);
    }

    #[test]
    fn test_display_fallbacks() {
        let record: ScanRecord = serde_json::from_str(
            r#"{"results": {"vulnerabilities": [], "repo_url": "https://github.com/x/y"}}"#,
        )
        .unwrap();
        assert_eq!(record.display_url(), "https://github.com/x/y");
        assert_eq!(record.display_name(), "");

        let record: ScanRecord =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert_eq!(record.display_name(), "https://example.com");
    }

    #[test]
    fn test_tally_counts_by_severity() {
        let vulns = vec![
            Vulnerability {
                severity: Severity::High,
                ..Default::default()
            },
            Vulnerability {
                severity: Severity::High,
                ..Default::default()
            },
            Vulnerability {
                severity: Severity::Medium,
                ..Default::default()
            },
        ];
        let counts = SeverityCounts::tally(&vulns);
        assert_eq!(counts.high_severity, Some(2));
        assert_eq!(counts.medium_severity, Some(1));
        assert_eq!(counts.low_severity, Some(0));
        assert_eq!(counts.total, Some(3));
    }
}
