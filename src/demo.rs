//! Canned scan results for the offline demo path.
//!
//! When the demo scan cannot even create a job (backend unreachable), the
//! client renders a fixed result set locally instead of retrying. The
//! fixtures mirror what the server's own demo mode produces for each scan
//! type.

use chrono::Utc;

use crate::model::{
    AiSummary, JobStatus, ScanRecord, ScanResults, ScanType, Severity, SeverityCounts,
    Vulnerability,
};

/// Placeholder target used by the demo scan.
pub const DEMO_URL: &str = "https://example.com";

/// Display name given to demo scan jobs.
pub const DEMO_SCAN_NAME: &str = "Demo Scan";

/// Builds a completed demo record for the given scan type without any
/// server involvement.
pub fn offline_record(scan_type: ScanType) -> ScanRecord {
    let now = Utc::now().to_rfc3339();
    let vulnerabilities = demo_vulnerabilities(scan_type);
    let summary = SeverityCounts::tally(&vulnerabilities);

    ScanRecord {
        id: Some("demo-offline".to_string()),
        name: Some(DEMO_SCAN_NAME.to_string()),
        url: Some(DEMO_URL.to_string()),
        scan_type: Some(scan_type.as_str().to_string()),
        status: Some(JobStatus::Completed),
        created_at: Some(now.clone()),
        completed_at: Some(now),
        results: Some(ScanResults {
            vulnerabilities,
            summary: Some(summary),
            repo_url: None,
            site_url: None,
        }),
        summary: Some(AiSummary {
            overview: "Demo overview of findings.".to_string(),
            key_findings: "Sample high and medium issues shown below.".to_string(),
            recommendations: "Update vulnerable packages and add security headers.".to_string(),
            risk_assessment: "Medium".to_string(),
        }),
    }
}

fn demo_vulnerabilities(scan_type: ScanType) -> Vec<Vulnerability> {
    match scan_type {
        ScanType::Repository => vec![
            Vulnerability {
                kind: Some("outdated_dependency".to_string()),
                package: Some("axios".to_string()),
                version: Some("0.19.2".to_string()),
                severity: Severity::High,
                description: Some("Known SSRF vulnerability".to_string()),
                recommendation: Some("Update to >= 0.21.1".to_string()),
                ..Default::default()
            },
            Vulnerability {
                kind: Some("exposed_secret".to_string()),
                file: Some("config.js".to_string()),
                severity: Severity::High,
                description: Some("API key present in source".to_string()),
                recommendation: Some("Move to env vars".to_string()),
                ..Default::default()
            },
        ],
        ScanType::Website => vec![
            Vulnerability {
                kind: Some("missing_header".to_string()),
                header: Some("Content-Security-Policy".to_string()),
                severity: Severity::High,
                description: Some("CSP missing".to_string()),
                recommendation: Some("Add CSP header".to_string()),
                ..Default::default()
            },
            Vulnerability {
                kind: Some("mixed_content".to_string()),
                severity: Severity::Medium,
                description: Some("HTTP resources on HTTPS page".to_string()),
                recommendation: Some("Use HTTPS for all assets".to_string()),
                ..Default::default()
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_demo_counts() {
        let record = offline_record(ScanType::Repository);
        assert_eq!(record.status, Some(JobStatus::Completed));
        assert!(!record.vulnerabilities().is_empty());

        let summary = record.severity_summary();
        assert_eq!(summary.high, 2);
        assert_eq!(summary.medium, 0);
        assert_eq!(summary.low, 0);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_website_demo_counts() {
        let record = offline_record(ScanType::Website);
        assert_eq!(record.status, Some(JobStatus::Completed));

        let summary = record.severity_summary();
        assert_eq!(summary.high, 1);
        assert_eq!(summary.medium, 1);
        assert_eq!(summary.low, 0);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn test_demo_record_is_labeled() {
        let record = offline_record(ScanType::Website);
        assert_eq!(record.display_name(), DEMO_SCAN_NAME);
        assert_eq!(record.display_url(), DEMO_URL);
        assert_eq!(record.display_scan_type(), "website");
        assert!(record.created_at.is_some());
        assert!(record.summary.is_some());
    }
}
