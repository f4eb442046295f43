use crate::model::{ScanRecord, Severity, Vulnerability};
use crate::output::format_timestamp;
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct VulnRow {
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Recommendation")]
    recommendation: String,
}

pub fn print_table(record: &ScanRecord) -> Result<()> {
    print!("{}", render_table(record));
    Ok(())
}

pub fn render_table(record: &ScanRecord) -> String {
    let mut out = String::new();

    out.push('\n');
    out.push_str(&format!("Scan: {}\n", record.display_name()));
    out.push_str(&format!("URL: {}\n", record.display_url()));
    out.push_str(&format!("Type: {}\n", record.display_scan_type()));
    if let Some(created) = &record.created_at {
        out.push_str(&format!("Started: {}\n", format_timestamp(created)));
    }
    if let Some(completed) = &record.completed_at {
        out.push_str(&format!("Completed: {}\n", format_timestamp(completed)));
    }
    out.push_str(&format!("Status: {}\n", record.display_status()));
    out.push('\n');

    let summary = record.severity_summary();
    out.push_str(&format!(
        "Findings: {} high, {} medium, {} low ({} total)\n",
        summary.high, summary.medium, summary.low, summary.total
    ));
    out.push('\n');

    let vulns = record.vulnerabilities();
    if vulns.is_empty() {
        out.push_str("No vulnerabilities found.\n");
    } else {
        // Server ordering is preserved.
        let rows: Vec<VulnRow> = vulns
            .iter()
            .map(|v| VulnRow {
                severity: format_severity(&v.severity),
                kind: v.display_kind(),
                location: location(v),
                description: truncate(v.description.as_deref().unwrap_or(""), 50),
                recommendation: truncate(v.recommendation.as_deref().unwrap_or(""), 50),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        out.push_str(&table);
        out.push('\n');
    }

    if let Some(ai) = record.summary.as_ref().filter(|ai| !ai.is_empty()) {
        out.push('\n');
        out.push_str("AI Summary:\n");
        if !ai.overview.is_empty() {
            out.push_str(&format!("  Overview: {}\n", ai.overview));
        }
        if !ai.key_findings.is_empty() {
            out.push_str(&format!("  Key findings: {}\n", ai.key_findings));
        }
        if !ai.recommendations.is_empty() {
            out.push_str(&format!("  Recommendations: {}\n", ai.recommendations));
        }
        if !ai.risk_assessment.is_empty() {
            out.push_str(&format!("  Risk assessment: {}\n", ai.risk_assessment));
        }
    }

    out
}

/// Where the finding lives: package, file, and/or header.
fn location(v: &Vulnerability) -> String {
    let mut parts = Vec::new();
    if let Some(package) = &v.package {
        match &v.version {
            Some(version) => parts.push(format!("{} ({})", package, version)),
            None => parts.push(package.clone()),
        }
    }
    if let Some(file) = &v.file {
        parts.push(file.clone());
    }
    if let Some(header) = &v.header {
        parts.push(header.clone());
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

fn format_severity(severity: &Severity) -> String {
    match severity {
        Severity::High => "\x1b[91mHIGH\x1b[0m".to_string(),
        Severity::Medium => "\x1b[33mMEDIUM\x1b[0m".to_string(),
        Severity::Low => "\x1b[32mLOW\x1b[0m".to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
