//! HTML report output format.
//!
//! Generates a self-contained HTML report with styling for easy viewing and sharing.

use crate::model::{ScanRecord, Severity};
use crate::output::format_timestamp;
use anyhow::Result;

/// Generate and print HTML report output
pub fn print_html(record: &ScanRecord) -> Result<()> {
    let html = generate_html_string(record);
    println!("{}", html);
    Ok(())
}

/// Generate HTML as a string (for file output)
pub fn generate_html_string(record: &ScanRecord) -> String {
    let summary = record.severity_summary();

    let mut html = String::new();

    html.push_str(&format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Scan Report - {}</title>
    <style>
        :root {{
            --bg-color: #1a1a2e;
            --card-bg: #16213e;
            --text-color: #eee;
            --text-muted: #888;
            --border-color: #0f3460;
            --high: #dc3545;
            --medium: #ffc107;
            --low: #28a745;
            --accent: #0f3460;
        }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg-color);
            color: var(--text-color);
            line-height: 1.6;
            padding: 2rem;
        }}
        .container {{ max-width: 960px; margin: 0 auto; }}
        header {{
            display: flex;
            justify-content: space-between;
            align-items: center;
            margin-bottom: 2rem;
            padding-bottom: 1rem;
            border-bottom: 1px solid var(--border-color);
        }}
        h1 {{ font-size: 1.75rem; font-weight: 600; }}
        .meta {{ color: var(--text-muted); font-size: 0.9rem; }}
        .stats {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
            gap: 1rem;
            margin-bottom: 2rem;
        }}
        .stat-card {{
            background: var(--card-bg);
            padding: 1.25rem;
            border-radius: 8px;
            border: 1px solid var(--border-color);
        }}
        .stat-value {{ font-size: 2rem; font-weight: 700; }}
        .stat-label {{ color: var(--text-muted); font-size: 0.85rem; }}
        .stat-high {{ color: var(--high); }}
        .stat-medium {{ color: var(--medium); }}
        .stat-low {{ color: var(--low); }}
        section {{ margin-bottom: 2rem; }}
        h2 {{
            font-size: 1.25rem;
            margin-bottom: 1rem;
            padding-bottom: 0.5rem;
            border-bottom: 1px solid var(--border-color);
        }}
        dl.details {{ background: var(--card-bg); border: 1px solid var(--border-color); border-radius: 8px; padding: 1rem 1.25rem; }}
        dl.details dt {{ color: var(--text-muted); font-size: 0.8rem; margin-top: 0.5rem; }}
        dl.details dd {{ margin: 0; }}
        .vuln-card {{
            background: var(--card-bg);
            border: 1px solid var(--border-color);
            border-radius: 8px;
            padding: 1rem 1.25rem;
            margin-bottom: 1rem;
        }}
        .vuln-title {{ font-weight: 600; margin-bottom: 0.25rem; }}
        .vuln-field {{ font-size: 0.9rem; color: var(--text-muted); }}
        .badge {{ display: inline-block; padding: 0.25rem 0.5rem; border-radius: 4px; font-size: 0.75rem; font-weight: 600; margin-bottom: 0.5rem; }}
        .badge-high {{ background: var(--high); color: white; }}
        .badge-medium {{ background: var(--medium); color: black; }}
        .badge-low {{ background: var(--low); color: white; }}
        .empty {{ text-align: center; padding: 2rem; color: var(--text-muted); }}
        footer {{ text-align: center; color: var(--text-muted); font-size: 0.8rem; margin-top: 2rem; padding-top: 1rem; border-top: 1px solid var(--border-color); }}
    </style>
</head>
<body>
    <div class="container">
        <header>
            <h1>Scan Report</h1>
            <span class="meta">{}</span>
        </header>
"#,
        html_escape(record.display_name()),
        html_escape(record.display_name()),
    ));

    // Stat cards
    html.push_str(&format!(
        r#"        <div class="stats">
            <div class="stat-card">
                <div class="stat-value stat-high">{}</div>
                <div class="stat-label">High</div>
            </div>
            <div class="stat-card">
                <div class="stat-value stat-medium">{}</div>
                <div class="stat-label">Medium</div>
            </div>
            <div class="stat-card">
                <div class="stat-value stat-low">{}</div>
                <div class="stat-label">Low</div>
            </div>
            <div class="stat-card">
                <div class="stat-value">{}</div>
                <div class="stat-label">Total</div>
            </div>
        </div>
"#,
        summary.high, summary.medium, summary.low, summary.total
    ));

    // Scan details
    let started = record
        .created_at
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_default();
    let completed = record
        .completed_at
        .as_deref()
        .map(format_timestamp)
        .unwrap_or_default();
    html.push_str(&format!(
        r#"        <section>
            <h2>Scan Details</h2>
            <dl class="details">
                <dt>URL</dt><dd>{}</dd>
                <dt>Type</dt><dd>{}</dd>
                <dt>Started</dt><dd>{}</dd>
                <dt>Completed</dt><dd>{}</dd>
                <dt>Status</dt><dd>{}</dd>
            </dl>
        </section>
"#,
        html_escape(record.display_url()),
        html_escape(record.display_scan_type()),
        html_escape(&started),
        html_escape(&completed),
        html_escape(record.display_status()),
    ));

    // Vulnerability cards, in server order
    html.push_str(
        r#"        <section>
            <h2>Vulnerabilities</h2>
"#,
    );

    let vulns = record.vulnerabilities();
    if vulns.is_empty() {
        html.push_str(
            r#"            <div class="empty">No vulnerabilities found.</div>
"#,
        );
    } else {
        for vuln in vulns {
            let badge_class = match vuln.severity {
                Severity::High => "badge-high",
                Severity::Medium => "badge-medium",
                Severity::Low => "badge-low",
            };

            html.push_str(&format!(
                r#"            <div class="vuln-card">
                <span class="badge {}">{}</span>
                <div class="vuln-title">{}</div>
"#,
                badge_class,
                vuln.severity.as_str().to_uppercase(),
                html_escape(&vuln.display_kind()),
            ));

            if let Some(package) = &vuln.package {
                let version = vuln
                    .version
                    .as_ref()
                    .map(|v| format!(" ({})", v))
                    .unwrap_or_default();
                html.push_str(&format!(
                    "                <div class=\"vuln-field\">Package: {}{}</div>\n",
                    html_escape(package),
                    html_escape(&version)
                ));
            }
            if let Some(file) = &vuln.file {
                html.push_str(&format!(
                    "                <div class=\"vuln-field\">File: {}</div>\n",
                    html_escape(file)
                ));
            }
            if let Some(header) = &vuln.header {
                html.push_str(&format!(
                    "                <div class=\"vuln-field\">Header: {}</div>\n",
                    html_escape(header)
                ));
            }
            if let Some(description) = &vuln.description {
                html.push_str(&format!(
                    "                <div>{}</div>\n",
                    html_escape(description)
                ));
            }
            if let Some(recommendation) = &vuln.recommendation {
                html.push_str(&format!(
                    "                <div><strong>Recommendation:</strong> {}</div>\n",
                    html_escape(recommendation)
                ));
            }

            html.push_str("            </div>\n");
        }
    }

    html.push_str("        </section>\n");

    // AI summary
    if let Some(ai) = record.summary.as_ref().filter(|ai| !ai.is_empty()) {
        html.push_str(&format!(
            r#"        <section>
            <h2>AI Summary</h2>
            <div class="vuln-card">
                <p>{}</p>
                <p>{}</p>
                <p>{}</p>
                <p class="vuln-field">Risk assessment: {}</p>
            </div>
        </section>
"#,
            html_escape(&ai.overview),
            html_escape(&ai.key_findings),
            html_escape(&ai.recommendations),
            html_escape(&ai.risk_assessment),
        ));
    }

    // Footer
    html.push_str(
        r#"        <footer>
            Generated by surascan
        </footer>
    </div>
</body>
</html>
"#,
    );

    html
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
