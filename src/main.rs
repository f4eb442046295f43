use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use surascan::{
    api::ApiClient,
    config::Config,
    controller::{AuthController, ScanController, ScanOutcome},
    model::{ScanRecord, ScanRequest, ScanType},
    notify::ConsoleNotifier,
    output::{print_record, render_record, OutputFormat},
    session::SessionStore,
};

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
    pub const HIGH_VULN: u8 = 2;
    pub const MEDIUM_VULN: u8 = 3;
    pub const LOW_VULN: u8 = 4;
}

#[derive(Parser)]
#[command(name = "surascan")]
#[command(
    author,
    version,
    about = "Submit security scans to a Surakshate server and render the results"
)]
struct Cli {
    /// Server base URL (overrides the config file)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a scan and poll it to completion
    Scan {
        /// Target to scan (repository or website URL)
        #[arg(short, long)]
        url: String,

        /// Optional display name for the scan
        #[arg(short, long)]
        name: Option<String>,

        /// Scan type (repository, website)
        #[arg(short = 't', long, default_value = "repository")]
        scan_type: String,

        /// Output format (table, json, html)
        #[arg(short, long)]
        format: Option<String>,

        /// Write rendered results to file
        #[arg(short, long)]
        output: Option<String>,

        /// Download the server-rendered report to this file afterwards
        #[arg(long)]
        report: Option<String>,

        /// Exit with an error if vulnerabilities at or above this severity are found
        #[arg(long, value_enum)]
        fail_on: Option<FailLevel>,
    },

    /// Run the demo scan (falls back to canned offline results)
    Demo {
        /// Scan type (repository, website)
        #[arg(short = 't', long, default_value = "website")]
        scan_type: String,

        /// Output format (table, json, html)
        #[arg(short, long)]
        format: Option<String>,

        /// Write rendered results to file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Download the server-rendered report for a scan job
    Report {
        /// Job id of a submitted scan
        job_id: String,

        /// Destination file (defaults to report-<job_id>.pdf)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Log in to the scan server
    Login { email: String, password: String },

    /// Create an account on the scan server
    Signup { email: String, password: String },

    /// End the current session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FailLevel {
    High,
    Medium,
    Low,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();
    let server_url = cli.server.unwrap_or_else(|| config.server_url.clone());

    match cli.command {
        Commands::Scan {
            url,
            name,
            scan_type,
            format,
            output,
            report,
            fail_on,
        } => {
            let scan_type = parse_scan_type(&scan_type)?;
            let format = parse_format(format, &config)?;

            let client = Arc::new(ApiClient::new(server_url.as_str())?);
            let notifier = Arc::new(ConsoleNotifier::new());
            let mut controller = ScanController::new(client.clone(), notifier)
                .with_poll_settings(
                    Duration::from_millis(config.poll_interval_ms),
                    Duration::from_secs(config.poll_timeout_secs),
                );

            let mut request = ScanRequest::new(url, scan_type);
            if let Some(name) = name {
                request = request.with_name(name);
            }

            let outcome = match controller.submit(&request).await {
                Ok(outcome) => outcome,
                // The failure notice has already been shown.
                Err(_) => return Ok(exit_codes::ERROR),
            };

            render_outcome(&outcome, format, output.as_deref())?;

            if let Some(path) = report {
                if controller.report_url().is_ok() {
                    if let Some(job_id) = controller.current_job() {
                        let bytes = client.fetch_report(job_id).await?;
                        std::fs::write(&path, bytes)?;
                        println!("Report saved to: {}", path);
                    }
                }
            }

            Ok(match &outcome {
                ScanOutcome::Completed(record) | ScanOutcome::Offline(record) => {
                    determine_exit_code(record, fail_on)
                }
                ScanOutcome::Failed(_) | ScanOutcome::TimedOut | ScanOutcome::Cancelled => {
                    exit_codes::ERROR
                }
            })
        }

        Commands::Demo {
            scan_type,
            format,
            output,
        } => {
            let scan_type = parse_scan_type(&scan_type)?;
            let format = parse_format(format, &config)?;

            let client = Arc::new(ApiClient::new(server_url.as_str())?);
            let notifier = Arc::new(ConsoleNotifier::new());
            let mut controller = ScanController::new(client, notifier).with_poll_settings(
                Duration::from_millis(config.poll_interval_ms),
                Duration::from_secs(config.poll_timeout_secs),
            );

            let outcome = controller.demo(scan_type).await?;
            render_outcome(&outcome, format, output.as_deref())?;

            Ok(match outcome {
                ScanOutcome::Failed(_) | ScanOutcome::TimedOut | ScanOutcome::Cancelled => {
                    exit_codes::ERROR
                }
                _ => exit_codes::SUCCESS,
            })
        }

        Commands::Report { job_id, output } => {
            let client = ApiClient::new(server_url.as_str())?;
            let bytes = client.fetch_report(&job_id).await?;
            let path = output.unwrap_or_else(|| format!("report-{}.pdf", job_id));
            std::fs::write(&path, bytes)?;
            println!("Report saved to: {}", path);
            Ok(exit_codes::SUCCESS)
        }

        Commands::Login { email, password } => {
            let mut controller = auth_controller(&server_url, &config)?;
            match controller.login(&email, &password).await {
                Ok(redirect) => {
                    println!("Continue at: {}", redirect.destination);
                    Ok(exit_codes::SUCCESS)
                }
                Err(_) => Ok(exit_codes::ERROR),
            }
        }

        Commands::Signup { email, password } => {
            let mut controller = auth_controller(&server_url, &config)?;
            match controller.signup(&email, &password).await {
                Ok(redirect) => {
                    println!("Continue at: {}", redirect.destination);
                    Ok(exit_codes::SUCCESS)
                }
                Err(_) => Ok(exit_codes::ERROR),
            }
        }

        Commands::Logout => {
            let mut controller = auth_controller(&server_url, &config)?;
            match controller.logout().await {
                Ok(redirect) => {
                    println!("Continue at: {}", redirect.destination);
                    Ok(exit_codes::SUCCESS)
                }
                Err(_) => Ok(exit_codes::ERROR),
            }
        }

        Commands::Whoami => {
            let mut controller = auth_controller(&server_url, &config)?;
            match controller.check_status().await.email() {
                Some(email) => println!("Logged in as {}", email),
                None => println!("Not logged in."),
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn auth_controller(server_url: &str, config: &Config) -> Result<AuthController> {
    let client = Arc::new(ApiClient::new(server_url)?);
    let notifier = Arc::new(ConsoleNotifier::new());
    Ok(AuthController::new(
        client,
        notifier,
        SessionStore::new(),
        config.offline_auth,
    ))
}

fn render_outcome(outcome: &ScanOutcome, format: OutputFormat, output: Option<&str>) -> Result<()> {
    let record = match outcome.record() {
        Some(record) => record,
        // Timed-out and cancelled scans have nothing to render.
        None => return Ok(()),
    };

    match output {
        Some(path) => {
            let rendered = render_record(record, format)?;
            std::fs::write(path, rendered)?;
            println!("Results written to: {}", path);
        }
        None => print_record(record, format)?,
    }
    Ok(())
}

/// Determine the exit code based on resolved severity counts and --fail-on
fn determine_exit_code(record: &ScanRecord, fail_on: Option<FailLevel>) -> u8 {
    let fail_on = match fail_on {
        Some(level) => level,
        None => return exit_codes::SUCCESS,
    };

    let summary = record.severity_summary();
    let has_high = summary.high > 0;
    let has_medium = summary.medium > 0;
    let has_low = summary.low > 0;

    match fail_on {
        FailLevel::High => {
            if has_high {
                exit_codes::HIGH_VULN
            } else {
                exit_codes::SUCCESS
            }
        }
        FailLevel::Medium => {
            if has_high {
                exit_codes::HIGH_VULN
            } else if has_medium {
                exit_codes::MEDIUM_VULN
            } else {
                exit_codes::SUCCESS
            }
        }
        FailLevel::Low => {
            if has_high {
                exit_codes::HIGH_VULN
            } else if has_medium {
                exit_codes::MEDIUM_VULN
            } else if has_low {
                exit_codes::LOW_VULN
            } else {
                exit_codes::SUCCESS
            }
        }
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'surascan config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}

fn parse_scan_type(s: &str) -> Result<ScanType> {
    match s.to_lowercase().as_str() {
        "repository" | "repo" => Ok(ScanType::Repository),
        "website" | "site" => Ok(ScanType::Website),
        _ => Err(anyhow::anyhow!(
            "Unknown scan type: {}. Use: repository, website",
            s
        )),
    }
}

fn parse_format(flag: Option<String>, config: &Config) -> Result<OutputFormat> {
    let raw = flag.unwrap_or_else(|| config.default_format.clone());
    OutputFormat::from_str(&raw).map_err(|e| anyhow::anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use surascan::demo;

    #[test]
    fn test_parse_scan_type() {
        assert_eq!(parse_scan_type("repository").unwrap(), ScanType::Repository);
        assert_eq!(parse_scan_type("REPO").unwrap(), ScanType::Repository);
        assert_eq!(parse_scan_type("website").unwrap(), ScanType::Website);
        assert!(parse_scan_type("container").is_err());
    }

    #[test]
    fn test_determine_exit_code_thresholds() {
        // website demo fixture: 1 high, 1 medium, 0 low
        let record = demo::offline_record(ScanType::Website);

        assert_eq!(determine_exit_code(&record, None), exit_codes::SUCCESS);
        assert_eq!(
            determine_exit_code(&record, Some(FailLevel::High)),
            exit_codes::HIGH_VULN
        );
        assert_eq!(
            determine_exit_code(&record, Some(FailLevel::Low)),
            exit_codes::HIGH_VULN
        );

        let clean: ScanRecord = serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
        assert_eq!(
            determine_exit_code(&clean, Some(FailLevel::Low)),
            exit_codes::SUCCESS
        );
    }
}
