//! SOFIPO-WATCH — CONDUSEF credit-portfolio monitor.
//!
//! Entry point for one scheduled run. Loads configuration, initialises
//! structured logging, restores the cursor from disk (or starts from the
//! default), scans forward for newly published periods, and on a find
//! sends the alert and advances the cursor.
//!
//! Exit status is a scheduler signal, not an error code: 0 means nothing
//! new, 1 means new data was found and processed.

use anyhow::Result;
use std::process::ExitCode;
use tracing::{error, info, warn};

use sofipo_watch::config::AppConfig;
use sofipo_watch::fetch::CondusefClient;
use sofipo_watch::notify::Mailer;
use sofipo_watch::storage;
use sofipo_watch::types::{Cursor, Period};
use sofipo_watch::{report, scan};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    info!(
        source = %cfg.source.url,
        entities = cfg.entities.len(),
        "SOFIPO watch starting"
    );

    let cursor = storage::load_cursor(&cfg.state.cursor_file)?;
    let current = Period::current();
    info!(last_known = %cursor.period(), current = %current, "Scan window");

    let client = CondusefClient::new(cfg.source.clone(), cfg.entities.clone())?;
    let scanner = scan::Scanner::new(&client);
    let outcome = scanner.run(cursor, current).await;

    if outcome.is_empty() {
        info!("No new data. Everything up to date.");
        return Ok(ExitCode::SUCCESS);
    }

    info!(
        periods = outcome.periods.len(),
        labels = %outcome.period_labels(),
        "New period(s) found"
    );

    let subject = report::subject(&outcome);
    let html = report::render_html(&outcome);

    match Mailer::from_env(&cfg.alerts) {
        Some(mailer) => {
            if let Err(e) = mailer.send(&subject, &html).await {
                // Delivery failure is non-fatal: the data was retrieved, so
                // the cursor still advances. An operator can resend from
                // the logged report.
                error!(error = %e, labels = %outcome.period_labels(), "Failed to send alert email");
                println!("{}", report::render_text(&outcome));
            }
        }
        None => {
            warn!("Email credentials not set, printing report to stdout");
            println!("{}", report::render_text(&outcome));
        }
    }

    // Persist last: the cursor only moves once the periods are both
    // confirmed and reported (or reporting was at least attempted).
    if let Some(latest) = outcome.latest_period() {
        storage::save_cursor(&cfg.state.cursor_file, &Cursor::from_period(latest))?;
        info!(cursor = %latest, "Cursor advanced");
    }

    Ok(ExitCode::from(1))
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sofipo_watch=info"));

    let json_logging = std::env::var("SOFIPO_WATCH_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
