use std::path::PathBuf;

use classmail::config::Config;
use classmail::error::Error;
use classmail::mailbox::ImapMailbox;
use classmail::roster;
use classmail::sorter::{Outcome, Sorter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config_path: PathBuf = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => {
            eprintln!("Usage: classmail <config.json>");
            std::process::exit(2);
        }
    };

    let config = Config::load(&config_path)?;
    let roster = roster::load_dir(&config.roster_dir)?;

    eprintln!("📬 classmail v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   IMAP: {}:{} as {}",
        config.imap.host, config.imap.port, config.imap.user
    );
    eprintln!(
        "   Roster: {} students from {}",
        roster.len(),
        config.roster_dir.display()
    );
    eprintln!("   Class folders under: {}\n", config.folder_prefix);

    // The IMAP client is blocking; the whole pass runs as a single blocking
    // task, one message at a time.
    let reports = tokio::task::spawn_blocking(move || -> Result<_, Error> {
        let mut mailbox = ImapMailbox::connect(&config.imap)?;
        let sorter = Sorter::new(&roster, &config.folder_prefix);
        let reports = sorter.run(&mut mailbox)?;
        mailbox.logout();
        Ok(reports)
    })
    .await??;

    let moved = reports
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::Moved { .. }))
        .count();
    eprintln!("\n   {} messages processed, {} moved", reports.len(), moved);

    Ok(())
}
