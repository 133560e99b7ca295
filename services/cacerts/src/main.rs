mod app_command;

use self::app_command::{AppCommand, Command};
use anyhow::Error as AnyError;
use clap::Parser;
use shine_truststore::{config::TrustStoreConfig, CertificateExport, TrustStoreExporter};
use std::{
    fs,
    io::{self, Write},
};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // stdout is reserved for the exported data
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("[WARN] Failed to set up logging: {err}");
    }
}

fn run(command: AppCommand) -> Result<(), AnyError> {
    let config = TrustStoreConfig::load(command.config.as_deref())?;
    let exporter = TrustStoreExporter::from_config(&config);

    match command.command {
        Command::Pem { output } => {
            let export = exporter.export_trusted_certificates();
            if let CertificateExport::Empty(reason) = &export {
                log::warn!("No certificates were exported: {reason}");
            }

            match output {
                Some(path) => {
                    log::info!("Writing {} certificates to {}", export.len(), path.display());
                    fs::write(&path, export.as_bytes())?;
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(export.as_bytes())?;
                    stdout.flush()?;
                }
            }
        }
        Command::Path => {
            let path = exporter.export_trust_store_path();
            if path.is_fallback() {
                log::info!("Trust store location is a best guess");
            }
            println!("{path}");
        }
    }

    Ok(())
}

pub fn main() {
    let command = AppCommand::parse();
    init_logging();

    if let Err(err) = run(command) {
        eprintln!("[ERROR] {}", err);
        if err.chain().nth(1).is_some() {
            eprintln!();
            eprintln!("Caused by:");
            for (i, e) in err.chain().skip(1).enumerate() {
                eprintln!("   {}: {}", i, e);
            }
        }
        std::process::exit(1);
    }
}
