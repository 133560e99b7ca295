use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Export the trusted root certificates of this host.
#[derive(Debug, Parser)]
#[command(name = "shine-cacerts", version, about)]
pub struct AppCommand {
    /// Trust store configuration file (json, toml or yaml)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the trusted certificates as concatenated PEM blocks. The output is empty when the trust store is not
    /// available.
    Pem {
        /// Output file, stdout by default
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the location of the trust store
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use shine_test::test;

    #[test]
    fn test_pem_command() {
        let cmd = AppCommand::try_parse_from(["shine-cacerts", "pem", "--output", "roots.pem"]).unwrap();
        assert_eq!(cmd.config, None);
        match cmd.command {
            Command::Pem { output } => assert_eq!(output, Some(PathBuf::from("roots.pem"))),
            cmd => panic!("unexpected command: {cmd:?}"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cmd = AppCommand::try_parse_from(["shine-cacerts", "path", "--config", "cacerts.json"]).unwrap();
        assert_eq!(cmd.config, Some(PathBuf::from("cacerts.json")));
        assert!(matches!(cmd.command, Command::Path));
    }

    #[test]
    fn test_missing_command() {
        assert!(AppCommand::try_parse_from(["shine-cacerts"]).is_err());
    }
}
