//! s3manager - manage buckets and objects in S3-compatible storage
//!
//! Upload, download and delete files, empty buckets and delete buckets.
//! Every operation checks the remote state before and after acting.

mod commands;
mod exit_code;
mod output;

use clap::{CommandFactory, Parser};
use s3m_core::{DEFAULT_CREDENTIAL_PATH, DEFAULT_PROFILE, ObjectLookup};
use tracing_subscriber::EnvFilter;

use crate::commands::{Commands, GlobalOptions};
use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

/// Amazon S3 manager
#[derive(Parser, Debug)]
#[command(name = "s3manager", version, about, long_about = None)]
pub struct Cli {
    /// Credential file containing the profile section
    #[arg(
        short = 'c',
        long = "credential",
        value_name = "PATH",
        global = true,
        env = "AWS_SHARED_CREDENTIALS_FILE",
        default_value = DEFAULT_CREDENTIAL_PATH
    )]
    pub credential: String,

    /// Profile section to read from the credential file
    #[arg(
        short = 'p',
        long,
        value_name = "NAME",
        global = true,
        env = "AWS_PROFILE",
        default_value = DEFAULT_PROFILE
    )]
    pub profile: String,

    /// Check object existence with a HEAD request instead of listing the bucket
    #[arg(long, global = true)]
    pub head_lookup: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress everything except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            credential: self.credential.clone(),
            profile: self.profile.clone(),
            lookup: if self.head_lookup {
                ObjectLookup::Head
            } else {
                ObjectLookup::Listing
            },
            output: OutputConfig {
                no_color: self.no_color,
                quiet: self.quiet,
            },
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let options = cli.global_options();
    let Some(command) = cli.command else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("{e}");
        }
        println!();
        return ExitCode::Success.into();
    };

    commands::execute(command, options).await.into()
}

/// Install the tracing subscriber; `RUST_LOG` takes precedence over `--debug`
fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("warn,s3manager=debug,s3m_core=debug,s3m_s3=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from([
            "s3manager",
            "upload",
            "-f",
            "demo",
            "docs/a.txt",
            "/tmp/a.txt",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Upload(args)) => {
                assert!(args.force);
                assert_eq!(args.bucket_name, "demo");
                assert_eq!(args.bucket_file, "docs/a.txt");
                assert_eq!(args.host_file.to_str(), Some("/tmp/a.txt"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "s3manager",
            "delete-bucket",
            "demo",
            "-c",
            "/etc/s3/credentials",
            "--profile",
            "minio",
            "--head-lookup",
            "--no-color",
        ])
        .unwrap();

        let options = cli.global_options();
        assert_eq!(options.credential, "/etc/s3/credentials");
        assert_eq!(options.profile, "minio");
        assert_eq!(options.lookup, ObjectLookup::Head);
        assert!(options.output.no_color);
        assert!(!options.output.quiet);

        match cli.command {
            Some(Commands::DeleteBucket(args)) => {
                assert!(!args.force);
                assert_eq!(args.bucket_name, "demo");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_delete_commands() {
        let cli = Cli::try_parse_from(["s3manager", "delete-file", "demo", "a.txt"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::DeleteFile(_))));

        let cli = Cli::try_parse_from(["s3manager", "delete-all-files", "demo"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::DeleteAllFiles(_))));

        let cli = Cli::try_parse_from(["s3manager", "delete-bucket", "-f", "demo"]).unwrap();
        match cli.command {
            Some(Commands::DeleteBucket(args)) => assert!(args.force),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["s3manager"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_rejects_empty_names() {
        assert!(Cli::try_parse_from(["s3manager", "delete-bucket", ""]).is_err());
        assert!(Cli::try_parse_from(["s3manager", "delete-file", "demo", ""]).is_err());
        assert!(Cli::try_parse_from(["s3manager", "upload", "demo", "a.txt"]).is_err());
    }
}
