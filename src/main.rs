use std::{io::Write, process};

use clap::{CommandFactory, Parser};
use sendemail::{version_details, Config, Error, Stopwatch};
use tracing::{event, Level};
use tracing_subscriber::{prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CMD_LINE_ERROR: i32 = 2;

/// A Command Line Interface (CLI) program to send email.
///
/// If a program argument is a file path and the file exists, the file lines
/// will be used with leading and trailing white space removed. When supplying
/// multiple email addresses for an argument, a comma should be used to
/// separate them. Arguments with spaces should be enclosed in double quotes.
#[derive(Debug, Parser)]
#[command(name = env!("CARGO_PKG_NAME"), disable_version_flag = true)]
struct Cli {
    /// Body of email. All lines from file used if file path provided.
    #[arg(short, long, help_heading = "Mandatory arguments")]
    body: Option<String>,

    /// Email sender (source/from). Only first line of file used if file path provided.
    #[arg(short, long, help_heading = "Mandatory arguments")]
    from: Option<String>,

    /// Name of SMTP host used to send email. Only first line of file used if file path provided.
    #[arg(
        short = 'H',
        long = "smtp_host",
        visible_alias = "smtp-host",
        env = "SMTP_HOST",
        help_heading = "Mandatory arguments"
    )]
    smtp_host: Option<String>,

    /// Subject of email. Only first line of file used if file path provided.
    #[arg(short, long, help_heading = "Mandatory arguments")]
    subject: Option<String>,

    /// Recipient(s) of email (destination). One email address per line if file path provided.
    #[arg(short, long, help_heading = "Mandatory arguments")]
    to: Option<String>,

    /// Recipient(s) to be Carbon Copied (CC). One email address per line if file path provided.
    #[arg(short, long)]
    cc: Option<String>,

    /// Increase verbosity to help debugging.
    #[arg(short, long)]
    debug: bool,

    /// Print to standard output the programs execution duration.
    #[arg(short = 'D', long)]
    duration: bool,

    /// Print the version number to the standard output. This version number
    /// should be included in all bug reports.
    #[arg(short = 'V', long)]
    version: bool,
}

impl Cli {
    /// the configuration, if every mandatory argument was supplied
    fn into_config(self) -> Option<Config> {
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());

        Some(Config {
            from: present(self.from)?,
            to: present(self.to)?,
            subject: present(self.subject)?,
            body: present(self.body)?,
            smtp_host: present(self.smtp_host)?,
            cc: present(self.cc),
            bcc: None,
            debug: self.debug,
            duration: self.duration,
        })
    }
}

fn init_logging(debug: bool) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "sendemail=warn".into());
    let filter = if debug {
        format!("{filter},sendemail=debug,lettre=debug")
    } else {
        filter
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// print the help text for a missing mandatory argument
fn print_usage(out: &mut impl Write) -> i32 {
    if let Err(e) = Cli::command().write_help(out) {
        event!(Level::ERROR, "could not print usage: {e}");
    }

    EXIT_CMD_LINE_ERROR
}

fn main() {
    let stopwatch = Stopwatch::start();
    let cli = Cli::parse();

    if cli.version {
        println!("{}", version_details(env!("CARGO_PKG_NAME")));
        process::exit(EXIT_SUCCESS);
    }

    init_logging(cli.debug);

    let Some(config) = cli.into_config() else {
        process::exit(print_usage(&mut std::io::stdout()));
    };

    let exit_code = match sendemail::run(&config) {
        Err(e) => {
            event!(Level::ERROR, "{}: {e}", e.kind());
            Error::EXIT_GENERAL_ERROR
        }
        Ok(()) => {
            if config.duration {
                println!("{}", stopwatch.report());
            }
            EXIT_SUCCESS
        }
    };

    process::exit(exit_code);
}
