//! appdesk - add or remove desktop integration for an AppImage.
//!
//! Usage: `appdesk <path-to-appimage> [--remove]`

mod prompt;

use anyhow::Result;
use appdesk_core::config::PathsConfig;
use appdesk_core::{AppdeskError, InstallReport, Integrator, Layout, RemoveReport};
use clap::Parser;
use prompt::TerminalPrompter;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "appdesk")]
#[command(about = "Add or remove desktop integration for an AppImage")]
struct Args {
    /// Path to the AppImage
    appimage: PathBuf,

    /// Remove the integration instead of creating it
    #[arg(long)]
    remove: bool,

    /// Directory that receives the command symlink
    #[arg(long, default_value = PathsConfig::BIN_DIR)]
    bin_dir: PathBuf,

    /// Never escalate with sudo; fail instead
    #[arg(long)]
    no_sudo: bool,

    /// Log each step
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.debug {
        Level::DEBUG
    } else if args.verbose {
        Level::INFO
    } else {
        Level::WARN
    };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = match err.downcast_ref::<AppdeskError>() {
                Some(AppdeskError::UserAborted) => {
                    eprintln!("Aborted by user.");
                    130
                }
                Some(AppdeskError::ExtractionFailed { output, .. }) => {
                    eprintln!("Error: {}", err);
                    if !output.is_empty() {
                        eprintln!("{}", output);
                    }
                    4
                }
                Some(app_err) => {
                    eprintln!("Error: {}", err);
                    app_err.exit_code()
                }
                None => {
                    eprintln!("Error: {:#}", err);
                    1
                }
            };
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let layout = Layout::detect()?
        .with_bin_dir(&args.bin_dir)
        .with_sudo(!args.no_sudo);
    let integrator = Integrator::new(layout);
    debug!("Using layout {:?}", integrator.layout());

    if args.remove {
        let report = integrator.remove(&args.appimage)?;
        print_remove_report(&report);
    } else {
        let mut prompter = TerminalPrompter;
        let report = integrator.install(&args.appimage, &mut prompter)?;
        print_install_report(&report);
    }

    Ok(())
}

fn print_install_report(report: &InstallReport) {
    println!("Icon installed: {}", report.icon_path.display());
    println!("Desktop entry created: {}", report.desktop_entry_path.display());
    println!(
        "Run '{}' or pick {} from the {} menu.",
        report.command_name, report.app_name, report.category
    );
}

fn print_remove_report(report: &RemoveReport) {
    if let Some(ref link) = report.symlink {
        println!("Symlink removed: {}", link.display());
    }
    for failure in &report.failures {
        eprintln!("Warning: {}", failure);
    }
    println!("Desktop entry and icon removed for {}.", report.app_name);
}
