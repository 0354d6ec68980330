//! amdfanctl - sysfs-based AMD GPU fan control
//!
//! A command-line tool that reads GPU temperatures through sysfs and
//! ramps fan speed gradually to hold a safe thermal envelope. Running
//! without a subcommand starts the control loop.

use amdfanctl::cli::args::{generate_completions, Cli, Commands, ControlArgs};
use amdfanctl::commands::{run_control, run_fan, run_list, run_status, run_telemetry};
use amdfanctl::error::{AppError, FanControlError, RegistryError, SysfsWriteError};
use clap::Parser;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; -v raises to info, -vv to debug
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Some(Commands::List) => run_list(cli.format, cli.card),

        Some(Commands::Status) => run_status(cli.format, cli.card),

        Some(Commands::Fan(args)) => run_fan(args, cli.format, cli.card, cli.dry_run),

        Some(Commands::Telemetry(args)) => run_telemetry(args, cli.format, cli.card),

        Some(Commands::Control(args)) => {
            run_control(args, cli.config.as_deref(), cli.card, cli.dry_run)
        }

        Some(Commands::Completions { shell }) => {
            generate_completions(*shell);
            Ok(())
        }

        // The bare invocation is the daemon.
        None => run_control(
            &ControlArgs::default(),
            cli.config.as_deref(),
            cli.card,
            cli.dry_run,
        ),
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Registry(RegistryError::ClassMissing(_)) => {
            eprintln!();
            eprintln!("Hint: Make sure the amdgpu driver is loaded.");
            eprintln!("      Check that /sys/class/drm contains card entries.");
        }
        AppError::SysfsWrite(SysfsWriteError::Io { source, .. })
        | AppError::FanControl(FanControlError::Write(SysfsWriteError::Io { source, .. }))
            if source.kind() == std::io::ErrorKind::PermissionDenied =>
        {
            eprintln!();
            eprintln!("Hint: Writing sysfs control files requires root.");
            eprintln!("      Try running with sudo.");
        }
        AppError::CardNotFound(_) => {
            eprintln!();
            eprintln!("Hint: Use 'amdfanctl list' to see detected cards.");
        }
        _ => {}
    }
}
