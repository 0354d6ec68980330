//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Sysfs-based AMD GPU fan control
///
/// Keeps AMD GPUs inside a safe thermal envelope by ramping fan speed
/// gradually, without oscillation or abrupt jumps. Runs the control
/// loop when invoked without a subcommand.
#[derive(Parser, Debug)]
#[command(name = "amdfanctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "AMDFANCTL_CONFIG")]
    pub config: Option<String>,

    /// Target card by index (0-based)
    #[arg(long, global = true)]
    pub card: Option<u32>,

    /// Dry run mode - don't actually apply changes
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all detected AMD cards
    List,

    /// Show a one-shot temperature and fan snapshot per card
    Status,

    /// Control fan settings
    Fan(FanArgs),

    /// Read auxiliary telemetry values
    Telemetry(TelemetryArgs),

    /// Start the control loop daemon
    Control(ControlArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for fan control commands
#[derive(Parser, Debug)]
pub struct FanArgs {
    #[command(subcommand)]
    pub command: FanCommands,
}

/// Fan subcommands
#[derive(Subcommand, Debug)]
pub enum FanCommands {
    /// Set fan speed once (switches the card to manual control)
    Speed {
        /// Fan speed percentage (0-100)
        #[arg(value_parser = parse_percent)]
        percent: f64,
    },

    /// Set fan control mode
    ///
    /// `auto` returns the fan to the hardware's automatic controller;
    /// do this before stopping the daemon for good, or reboot.
    Mode {
        /// Mode to set
        #[arg(value_enum)]
        mode: FanModeArg,
    },
}

/// Fan mode argument
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FanModeArg {
    /// Hardware-controlled fan
    Auto,
    /// Manual fan control
    Manual,
}

/// Arguments for the telemetry command
#[derive(Parser, Debug)]
pub struct TelemetryArgs {
    /// Telemetry keys to read (all displayable keys when omitted)
    pub keys: Vec<String>,
}

/// Arguments for the control loop command
#[derive(Parser, Debug)]
pub struct ControlArgs {
    /// Control loop interval in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Run once and exit (single-use mode)
    #[arg(long)]
    pub single_use: bool,

    /// Minimum effective fan speed percentage
    #[arg(long, value_parser = parse_percent)]
    pub min_speed: Option<f64>,

    /// Temperature below which the fan may wind down to off
    #[arg(long)]
    pub cold: Option<f64>,

    /// Temperature at which the fan is forced to 100%
    #[arg(long)]
    pub hot: Option<f64>,

    /// Fan speed percentage changed per tick
    #[arg(long)]
    pub fan_step: Option<f64>,
}

impl Default for ControlArgs {
    fn default() -> Self {
        Self {
            interval: None,
            single_use: false,
            min_speed: None,
            cold: None,
            hot: None,
            fan_step: None,
        }
    }
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

fn parse_percent(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(format!("{} is not in range 0-100", value));
    }
    Ok(value)
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_list() {
        let args = Cli::try_parse_from(["amdfanctl", "list"]).unwrap();
        assert!(matches!(args.command, Some(Commands::List)));
    }

    #[test]
    fn test_cli_no_subcommand_defaults_to_control() {
        let args = Cli::try_parse_from(["amdfanctl"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_cli_parse_verbose_count() {
        let args = Cli::try_parse_from(["amdfanctl", "-v", "list"]).unwrap();
        assert_eq!(args.verbose, 1);
        let args = Cli::try_parse_from(["amdfanctl", "-vv", "list"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_parse_card_selection() {
        let args = Cli::try_parse_from(["amdfanctl", "--card", "1", "status"]).unwrap();
        assert_eq!(args.card, Some(1));
    }

    #[test]
    fn test_cli_parse_fan_speed() {
        let args = Cli::try_parse_from(["amdfanctl", "fan", "speed", "75"]).unwrap();
        if let Some(Commands::Fan(fan_args)) = args.command {
            if let FanCommands::Speed { percent } = fan_args.command {
                assert_eq!(percent, 75.0);
            } else {
                panic!("Expected Speed command");
            }
        } else {
            panic!("Expected Fan command");
        }
    }

    #[test]
    fn test_cli_fan_speed_validation() {
        // Should fail for > 100
        let result = Cli::try_parse_from(["amdfanctl", "fan", "speed", "150"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_fan_mode() {
        let args = Cli::try_parse_from(["amdfanctl", "fan", "mode", "auto"]).unwrap();
        if let Some(Commands::Fan(fan_args)) = args.command {
            assert!(matches!(
                fan_args.command,
                FanCommands::Mode {
                    mode: FanModeArg::Auto
                }
            ));
        } else {
            panic!("Expected Fan command");
        }
    }

    #[test]
    fn test_cli_parse_control_args() {
        let args = Cli::try_parse_from([
            "amdfanctl",
            "control",
            "--interval",
            "10",
            "--single-use",
            "--min-speed",
            "20",
            "--cold",
            "45",
            "--hot",
            "80",
            "--fan-step",
            "2",
        ])
        .unwrap();

        if let Some(Commands::Control(ctrl)) = args.command {
            assert_eq!(ctrl.interval, Some(10));
            assert!(ctrl.single_use);
            assert_eq!(ctrl.min_speed, Some(20.0));
            assert_eq!(ctrl.cold, Some(45.0));
            assert_eq!(ctrl.hot, Some(80.0));
            assert_eq!(ctrl.fan_step, Some(2.0));
        } else {
            panic!("Expected Control command");
        }
    }

    #[test]
    fn test_cli_parse_telemetry_keys() {
        let args = Cli::try_parse_from(["amdfanctl", "telemetry", "power", "vbios"]).unwrap();
        if let Some(Commands::Telemetry(telemetry)) = args.command {
            assert_eq!(telemetry.keys, vec!["power", "vbios"]);
        } else {
            panic!("Expected Telemetry command");
        }
    }
}
