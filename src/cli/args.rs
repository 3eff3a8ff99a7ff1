//! CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::DeviceCategory;

/// Autodock - posture-aware default device switcher
#[derive(Parser, Debug)]
#[command(name = "autodock")]
#[command(version)]
#[command(about = "Keeps mic, speakers, and camera in sync with laptop posture")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the switching daemon in the foreground
    Run(RunOptions),
    /// Show daemon posture and current selection
    Status,
    /// List devices and the selection a fresh evaluation would make
    Devices,
    /// Pin a device for a category until cleared
    Override {
        /// Device category to pin
        #[arg(value_enum)]
        category: CategoryArg,
        /// Device display name, exactly as listed
        name: String,
    },
    /// Clear a pinned device
    Clear {
        /// Device category to unpin
        #[arg(value_enum)]
        category: CategoryArg,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Daemon options
#[derive(Args, Debug, Clone)]
pub struct RunOptions {
    /// Show desktop notifications on each switch
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Debounce window for device churn, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 500)]
    pub debounce_ms: u64,

    /// Posture poll interval, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub poll_secs: u64,

    /// Device rescan interval, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 2)]
    pub rescan_secs: u64,
}

/// Device category argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryArg {
    Mic,
    Output,
    Camera,
}

impl From<CategoryArg> for DeviceCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Mic => DeviceCategory::Mic,
            CategoryArg::Output => DeviceCategory::Output,
            CategoryArg::Camera => DeviceCategory::Camera,
        }
    }
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Print the full configuration as JSON
    Show,
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// Set a config value (list keys take comma-separated names)
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Print config file path
    Path,
    /// Restore defaults
    Reset,
}

/// Valid configuration keys
pub const VALID_CONFIG_KEYS: [&str; 10] = [
    "open_mic",
    "open_output",
    "open_camera",
    "closed_mic",
    "closed_output",
    "closed_camera",
    "blocked_mic_keywords",
    "blocked_output_keywords",
    "stream_cam_keyword",
    "allow_builtin_speakers",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
