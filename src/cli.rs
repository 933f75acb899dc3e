use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Settings file path (default: settings.yaml)
    #[arg(short, long, env = "PROXMOX_CONFIG")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Retrieve Proxmox users
    #[arg(long, default_value_t = false)]
    pub users: bool,

    /// List all nodes
    #[arg(long, default_value_t = false)]
    pub nodes: bool,

    /// Retrieve network information of the target node
    #[arg(long, default_value_t = false)]
    pub network_info: bool,

    /// List ISO images on the configured storage
    #[arg(long, default_value_t = false)]
    pub isos: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// The shell to generate the script for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// The report a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Vms,
    Users,
    Nodes,
    NetworkInfo,
    Isos,
}

impl Args {
    /// Whether any flag was given at all; without one only the help is printed.
    pub fn has_flags(&self) -> bool {
        self.debug || self.users || self.nodes || self.network_info || self.isos
    }

    /// First set mode flag wins; VM listing when none is set.
    pub fn mode(&self) -> Mode {
        if self.users {
            Mode::Users
        } else if self.nodes {
            Mode::Nodes
        } else if self.network_info {
            Mode::NetworkInfo
        } else if self.isos {
            Mode::Isos
        } else {
            Mode::Vms
        }
    }
}
