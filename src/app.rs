use crate::cli::{Args, Commands, Mode};
use crate::proxmox::ProxmoxClient;
use crate::report;
use crate::settings::{ConnectionProfile, Settings, DEFAULT_SETTINGS_FILE};
use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::generate;
use log::debug;
use std::io::Write;

/// A mode together with the settings it depends on.
#[derive(Debug, PartialEq, Eq)]
enum Report<'a> {
    Vms,
    Users,
    Nodes,
    Network { node: &'a str },
    Isos { node: &'a str, storage: &'a str },
}

impl<'a> Report<'a> {
    fn prepare(mode: Mode, profile: &'a ConnectionProfile) -> Result<Self> {
        Ok(match mode {
            Mode::Vms => Report::Vms,
            Mode::Users => Report::Users,
            Mode::Nodes => Report::Nodes,
            Mode::NetworkInfo => Report::Network {
                node: profile.target_node()?,
            },
            Mode::Isos => Report::Isos {
                node: profile.target_node()?,
                storage: profile.storage()?,
            },
        })
    }
}

/// Runs the invocation described by `args`, writing the report to `out`.
///
/// Without any flag only the help text is written; settings are not read
/// and no connection is made.
pub async fn run<F, W>(args: &Args, env: F, out: &mut W) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    if let Some(Commands::Completions { shell }) = &args.command {
        let mut cmd = Args::command();
        generate(*shell, &mut cmd, env!("CARGO_PKG_NAME"), out);
        return Ok(());
    }

    if !args.has_flags() {
        writeln!(out, "{}", Args::command().render_help())?;
        return Ok(());
    }

    let path = args.config.as_deref().unwrap_or(DEFAULT_SETTINGS_FILE);
    debug!("Loading settings from {}", path);
    let profile = Settings::load(path, env)
        .with_context(|| format!("Failed to load configuration from {}", path))?
        .resolve()
        .context("Configuration error")?;

    execute(args.mode(), &profile, out).await
}

/// Connects with `profile` and produces the report for `mode`.
pub async fn execute<W: Write>(mode: Mode, profile: &ConnectionProfile, out: &mut W) -> Result<()> {
    // Checked before connecting so a missing setting never costs a request.
    let report = Report::prepare(mode, profile)?;
    debug!("Selected report: {:?}", report);

    let client = ProxmoxClient::connect(profile).await?;

    match report {
        Report::Vms => report::list_vms(&client, out).await,
        Report::Users => report::list_users(&client, out).await,
        Report::Nodes => report::list_nodes(&client, out).await,
        Report::Network { node } => report::list_network(&client, node, out).await,
        Report::Isos { node, storage } => report::list_isos(&client, node, storage, out).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Credentials;

    fn profile(target_node: Option<&str>, storage: Option<&str>) -> ConnectionProfile {
        ConnectionProfile {
            host: "pve.local".into(),
            user: "root@pam".into(),
            credentials: Credentials::Password("x".into()),
            verify_ssl: false,
            port: 8006,
            target_node: target_node.map(Into::into),
            storage: storage.map(Into::into),
        }
    }

    #[test]
    fn test_prepare_requires_target_node() {
        let p = profile(None, Some("local"));
        assert!(Report::prepare(Mode::NetworkInfo, &p).is_err());
        assert!(Report::prepare(Mode::Isos, &p).is_err());
        assert_eq!(Report::prepare(Mode::Nodes, &p).unwrap(), Report::Nodes);
    }

    #[test]
    fn test_prepare_requires_storage() {
        let p = profile(Some("pve1"), None);
        assert_eq!(
            Report::prepare(Mode::NetworkInfo, &p).unwrap(),
            Report::Network { node: "pve1" }
        );
        assert!(Report::prepare(Mode::Isos, &p).is_err());

        let p = profile(Some("pve1"), Some("local"));
        assert_eq!(
            Report::prepare(Mode::Isos, &p).unwrap(),
            Report::Isos {
                node: "pve1",
                storage: "local"
            }
        );
    }
}
