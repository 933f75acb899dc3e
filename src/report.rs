//! Report handlers: each fetches one kind of resource and prints it.
//!
//! The `render_*` functions only format already-fetched records, the `list_*`
//! functions drive the client and stream the result to `out`.

use crate::proxmox::models::{
    ApiData, IsoEntry, NetworkInterface, NodeSummary, UserRecord, VmSummary,
};
use crate::proxmox::ProxmoxClient;
use anyhow::{Context, Result};
use log::{debug, error, info};
use std::fmt::Display;
use std::io::{self, Write};

pub const DIVIDER: &str = "--------------------";
const NOT_AVAILABLE: &str = "N/A";

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

pub fn render_vms<W: Write>(vms: &[VmSummary], out: &mut W) -> io::Result<()> {
    for vm in vms {
        writeln!(
            out,
            "{}. {} => {}",
            vm.vmid,
            vm.name.as_deref().unwrap_or(NOT_AVAILABLE),
            vm.status
        )?;
    }
    Ok(())
}

pub fn render_users<W: Write>(users: &[UserRecord], out: &mut W) -> io::Result<()> {
    for user in users {
        writeln!(out, "User ID: {}", user.userid)?;
        writeln!(out, "Email: {}", or_na(user.email.as_deref()))?;
        writeln!(out, "Realm Type: {}", or_na(user.realm_type.as_deref()))?;
        // Printed the way the API reports it.
        writeln!(out, "Enable: {}", or_na(user.enable.map(u8::from)))?;
        writeln!(out, "Expire: {}", or_na(user.expire))?;
        writeln!(out, "{}", DIVIDER)?;
    }
    Ok(())
}

pub fn render_nodes<W: Write>(nodes: &[NodeSummary], out: &mut W) -> io::Result<()> {
    if nodes.is_empty() {
        return writeln!(out, "No nodes found.");
    }
    for node in nodes {
        writeln!(out, "{}", node.node)?;
        writeln!(out, "{}", DIVIDER)?;
    }
    Ok(())
}

pub fn render_network<W: Write>(interfaces: &[NetworkInterface], out: &mut W) -> io::Result<()> {
    for iface in interfaces {
        writeln!(out, "Network Information:")?;
        for (key, value) in &iface.0 {
            writeln!(out, "{}: {}", key, value)?;
        }
        writeln!(out, "{}", DIVIDER)?;
    }
    Ok(())
}

pub fn render_isos<W: Write>(isos: &[IsoEntry], out: &mut W) -> io::Result<()> {
    for iso in isos {
        writeln!(out, "{}", iso.volid)?;
    }
    Ok(())
}

/// Prints every QEMU guest of every node, in API order.
pub async fn list_vms<W: Write>(client: &ProxmoxClient, out: &mut W) -> Result<()> {
    debug!("Retrieving nodes and their associated virtual machines...");
    let nodes = client.get_nodes().await.context("Failed to list nodes")?;

    for node in &nodes {
        let vms = client
            .get_vms(&node.node)
            .await
            .with_context(|| format!("Failed to list VMs on node {}", node.node))?;
        render_vms(&vms, out)?;
    }

    info!("Nodes and their associated virtual machines printed.");
    Ok(())
}

pub async fn list_users<W: Write>(client: &ProxmoxClient, out: &mut W) -> Result<()> {
    debug!("Retrieving Proxmox users...");
    let users = client.get_users().await.context("Failed to list users")?;
    render_users(&users, out)?;
    info!("Proxmox users printed.");
    Ok(())
}

pub async fn list_nodes<W: Write>(client: &ProxmoxClient, out: &mut W) -> Result<()> {
    debug!("Retrieving Proxmox nodes...");
    let nodes = client.get_nodes().await.context("Failed to list nodes")?;
    render_nodes(&nodes, out)?;
    info!("{} Proxmox node(s) printed.", nodes.len());
    Ok(())
}

pub async fn list_network<W: Write>(
    client: &ProxmoxClient,
    node: &str,
    out: &mut W,
) -> Result<()> {
    debug!("Retrieving network information for node: {}", node);
    let interfaces = client
        .get_network_interfaces(node)
        .await
        .with_context(|| format!("Failed to list network interfaces on node {}", node))?;
    render_network(&interfaces, out)?;
    info!("Network information printed.");
    Ok(())
}

/// Prints the volume ids of the ISO images on `storage`.
///
/// A non-success HTTP status is reported on `out` and ends the command
/// without an error.
pub async fn list_isos<W: Write>(
    client: &ProxmoxClient,
    node: &str,
    storage: &str,
    out: &mut W,
) -> Result<()> {
    client.ticket()?;

    debug!("Retrieving ISO images from {} on node {}", storage, node);
    let resp = client
        .get_storage_content(node, storage, Some("iso"))
        .await
        .with_context(|| format!("Failed to list content of storage {}", storage))?;

    let status = resp.status();
    if !status.is_success() {
        error!("Storage content request returned {}", status);
        writeln!(out, "Failed to retrieve ISO list: HTTP {}", status.as_u16())?;
        return Ok(());
    }

    let body: ApiData<Vec<IsoEntry>> = resp
        .json()
        .await
        .context("Failed to parse storage content response")?;
    render_isos(&body.data, out)?;
    info!("{} ISO image(s) printed.", body.data.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxmox::models::{AttrValue, VmStatus};

    fn rendered<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_vms() {
        let vms = vec![
            VmSummary {
                vmid: 100,
                name: Some("web".into()),
                status: VmStatus::Running,
            },
            VmSummary {
                vmid: 101,
                name: None,
                status: VmStatus::Stopped,
            },
        ];
        let out = rendered(|w| render_vms(&vms, w));
        assert_eq!(out, "100. web => running\n101. N/A => stopped\n");
    }

    #[test]
    fn test_render_users_placeholders() {
        let users = vec![
            UserRecord {
                userid: "root@pam".into(),
                email: Some("root@example.com".into()),
                realm_type: Some("pam".into()),
                enable: Some(true),
                expire: Some(0),
            },
            UserRecord {
                userid: "bob@pve".into(),
                enable: Some(false),
                ..Default::default()
            },
            UserRecord {
                userid: "eve@pve".into(),
                ..Default::default()
            },
        ];
        let out = rendered(|w| render_users(&users, w));
        assert_eq!(
            out,
            "User ID: root@pam\nEmail: root@example.com\nRealm Type: pam\nEnable: 1\nExpire: 0\n--------------------\n\
             User ID: bob@pve\nEmail: N/A\nRealm Type: N/A\nEnable: 0\nExpire: N/A\n--------------------\n\
             User ID: eve@pve\nEmail: N/A\nRealm Type: N/A\nEnable: N/A\nExpire: N/A\n--------------------\n"
        );
    }

    #[test]
    fn test_render_nodes() {
        let nodes = vec![
            NodeSummary { node: "pve2".into() },
            NodeSummary { node: "pve1".into() },
        ];
        let out = rendered(|w| render_nodes(&nodes, w));
        assert_eq!(out, "pve2\n--------------------\npve1\n--------------------\n");

        let out = rendered(|w| render_nodes(&[], w));
        assert_eq!(out, "No nodes found.\n");
    }

    #[test]
    fn test_render_network() {
        let mut iface = NetworkInterface::default();
        iface.0.insert("iface".into(), AttrValue::Text("eth0".into()));
        iface.0.insert("active".into(), AttrValue::Integer(1));
        let out = rendered(|w| render_network(&[iface], w));
        assert_eq!(
            out,
            "Network Information:\niface: eth0\nactive: 1\n--------------------\n"
        );
    }

    #[test]
    fn test_divider_width() {
        assert_eq!(DIVIDER, "-".repeat(20));
    }
}
