use crate::{Error, Result};
use nix::unistd::Uid;
use pnet::datalink::interfaces;

/// A network interface that the OS knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetInterface {
    pub name: String,
    pub index: u32,
}

/// Resolve an interface name (e.g. `wlan1`) to its kernel index.
/// 网卡不存在时返回 `Error::InterfaceNotFound`。
pub fn resolve_interface(name: &str) -> Result<NetInterface> {
    let iface = interfaces()
        .into_iter()
        .find(|iface| iface.name == name)
        .ok_or_else(|| Error::InterfaceNotFound(name.to_string()))?;

    Ok(NetInterface {
        name: iface.name,
        index: iface.index,
    })
}

/// Whether the process runs with an effective UID of 0.
pub fn is_privileged() -> bool {
    Uid::effective().is_root()
}
