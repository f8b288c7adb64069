//! Cluster node identity.

use std::fmt::Display;
use std::net::SocketAddr;

/// A cluster node, identified by the address the driver connects to.
///
/// Equality, ordering and hashing all derive solely from the address, so the
/// type is safe as a set or map key and inside ordered host queues without
/// incidental duplication from unrelated fields. Hosts are small immutable
/// values and are copied freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Host {
    /// Address of the node.
    pub address: SocketAddr,
}

impl Host {
    /// Creates a host from the address used to reach it.
    pub fn new(address: SocketAddr) -> Self {
        Host { address }
    }
}

impl Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.address)
    }
}
