//! Destination checks for provider-returned audio URLs
//!
//! The URL in a completion envelope is chosen by the provider, so before the
//! proxy fetches it the host must not be, or resolve to, an address inside
//! the deployment's own network.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use thiserror::Error;
use url::{Host, Url};

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("URL has no host")]
    MissingHost,

    #[error("URL points at a private address: {0}")]
    PrivateAddress(IpAddr),

    #[error("URL points at a local host name: {0}")]
    LocalHostName(String),

    #[error("failed to resolve host '{host}': {reason}")]
    Resolution { host: String, reason: String },
}

fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();

    ip.is_loopback()
        || ip.is_private()
        || ip.is_link_local()
        || ip.is_broadcast()
        || ip.is_unspecified()
        || ip.is_documentation()
        // shared address space 100.64.0.0/10
        || (a == 100 && (b & 0xC0) == 64)
        // benchmarking 198.18.0.0/15
        || (a == 198 && (b == 18 || b == 19))
}

fn is_private_ipv6(ip: Ipv6Addr) -> bool {
    if let Some(mapped) = ip.to_ipv4_mapped() {
        return is_private_ipv4(mapped);
    }

    let first = ip.segments()[0];

    ip.is_loopback()
        || ip.is_unspecified()
        // link-local fe80::/10
        || (first & 0xFFC0) == 0xFE80
        // unique local fc00::/7
        || (first & 0xFE00) == 0xFC00
        // documentation 2001:db8::/32
        || (first == 0x2001 && ip.segments()[1] == 0x0DB8)
}

pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_ipv4(v4),
        IpAddr::V6(v6) => is_private_ipv6(v6),
    }
}

fn is_local_name(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    host == "localhost" || host.ends_with(".localhost")
}

/// Whether the URL names a private destination without needing DNS
pub fn is_literal_private(url: &Url) -> bool {
    match url.host() {
        Some(Host::Ipv4(ip)) => is_private_ipv4(ip),
        Some(Host::Ipv6(ip)) => is_private_ipv6(ip),
        Some(Host::Domain(name)) => is_local_name(name),
        None => true,
    }
}

/// Refuse URLs whose host is a private address or a local host name
///
/// Host names that need DNS are checked by [`PublicOnlyResolver`] when the
/// fetch client connects.
pub fn check_destination(url: &Url) -> Result<(), GuardError> {
    match url.host() {
        None => Err(GuardError::MissingHost),
        Some(Host::Ipv4(ip)) => ensure_public(IpAddr::V4(ip)),
        Some(Host::Ipv6(ip)) => ensure_public(IpAddr::V6(ip)),
        Some(Host::Domain(name)) if is_local_name(name) => Err(GuardError::LocalHostName(name.to_string())),
        Some(Host::Domain(_)) => Ok(()),
    }
}

/// Resolve a host name, refusing it if any address is private
pub async fn resolve_public(host: &str) -> Result<Vec<SocketAddr>, GuardError> {
    if is_local_name(host) {
        return Err(GuardError::LocalHostName(host.to_string()));
    }

    let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|e| GuardError::Resolution {
            host: host.to_string(),
            reason: e.to_string(),
        })?
        .collect();

    if addrs.is_empty() {
        return Err(GuardError::Resolution {
            host: host.to_string(),
            reason: "no addresses".to_string(),
        });
    }

    for addr in &addrs {
        ensure_public(addr.ip())?;
    }

    Ok(addrs)
}

/// DNS resolver for the audio fetch client
///
/// The client connects only to the addresses this resolver checked, for the
/// initial URL and for every redirect hop.
#[derive(Debug, Default, Clone, Copy)]
pub struct PublicOnlyResolver;

impl Resolve for PublicOnlyResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let addrs = resolve_public(name.as_str()).await?;
            Ok(Box::new(addrs.into_iter()) as Addrs)
        })
    }
}

fn ensure_public(ip: IpAddr) -> Result<(), GuardError> {
    if is_private_ip(ip) {
        Err(GuardError::PrivateAddress(ip))
    } else {
        Ok(())
    }
}
