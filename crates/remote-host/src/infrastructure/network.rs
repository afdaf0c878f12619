//! Local address and host name lookup.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// The IPv4 address of the interface that routes to the wider network, or
/// loopback if there is none.
///
/// Connecting a UDP socket sends no packets; it only asks the OS which
/// local address it would route from.
pub fn primary_ipv4() -> IpAddr {
    routed_ipv4().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn routed_ipv4() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let ip = socket.local_addr().ok()?.ip();
    (ip.is_ipv4() && !ip.is_unspecified()).then_some(ip)
}

/// The address controllers should dial: the bind address itself when it
/// names a specific interface, otherwise the primary LAN address.
pub fn advertised_ip(bind_ip: IpAddr) -> IpAddr {
    if bind_ip.is_unspecified() {
        primary_ipv4()
    } else {
        bind_ip
    }
}

/// The machine's host name, or `localhost` if it cannot be read.
pub fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_ipv4_is_ipv4() {
        assert!(primary_ipv4().is_ipv4());
    }

    #[test]
    fn test_specific_bind_address_is_advertised_as_is() {
        let ip: IpAddr = "192.168.1.20".parse().unwrap();
        assert_eq!(advertised_ip(ip), ip);
    }

    #[test]
    fn test_unspecified_bind_address_is_replaced() {
        let advertised = advertised_ip(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert!(!advertised.is_unspecified());
    }

    #[test]
    fn test_hostname_is_never_empty() {
        assert!(!local_hostname().is_empty());
    }
}
