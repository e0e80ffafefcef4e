//
// port_picker.rs
//
// Copyright (C) 2024-2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//
//

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// First port tried when a debug port is generated.
pub const DEFAULT_DEBUG_PORT: u16 = 1044;

/// Last port (inclusive) tried when a debug port is generated.
pub const LAST_DEBUG_PORT: u16 = 9999;

/// How long a connect probe waits before treating the port as free.
const PROBE_TIMEOUT: Duration = Duration::from_millis(200);

/// Decides whether a TCP port is free.
pub trait PortProbe {
    fn is_free(&self, port: u16) -> bool;
}

impl<F> PortProbe for F
where
    F: Fn(u16) -> bool,
{
    fn is_free(&self, port: u16) -> bool {
        self(port)
    }
}

/// Treats a port as in use when something accepts a connection on
/// `localhost:port`.
///
/// This is a liveness probe rather than a reservation: two launchers probing
/// at the same time can both pick the same port.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectProbe;

impl PortProbe for ConnectProbe {
    fn is_free(&self, port: u16) -> bool {
        let addrs: Vec<SocketAddr> = match ("localhost", port).to_socket_addrs() {
            Ok(addrs) => addrs.collect(),
            Err(e) => {
                log::warn!("Failed to resolve localhost for port {}: {}", port, e);
                vec![SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port))]
            }
        };

        // The stream is dropped (and the connection closed) right away
        !addrs
            .iter()
            .any(|addr| TcpStream::connect_timeout(addr, PROBE_TIMEOUT).is_ok())
    }
}

/// Treats a port as free only if it can be bound on the loopback interface.
///
/// Stricter than [`ConnectProbe`]: a port held by a listener that doesn't
/// accept connections yet is reported as busy.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindProbe;

impl PortProbe for BindProbe {
    fn is_free(&self, port: u16) -> bool {
        TcpListener::bind(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port)).is_ok()
    }
}

/// Scans `first..=LAST_DEBUG_PORT` in ascending order and returns the first
/// port the probe reports as free, or `None` if the whole range is taken.
pub fn find_free_port<P: PortProbe + ?Sized>(first: u16, probe: &P) -> Option<u16> {
    if first > LAST_DEBUG_PORT {
        log::debug!(
            "First port {} is above the last probed port {}",
            first,
            LAST_DEBUG_PORT
        );
        return None;
    }

    let port = (first..=LAST_DEBUG_PORT).find(|port| {
        let free = probe.is_free(*port);
        if !free {
            log::trace!("Port {} is in use", port);
        }
        free
    });

    if let Some(port) = port {
        log::debug!("Picked free port {} (scan started at {})", port, first);
    }
    port
}
