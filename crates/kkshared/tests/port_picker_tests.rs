//
// port_picker_tests.rs
//
// Copyright (C) 2025 Posit Software, PBC. All rights reserved.
// Licensed under the Elastic License 2.0. See LICENSE.txt for license information.
//

//! Tests for debug port selection

use std::cell::RefCell;
use std::net::{Ipv4Addr, SocketAddrV4, TcpListener};

use kkshared::port_picker::{
    find_free_port, BindProbe, ConnectProbe, PortProbe, DEFAULT_DEBUG_PORT, LAST_DEBUG_PORT,
};

#[test]
fn test_returns_first_free_port_in_range() {
    // Only 9050 is free among 9048..=9052
    let probe = |port: u16| port == 9050 || port > 9052;
    assert_eq!(find_free_port(9048, &probe), Some(9050));
}

#[test]
fn test_first_port_is_returned_when_free() {
    let probe = |_port: u16| true;
    assert_eq!(
        find_free_port(DEFAULT_DEBUG_PORT, &probe),
        Some(DEFAULT_DEBUG_PORT)
    );
}

#[test]
fn test_fully_occupied_range_yields_none() {
    let probe = |_port: u16| false;
    assert_eq!(find_free_port(9048, &probe), None);
}

#[test]
fn test_scan_is_ascending_and_bounded() {
    let seen = RefCell::new(Vec::new());
    let probe = |port: u16| {
        seen.borrow_mut().push(port);
        false
    };
    assert_eq!(find_free_port(9995, &probe), None);
    assert_eq!(*seen.borrow(), vec![9995, 9996, 9997, 9998, 9999]);
}

#[test]
fn test_last_port_is_inclusive() {
    let probe = |port: u16| port == LAST_DEBUG_PORT;
    assert_eq!(find_free_port(9990, &probe), Some(LAST_DEBUG_PORT));
}

#[test]
fn test_start_above_range_yields_none() {
    let probe = |_port: u16| true;
    assert_eq!(find_free_port(LAST_DEBUG_PORT + 1, &probe), None);
}

#[test]
fn test_connect_probe_sees_listener() {
    let port = portpicker::pick_unused_port().expect("No free port available");
    let listener = TcpListener::bind(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port))
        .expect("Failed to bind test listener");

    assert!(!ConnectProbe.is_free(port));
    assert!(!BindProbe.is_free(port));

    drop(listener);
    assert!(ConnectProbe.is_free(port));
}
