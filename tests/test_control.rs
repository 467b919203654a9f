use std::net::SocketAddr;
use std::time::Duration;

use switchd::server::control::{
    ControlGate, ControlSignal, GateState, is_start_command, is_stop_command,
};
use tokio::net::UdpSocket;
use tokio::time::timeout;

async fn gate_and_sender() -> (ControlGate, UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let gate = ControlGate::new(socket);
    let addr = gate.local_addr().unwrap();
    let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    (gate, sender, addr)
}

#[test]
fn test_start_command_prefix() {
    assert!(is_start_command(b"ON"));
    assert!(is_start_command(b"ON\n"));
    assert!(is_start_command(b"ONWARD"));
    assert!(!is_start_command(b"O"));
    assert!(!is_start_command(b"on"));
    assert!(!is_start_command(b" ON"));
    assert!(!is_start_command(b""));
}

#[test]
fn test_stop_command_prefix() {
    assert!(is_stop_command(b"OFF"));
    assert!(is_stop_command(b"OFF\r\n"));
    assert!(!is_stop_command(b"OF"));
    assert!(!is_stop_command(b"off"));
    assert!(!is_stop_command(b"ON"));
}

#[tokio::test]
async fn test_await_start_ignores_other_datagrams() {
    let (mut gate, sender, addr) = gate_and_sender().await;
    assert_eq!(gate.state(), GateState::AwaitingOn);

    for payload in [&b"OFF"[..], b"", b"on", b"O", b"hello world"] {
        sender.send_to(payload, addr).await.unwrap();
    }

    let waited = timeout(Duration::from_millis(200), gate.await_start()).await;
    assert!(waited.is_err(), "gate started without ON");
    assert_eq!(gate.state(), GateState::AwaitingOn);

    sender.send_to(b"ON", addr).await.unwrap();
    timeout(Duration::from_secs(5), gate.await_start())
        .await
        .expect("ON was not recognised")
        .unwrap();
    assert_eq!(gate.state(), GateState::Running);
}

#[tokio::test]
async fn test_check_stop_reads_one_datagram() {
    let (mut gate, sender, addr) = gate_and_sender().await;
    sender.send_to(b"ON", addr).await.unwrap();
    gate.await_start().await.unwrap();

    sender.send_to(b"ON", addr).await.unwrap();
    sender.send_to(b"OF", addr).await.unwrap();
    sender.send_to(b"OFFLINE-NOW", addr).await.unwrap();

    assert_eq!(gate.check_stop().await.unwrap(), ControlSignal::Continue);
    assert_eq!(gate.state(), GateState::Running);
    assert_eq!(gate.check_stop().await.unwrap(), ControlSignal::Continue);
    assert_eq!(gate.check_stop().await.unwrap(), ControlSignal::Stop);
    assert_eq!(gate.state(), GateState::Stopped);
}
