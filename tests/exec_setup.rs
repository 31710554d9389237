// tests/exec_setup.rs

use std::fs::Permissions;
use std::io::{Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::UnixStream;

use tempfile::NamedTempFile;
use waybridge::errors::WaybridgeError;
use waybridge::exec::{ChannelPair, require_executable};

#[test]
fn executable_file_passes_the_precondition_check() {
    let file = NamedTempFile::new().unwrap();
    std::fs::set_permissions(file.path(), Permissions::from_mode(0o755)).unwrap();

    require_executable(file.path(), "compositor").unwrap();
}

#[test]
fn non_executable_file_is_an_environment_error() {
    let file = NamedTempFile::new().unwrap();
    std::fs::set_permissions(file.path(), Permissions::from_mode(0o644)).unwrap();

    match require_executable(file.path(), "compositor") {
        Err(WaybridgeError::Environment(msg)) => {
            assert!(msg.contains("compositor"), "message was: {msg}");
            assert!(msg.contains("not executable"), "message was: {msg}");
        }
        other => panic!("expected Environment error, got: {other:?}"),
    }
}

#[test]
fn missing_file_is_an_environment_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-binary");

    match require_executable(&path, "X server") {
        Err(WaybridgeError::Environment(msg)) => {
            assert!(msg.contains("X server"), "message was: {msg}");
        }
        other => panic!("expected Environment error, got: {other:?}"),
    }
}

#[test]
fn channel_pair_endpoints_are_connected() {
    let pair = ChannelPair::new("control").unwrap();

    let mut launcher_side = UnixStream::from(pair.launcher);
    let mut child_side = UnixStream::from(pair.child);

    launcher_side.write_all(b"ping").unwrap();
    let mut buf = [0u8; 4];
    child_side.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"ping");
}

#[test]
fn child_fd_token_is_the_decimal_descriptor() {
    use std::os::fd::AsRawFd;

    let pair = ChannelPair::new("display").unwrap();
    let token = pair.child_fd_token();
    assert_eq!(token, pair.child.as_raw_fd().to_string());
    assert!(token.parse::<i32>().unwrap() > 2);
}
