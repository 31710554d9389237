// src/exec/mod.rs

//! Process orchestration: socket-pair channels, child spawning and session
//! supervision.

pub mod channels;
pub mod spawn;

pub use channels::ChannelPair;
pub use spawn::{
    ExecutablePaths, require_executable, resolve_paths, spawn_compositor, spawn_xwayland,
    supervise,
};
