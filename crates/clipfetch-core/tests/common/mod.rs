#![allow(dead_code)]

pub mod clip_server;
#[cfg(unix)]
pub mod stub_ffmpeg;
