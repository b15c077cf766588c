//! dashgen: turns a JSON dashboard layout description into a generated
//! React/TSX source file by stitching chart, filter and layout templates.
#![deny(unsafe_code)]

pub mod core;
pub mod generation;
pub mod server;
