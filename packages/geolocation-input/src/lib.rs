#![doc = include_str!("../README.md")]

mod config;
pub use config::*;

mod error;
pub use error::*;

mod fix;
pub use fix::*;

mod provider;
pub use provider::*;

mod sink;
pub use sink::*;

mod request;
pub use request::*;

#[cfg(target_arch = "wasm32")]
pub mod web;
