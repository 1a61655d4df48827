//! # Memory Mart Core Library
//!
//! Game rules for 메모리 마트, a shopping-themed sequence memory game:
//! the player watches an ordered row of items for a short countdown, then
//! rebuilds the order from a shuffled shelf that also holds decoys.
//!
//! - [`types`]: difficulty, category, items, scenarios, phases
//! - [`session`]: the four-phase state machine for one player
//! - [`pool`]: shelf shuffling
//! - [`scoring`]: index-wise answer comparison and result grades
//! - [`fallback`]: placeholder scenario when generated content is unusable
//! - [`keystore`]: the saved content-API key
//! - [`config`]: `memory-mart.toml`
//!
//! Nothing in this crate touches the network or a clock; the driver
//! supplies scenarios and calls [`Session::tick`] once per second.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod fallback;
pub mod keystore;
pub mod pool;
pub mod scoring;
pub mod session;
pub mod types;

pub use config::MartConfig;
pub use error::MartError;
pub use session::Session;
pub use types::*;
