//! # mart-cli: terminal front end for Memory Mart
//!
//! ```text
//! stdin ──lines──▶ commands::parse ──▶ App::handle ──▶ mart-core Session
//!                                          │
//! interval(1s) ──▶ App::on_tick            └──▶ mart-llm ScenarioGenerator
//!                        │                             (+ Prefetcher)
//!                        ▼
//!                 screens::render ──▶ stdout
//! ```
//!
//! - `commands`: input line parsing
//! - `screens`: pure text rendering of the four screens
//! - `app`: the event loop and key management

pub mod app;
pub mod commands;
pub mod screens;

pub use app::{App, Flow, run};
