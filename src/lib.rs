//! Space Invader: a wave shooter simulation core.
//!
//! The library owns the per-tick simulation (ships, lasers, pixel-mask
//! collision, wave spawning, win/loss transitions).  The terminal front end
//! in `main.rs` polls input, calls [`compute::tick`], and draws the result.

pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod sprite;
