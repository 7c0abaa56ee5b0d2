//! CLI command implementations.

pub mod config;
mod render;
pub mod services;
mod show;

pub use render::{RenderOptions, render};
pub use show::{ShowOptions, show};
