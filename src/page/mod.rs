//! Product page rendering.
//!
//! - `config` - Per-page configuration
//! - `document` - Writable page abstraction
//! - `template` - HTML template implementation of [`Document`]
//! - `render` - Release rendering into a [`Document`]

mod config;
mod document;
pub mod ids;
mod render;
mod template;

pub use config::PageConfig;
pub use document::Document;
pub use render::{
    RenderOutcome, changelog_html, download_cards_html, hero_buttons, render_feed, render_page,
    wire_links,
};
pub use template::HtmlTemplate;
