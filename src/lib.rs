pub mod commands;
pub mod feed;
pub mod http;
pub mod page;
pub mod platform;
pub mod runtime;
