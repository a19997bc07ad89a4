//! `WebDAV` property mapping.

pub mod build;
pub mod core;
pub mod parse;
