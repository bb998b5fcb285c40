//! HTTP front end and command line for the brochure generator.

pub mod cli;
pub mod pages;
pub mod render;
pub mod server;
