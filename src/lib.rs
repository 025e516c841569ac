//! stockscope: technical indicators for daily price series.
//!
//! Hexagonal architecture: the pure indicator engine and its types live in
//! [`domain`], port traits in [`ports`], concrete implementations in
//! [`adapters`], and the command-line front end in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
