pub mod action;
pub mod catalog;
pub mod config;
pub mod error;
pub mod io;
pub mod nav;
pub mod paths;
pub mod pipeline;
pub mod requirement;
pub mod screens;
pub mod session;
pub mod types;

pub use error::{Result, TrackerError};
