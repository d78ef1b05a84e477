pub mod config;
pub mod dashboard;
pub mod events;
pub mod nav;
pub mod requirements;
pub mod screens;
pub mod session;
