pub mod api;
pub mod app;
pub mod auth;
pub mod call;
pub mod channel;
pub mod cli;
pub mod config;
pub mod device;
pub mod dispatch;
pub mod event;
pub mod global;
pub mod registry;
pub mod xapi;
