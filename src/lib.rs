pub mod api;
pub mod batch;
pub mod classifier;
pub mod config;
pub mod consts;
pub mod error;
pub mod model;
pub mod prompts;
pub mod service;
pub mod store;
