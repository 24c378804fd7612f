pub mod config;

pub use config::ServiceConfig;
