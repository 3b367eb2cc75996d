pub mod catalog;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod i18n;
pub mod model;
pub mod pagination;
pub mod query;
pub mod search;
pub mod server;
