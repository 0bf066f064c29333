pub mod config;
pub mod domain;
pub mod i18n;
pub mod links;
pub mod negotiate;
pub mod page;
pub mod server;
