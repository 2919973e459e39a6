pub mod auth;
pub mod config;
pub mod database;
pub mod derive;
pub mod error;
pub mod handlers;
pub mod language;
pub mod middleware;
pub mod services;

#[cfg(test)]
pub mod testing;
