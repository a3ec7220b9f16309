//! Travel admin library
//!
//! Record managers for the reviews, users, categories and places of a
//! travel guide, kept in sync with a remote document store.

pub mod app;
pub mod config;
pub mod console;
pub mod database;
pub mod error;
pub mod ids;
pub mod models;
pub mod remote;
pub mod services;
