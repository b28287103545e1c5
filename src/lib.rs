//! DPR Server library.
//!
//! Core functionality for the daily progress report server: database
//! operations, authorization policy, session auth, and API services.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod policy;
pub mod services;
