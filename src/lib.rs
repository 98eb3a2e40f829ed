//! # Query Cost Estimator Library
//!
//! Heuristic cost and risk estimation for warehouse SQL queries.

pub mod app;
pub mod cache;
pub mod cli;
pub mod compute;
pub mod config;
pub mod error;
pub mod estimator;
pub mod output;
pub mod stats;
