//! aieo: client for the AI Engine Optimization backend.
//!
//! - `api`: HTTP client, error normalization and the endpoint bindings
//! - `pages`: view-controllers for audit, optimize, dashboard and patterns
//! - `web`: navigation shell and the local web UI server
//! - `cli`: terminal front end over the same pages
//! - `config`, `analytics`: layered settings and the local request log

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod pages;
pub mod web;
