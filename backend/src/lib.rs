//! # School Backend
//!
//! Administration backend for a school: users and their roles, lessons,
//! weekly lesson programs, education terms, advisor meetings, and student
//! grades. The REST API is served by axum.
//!
//! ## Scheduling
//!
//! Every operation that puts a person into a time slot goes through
//! [`scheduling`]. Lesson programs are checked against the weekly slots a
//! teacher or student already holds, and meetings against the other meetings
//! of the advisor and each attending student on the same date. Two intervals
//! conflict when they share any instant; back-to-back intervals do not.
//! Checks and writes for the same person are serialized through per-user
//! locks held by the repository.
//!
//! ## Architecture
//!
//! - [`models`]: Domain types and strongly typed ids
//! - [`scheduling`]: Interval overlap and conflict detection
//! - [`db`]: Repository traits and the in-memory backend
//! - [`services`]: Business rules, validation, and authentication
//! - [`config`]: TOML and environment configuration
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod models;

pub mod config;
pub mod db;
pub mod scheduling;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
