//! Pipehub Core
//!
//! Core types and abstractions for the Pipehub artifact registry.
//!
//! This crate contains:
//! - Domain types: Core business entities (Pipe, Version)
//! - DTOs: Data transfer objects for the HTTP API

pub mod domain;
pub mod dto;
