//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! gcloud adapter, the instance cache, configuration and roledefs files.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod cache;
pub mod command_runner;
pub mod config;
pub mod gcloud;
pub mod roledefs;
