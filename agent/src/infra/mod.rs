//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! podman runtime adapter, the manifest directory and the device config file.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.

pub mod command_runner;
pub mod config;
pub mod manifests;
pub mod podman;
pub mod state;
