//! CLI infrastructure for the pillar agent
//!
//! This module provides the command-line interface for headless training
//! and for inspecting what the agent has learned.

pub mod commands;
pub mod config;
pub mod output;
