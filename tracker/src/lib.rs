//! Demo delivery-pipeline tracker
//!
//! Simulates a software-delivery pipeline (intake → refinement →
//! development → QA → release) over an in-memory store, with four
//! LLM-backed role agents and best-effort mirroring to an issue tracker
//! and a source host.

pub mod config;
pub mod events;
pub mod llm;
pub mod model;
pub mod orchestrator;
pub mod store;
pub mod web;
pub mod workflow;
