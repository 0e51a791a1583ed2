//! HTTP API: the orchestrator-facing invocation surface of each pipeline stage.

pub mod app;
