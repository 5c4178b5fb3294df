//! Structured activity logging: JSONL append-only with graceful degradation.

pub mod activity;
pub mod jsonl;
