//! End-to-end engine tests.
//!
//! Lines go through the full pipeline: parse, interpolate, dispatch against
//! the complete built-in registry, with the mock LLM backend and a capturing
//! output sink.

pub mod common;
pub mod executor_test;
pub mod interpolation_test;
pub mod parser_test;
pub mod registry_test;
pub mod script_test;
