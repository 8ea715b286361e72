//! Common test utilities for engine tests.

use std::sync::Arc;

use quill::commands::register_builtins;
use quill::engine::{CaptureSink, CommandRegistry, Engine, EngineContext};
use quill::llm::mock::MockLlmClient;

/// Builds an engine with every built-in registered and a mock backend.
pub fn test_engine() -> (Engine, CaptureSink) {
    test_engine_with_mock(MockLlmClient::new())
}

/// Same, with a customized mock backend.
pub fn test_engine_with_mock(mock: MockLlmClient) -> (Engine, CaptureSink) {
    let capture = CaptureSink::new();
    let ctx = EngineContext::new(Arc::new(mock), Box::new(capture.handle()));
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry).expect("builtins must register");
    (Engine::new(registry, ctx), capture)
}
