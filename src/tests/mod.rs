//! Cross-module integration tests for the similarity pipeline.
