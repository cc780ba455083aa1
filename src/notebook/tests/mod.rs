//! Unit tests for the notebook bounded context.
