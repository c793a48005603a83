//! Unit tests for the workspace core.
