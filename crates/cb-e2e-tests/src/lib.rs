//! End-to-end tests for the current bridge live under `tests/`.
