//! Unit tests for the renewal task module.

mod support;
