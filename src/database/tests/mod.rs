//! Unit tests for the database context.
