//! Integration Tests Module
//!
//! End-to-end tests for the review engine: batch orchestration under
//! concurrency and deadlines, durable progress, and interrupt/resume
//! cycles. All tests run against temporary directories and the scripted
//! oracle provider.

// Batch orchestration, timeout isolation, and failure policy tests
mod batch_test;


// Interrupt/resume cycle tests
mod resume_test;

mod common;
