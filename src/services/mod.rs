//! Engine services

pub mod analyzer;
pub mod batch;
pub mod discovery;
pub mod rules;
pub mod segmenter;
