//! # linepool
//!
//! A fixed pool of OS threads drains lines from one shared input file and
//! appends each line, tagged with the worker's id, to one shared output file.
//!
//! Two modes: `mutex` serializes every read-then-write step behind a single
//! lock, `nomutex` lets the workers race on both streams.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod stream;
pub mod telemetry;
