#![doc = include_str!("../README.md")]

pub mod mock_storage;
pub mod mock_upstream;
pub mod steps;
pub mod tracing;
pub mod world;
