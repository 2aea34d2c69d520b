//! Tuning values for the collision pipeline

pub mod config;
