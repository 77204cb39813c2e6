//! Scenario tests
//!
//! Disc trees built on disk in temporary directories:
//! - Structure discovery and feature classification
//! - The scan phases with a mock decoder
//! - End-to-end scans with the header decoder

pub mod scan_phases;
