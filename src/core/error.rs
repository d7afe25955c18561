// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/core/error.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the error taxonomy of the harness. Cancellation is not an
// error and has no variant here; it is reported through run outcomes.
//
// Tree Location:
// - src/core/error.rs (StressError)
// - Depends on: thiserror

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StressError {
    #[error("invalid {family} option '{name}', allowed options are: {}", valid.join(" "))]
    Configuration {
        family: &'static str,
        name: String,
        valid: Vec<&'static str>,
    },

    #[error("failed to allocate {label} scratch: {reason}")]
    Resource { label: &'static str, reason: String },

    #[error("{method} verification failure on element {element}, got {got}, expected {expected}")]
    Verification {
        method: &'static str,
        element: usize,
        expected: String,
        got: String,
    },

    #[error("{method} reported a negative elapsed time")]
    NegativeElapsed { method: &'static str },

    #[error("{method}: only processed {completed} of {submitted} jobs")]
    IncompleteJobs {
        method: &'static str,
        completed: usize,
        submitted: usize,
    },

    #[error("instance {instance} failed: {reason}")]
    Instance { instance: usize, reason: String },
}

impl StressError {
    /// Configuration and resource errors end the instance before or outside
    /// any timed work.
    pub fn is_fatal_to_instance(&self) -> bool {
        matches!(
            self,
            StressError::Configuration { .. } | StressError::Resource { .. } | StressError::Instance { .. }
        )
    }

    pub fn method(&self) -> Option<&'static str> {
        match self {
            StressError::Verification { method, .. }
            | StressError::NegativeElapsed { method }
            | StressError::IncompleteJobs { method, .. } => Some(method),
            _ => None,
        }
    }
}

// Changelog:
// - v1.0.0 (2026-10-19): Initial error taxonomy.
//   - Purpose: Configuration, resource and verification failures with enough
//     detail (method, element, both values) to diagnose a divergence.
