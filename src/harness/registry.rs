// numstress - Free and Open Source Software Statement
//
// This project, numstress, is Free and Open Source Software (FOSS) licensed
// under the MIT License. You are free to use, modify, and distribute this
// software in accordance with the license terms. Contributions are welcome
// via pull requests to the project repository.
//
// File: src/harness/registry.rs
// Version: 1.0.1
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the method registry: an immutable, ordered table of
// named workload entries whose first entry is always the "all" fan-out.
//
// Tree Location:
// - src/harness/registry.rs (MethodEntry, MethodTable)
// - Depends on: core/types, core/error

use crate::Result;
use crate::core::error::StressError;
use crate::core::{Category, StressContext, Variant};

/// Uniform workload entry point: returns the elapsed seconds of the timed
/// section.
pub type WorkloadFn<S> = fn(&mut StressContext, &mut S, Variant) -> Result<f64>;

pub enum Dispatch<S> {
    /// Runs every concrete entry in registration order
    FanOut,
    Concrete(WorkloadFn<S>),
}

// Manual impls: a derive would require S: Clone
impl<S> Clone for Dispatch<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Dispatch<S> {}

pub struct MethodEntry<S> {
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub dispatch: Dispatch<S>,
}

impl<S> MethodEntry<S> {
    pub const fn new(name: &'static str, description: &'static str, category: Category, run: WorkloadFn<S>) -> Self {
        Self {
            name,
            description,
            category,
            dispatch: Dispatch::Concrete(run),
        }
    }

    pub fn is_fan_out(&self) -> bool {
        matches!(self.dispatch, Dispatch::FanOut)
    }
}

pub struct MethodTable<S> {
    family: &'static str,
    entries: Vec<MethodEntry<S>>,
}

impl<S> MethodTable<S> {
    /// Builds a table with the fan-out entry at index 0 followed by
    /// `concrete` in the given order.
    pub fn new(family: &'static str, fan_out_description: &'static str, concrete: Vec<MethodEntry<S>>) -> Self {
        let mut entries = Vec::with_capacity(concrete.len() + 1);
        entries.push(MethodEntry {
            name: "all",
            description: fan_out_description,
            category: Category::All,
            dispatch: Dispatch::FanOut,
        });
        for entry in concrete {
            debug_assert!(!entry.is_fan_out(), "only entry 0 may fan out");
            debug_assert!(entry.name != "all", "'all' is reserved for the fan-out entry");
            entries.push(entry);
        }
        Self { family, entries }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }

    pub fn entries(&self) -> &[MethodEntry<S>] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&MethodEntry<S>> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn resolve(&self, name: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| StressError::Configuration {
                family: self.family,
                name: name.to_string(),
                valid: self.names(),
            })
    }
}


// Changelog:
// - v1.0.1 (2026-10-19): Unknown names report every valid name.
// - v1.0.0 (2026-10-19): Initial method registry.
//   - Purpose: Static dispatch table shared by every workload family.
