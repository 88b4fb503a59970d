//! Static permission table
//!
//! Each protected operation declares the (resource, action) pair it needs in
//! one table, checked for completeness at startup instead of being resolved
//! dynamically per call.

use std::collections::HashMap;

use crate::prelude::*;

pub struct PermissionTable {
	ops: HashMap<&'static str, (&'static str, &'static str)>,
}

impl PermissionTable {
	pub fn new(entries: &[(&'static str, &'static str, &'static str)]) -> Self {
		let ops = entries.iter().map(|&(op, resource, action)| (op, (resource, action))).collect();
		Self { ops }
	}

	pub fn lookup(&self, op: &str) -> CpResult<(&'static str, &'static str)> {
		self.ops
			.get(op)
			.copied()
			.ok_or_else(|| Error::ConfigError(format!("no permission declared for operation {}", op)))
	}

	/// Startup completeness check: every protected operation the service
	/// wires must have a declaration, or the process refuses to start.
	pub fn verify_complete(&self, operations: &[&str]) -> CpResult<()> {
		for op in operations {
			if !self.ops.contains_key(op) {
				return Err(Error::ConfigError(format!(
					"operation {} has no (resource, action) declaration",
					op
				)));
			}
		}
		Ok(())
	}
}


// vim: ts=4
