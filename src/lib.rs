// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Stackform
//!
//! A declarative compiler for container-task deployment stacks.
//!
//! ## Overview
//!
//! Stackform turns a single YAML stack file into a closed, dependency-ordered
//! resource graph ready for an external provisioning backend to reconcile:
//!
//! - Resolve a pre-existing network through an inventory lookup
//! - Declare task and execution identity roles
//! - Declare a sized compute task definition with one container
//! - Wire plain and secret configuration bindings (secrets stay references)
//! - Declare the cluster and security boundary attached to the network
//!
//! The output is a JSON provisioning manifest with a deterministic
//! fingerprint. Stackform never applies changes itself: diffing, retries,
//! and apply ordering belong to the provisioning backend consuming the
//! manifest.
//!
//! ## Modules
//!
//! - [`config`]: Stack file parsing and validation
//! - [`graph`]: Resource entities and the graph builder
//! - [`compiler`]: Stack file to manifest compilation
//! - [`manifest`]: Manifest emission and fingerprinting
//! - [`inventory`]: Network inventory and configuration-store collaborators
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! stack:
//!   name: ecs-job
//!   network_lookup: vpc-123
//!
//! task:
//!   cpu_units: 2048
//!   memory_mib: 4096
//!
//! container:
//!   repository: ecs-job
//!   secrets:
//!     - name: PAGERDUTY_API_KEY
//!       entry: PAGERDUTY_API_KEY
//!       version: 1
//!
//! cluster:
//!   name: ecs-jobcluster
//!   elastic_capacity: true
//!
//! security:
//!   name: ecs-job-sg
//!   outbound: allow_all
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod graph;
pub mod inventory;
pub mod manifest;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use compiler::StackCompiler;
pub use config::{ConfigParser, ConfigValidator, StackConfig};
pub use error::{Result, StackformError};
pub use graph::{GraphBuilder, ResourceGraph, ResourceId, ResourceKind};
pub use inventory::{
    HttpNetworkInventory, NetworkInventory, ParameterStore, StaticNetworkInventory,
    StaticParameterStore,
};
pub use manifest::{GraphHasher, ProvisioningManifest};
