//! Manifest emission.
//!
//! Converts a finalized resource graph into the JSON hand-off artifact
//! consumed by the provisioning backend, with a deterministic fingerprint
//! for change detection.

mod artifact;
mod hash;

pub use artifact::{MANIFEST_VERSION, ProvisioningManifest};
pub use hash::GraphHasher;
