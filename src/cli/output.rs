//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying validation
//! results and manifests to the user in text or JSON form.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::config::ValidationResult;
use crate::graph::{BindingValue, ResourceSpec};
use crate::manifest::{GraphHasher, ProvisioningManifest};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Resource row for table display.
#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Depends on")]
    depends_on: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a validation result for display.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => {
                let body = serde_json::json!({
                    "valid": result.is_valid(),
                    "errors": result.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "warnings": result.warnings,
                });
                serde_json::to_string_pretty(&body).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_validation_text(result, show_warnings),
        }
    }

    /// Formats a validation result as text.
    fn format_validation_text(result: &ValidationResult, show_warnings: bool) -> String {
        let mut output = String::new();

        if result.is_valid() {
            let _ = writeln!(output, "{} Stack file is valid.", "✓".green());
        } else {
            let _ = writeln!(
                output,
                "{} Stack file has {} error(s):",
                "✗".red(),
                result.error_count()
            );
            for error in &result.errors {
                let _ = writeln!(output, "  - {error}");
            }
        }

        if show_warnings && !result.warnings.is_empty() {
            let _ = writeln!(output, "\n{} warning(s):", result.warning_count());
            for warning in &result.warnings {
                let _ = writeln!(output, "  - {}", warning.yellow());
            }
        }

        output
    }

    /// Formats a manifest for display.
    #[must_use]
    pub fn format_manifest(&self, manifest: &ProvisioningManifest, detailed: bool) -> String {
        match self.format {
            OutputFormat::Json => manifest.to_json().unwrap_or_default(),
            OutputFormat::Text => Self::format_manifest_text(manifest, detailed),
        }
    }

    /// Formats a manifest as text.
    fn format_manifest_text(manifest: &ProvisioningManifest, detailed: bool) -> String {
        let hasher = GraphHasher::new();
        let mut output = String::new();

        let _ = writeln!(
            output,
            "\n{} stack '{}' ({} resources, fingerprint {})",
            "Manifest:".bold(),
            manifest.stack,
            manifest.resource_count(),
            hasher.short_hash(&manifest.fingerprint)
        );

        let rows: Vec<ResourceRow> = manifest
            .resources
            .iter()
            .enumerate()
            .map(|(index, node)| ResourceRow {
                index,
                kind: node.id.kind.to_string(),
                name: node.id.name.clone(),
                depends_on: node
                    .depends_on
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();
        let _ = writeln!(output, "{}", Table::new(rows));

        if detailed {
            output.push_str(&Self::format_bindings(manifest));
        }

        output
    }

    /// Formats container bindings.
    fn format_bindings(manifest: &ProvisioningManifest) -> String {
        let mut output = String::new();

        for node in &manifest.resources {
            let ResourceSpec::Container(container) = &node.spec else {
                continue;
            };

            let _ = writeln!(output, "\nBindings for {}:", node.id.to_string().bold());
            for binding in &container.bindings {
                match &binding.value {
                    BindingValue::Plain { value } => {
                        let _ = writeln!(output, "  {} = {value}", binding.name);
                    }
                    BindingValue::Secret { entry, version } => {
                        let _ = writeln!(
                            output,
                            "  {} = {}",
                            binding.name,
                            format!("<secret {entry}@v{version}>").yellow()
                        );
                    }
                }
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, OutboundPolicy};
    use crate::inventory::StaticNetworkInventory;

    fn sample_manifest() -> ProvisioningManifest {
        let inventory = StaticNetworkInventory::new().with_network("vpc-123", "net-a");
        let mut builder = GraphBuilder::new();
        let network = builder.resolve_network(&inventory, "vpc-123").unwrap();
        builder.declare_cluster("c", &network, true).unwrap();
        builder
            .declare_security_boundary("sg", &network, OutboundPolicy::AllowAll)
            .unwrap();
        ProvisioningManifest::from_graph("job", &builder.finalize().unwrap())
    }

    #[test]
    fn test_text_manifest_lists_resources() {
        let formatter = OutputFormatter::new(OutputFormat::Text);
        let rendered = formatter.format_manifest(&sample_manifest(), false);
        assert!(rendered.contains("(3 resources, fingerprint "));
        assert!(rendered.contains("vpc-123"));
        assert!(rendered.contains("security-boundary"));
    }

    #[test]
    fn test_json_manifest_is_parseable() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let rendered = formatter.format_manifest(&sample_manifest(), false);
        assert!(serde_json::from_str::<serde_json::Value>(&rendered).is_ok());
    }

    #[test]
    fn test_validation_text_valid() {
        let formatter = OutputFormatter::new(OutputFormat::Text);
        let rendered = formatter.format_validation(&ValidationResult::default(), true);
        assert!(rendered.contains("valid"));
    }
}
