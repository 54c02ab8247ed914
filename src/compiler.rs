//! Stack compilation.
//!
//! Turns a validated stack file into a provisioning manifest by driving
//! the graph builder through the declaration sequence in dependency order:
//! network lookup, identity roles, task definition, image repository,
//! container and bindings, cluster, security boundary. Any failure aborts
//! the build; a partial manifest is never produced.

use tracing::{debug, info};

use crate::config::StackConfig;
use crate::error::Result;
use crate::graph::{
    GraphBuilder, ImageSource, LogConfig, PermissionStatement, RuntimePlatform, TaskSizing,
};
use crate::inventory::{NetworkInventory, ParameterStore};
use crate::manifest::ProvisioningManifest;

/// Actions the execution role needs to read the configuration store when
/// starting the workload.
const STORE_READ_ACTIONS: &[&str] = &[
    "paramstore:DescribeParameters",
    "paramstore:GetParameter",
    "paramstore:GetParameterHistory",
    "paramstore:GetParameters",
];

/// Compiles stack files into provisioning manifests.
pub struct StackCompiler<'a> {
    /// Network inventory for the lookup.
    inventory: &'a dyn NetworkInventory,
    /// Configuration store for build-time plain lookups.
    params: &'a dyn ParameterStore,
}

impl<'a> StackCompiler<'a> {
    /// Creates a compiler over the given collaborators.
    #[must_use]
    pub const fn new(
        inventory: &'a dyn NetworkInventory,
        params: &'a dyn ParameterStore,
    ) -> Self {
        Self { inventory, params }
    }

    /// Compiles a stack file into a manifest.
    ///
    /// # Errors
    ///
    /// Returns the first graph, inventory, or parameter-store error; the
    /// build is all-or-nothing.
    pub fn compile(&self, config: &StackConfig) -> Result<ProvisioningManifest> {
        info!("Compiling stack '{}'", config.stack.name);
        let mut builder = GraphBuilder::new();

        let network = builder.resolve_network(self.inventory, &config.stack.network_lookup)?;

        let task_role =
            builder.declare_identity_role(&config.task_role_name(), &config.identity.principal, vec![])?;

        // The execution role starts the workload and must be able to read
        // the configuration store to resolve secrets.
        let execution_role = builder.declare_identity_role(
            &config.execution_role_name(),
            &config.identity.principal,
            vec![PermissionStatement::allow(
                STORE_READ_ACTIONS.iter().map(|a| (*a).to_string()).collect(),
                vec![String::from("*")],
            )],
        )?;

        let task_definition = builder.declare_task_definition(
            &config.task_definition_name(),
            TaskSizing {
                cpu_units: config.task.cpu_units,
                memory_mib: config.task.memory_mib,
            },
            RuntimePlatform {
                architecture: config.task.platform.architecture,
                os_family: config.task.platform.os,
            },
            &task_role,
            &execution_role,
        )?;

        let repository = builder.declare_image_repository(&config.container.repository)?;

        let container = builder.attach_container(
            &task_definition,
            &config.container_name(),
            ImageSource::FromRepository { repository },
            LogConfig {
                stream_prefix: config.log_stream_prefix(),
            },
        )?;

        for env in &config.container.env {
            let value = match (&env.value, &env.lookup) {
                (Some(literal), _) => literal.clone(),
                (None, Some(key)) => {
                    debug!("Resolving plain binding '{}' from store entry '{key}'", env.name);
                    self.params.require(key)?
                }
                // Structurally invalid entries are caught by the validator;
                // an empty value here keeps compilation total.
                (None, None) => String::new(),
            };
            builder.bind_plain_value(&container, &env.name, &value)?;
        }

        for secret in &config.container.secrets {
            builder.bind_secret_value(&container, &secret.name, &secret.entry, secret.version)?;
        }

        builder.declare_cluster(&config.cluster.name, &network, config.cluster.elastic_capacity)?;

        builder.declare_security_boundary(&config.security.name, &network, config.security.outbound)?;

        let graph = builder.finalize()?;
        info!(
            "Compiled stack '{}' into {} resources",
            config.stack.name,
            graph.len()
        );
        Ok(ProvisioningManifest::from_graph(&config.stack.name, &graph))
    }
}
