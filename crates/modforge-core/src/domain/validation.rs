use crate::domain::{
    entities::{LocalDependency, ModuleConfiguration, ModuleTree, WorkspaceContainer},
    error::DomainError,
};

/// Single entry point for domain invariants checked by the services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_module(module: &ModuleConfiguration) -> Result<(), DomainError> {
        module.validate()
    }

    /// Exposed products must be a subset of the products the package offers.
    pub fn validate_local_dependency(dep: &LocalDependency) -> Result<(), DomainError> {
        dep.validate()
    }

    pub fn validate_module_tree(tree: &ModuleTree, module: &str) -> Result<(), DomainError> {
        tree.validate(module)
    }

    pub fn validate_workspace(container: &WorkspaceContainer) -> Result<(), DomainError> {
        container.validate()
    }
}
