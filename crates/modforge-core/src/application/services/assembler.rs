//! Module configuration assembler - builds the template context.
//!
//! The context is a pure function of the module configuration, the merged
//! configuration and one clock reading. Module values win over
//! configuration; configuration fills whatever the module leaves unset.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{Datelike, SecondsFormat};
use tracing::instrument;

use crate::{
    application::{ports::Clock, services::DependencyResolver},
    domain::{
        MergedConfiguration, ModuleConfiguration, Platform, TemplateContext, Value, ValueMap,
        context_keys as ctx, interface_name, keys, value,
    },
    error::ModforgeResult,
};

pub struct ModuleConfigurationAssembler {
    resolver: DependencyResolver,
    clock: Arc<dyn Clock>,
}

impl ModuleConfigurationAssembler {
    pub fn new(resolver: DependencyResolver, clock: Arc<dyn Clock>) -> Self {
        Self { resolver, clock }
    }

    pub fn resolver(&self) -> &DependencyResolver {
        &self.resolver
    }

    #[instrument(skip_all, fields(module = module.name()))]
    pub fn assemble(
        &self,
        module: &ModuleConfiguration,
        config: &MergedConfiguration,
    ) -> ModforgeResult<TemplateContext> {
        let exclusions = config
            .get_string_list(keys::DEPENDENCY_EXCLUSIONS)?
            .unwrap_or_default();
        let module = module.excluding(&exclusions);

        let resolved = self.resolver.resolve(
            module.target_path(),
            module.name(),
            module.local_dependencies(),
            module.remote_dependencies(),
        )?;

        let text = |own: Option<&str>, key: &str| -> ModforgeResult<String> {
            Ok(match own {
                Some(v) => v.to_string(),
                None => config.get_str(key)?.unwrap_or_default().to_string(),
            })
        };

        let now = self.clock.now();

        Ok(TemplateContext::new()
            .with(ctx::NAME, module.name())
            .with(ctx::MODULE_KIND, module.kind().as_str())
            .with(ctx::INTERFACE_NAME, interface_name(module.name()))
            .with(ctx::TESTS_NAME, format!("{}Tests", module.name()))
            .with(ctx::AUTHOR, text(module.author(), keys::AUTHOR)?)
            .with(ctx::ORGANIZATION, text(module.organization(), keys::ORGANIZATION)?)
            .with(
                ctx::BUNDLE_IDENTIFIER,
                text(module.bundle_identifier(), keys::BUNDLE_IDENTIFIER)?,
            )
            .with(ctx::TOOLS_VERSION, text(module.tools_version(), keys::TOOLS_VERSION)?)
            .with(ctx::PLATFORMS, Value::string_list(platforms(&module, config)?))
            .with(ctx::PACKAGE_DEPENDENCIES, Value::string_list(resolved.package_lines()))
            .with(ctx::TARGET_DEPENDENCIES, Value::string_list(resolved.target_lines()))
            .with(ctx::CUSTOM_VARIABLES, custom_variables(&module, config)?)
            .with(ctx::TIMESTAMP, now.to_rfc3339_opts(SecondsFormat::Secs, true))
            .with(ctx::YEAR, i64::from(now.year())))
    }
}

/// Described platforms: the module's own, or the configured list.
fn platforms(
    module: &ModuleConfiguration,
    config: &MergedConfiguration,
) -> ModforgeResult<Vec<String>> {
    if !module.platforms().is_empty() {
        return Ok(module.platforms().iter().map(Platform::describe).collect());
    }

    config
        .get_string_list(keys::PLATFORMS)?
        .unwrap_or_default()
        .iter()
        .map(|raw| -> ModforgeResult<String> { Ok(Platform::from_str(raw)?.describe()) })
        .collect()
}

/// Configured variables overlaid by the module's.
fn custom_variables(
    module: &ModuleConfiguration,
    config: &MergedConfiguration,
) -> ModforgeResult<ValueMap> {
    let mut merged = config
        .get_map(keys::CUSTOM_VARIABLES)?
        .cloned()
        .unwrap_or_default();
    value::merge_maps(&mut merged, module.custom_variables().clone());
    Ok(merged)
}
