//! Resource filter and classification.
//!
//! Only software deployments, software configs and servers are drawn. A
//! resource whose type is outside [`TYPE_ALLOW_LIST`] is skipped; one inside
//! it that is none of the three kinds aborts the run.

use serde_yaml::Value;
use tracing::debug;

use crate::core::HeatVizError;
use crate::dialect::{Dialect, scalar_text};
use crate::graph::Shape;
use crate::template::TemplateDocument;

/// Type-name fragments of the resources that are kept.
pub const TYPE_ALLOW_LIST: &[&str] =
    &["OS::Heat::Structured", "OS::Heat::Software", "OS::Nova::Server", "AWS::EC2::Instance"];

/// The role a resource plays in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Applies a config to a server
    Deployment,
    /// Software configuration consumed by deployments
    Config,
    /// Compute instance
    Server,
}

impl ResourceKind {
    /// Classify a type name; checked in priority order.
    #[must_use]
    pub fn classify(resource_type: &str) -> Option<Self> {
        if resource_type.contains("Deployment") {
            Some(ResourceKind::Deployment)
        } else if resource_type.contains("Config") {
            Some(ResourceKind::Config)
        } else if resource_type.contains("Server") || resource_type.contains("Instance") {
            Some(ResourceKind::Server)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn shape(self) -> Shape {
        match self {
            ResourceKind::Deployment => Shape::Box,
            ResourceKind::Config => Shape::Oval,
            ResourceKind::Server => Shape::Box3d,
        }
    }
}

/// One retained resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEntry {
    pub key: String,
    pub resource_type: String,
    pub kind: ResourceKind,
    /// `Null` when the resource has no properties
    pub properties: Value,
    /// Keys listed in the dependency field, in order
    pub depends_on: Vec<String>,
}

/// Whether a type name is on the allow-list.
#[must_use]
pub fn is_allowed(resource_type: &str) -> bool {
    TYPE_ALLOW_LIST.iter().any(|fragment| resource_type.contains(fragment))
}

/// Collect the drawable resources of `document` in document order.
///
/// A document without a resource section yields no entries.
///
/// # Errors
///
/// - [`HeatVizError::MalformedTemplate`] if the resource section is not a
///   mapping, or a resource has no string type or a bad dependency list
/// - [`HeatVizError::UnexpectedResourceType`] for an allow-listed type that is
///   not a deployment, config or server
pub fn select_resources(
    document: &TemplateDocument,
    dialect: Dialect,
) -> Result<Vec<ResourceEntry>, HeatVizError> {
    let fields = dialect.fields();
    let resources = match document.root().get(fields.resources) {
        None | Some(Value::Null) => {
            debug!("Template has no '{}' section", fields.resources);
            return Ok(Vec::new());
        }
        Some(Value::Mapping(resources)) => resources,
        Some(_) => {
            return Err(HeatVizError::MalformedTemplate {
                reason: format!("'{}' is not a mapping", fields.resources),
            });
        }
    };

    let mut entries = Vec::new();
    for (key, resource) in resources {
        let key = scalar_text(key).ok_or_else(|| HeatVizError::MalformedTemplate {
            reason: format!("resource key {key:?} is not a scalar"),
        })?;

        let resource_type = resource
            .get(fields.resource_type)
            .and_then(Value::as_str)
            .ok_or_else(|| HeatVizError::MalformedTemplate {
                reason: format!("resource '{key}' has no '{}' string", fields.resource_type),
            })?;

        if !is_allowed(resource_type) {
            debug!("Skipping resource {key} of type {resource_type}");
            continue;
        }

        let kind = ResourceKind::classify(resource_type).ok_or_else(|| {
            HeatVizError::UnexpectedResourceType {
                resource: key.clone(),
                resource_type: resource_type.to_string(),
            }
        })?;

        let depends_on = dependency_list(&key, resource.get(fields.depends_on))?;
        let properties = resource.get(fields.properties).cloned().unwrap_or(Value::Null);

        debug!("Selected resource {key} ({resource_type}) as {kind:?}");
        entries.push(ResourceEntry {
            key,
            resource_type: resource_type.to_string(),
            kind,
            properties,
            depends_on,
        });
    }

    Ok(entries)
}

/// A dependency field holds one key or a list of keys.
fn dependency_list(key: &str, value: Option<&Value>) -> Result<Vec<String>, HeatVizError> {
    let malformed = || HeatVizError::MalformedTemplate {
        reason: format!("dependency list of resource '{key}' must be a string or a list of strings"),
    };

    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(single)) => Ok(vec![single.clone()]),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(malformed))
            .collect(),
        Some(_) => Err(malformed()),
    }
}
