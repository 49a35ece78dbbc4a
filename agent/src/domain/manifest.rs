//! Pod manifest rendering, parsing and file naming.
//!
//! Pure functions only, no I/O.

use anyhow::Result;
use edge_models::WorkloadSpec;
use serde::{Deserialize, Serialize};

use crate::domain::error::WorkloadError;

/// Extension of every manifest file.
pub const MANIFEST_EXTENSION: &str = "yaml";

const POD_KIND: &str = "Pod";
const POD_API_VERSION: &str = "v1";

/// Runnable pod description written to the manifest directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodManifest {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: serde_yaml::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
}

/// Validates a workload name before it is turned into a file name.
///
/// # Errors
///
/// Returns [`WorkloadError::InvalidName`] for empty names, `.`/`..`, and
/// names containing `/` or `\`.
pub fn validate_workload_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(WorkloadError::InvalidName(name.to_string()).into());
    }
    Ok(())
}

/// File name of the manifest for `name`: spaces become hyphens.
#[must_use]
pub fn manifest_file_name(name: &str) -> String {
    format!("{}.{MANIFEST_EXTENSION}", name.replace(' ', "-"))
}

/// Wraps a workload's pod spec into a named `Pod` manifest.
///
/// # Errors
///
/// Returns [`WorkloadError::InvalidSpecification`] if the specification is
/// not a YAML mapping.
pub fn render_pod_manifest(workload: &WorkloadSpec) -> Result<PodManifest> {
    let spec: serde_yaml::Value = serde_yaml::from_str(&workload.specification).map_err(|e| {
        WorkloadError::InvalidSpecification {
            name: workload.name.clone(),
            reason: e.to_string(),
        }
    })?;
    if !spec.is_mapping() {
        return Err(WorkloadError::InvalidSpecification {
            name: workload.name.clone(),
            reason: "pod spec must be a YAML mapping".to_string(),
        }
        .into());
    }
    Ok(PodManifest {
        api_version: POD_API_VERSION.to_string(),
        kind: POD_KIND.to_string(),
        metadata: ObjectMeta {
            name: workload.name.clone(),
        },
        spec,
    })
}

/// Renders a workload straight to manifest YAML text.
///
/// # Errors
///
/// Returns an error if the specification is invalid or serialization fails.
pub fn render_pod_yaml(workload: &WorkloadSpec) -> Result<String> {
    let manifest = render_pod_manifest(workload)?;
    Ok(serde_yaml::to_string(&manifest)?)
}

/// Recovers the declared workload name from manifest text.
///
/// # Errors
///
/// Returns [`WorkloadError::InvalidManifest`] if the text is not a manifest or
/// carries no name.
pub fn parse_manifest_name(content: &str) -> Result<String> {
    let manifest: PodManifest = serde_yaml::from_str(content)
        .map_err(|e| WorkloadError::InvalidManifest(e.to_string()))?;
    if manifest.metadata.name.is_empty() {
        return Err(WorkloadError::InvalidManifest("metadata.name is empty".to_string()).into());
    }
    Ok(manifest.metadata.name)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
