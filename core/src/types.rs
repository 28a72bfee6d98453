//! Domain DTOs for the variant API.
//!
//! # Design
//! Wire shapes (`ListedVariant`, `NewVariantRequest`, the remove bodies)
//! mirror the backend's JSON exactly; `Variant` is the local shape handed to
//! callers after field renames. The mock-server crate defines its own copies
//! of the wire types; integration tests catch any schema drift between the
//! two crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single configurable input or option of a variant.
///
/// `input == true` marks a parameter the caller must supply a value for;
/// `input == false` marks an option carrying a static default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub input: bool,
}

/// A named, server-stored configuration of an application, optionally derived
/// from another variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variant {
    pub variant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_variant_name: Option<String>,
    pub persistent: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl Variant {
    /// Name of the variant whose OpenAPI schema describes this variant's
    /// parameters: the template if present, else the variant itself.
    pub fn source_name(&self) -> &str {
        self.template_variant_name
            .as_deref()
            .unwrap_or(&self.variant_name)
    }
}

/// Wire shape of one element of the variant-listing response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListedVariant {
    pub variant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_variant_name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl From<ListedVariant> for Variant {
    fn from(wire: ListedVariant) -> Self {
        Variant {
            variant_name: wire.variant_name,
            template_variant_name: wire.previous_variant_name,
            // Everything the listing endpoint returns is stored server-side.
            persistent: true,
            parameters: wire.parameters,
        }
    }
}

/// Identifies a variant within an application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppVariantRef {
    pub app_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
}

/// Request body for saving a new variant derived from a previous one.
///
/// `parameters` maps parameter names to their defaults; duplicate names in
/// the source list collapse last-write-wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewVariantRequest {
    pub previous_app_variant: AppVariantRef,
    pub new_variant_name: String,
    pub parameters: BTreeMap<String, String>,
}

/// Request body for deleting an application and everything under it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoveAppRequest {
    pub app_name: String,
}

/// Request body for deleting a single variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RemoveVariantRequest {
    pub app_name: String,
    pub variant_name: String,
}

/// Parameters of a variant partitioned by the `input` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantParameters {
    /// Options carrying static defaults (`input == false`).
    pub init_opt_params: Vec<Parameter>,
    /// Parameters the caller must supply values for (`input == true`).
    pub input_params: Vec<Parameter>,
}

impl VariantParameters {
    /// Split a parameter list on the `input` flag.
    ///
    /// The partition is total and disjoint: every parameter lands in exactly
    /// one group, and the group lengths sum to the input length.
    pub fn partition(parameters: Vec<Parameter>) -> Self {
        let (input_params, init_opt_params) =
            parameters.into_iter().partition(|param| param.input);
        Self {
            init_opt_params,
            input_params,
        }
    }
}
