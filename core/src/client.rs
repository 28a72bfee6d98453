//! Request builders and response parsers for the variant API.
//!
//! # Design
//! Every backend operation is a single stateless round trip, so each one is
//! expressed as a `build_*` method producing an `HttpRequest` plus a
//! `parse_*` method consuming the `HttpResponse` the host obtained. The
//! clients hold nothing but their base URL; there is no ordering between
//! calls and no shared state for concurrent callers to trip over.
//!
//! `EvaluationClient` is the same pattern with its base path fixed to the
//! evaluation sub-resource at construction time.
//!
//! The save and remove operations emit diagnostic log records around the
//! round trip. Logging is observability only: errors are returned unchanged
//! after the record is emitted.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config;
use crate::error::ApiError;
use crate::http::{query_string, HttpMethod, HttpRequest, HttpResponse};
use crate::openapi::parse_openapi_parameters;
use crate::types::{
    AppVariantRef, ListedVariant, NewVariantRequest, Parameter, RemoveAppRequest,
    RemoveVariantRequest, Variant, VariantParameters,
};

/// Stateless client for the variant, dataset, and generation endpoints.
///
/// The host executes the HTTP round trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct VariantClient {
    base_url: String,
}

impl VariantClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Construct a client from the process-wide base URL.
    pub fn from_config() -> Self {
        Self::new(config::base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET the variants of an application.
    ///
    /// The application name is passed through as-is; validating it is the
    /// backend's job.
    pub fn build_list_variants(&self, app: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}/api/app_variant/list_variants/?app_name={app}",
                self.base_url
            ),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Map the listing response into local `Variant` values.
    ///
    /// A body that is `null`, not an array, not JSON at all, or an empty
    /// array yields an empty vec — "no variants" is a normal outcome, not a
    /// failure. A non-success status is still an error.
    pub fn parse_list_variants(&self, response: HttpResponse) -> Result<Vec<Variant>, ApiError> {
        check_status(&response, 200)?;

        let Ok(payload) = serde_json::from_str::<Value>(&response.body) else {
            return Ok(Vec::new());
        };
        let Some(items) = payload.as_array() else {
            return Ok(Vec::new());
        };

        items
            .iter()
            .map(|item| {
                serde_json::from_value::<ListedVariant>(item.clone())
                    .map(Variant::from)
                    .map_err(|e| ApiError::DeserializationError(e.to_string()))
            })
            .collect()
    }

    /// POST to a variant's generate endpoint.
    ///
    /// The query string carries the caller-supplied input values followed by
    /// every optional parameter that has a non-empty default. Both halves may
    /// be empty; empty segments are never emitted.
    pub fn build_call_variant(
        &self,
        input_params: &[(String, String)],
        opt_params: &[Parameter],
        uri_path: &str,
    ) -> HttpRequest {
        let pairs = input_params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .chain(opt_params.iter().filter_map(|param| {
                param
                    .default
                    .as_deref()
                    .filter(|default| !default.is_empty())
                    .map(|default| (param.name.as_str(), default))
            }));
        let query = query_string(pairs);

        let path = if query.is_empty() {
            format!("{}/{uri_path}/generate", self.base_url)
        } else {
            format!("{}/{uri_path}/generate?{query}", self.base_url)
        };

        HttpRequest {
            method: HttpMethod::Post,
            path,
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    /// The generation payload, passed through as untyped JSON.
    pub fn parse_call_variant(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// GET the OpenAPI document describing a variant's parameters.
    ///
    /// The schema is fetched for the source variant: the template the variant
    /// was derived from if there is one, else the variant itself.
    pub fn build_variant_schema(&self, app: &str, variant: &Variant) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!(
                "{}/{app}/{}/openapi.json",
                self.base_url,
                variant.source_name()
            ),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Extract the variant's parameters from its OpenAPI document and split
    /// them into options and required inputs.
    pub fn parse_variant_parameters(
        &self,
        response: HttpResponse,
    ) -> Result<VariantParameters, ApiError> {
        check_status(&response, 200)?;
        let document: Value = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        let parameters = parse_openapi_parameters(&document)?;
        Ok(VariantParameters::partition(parameters))
    }

    /// POST a new variant derived from the variant's template.
    ///
    /// The parameter list is reduced into a name→default map; later duplicate
    /// names overwrite earlier ones.
    pub fn build_save_new_variant(
        &self,
        app_name: &str,
        variant: &Variant,
        parameters: &[Parameter],
    ) -> Result<HttpRequest, ApiError> {
        let mut defaults = BTreeMap::new();
        for param in parameters {
            defaults.insert(param.name.clone(), param.default.clone().unwrap_or_default());
        }
        log::debug!(
            "saving variant {} of {app_name} (from {:?}) with parameters {defaults:?}",
            variant.variant_name,
            variant.template_variant_name
        );

        let request = NewVariantRequest {
            previous_app_variant: AppVariantRef {
                app_name: app_name.to_string(),
                variant_name: variant.template_variant_name.clone(),
            },
            new_variant_name: variant.variant_name.clone(),
            parameters: defaults,
        };
        let body = serde_json::to_string(&request)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;

        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/app_variant/add/from_previous/", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_save_new_variant(
        &self,
        variant_name: &str,
        response: HttpResponse,
    ) -> Result<(), ApiError> {
        match check_status(&response, 200) {
            Ok(()) => {
                log::info!("variant saved: {variant_name}");
                Ok(())
            }
            Err(error) => {
                log::error!("error saving variant {variant_name}: {error}");
                Err(error)
            }
        }
    }

    /// DELETE an application and everything under it.
    pub fn build_remove_app(&self, app_name: &str) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&RemoveAppRequest {
            app_name: app_name.to_string(),
        })
        .map_err(|e| ApiError::SerializationError(e.to_string()))?;

        Ok(HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/api/app_variant/remove_app/", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_remove_app(&self, app_name: &str, response: HttpResponse) -> Result<(), ApiError> {
        match check_status(&response, 200) {
            Ok(()) => {
                log::info!("app removed: {app_name}");
                Ok(())
            }
            Err(error) => {
                log::error!("error removing app {app_name}: {error}");
                Err(error)
            }
        }
    }

    /// DELETE a single variant of an application.
    pub fn build_remove_variant(
        &self,
        app_name: &str,
        variant_name: &str,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&RemoveVariantRequest {
            app_name: app_name.to_string(),
            variant_name: variant_name.to_string(),
        })
        .map_err(|e| ApiError::SerializationError(e.to_string()))?;

        Ok(HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/api/app_variant/remove_variant/", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_remove_variant(
        &self,
        variant_name: &str,
        response: HttpResponse,
    ) -> Result<(), ApiError> {
        match check_status(&response, 200) {
            Ok(()) => {
                log::info!("variant removed: {variant_name}");
                Ok(())
            }
            Err(error) => {
                log::error!("error removing variant {variant_name}: {error}");
                Err(error)
            }
        }
    }

    /// GET the datasets of an application. See [`crate::DatasetsLoader`] for
    /// the stateful accessor built on top of this pair.
    pub fn build_list_datasets(&self, app_name: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/datasets?app_name={app_name}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_datasets(&self, response: HttpResponse) -> Result<Value, ApiError> {
        parse_datasets_payload(response)
    }
}

/// Dataset listing is shared between `VariantClient` and `DatasetsLoader`.
pub(crate) fn parse_datasets_payload(response: HttpResponse) -> Result<Value, ApiError> {
    check_status(&response, 200)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Client for the evaluation-table sub-resource.
///
/// The evaluation base path is fixed at construction, mirroring how the
/// variant endpoints hang off the plain base URL.
#[derive(Debug, Clone)]
pub struct EvaluationClient {
    base_url: String,
}

impl EvaluationClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: format!("{}/api/app_evaluations", base_url.trim_end_matches('/')),
        }
    }

    /// Construct a client from the process-wide base URL.
    pub fn from_config() -> Self {
        Self::new(config::base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// PUT a caller-supplied payload onto an evaluation table.
    pub fn build_update_evaluations(
        &self,
        evaluation_table_id: &str,
        data: &Value,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_body(
            HttpMethod::Put,
            format!("{}/{evaluation_table_id}", self.base_url),
            data,
        )
    }

    /// PUT a caller-supplied payload onto one row of an evaluation table.
    pub fn build_update_evaluation_row(
        &self,
        evaluation_table_id: &str,
        evaluation_row_id: &str,
        data: &Value,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_body(
            HttpMethod::Put,
            format!(
                "{}/{evaluation_table_id}/evaluation_row/{evaluation_row_id}",
                self.base_url
            ),
            data,
        )
    }

    /// POST a new row onto an evaluation table.
    pub fn build_post_evaluation_row(
        &self,
        evaluation_table_id: &str,
        data: &Value,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_body(
            HttpMethod::Post,
            format!("{}/{evaluation_table_id}/evaluation_row", self.base_url),
            data,
        )
    }

    /// The response body of any evaluation operation, returned directly.
    pub fn parse_evaluations(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    fn build_with_body(
        &self,
        method: HttpMethod,
        path: String,
        data: &Value,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(data).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

/// Map a non-expected status code to `ApiError::HttpError`.
pub(crate) fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
