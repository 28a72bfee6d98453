use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// One configurable field of a stored variant, in wire shape.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub input: bool,
}

/// A variant as stored and listed by the server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredVariant {
    pub variant_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_variant_name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dataset {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct EvaluationTable {
    pub table: Value,
    pub rows: BTreeMap<String, Value>,
}

/// In-memory backend state. BTreeMaps keep listings deterministic.
#[derive(Debug, Default)]
pub struct ServerState {
    pub apps: BTreeMap<String, BTreeMap<String, StoredVariant>>,
    pub datasets: BTreeMap<String, Vec<Dataset>>,
    pub evaluations: BTreeMap<String, EvaluationTable>,
}

impl ServerState {
    /// Seed an application with the given variants.
    pub fn with_app(mut self, app_name: &str, variants: Vec<StoredVariant>) -> Self {
        let app = self.apps.entry(app_name.to_string()).or_default();
        for variant in variants {
            app.insert(variant.variant_name.clone(), variant);
        }
        self
    }

    /// Seed an application's dataset list; ids are assigned here.
    pub fn with_datasets(mut self, app_name: &str, names: &[&str]) -> Self {
        let datasets = self.datasets.entry(app_name.to_string()).or_default();
        for name in names {
            datasets.push(Dataset {
                id: Uuid::new_v4(),
                name: name.to_string(),
            });
        }
        self
    }

    pub fn into_db(self) -> Db {
        Arc::new(RwLock::new(self))
    }
}

pub type Db = Arc<RwLock<ServerState>>;

#[derive(Debug, Deserialize)]
pub struct PreviousAppVariant {
    pub app_name: String,
    #[serde(default)]
    pub variant_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddVariantRequest {
    pub previous_app_variant: PreviousAppVariant,
    pub new_variant_name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveAppRequest {
    pub app_name: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveVariantRequest {
    pub app_name: String,
    pub variant_name: String,
}

pub fn app() -> Router {
    app_with_state(Db::default())
}

pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route("/api/app_variant/list_variants/", get(list_variants))
        .route("/api/app_variant/add/from_previous/", post(add_variant_from_previous))
        .route("/api/app_variant/remove_app/", delete(remove_app))
        .route("/api/app_variant/remove_variant/", delete(remove_variant))
        .route("/api/datasets", get(list_datasets))
        .route("/api/app_evaluations/{table_id}", put(update_evaluations))
        .route("/api/app_evaluations/{table_id}/evaluation_row", post(post_evaluation_row))
        .route(
            "/api/app_evaluations/{table_id}/evaluation_row/{row_id}",
            put(update_evaluation_row),
        )
        .route("/{app}/{variant}/openapi.json", get(openapi_schema))
        .route("/{app}/{variant}/generate", post(generate))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, Db::default()).await
}

pub async fn run_with_state(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}

async fn list_variants(
    State(db): State<Db>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Json<Vec<StoredVariant>> {
    let app_name = query.get("app_name").cloned().unwrap_or_default();
    let state = db.read().await;
    let variants = state
        .apps
        .get(&app_name)
        .map(|app| app.values().cloned().collect())
        .unwrap_or_default();
    Json(variants)
}

async fn add_variant_from_previous(
    State(db): State<Db>,
    Json(input): Json<AddVariantRequest>,
) -> Result<Json<StoredVariant>, StatusCode> {
    let mut state = db.write().await;
    let app = state
        .apps
        .get_mut(&input.previous_app_variant.app_name)
        .ok_or(StatusCode::NOT_FOUND)?;
    let previous_name = input.previous_app_variant.variant_name.unwrap_or_default();
    if !app.contains_key(&previous_name) {
        return Err(StatusCode::NOT_FOUND);
    }

    let variant = StoredVariant {
        variant_name: input.new_variant_name,
        previous_variant_name: Some(previous_name),
        parameters: input
            .parameters
            .into_iter()
            .map(|(name, default)| ParameterSpec {
                name,
                default: Some(default),
                input: false,
            })
            .collect(),
    };
    app.insert(variant.variant_name.clone(), variant.clone());
    Ok(Json(variant))
}

async fn remove_app(State(db): State<Db>, Json(input): Json<RemoveAppRequest>) -> StatusCode {
    let mut state = db.write().await;
    if state.apps.remove(&input.app_name).is_none() {
        return StatusCode::NOT_FOUND;
    }
    state.datasets.remove(&input.app_name);
    StatusCode::OK
}

async fn remove_variant(
    State(db): State<Db>,
    Json(input): Json<RemoveVariantRequest>,
) -> StatusCode {
    let mut state = db.write().await;
    let Some(app) = state.apps.get_mut(&input.app_name) else {
        return StatusCode::NOT_FOUND;
    };
    if app.remove(&input.variant_name).is_none() {
        return StatusCode::NOT_FOUND;
    }
    StatusCode::OK
}

async fn list_datasets(
    State(db): State<Db>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Json<Vec<Dataset>> {
    let app_name = query.get("app_name").cloned().unwrap_or_default();
    let state = db.read().await;
    let datasets = state.datasets.get(&app_name).cloned().unwrap_or_default();
    Json(datasets)
}

/// Synthesize the variant's OpenAPI document from its parameter specs.
/// Options carry a `schema.default`; required inputs do not.
async fn openapi_schema(
    State(db): State<Db>,
    Path((app, variant)): Path<(String, String)>,
) -> Result<Json<Value>, StatusCode> {
    let state = db.read().await;
    let stored = state
        .apps
        .get(&app)
        .and_then(|variants| variants.get(&variant))
        .ok_or(StatusCode::NOT_FOUND)?;

    let parameters: Vec<Value> = stored
        .parameters
        .iter()
        .map(|param| {
            let mut schema = serde_json::json!({"type": "string"});
            if let Some(default) = &param.default {
                schema["default"] = Value::String(default.clone());
            }
            serde_json::json!({
                "name": param.name,
                "in": "query",
                "required": param.default.is_none(),
                "schema": schema,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "openapi": "3.1.0",
        "info": {"title": format!("{app}/{variant}"), "version": "0.1.0"},
        "paths": {
            "/generate": {
                "post": {
                    "parameters": parameters,
                    "responses": {"200": {"description": "generation output"}},
                }
            }
        }
    })))
}

async fn generate(
    State(db): State<Db>,
    Path((app, variant)): Path<(String, String)>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let state = db.read().await;
    if state
        .apps
        .get(&app)
        .and_then(|variants| variants.get(&variant))
        .is_none()
    {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({
        "output": format!("generated by {app}/{variant}"),
        "params": params,
    })))
}

async fn update_evaluations(
    State(db): State<Db>,
    Path(table_id): Path<String>,
    Json(data): Json<Value>,
) -> Json<Value> {
    let mut state = db.write().await;
    let table = state.evaluations.entry(table_id).or_default();
    table.table = data.clone();
    Json(data)
}

async fn post_evaluation_row(
    State(db): State<Db>,
    Path(table_id): Path<String>,
    Json(data): Json<Value>,
) -> Json<Value> {
    let mut state = db.write().await;
    let table = state.evaluations.entry(table_id).or_default();
    let row_id = Uuid::new_v4().to_string();
    let mut row = data;
    if let Value::Object(fields) = &mut row {
        fields.insert("id".to_string(), Value::String(row_id.clone()));
    }
    table.rows.insert(row_id, row.clone());
    Json(row)
}

async fn update_evaluation_row(
    State(db): State<Db>,
    Path((table_id, row_id)): Path<(String, String)>,
    Json(data): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = db.write().await;
    let table = state.evaluations.get_mut(&table_id).ok_or(StatusCode::NOT_FOUND)?;
    let row = table.rows.get_mut(&row_id).ok_or(StatusCode::NOT_FOUND)?;
    *row = data;
    if let Value::Object(fields) = row {
        fields
            .entry("id".to_string())
            .or_insert(Value::String(row_id));
    }
    Ok(Json(row.clone()))
}
