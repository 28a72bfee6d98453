//! Client core for the variant API.
//!
//! # Overview
//! Typed access to a backend managing application variants (named
//! configurations with parameters), datasets, and evaluation records. Builds
//! `HttpRequest` values and parses `HttpResponse` values without touching the
//! network (host-does-IO pattern); the caller executes the actual round trip,
//! making the core fully deterministic and testable.
//!
//! # Design
//! - `VariantClient` and `EvaluationClient` are stateless — each holds only
//!   its base URL. The evaluation base path is fixed at construction.
//! - Each operation is split into `build_*` (produces request) and `parse_*`
//!   (consumes response), so the I/O boundary is explicit. No retries,
//!   timeouts, or cancellation live here; the host owns all of that.
//! - `DatasetsLoader` wraps the dataset listing in an explicit
//!   loading/loaded/failed state machine.
//! - The process-wide base URL is set once at startup (`config`), with an
//!   environment override; clients can also take an explicit URL.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod datasets;
pub mod error;
pub mod http;
pub mod openapi;
pub mod types;

pub use client::{EvaluationClient, VariantClient};
pub use datasets::DatasetsLoader;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use openapi::parse_openapi_parameters;
pub use types::{
    AppVariantRef, ListedVariant, NewVariantRequest, Parameter, RemoveAppRequest,
    RemoveVariantRequest, Variant, VariantParameters,
};
