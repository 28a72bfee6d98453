//! Stateful accessor for the dataset listing.
//!
//! # Design
//! An explicit three-field state machine replaces the render-cycle hook of
//! typical frontend data fetching: the loader starts in `Loading`, the host
//! executes the pending request, and feeds back either the response or a
//! transport error. `datasets()`, `error()`, and `is_loading()` are
//! observable at every point and follow the usual derivation — loading is
//! true until data or an error is present. Transitions are monotonic; once
//! settled, further feeding is ignored.

use serde_json::Value;

use crate::client::{parse_datasets_payload, VariantClient};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

#[derive(Debug)]
enum LoadState {
    Loading,
    Loaded(Value),
    Failed(ApiError),
}

/// Tracks one dataset-listing request from issue to settlement.
#[derive(Debug)]
pub struct DatasetsLoader {
    request: HttpRequest,
    state: LoadState,
}

impl DatasetsLoader {
    /// Build the listing request for `app_name` and start in `Loading`.
    pub fn new(client: &VariantClient, app_name: &str) -> Self {
        Self {
            request: client.build_list_datasets(app_name),
            state: LoadState::Loading,
        }
    }

    /// The request the host should execute. Stable across the loader's life,
    /// so a host may also use it to retry after `fail`-free inspection.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Feed back the HTTP response. Settles into `Loaded` on a parsable
    /// success payload, `Failed` otherwise. Ignored once settled.
    pub fn resolve(&mut self, response: HttpResponse) {
        if !self.is_loading() {
            return;
        }
        self.state = match parse_datasets_payload(response) {
            Ok(payload) => LoadState::Loaded(payload),
            Err(error) => LoadState::Failed(error),
        };
    }

    /// Feed back a transport failure that produced no response at all.
    /// Ignored once settled.
    pub fn fail(&mut self, error: ApiError) {
        if self.is_loading() {
            self.state = LoadState::Failed(error);
        }
    }

    /// The raw dataset payload, once available.
    pub fn datasets(&self) -> Option<&Value> {
        match &self.state {
            LoadState::Loaded(payload) => Some(payload),
            _ => None,
        }
    }

    /// The failure, if the request failed.
    pub fn error(&self) -> Option<&ApiError> {
        match &self.state {
            LoadState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// True until data or an error is present.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }
}
