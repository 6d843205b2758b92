//! Route parameter resolution for the project editor page.
//!
//! The editor view needs a browser (the graph canvas cannot be rendered on
//! the server), so the page is flagged as client-rendered and the resolver
//! only hands the project id through. Malformed ids are not checked here;
//! they surface later as a not-found from the store.

use std::collections::HashMap;

use serde::Serialize;

/// Route parameter carrying the project identifier.
pub const PROJECT_ID_PARAM: &str = "id";

/// The editor page is never rendered server-side.
pub const PROJECT_PAGE_SSR: bool = false;

/// Initial data handed to the project editor view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPageData {
    pub project_id: String,
}

/// Build the editor page data from the route parameter map.
pub fn resolve_project_page(params: &HashMap<String, String>) -> ProjectPageData {
    ProjectPageData {
        project_id: params.get(PROJECT_ID_PARAM).cloned().unwrap_or_default(),
    }
}
