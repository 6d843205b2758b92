//! Page parameter resolution for the project editor view.

use std::collections::HashMap;

use axum::extract::Path;
use axum::Json;
use mechgraph_core::page::{resolve_project_page, ProjectPageData, PROJECT_PAGE_SSR};
use serde::Serialize;

use crate::middleware::auth::ApiKey;

#[derive(Debug, Serialize)]
pub struct PageResponse {
    #[serde(flatten)]
    pub data: ProjectPageData,
    pub ssr: bool,
}

/// GET /api/v1/pages/projects/{id}
///
/// Hands the raw id through without checking it.
pub async fn project_page(
    _key: ApiKey,
    Path(params): Path<HashMap<String, String>>,
) -> Json<PageResponse> {
    Json(PageResponse {
        data: resolve_project_page(&params),
        ssr: PROJECT_PAGE_SSR,
    })
}
