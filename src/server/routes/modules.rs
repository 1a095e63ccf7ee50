//! Module-registry and permission-matrix management endpoints
//!
//! Thin administrative surface over the registry and matrix. These routes
//! are themselves protected by the authorization middleware like any other
//! resource under the API prefix.

use crate::auth::PermissionEntry;
use crate::registry::Module;
use crate::server::AppState;
use crate::utils::error::GateError;
use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Module creation request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateModule {
    /// Name shown in navigation
    pub display_name: String,
    /// Stable internal name
    pub internal_name: String,
    /// Depth hint
    #[serde(default)]
    pub level: i32,
    /// Sibling ordering
    #[serde(default)]
    pub order_no: i32,
    /// Governed request path; omit for grouping nodes
    #[serde(default)]
    pub canonical_path: Option<String>,
    /// Parent module id
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Organizational node rather than a leaf resource
    #[serde(default)]
    pub is_group: bool,
    /// UI visibility hint
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

/// One row of a role's permission set, as sent by the management UI
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRow {
    /// Module the row governs
    pub module_id: Uuid,
    /// GET allowed
    #[serde(default)]
    pub can_read: bool,
    /// POST allowed
    #[serde(default)]
    pub can_add: bool,
    /// PUT/PATCH/DELETE allowed
    #[serde(default)]
    pub can_update: bool,
    /// Visible in navigation
    #[serde(default)]
    pub can_see: bool,
}

/// All modules, siblings grouped and ordered
pub async fn list_modules(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.registry.list_all()))
}

/// The module forest grouped by parent id
pub async fn module_tree(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.registry.build_tree()))
}

/// Register a new module
pub async fn create_module(
    state: web::Data<AppState>,
    request: web::Json<CreateModule>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();

    if let Some(path) = &request.canonical_path {
        if !path.starts_with('/') {
            return Err(
                GateError::BadRequest(format!("canonical path {path:?} must be absolute")).into(),
            );
        }
    }

    let module = Module {
        id: Uuid::new_v4(),
        display_name: request.display_name,
        internal_name: request.internal_name,
        level: request.level,
        order_no: request.order_no,
        canonical_path: request.canonical_path,
        parent_id: request.parent_id,
        is_group: request.is_group,
        visible: request.visible,
    };
    state.registry.insert(module.clone())?;
    info!(module = %module.internal_name, "module registered");
    Ok(HttpResponse::Created().json(module))
}

/// Delete a module and its permission-matrix rows
pub async fn delete_module(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let id = id.into_inner();
    let Some(module) = state.registry.remove(id) else {
        return Err(GateError::NotFound(format!("module {id} does not exist")).into());
    };

    // Matrix rows for a vanished module would fail closed anyway; cleaning
    // them up here keeps the table from accumulating orphans.
    state.matrix.remove_module(id);
    info!(module = %module.internal_name, "module removed");
    Ok(HttpResponse::NoContent().finish())
}

/// A role's current permission entries
pub async fn role_permissions(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.matrix.entries_for_role(id.into_inner())))
}

/// Replace a role's entire permission set in one write
pub async fn replace_role_permissions(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    rows: web::Json<Vec<PermissionRow>>,
) -> ActixResult<HttpResponse> {
    let role_id = id.into_inner();
    let entries: Vec<PermissionEntry> = rows
        .into_inner()
        .into_iter()
        .map(|row| PermissionEntry {
            role_id,
            module_id: row.module_id,
            can_read: row.can_read,
            can_add: row.can_add,
            can_update: row.can_update,
            can_see: row.can_see,
        })
        .collect();

    let count = entries.len();
    state.matrix.replace_role(role_id, entries);
    info!(%role_id, count, "role permissions replaced");
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": count })))
}
