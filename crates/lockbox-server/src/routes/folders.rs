//! Folder and project routes: `/folders`
//!
//! Folder CRUD plus project sub-resources nested under each folder name.
//! Deletion is restrict: a folder with projects attached answers 400 and is
//! left untouched. Project routes answer 404 when the parent folder does not
//! exist.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use lockbox_core::folders::{Folder, Project};

use crate::error::AppError;
use crate::state::AppState;

/// Build the `/folders` router.
///
/// Paths:
/// - `GET    /folders` — list folders
/// - `POST   /folders` — create a folder
/// - `GET    /folders/{folder_name}` — folder details
/// - `DELETE /folders/{folder_name}` — delete (restrict)
/// - `GET    /folders/{folder_name}/projects` — list projects
/// - `POST   /folders/{folder_name}/projects` — create a project
/// - `DELETE /folders/{folder_name}/projects/{project_name}` — delete a project
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_folders).post(create_folder))
        .route("/{folder_name}", get(get_folder).delete(delete_folder))
        .route(
            "/{folder_name}/projects",
            get(list_projects).post(create_project),
        )
        .route(
            "/{folder_name}/projects/{project_name}",
            delete(delete_project),
        )
}

// ── Request / Response types ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub folder_name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub project_name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct FolderListResponse {
    pub folders: Vec<Folder>,
}

#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub folder: Folder,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub project: Project,
}

// ── Folder handlers ──────────────────────────────────────────────────

/// `GET /folders` — list all folders.
async fn list_folders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FolderListResponse>, AppError> {
    let folders = state.folders.list().await?;

    Ok(Json(FolderListResponse { folders }))
}

/// `POST /folders` — create a folder.
async fn create_folder(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<FolderResponse>), AppError> {
    if body.folder_name.is_empty() {
        return Err(AppError::BadRequest("folder_name is required".to_owned()));
    }

    let folder = state
        .folders
        .create(&body.folder_name, &body.description)
        .await?;

    Ok((StatusCode::CREATED, Json(FolderResponse { folder })))
}

/// `GET /folders/{folder_name}` — folder details.
async fn get_folder(
    State(state): State<Arc<AppState>>,
    Path(folder_name): Path<String>,
) -> Result<Json<FolderResponse>, AppError> {
    let folder = state.folders.get_by_name(&folder_name).await?;

    Ok(Json(FolderResponse { folder }))
}

/// `DELETE /folders/{folder_name}` — delete a folder (restrict policy).
async fn delete_folder(
    State(state): State<Arc<AppState>>,
    Path(folder_name): Path<String>,
) -> Result<StatusCode, AppError> {
    state.folders.delete_by_name(&folder_name).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ── Project handlers ─────────────────────────────────────────────────

/// `GET /folders/{folder_name}/projects` — list the folder's projects.
async fn list_projects(
    State(state): State<Arc<AppState>>,
    Path(folder_name): Path<String>,
) -> Result<Json<ProjectListResponse>, AppError> {
    let projects = state.folders.list_projects(&folder_name).await?;

    Ok(Json(ProjectListResponse { projects }))
}

/// `POST /folders/{folder_name}/projects` — create a project under a folder.
async fn create_project(
    State(state): State<Arc<AppState>>,
    Path(folder_name): Path<String>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    if body.project_name.is_empty() {
        return Err(AppError::BadRequest("project_name is required".to_owned()));
    }

    let project = state
        .folders
        .create_project(&folder_name, &body.project_name, &body.description)
        .await?;

    Ok((StatusCode::CREATED, Json(ProjectResponse { project })))
}

/// `DELETE /folders/{folder_name}/projects/{project_name}` — delete a project.
async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path((folder_name, project_name)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    state
        .folders
        .delete_project(&folder_name, &project_name)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
