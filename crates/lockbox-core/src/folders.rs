//! Folder/project store — the hierarchical resource integrity model.
//!
//! Folders own projects through a foreign key; deleting a folder that still
//! has projects is rejected (restrict, never cascade). Both the uniqueness
//! of folder names and the restrict policy are enforced by attempting the
//! statement and classifying the constraint violation — no pre-check, so
//! there is no race between check and write.
//!
//! Project operations are keyed by folder name and only reachable for an
//! existing folder: every project call resolves the parent first and fails
//! with not-found otherwise.

use serde::Serialize;
use uuid::Uuid;

use crate::db::{self, Database};
use crate::error::StoreError;
use crate::records::now_iso;

/// A folder. `folder_name` is unique across all folders; `uuid` is generated
/// at creation and immutable.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Folder {
    pub uuid: String,
    pub folder_name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A project, child of exactly one folder. `project_name` is unique within
/// its folder's namespace.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub uuid: String,
    pub folder_uuid: String,
    pub project_name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Store owning the lifecycle of folder and project rows.
#[derive(Clone)]
pub struct FolderStore {
    db: Database,
}

impl FolderStore {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List all folders, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] on storage failure.
    pub async fn list(&self) -> Result<Vec<Folder>, StoreError> {
        let folders = sqlx::query_as::<_, Folder>(
            r"SELECT uuid, folder_name, description, created_at, updated_at
              FROM folders
              ORDER BY folder_name",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(folders)
    }

    /// Create a folder with a fresh UUID. `description` defaults to empty;
    /// `created_at` and `updated_at` are set to the same instant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateName`] when `name` is already taken.
    pub async fn create(&self, name: &str, description: &str) -> Result<Folder, StoreError> {
        let uuid = Uuid::new_v4().to_string();
        let now = now_iso();

        let result = sqlx::query_as::<_, Folder>(
            r"INSERT INTO folders (uuid, folder_name, description, created_at, updated_at)
              VALUES (?, ?, ?, ?, ?)
              RETURNING uuid, folder_name, description, created_at, updated_at",
        )
        .bind(&uuid)
        .bind(name)
        .bind(description)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(folder) => {
                tracing::debug!(folder = %folder.folder_name, uuid = %folder.uuid, "folder created");
                Ok(folder)
            }
            Err(e) if db::is_unique_violation(&e) => Err(StoreError::DuplicateName {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a folder by its unique name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no folder matches.
    pub async fn get_by_name(&self, name: &str) -> Result<Folder, StoreError> {
        sqlx::query_as::<_, Folder>(
            r"SELECT uuid, folder_name, description, created_at, updated_at
              FROM folders
              WHERE folder_name = ?",
        )
        .bind(name)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| StoreError::NotFound {
            resource: format!("folder '{name}'"),
        })
    }

    /// Delete a folder by name.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ReferentialIntegrity`] when projects still reference
    ///   the folder. The folder is left untouched.
    /// - [`StoreError::NotFound`] when no folder matches.
    pub async fn delete_by_name(&self, name: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM folders WHERE folder_name = ?")
            .bind(name)
            .execute(self.db.pool())
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(StoreError::NotFound {
                resource: format!("folder '{name}'"),
            }),
            Ok(_) => {
                tracing::debug!(folder = %name, "folder deleted");
                Ok(())
            }
            Err(e) if db::is_foreign_key_violation(&e) => Err(StoreError::ReferentialIntegrity {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    // ── Projects ─────────────────────────────────────────────────────

    /// List the projects under a folder, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the folder does not exist.
    pub async fn list_projects(&self, folder_name: &str) -> Result<Vec<Project>, StoreError> {
        let folder = self.get_by_name(folder_name).await?;

        let projects = sqlx::query_as::<_, Project>(
            r"SELECT uuid, folder_uuid, project_name, description, created_at, updated_at
              FROM projects
              WHERE folder_uuid = ?
              ORDER BY project_name",
        )
        .bind(&folder.uuid)
        .fetch_all(self.db.pool())
        .await?;

        Ok(projects)
    }

    /// Create a project under an existing folder.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] when the folder does not exist.
    /// - [`StoreError::DuplicateName`] when the project name is already
    ///   taken within the folder.
    pub async fn create_project(
        &self,
        folder_name: &str,
        name: &str,
        description: &str,
    ) -> Result<Project, StoreError> {
        let folder = self.get_by_name(folder_name).await?;
        let uuid = Uuid::new_v4().to_string();
        let now = now_iso();

        let result = sqlx::query_as::<_, Project>(
            r"INSERT INTO projects (uuid, folder_uuid, project_name, description, created_at, updated_at)
              VALUES (?, ?, ?, ?, ?, ?)
              RETURNING uuid, folder_uuid, project_name, description, created_at, updated_at",
        )
        .bind(&uuid)
        .bind(&folder.uuid)
        .bind(name)
        .bind(description)
        .bind(&now)
        .bind(&now)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(project) => {
                tracing::debug!(folder = %folder_name, project = %name, "project created");
                Ok(project)
            }
            Err(e) if db::is_unique_violation(&e) => Err(StoreError::DuplicateName {
                name: name.to_owned(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a project by name within a folder.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the folder or the project does
    /// not exist.
    pub async fn delete_project(
        &self,
        folder_name: &str,
        project_name: &str,
    ) -> Result<(), StoreError> {
        let folder = self.get_by_name(folder_name).await?;

        let done = sqlx::query("DELETE FROM projects WHERE folder_uuid = ? AND project_name = ?")
            .bind(&folder.uuid)
            .bind(project_name)
            .execute(self.db.pool())
            .await?;

        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                resource: format!("project '{project_name}'"),
            });
        }

        tracing::debug!(folder = %folder_name, project = %project_name, "project deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store() -> FolderStore {
        FolderStore::new(Database::in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn create_generates_uuid_and_equal_timestamps() {
        let store = store().await;
        let folder = store.create("alpha", "").await.unwrap();

        assert!(!folder.uuid.is_empty());
        assert_eq!(folder.folder_name, "alpha");
        assert_eq!(folder.description, "");
        assert_eq!(folder.created_at, folder.updated_at);
    }

    #[tokio::test]
    async fn duplicate_folder_name_is_rejected() {
        let store = store().await;
        store.create("alpha", "first").await.unwrap();

        let err = store.create("alpha", "second").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { ref name } if name == "alpha"));

        // Exactly one row survives.
        assert_eq!(store.list().await.unwrap().len(), 1);
        assert_eq!(
            store.get_by_name("alpha").await.unwrap().description,
            "first"
        );
    }

    #[tokio::test]
    async fn get_by_name_unknown_is_not_found() {
        let store = store().await;
        let err = store.get_by_name("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_unknown_folder_is_not_found() {
        let store = store().await;
        let err = store.delete_by_name("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_is_restricted_while_projects_exist() {
        let store = store().await;
        store.create("alpha", "").await.unwrap();
        store.create_project("alpha", "svc", "").await.unwrap();

        let err = store.delete_by_name("alpha").await.unwrap_err();
        assert!(matches!(err, StoreError::ReferentialIntegrity { ref name } if name == "alpha"));

        // The failed delete had no side effects.
        assert!(store.get_by_name("alpha").await.is_ok());
        assert_eq!(store.list_projects("alpha").await.unwrap().len(), 1);

        // Once the child is gone the same call succeeds.
        store.delete_project("alpha", "svc").await.unwrap();
        store.delete_by_name("alpha").await.unwrap();
        assert!(matches!(
            store.get_by_name("alpha").await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn create_then_delete_scenario() {
        let store = store().await;

        let folder = store.create("alpha", "").await.unwrap();
        assert!(!folder.uuid.is_empty());
        assert_eq!(folder.description, "");
        assert_eq!(folder.created_at, folder.updated_at);

        store.delete_by_name("alpha").await.unwrap();
        assert!(matches!(
            store.get_by_name("alpha").await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn list_is_ordered_by_name() {
        let store = store().await;
        store.create("zeta", "").await.unwrap();
        store.create("alpha", "").await.unwrap();
        store.create("mid", "").await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.folder_name)
            .collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn project_operations_require_an_existing_folder() {
        let store = store().await;

        assert!(matches!(
            store.list_projects("ghost").await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert!(matches!(
            store.create_project("ghost", "svc", "").await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert!(matches!(
            store.delete_project("ghost", "svc").await.unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn project_names_are_unique_per_folder_only() {
        let store = store().await;
        store.create("alpha", "").await.unwrap();
        store.create("beta", "").await.unwrap();

        store.create_project("alpha", "svc", "").await.unwrap();
        let err = store.create_project("alpha", "svc", "").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { .. }));

        // Same name in a different folder is fine.
        store.create_project("beta", "svc", "").await.unwrap();
    }

    #[tokio::test]
    async fn delete_unknown_project_is_not_found() {
        let store = store().await;
        store.create("alpha", "").await.unwrap();

        let err = store.delete_project("alpha", "ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
