/// Project access resolution
///
/// Every board operation resolves the caller's standing on the project
/// first: owner, editor member, or viewer member. Owners and editors may
/// mutate board structure; viewers may read and comment. A caller with no
/// standing gets `None`, which the API surfaces as 404 so project ids don't
/// leak.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::project::{MemberRole, Project, ProjectMember};

#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    #[error("Project not found")]
    NotFound,

    #[error("Insufficient project permissions")]
    Forbidden,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// A caller's standing on one project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAccess {
    Owner,
    Editor,
    Viewer,
}

impl ProjectAccess {
    /// May this standing mutate board structure?
    pub fn can_edit(&self) -> bool {
        matches!(self, ProjectAccess::Owner | ProjectAccess::Editor)
    }

    /// Resolves the caller's standing on a project, if any
    pub async fn resolve(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(project) = Project::find_by_id(pool, project_id).await? else {
            return Ok(None);
        };

        if project.owner_id == user_id {
            return Ok(Some(ProjectAccess::Owner));
        }

        match ProjectMember::find(pool, project_id, user_id).await? {
            Some(member) => Ok(Some(match member.role {
                MemberRole::Editor => ProjectAccess::Editor,
                MemberRole::Viewer => ProjectAccess::Viewer,
            })),
            None => Ok(None),
        }
    }
}

/// Requires at least viewer standing; no standing reads as not-found
pub async fn require_member(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<ProjectAccess, AuthzError> {
    ProjectAccess::resolve(pool, project_id, user_id)
        .await?
        .ok_or(AuthzError::NotFound)
}

/// Requires owner or editor standing
pub async fn require_editor(
    pool: &PgPool,
    project_id: Uuid,
    user_id: Uuid,
) -> Result<ProjectAccess, AuthzError> {
    let access = require_member(pool, project_id, user_id).await?;
    if !access.can_edit() {
        return Err(AuthzError::Forbidden);
    }
    Ok(access)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_edit() {
        assert!(ProjectAccess::Owner.can_edit());
        assert!(ProjectAccess::Editor.can_edit());
        assert!(!ProjectAccess::Viewer.can_edit());
    }
}
