use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::path::Path;

#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    fn is_content_changed(&self, path: &Path, expected_oid: &ObjectId) -> anyhow::Result<bool> {
        let blob = self.repository.workspace().parse_blob(path)?;
        let oid = blob.object_id()?;

        Ok(&oid != expected_oid)
    }

    /// Compare the working tree file at `path` with the blob the next commit
    /// would record for it
    pub fn check_workspace_against(
        &self,
        path: &Path,
        expected_oid: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if !self.repository.workspace().exists(path) {
            Ok(Some(WorkspaceChangeType::Deleted))
        } else if self.is_content_changed(path, expected_oid)? {
            Ok(Some(WorkspaceChangeType::Modified))
        } else {
            Ok(None)
        }
    }
}
