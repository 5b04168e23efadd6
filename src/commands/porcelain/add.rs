use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use std::path::Path;

impl Repository {
    /// Stage the current content of `path`
    ///
    /// Content identical to the HEAD commit's unstages the path instead,
    /// cancelling a pending removal as well.
    pub fn add(&mut self, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let path = self.workspace().relative_path(Path::new(path))?;
        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;

        let (_, head_commit) = self.head_commit()?;
        let mut staged = self.load_staged()?;

        if staged.add(&head_commit, &path, blob_id) {
            self.database().store(&blob)?;
        }

        self.save_staged(&staged)?;

        Ok(())
    }
}
