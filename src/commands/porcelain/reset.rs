use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Check out the commit `revision` names and move the current branch to it
    pub fn reset(&mut self, revision: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        let target_oid = Revision::try_parse(revision)?.resolve(self)?;
        let target_commit = self.database().load_commit(&target_oid)?;

        self.switch_tree(&target_commit)?;
        self.refs().update_head(&target_oid)?;

        Ok(target_oid)
    }
}
