use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;
use colored::Colorize;
use std::io::Write;

impl Repository {
    pub fn status(&self) -> anyhow::Result<StatusInfo> {
        self.ensure_initialized()?;

        let status = self.inspect_status().initialize()?;

        self.print_branches(&status)?;
        self.print_staged_files(&status)?;
        self.print_removed_files(&status)?;
        self.print_workspace_changes(&status)?;
        self.print_untracked_files(&status)?;

        Ok(status)
    }

    fn print_branches(&self, status: &StatusInfo) -> anyhow::Result<()> {
        writeln!(self.writer(), "=== Branches ===")?;
        for branch in &status.branches {
            if branch == &status.current_branch {
                writeln!(self.writer(), "{}", format!("*{}", branch).green())?;
            } else {
                writeln!(self.writer(), "{}", branch)?;
            }
        }
        writeln!(self.writer())?;

        Ok(())
    }

    fn print_staged_files(&self, status: &StatusInfo) -> anyhow::Result<()> {
        writeln!(self.writer(), "=== Staged Files ===")?;
        for file in &status.staged_files {
            writeln!(self.writer(), "{}", file.display().to_string().green())?;
        }
        writeln!(self.writer())?;

        Ok(())
    }

    fn print_removed_files(&self, status: &StatusInfo) -> anyhow::Result<()> {
        writeln!(self.writer(), "=== Removed Files ===")?;
        for file in &status.removed_files {
            writeln!(self.writer(), "{}", file.display().to_string().red())?;
        }
        writeln!(self.writer())?;

        Ok(())
    }

    fn print_workspace_changes(&self, status: &StatusInfo) -> anyhow::Result<()> {
        writeln!(self.writer(), "=== Modifications Not Staged For Commit ===")?;
        for (file, change) in &status.workspace_changeset {
            writeln!(self.writer(), "{} {}", file.display(), change)?;
        }
        writeln!(self.writer())?;

        Ok(())
    }

    fn print_untracked_files(&self, status: &StatusInfo) -> anyhow::Result<()> {
        writeln!(self.writer(), "=== Untracked Files ===")?;
        for file in &status.untracked_files {
            writeln!(self.writer(), "{}", file.display())?;
        }
        writeln!(self.writer())?;

        Ok(())
    }
}
