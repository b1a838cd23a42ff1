//! One editing session and the project it owns.
//!
//! Every user-triggered operation either completes or leaves the project as
//! it was before the attempt.

use crate::libquiz::error::Result;
use crate::libquiz::export;
use crate::libquiz::model::Project;
use crate::libquiz::project_file;
use crate::libquiz::success_audio::SuccessAudio;
use log::debug;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct Session {
    project: Project,
    success: SuccessAudio,
}

impl Session {
    pub fn new(success: SuccessAudio) -> Self {
        Session {
            project: Project::default(),
            success,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Replaces the whole project with the file's contents. On failure the
    /// current project is kept.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.project = project_file::load(path)?;
        debug!("[Session] Project replaced from {:?}", path);
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        project_file::save(&self.project, path)
    }

    /// Applies `edit` to a copy and keeps it only if the edit succeeds.
    pub fn apply<T>(&mut self, edit: impl FnOnce(&mut Project) -> Result<T>) -> Result<T> {
        let mut draft = self.project.clone();
        let out = edit(&mut draft)?;
        self.project = draft;
        Ok(out)
    }

    /// Writes the page to `dest`, or to the project's output file.
    pub fn export(&self, dest: Option<&Path>) -> Result<PathBuf> {
        let dest = dest
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.project.output_file));
        export::export_to_file(&self.project, &self.success, &dest)?;
        Ok(dest)
    }
}
