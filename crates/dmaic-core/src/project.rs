use crate::catalog::Catalog;
use crate::error::{DmaicError, Result};
use crate::{io, paths};
use crate::types::{Phase, ToolStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ProjectState
// ---------------------------------------------------------------------------

/// Read-only snapshot of a project as seen by the recommendation engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    pub phase: String,
    #[serde(default)]
    pub tools: BTreeMap<String, ToolStatus>,
}

impl ProjectState {
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            tools: BTreeMap::new(),
        }
    }

    pub fn with_status(mut self, tool_id: impl Into<String>, status: ToolStatus) -> Self {
        self.tools.insert(tool_id.into(), status);
        self
    }

    /// Status of `tool_id`; tools without an entry have not been started.
    pub fn status(&self, tool_id: &str) -> ToolStatus {
        self.tools.get(tool_id).copied().unwrap_or_default()
    }

    pub fn is_completed(&self, tool_id: &str) -> bool {
        self.status(tool_id) == ToolStatus::Completed
    }
}

// ---------------------------------------------------------------------------
// ToolProgress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolProgress {
    pub status: ToolStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub phase: Phase,
    #[serde(default)]
    pub tools: BTreeMap<String, ToolProgress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, phase: Phase) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            title: title.into(),
            description: None,
            phase,
            tools: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn create(root: &Path, project: Project) -> Result<Self> {
        let path = paths::project_path(root, &project.slug)?;
        if !paths::dmaic_dir(root).is_dir() {
            return Err(DmaicError::NotInitialized);
        }
        if path.exists() {
            return Err(DmaicError::ProjectExists(project.slug));
        }
        project.save(root)?;
        Ok(project)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let path = paths::project_path(root, slug)?;
        io::read_yaml(&path)?.ok_or_else(|| DmaicError::ProjectNotFound(slug.to_string()))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        io::write_yaml(&paths::project_path(root, &self.slug)?, self)
    }

    pub fn delete(root: &Path, slug: &str) -> Result<()> {
        let path = paths::project_path(root, slug)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DmaicError::ProjectNotFound(slug.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Every project in the store. Files whose name is not a valid slug are
    /// not projects and are skipped.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::projects_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut projects = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if paths::validate_slug(slug).is_err() {
                tracing::debug!(file = %path.display(), "skipping non-project file");
                continue;
            }
            projects.push(Self::load(root, slug)?);
        }
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.updated_at = Utc::now();
    }

    /// Record a status change for `tool_id`, which must exist in `catalog`.
    pub fn set_tool_status(
        &mut self,
        catalog: &Catalog,
        tool_id: &str,
        status: ToolStatus,
    ) -> Result<()> {
        catalog.require_tool(tool_id)?;
        let now = Utc::now();

        if status == ToolStatus::NotStarted {
            self.tools.remove(tool_id);
        } else {
            let entry = self
                .tools
                .entry(tool_id.to_string())
                .or_insert(ToolProgress {
                    status,
                    started_at: None,
                    completed_at: None,
                });
            entry.status = status;
            entry.started_at.get_or_insert(now);
            entry.completed_at = (status == ToolStatus::Completed).then_some(now);
        }

        self.updated_at = now;
        Ok(())
    }

    pub fn tool_status(&self, tool_id: &str) -> ToolStatus {
        self.tools
            .get(tool_id)
            .map(|p| p.status)
            .unwrap_or_default()
    }

    pub fn count_with_status(&self, status: ToolStatus) -> usize {
        self.tools.values().filter(|p| p.status == status).count()
    }

    /// Snapshot handed to the recommendation engine.
    pub fn state(&self) -> ProjectState {
        ProjectState {
            phase: self.phase.label().to_string(),
            tools: self
                .tools
                .iter()
                .map(|(id, p)| (id.clone(), p.status))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn init(dir: &TempDir) {
        std::fs::create_dir_all(paths::projects_dir(dir.path())).unwrap();
    }

    #[test]
    fn state_defaults_missing_tools_to_not_started() {
        let state = ProjectState::new("Measure").with_status("sipoc", ToolStatus::Completed);
        assert_eq!(state.status("sipoc"), ToolStatus::Completed);
        assert_eq!(state.status("msa"), ToolStatus::NotStarted);
        assert!(state.is_completed("sipoc"));
        assert!(!state.is_completed("msa"));
    }

    #[test]
    fn create_requires_init() {
        let dir = TempDir::new().unwrap();
        let err = Project::create(dir.path(), Project::new("scrap", "Scrap", Phase::Define));
        assert!(matches!(err, Err(DmaicError::NotInitialized)));
    }

    #[test]
    fn create_rejects_bad_slug_and_duplicates() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        assert!(matches!(
            Project::create(dir.path(), Project::new("Bad Slug", "x", Phase::Define)),
            Err(DmaicError::InvalidSlug(_))
        ));
        Project::create(dir.path(), Project::new("scrap", "Scrap", Phase::Define)).unwrap();
        assert!(matches!(
            Project::create(dir.path(), Project::new("scrap", "Again", Phase::Define)),
            Err(DmaicError::ProjectExists(_))
        ));
    }

    #[test]
    fn save_load_roundtrip_keeps_status_and_phase() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        let catalog = Catalog::builtin();

        let mut project =
            Project::create(dir.path(), Project::new("scrap", "Reduce scrap", Phase::Define))
                .unwrap();
        project.set_phase(Phase::Measure);
        project
            .set_tool_status(catalog, "project-charter", ToolStatus::Completed)
            .unwrap();
        project
            .set_tool_status(catalog, "sipoc", ToolStatus::InProgress)
            .unwrap();
        project.save(dir.path()).unwrap();

        let loaded = Project::load(dir.path(), "scrap").unwrap();
        assert_eq!(loaded.phase, Phase::Measure);
        assert_eq!(loaded.tool_status("project-charter"), ToolStatus::Completed);
        assert_eq!(loaded.tool_status("sipoc"), ToolStatus::InProgress);
        assert_eq!(loaded.tool_status("msa"), ToolStatus::NotStarted);
    }

    #[test]
    fn set_tool_status_tracks_timestamps() {
        let catalog = Catalog::builtin();
        let mut project = Project::new("scrap", "Scrap", Phase::Define);

        project
            .set_tool_status(catalog, "sipoc", ToolStatus::InProgress)
            .unwrap();
        let started = project.tools["sipoc"].started_at;
        assert!(started.is_some());
        assert!(project.tools["sipoc"].completed_at.is_none());

        project
            .set_tool_status(catalog, "sipoc", ToolStatus::Completed)
            .unwrap();
        assert_eq!(project.tools["sipoc"].started_at, started);
        assert!(project.tools["sipoc"].completed_at.is_some());

        project
            .set_tool_status(catalog, "sipoc", ToolStatus::NotStarted)
            .unwrap();
        assert!(!project.tools.contains_key("sipoc"));
    }

    #[test]
    fn set_tool_status_rejects_unknown_tool() {
        let mut project = Project::new("scrap", "Scrap", Phase::Define);
        let err = project.set_tool_status(Catalog::builtin(), "kaizen", ToolStatus::Completed);
        assert!(matches!(err, Err(DmaicError::UnknownTool(_))));
        assert!(project.tools.is_empty());
    }

    #[test]
    fn state_snapshot_uses_phase_label() {
        let mut project = Project::new("scrap", "Scrap", Phase::Analyze);
        project
            .set_tool_status(Catalog::builtin(), "fmea", ToolStatus::InProgress)
            .unwrap();
        let state = project.state();
        assert_eq!(state.phase, "Analyze");
        assert_eq!(state.status("fmea"), ToolStatus::InProgress);
    }

    #[test]
    fn traversing_slug_cannot_touch_files_outside_projects() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        crate::config::Config::new("plant").save(dir.path()).unwrap();
        let config = paths::config_path(dir.path());

        assert!(matches!(
            Project::delete(dir.path(), "../config"),
            Err(DmaicError::InvalidSlug(_))
        ));
        assert!(config.exists());

        assert!(matches!(
            Project::load(dir.path(), "../config"),
            Err(DmaicError::InvalidSlug(_))
        ));

        let mut project = Project::new("scrap", "Scrap", Phase::Define);
        project.slug = "../config".to_string();
        assert!(matches!(
            project.save(dir.path()),
            Err(DmaicError::InvalidSlug(_))
        ));
        assert!(crate::config::Config::load(dir.path()).is_ok());
    }

    #[test]
    fn list_skips_files_that_are_not_projects() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        Project::create(dir.path(), Project::new("alpha", "Alpha", Phase::Define)).unwrap();
        std::fs::write(paths::projects_dir(dir.path()).join("Notes.yaml"), "x: 1\n").unwrap();
        std::fs::write(paths::projects_dir(dir.path()).join("readme.txt"), "hi").unwrap();

        let projects = Project::list(dir.path()).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].slug, "alpha");
    }

    #[test]
    fn load_missing_project() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        assert!(matches!(
            Project::load(dir.path(), "ghost"),
            Err(DmaicError::ProjectNotFound(slug)) if slug == "ghost"
        ));
    }

    #[test]
    fn list_and_delete() {
        let dir = TempDir::new().unwrap();
        init(&dir);
        Project::create(dir.path(), Project::new("alpha", "Alpha", Phase::Define)).unwrap();
        Project::create(dir.path(), Project::new("beta", "Beta", Phase::Improve)).unwrap();

        let slugs: Vec<String> = Project::list(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs.len(), 2);
        assert!(slugs.contains(&"alpha".to_string()));

        Project::delete(dir.path(), "alpha").unwrap();
        assert_eq!(Project::list(dir.path()).unwrap().len(), 1);
        assert!(matches!(
            Project::delete(dir.path(), "alpha"),
            Err(DmaicError::ProjectNotFound(_))
        ));
    }
}
