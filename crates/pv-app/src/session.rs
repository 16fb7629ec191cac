//! A results session: one in-memory project with an attached result model.

use pv_project::{MemoryProject, Project, ProjectDef, ProjectStatus};
use pv_results::{ResultModel, ResultsSnapshot};
use std::path::Path;
use std::sync::Arc;

use crate::config::ViewerConfig;
use crate::error::{AppError, AppResult};
use crate::project_service::load_project;

pub struct ResultsSession {
    project: Arc<MemoryProject>,
    model: Arc<ResultModel>,
    config: ViewerConfig,
}

impl ResultsSession {
    /// Build the project from `def` and attach a result model to it.
    pub fn open(def: ProjectDef, config: ViewerConfig) -> Self {
        let project = Arc::new(MemoryProject::from_def(def));
        let model = ResultModel::attach(project.clone());
        Self {
            project,
            model,
            config,
        }
    }

    pub fn load(path: &Path, config: ViewerConfig) -> AppResult<Self> {
        let def = load_project(path)?;
        tracing::info!(path = %path.display(), cases = def.cases.len(), "opening results session");
        Ok(Self::open(def, config))
    }

    pub fn project(&self) -> &Arc<MemoryProject> {
        &self.project
    }

    pub fn model(&self) -> &Arc<ResultModel> {
        &self.model
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Output shown in the result column.
    pub fn output(&self) -> String {
        self.config
            .output
            .clone()
            .or_else(|| self.project.main_output_function_name())
            .unwrap_or_default()
    }

    /// Drive the project through a run and return the resulting snapshot.
    ///
    /// The configured grouping is applied once the model is filled.
    pub fn replay(&self) -> AppResult<Arc<ResultsSnapshot>> {
        for status in [
            ProjectStatus::Initial,
            ProjectStatus::Running,
            ProjectStatus::Results,
        ] {
            self.project.set_status(status);
        }
        self.wait()?;

        if let Some(selector) = &self.config.group_by {
            return self.group(selector);
        }
        Ok(self.model.snapshot())
    }

    /// Regroup the rows by `selector` (`"None"` for no grouping).
    pub fn group(&self, selector: &str) -> AppResult<Arc<ResultsSnapshot>> {
        self.wait()?;
        self.model.group_variable(selector)?;
        Ok(self.model.snapshot())
    }

    pub fn snapshot(&self) -> Arc<ResultsSnapshot> {
        self.model.snapshot()
    }

    /// Wait for the model workers to settle.
    pub fn wait(&self) -> AppResult<()> {
        if self.model.wait_idle(self.config.refresh_timeout()) {
            Ok(())
        } else {
            Err(AppError::Timeout {
                waited_ms: self.config.refresh_timeout_ms,
            })
        }
    }
}
