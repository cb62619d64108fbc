//! On-disk job records.
//!
//! ```text
//! <jobs_dir>/<job_id>/
//!     job_description.md
//!     prompt_vars.yaml
//!     analysis.yaml
//!     generated/
//! ```
//!
//! Absence of a record is `Ok(None)`, never an error.

use std::io;
use std::path::{Component, Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::analysis::JobAnalysis;
use crate::models::PromptVars;

const ANALYSIS_FILE: &str = "analysis.yaml";
const DESCRIPTION_FILE: &str = "job_description.md";
const PROMPT_VARS_FILE: &str = "prompt_vars.yaml";
const GENERATED_DIR: &str = "generated";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid job identifier: '{0}'")]
    InvalidJobId(String),
}

#[derive(Debug, Clone)]
pub struct JobStore {
    root: PathBuf,
}

impl JobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one job. The identifier must be a single plain path component.
    pub fn job_dir(&self, job_id: &str) -> Result<PathBuf, StoreError> {
        let mut components = Path::new(job_id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !job_id.contains(&['/', '\\'][..]) => {
                Ok(self.root.join(job_id))
            }
            _ => Err(StoreError::InvalidJobId(job_id.to_string())),
        }
    }

    pub fn exists(&self, job_id: &str) -> Result<bool, StoreError> {
        Ok(self.job_dir(job_id)?.is_dir())
    }

    /// Writes `analysis.yaml` for the job, creating the job directory if needed.
    pub async fn save_analysis(
        &self,
        analysis: &JobAnalysis,
        job_id: &str,
    ) -> Result<PathBuf, StoreError> {
        let dir = self.job_dir(job_id)?;
        ensure_dir(&dir).await?;

        let path = dir.join(ANALYSIS_FILE);
        let yaml = serde_yaml::to_string(analysis).map_err(|source| StoreError::Yaml {
            path: path.clone(),
            source,
        })?;
        write(&path, &yaml).await?;

        info!("Analysis saved to: {}", path.display());
        Ok(path)
    }

    pub async fn load_analysis(&self, job_id: &str) -> Result<Option<JobAnalysis>, StoreError> {
        let path = self.job_dir(job_id)?.join(ANALYSIS_FILE);
        let analysis: Option<JobAnalysis> = read_yaml(&path).await?;
        Ok(analysis.map(JobAnalysis::capped))
    }

    pub async fn load_job_description(&self, job_id: &str) -> Result<Option<String>, StoreError> {
        let path = self.job_dir(job_id)?.join(DESCRIPTION_FILE);
        read_optional(&path).await
    }

    pub async fn load_prompt_vars(&self, job_id: &str) -> Result<Option<PromptVars>, StoreError> {
        let path = self.job_dir(job_id)?.join(PROMPT_VARS_FILE);
        read_yaml(&path).await
    }

    /// Creates (or refreshes) a job folder with its description, prompt
    /// variables and an empty `generated/` directory.
    pub async fn create_job(
        &self,
        job_id: &str,
        description_md: &str,
        prompt_vars: &PromptVars,
    ) -> Result<PathBuf, StoreError> {
        let dir = self.job_dir(job_id)?;
        ensure_dir(&dir.join(GENERATED_DIR)).await?;

        write(&dir.join(DESCRIPTION_FILE), description_md).await?;

        let vars_path = dir.join(PROMPT_VARS_FILE);
        let yaml = serde_yaml::to_string(prompt_vars).map_err(|source| StoreError::Yaml {
            path: vars_path.clone(),
            source,
        })?;
        write(&vars_path, &yaml).await?;

        info!("Created job folder: {}", dir.display());
        Ok(dir)
    }
}

async fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn write(path: &Path, contents: &str) -> Result<(), StoreError> {
    fs::write(path, contents)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path).await {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let Some(contents) = read_optional(path).await? else {
        return Ok(None);
    };
    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Yaml {
            path: path.to_path_buf(),
            source,
        })
}
