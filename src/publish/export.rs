//! Local export of the deployed address for later CI steps.
//!
//! GitHub Actions exposes two append-only files per step: `$GITHUB_ENV`
//! (environment of subsequent steps) and `$GITHUB_OUTPUT` (step outputs).
//! Both take `NAME=value` lines. Outside Actions neither is set and the
//! export is skipped.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::config::ExportConfig;
use crate::publish::types::{ExportError, ExportOutcome, ExportResult};

/// Writes `NAME=value` lines to the CI-provided files.
#[derive(Debug, Clone)]
pub struct LocalExport {
    variable_name: String,
    targets: Vec<PathBuf>,
}

impl LocalExport {
    pub fn new(config: &ExportConfig) -> Self {
        let targets = [&config.env_file, &config.output_file]
            .into_iter()
            .flatten()
            .map(PathBuf::from)
            .collect();
        Self {
            variable_name: config.variable_name.clone(),
            targets,
        }
    }

    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    /// True when the hosting environment offers somewhere to export to.
    pub fn is_supported(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Append the value to every configured file.
    pub async fn export(&self, value: &str) -> ExportResult<ExportOutcome> {
        if self.variable_name.is_empty()
            || self.variable_name.contains(['=', '\n', '\r'])
        {
            return Err(ExportError::InvalidName(self.variable_name.clone()));
        }
        if value.contains(['\n', '\r']) {
            return Err(ExportError::InvalidValue("value spans multiple lines".to_string()));
        }

        let line = format!("{}={}\n", self.variable_name, value);
        let mut outcome = ExportOutcome::default();

        for path in &self.targets {
            let io_err = |source| ExportError::Io {
                path: path.clone(),
                source,
            };
            let mut file = tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await
                .map_err(io_err)?;
            file.write_all(line.as_bytes()).await.map_err(io_err)?;
            file.flush().await.map_err(io_err)?;

            tracing::debug!(path = %path.display(), name = %self.variable_name, "Exported value");
            outcome.written.push(path.clone());
        }

        Ok(outcome)
    }
}
