use thiserror::Error;

use crate::{
    application::{registry::LoadError, render::RenderError},
    config::SettingsError,
    infra::error::InfraError,
};

/// Errors that abort a whole command. During a site build, render and execution
/// failures are recorded in the build report instead; `Render` only surfaces
/// when a single page is requested.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("item {0} not found")]
    NotFound(u32),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Short machine-readable code used in log fields.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Load(_) => "load",
            AppError::Render(_) => "render",
            AppError::Settings(_) => "settings",
            AppError::Unexpected(_) => "unexpected",
            AppError::Infra(InfraError::Telemetry(_)) => "telemetry",
            AppError::Infra(InfraError::Configuration { .. }) => "configuration",
            AppError::Infra(_) => "io",
            AppError::NotFound(_) => "not_found",
        }
    }
}
