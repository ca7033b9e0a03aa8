//! Packaging error types.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error while computing the packaged file set.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum PackagerError {
    #[error("no archive found for sub-project `{project}` (required by `{required_by}`)")]
    #[diagnostic(
        code(cordpack::package::missing_artifact),
        help("build `{project}` or declare its `archive`, or drop `--fail-on-missing` to skip it")
    )]
    MissingArtifact { project: String, required_by: String },
}

impl PackagerError {
    /// Convert to a user-friendly diagnostic.
    ///
    /// The miette code and help are carried over so both renderings agree.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = match self {
            PackagerError::MissingArtifact {
                project,
                required_by,
            } => Diagnostic::error(format!("no archive found for sub-project `{}`", project))
                .with_context(format!("`{}` depends on `{}`", required_by, project))
                .with_context(format!(
                    "no resolved file name contains `{}` and its archive output is not built",
                    project
                )),
        };

        if let Some(code) = MietteDiagnostic::code(self) {
            diag = diag.with_context(format!("code: {}", code));
        }
        if let Some(help) = MietteDiagnostic::help(self) {
            diag = diag.with_suggestion(help.to_string());
        }
        diag
    }
}
