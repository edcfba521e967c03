use std::process::ExitCode;

/// Process exit status of an `intlx` run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every file was transformed.
    Success,
    /// At least one file failed to parse or transform.
    Failure,
    /// The run itself failed (bad config, IO error).
    Error,
}

impl ExitStatus {
    pub fn from_failures(failed_files: usize) -> Self {
        if failed_files == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
