//! GitHub Actions workflow-command and step-output protocol.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use publisher::PublishResult;

/// Name of the step output carrying `Success` / `Failure`.
pub const RESULT_OUTPUT: &str = "result";

/// Escapes data for a workflow command (`::name::data`).
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Writes workflow commands to `stdout` and step outputs to the file named by
/// `GITHUB_OUTPUT`.
pub struct Workflow<W: Write> {
    stdout: W,
    output_file: Option<PathBuf>,
}

impl<W: Write> Workflow<W> {
    pub fn new(stdout: W, output_file: Option<PathBuf>) -> Self {
        Self {
            stdout,
            output_file,
        }
    }

    /// Sets a single-line step output.
    ///
    /// Without an output file the deprecated `::set-output` command is used so
    /// that older runners still pick the value up.
    pub fn set_output(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
        match &self.output_file {
            Some(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("opening step output file {}", path.display()))?;
                writeln!(file, "{name}={value}")
                    .with_context(|| format!("writing step output file {}", path.display()))?;
            }
            None => {
                writeln!(self.stdout, "::set-output name={name}::{}", escape_data(value))?;
            }
        }
        Ok(())
    }

    /// Marks the step as failed with an `::error::` annotation.
    pub fn set_failed(&mut self, message: &str) -> anyhow::Result<()> {
        writeln!(self.stdout, "::error::{}", escape_data(message))?;
        Ok(())
    }

    /// Reports the run's result: an error annotation for failures, then the
    /// `result` output.
    pub fn report(&mut self, result: &PublishResult) -> anyhow::Result<()> {
        if let PublishResult::Failure(reason) = result {
            self.set_failed(reason)?;
        }
        self.set_output(RESULT_OUTPUT, result.output_value())?;
        self.stdout.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.stdout
    }
}
