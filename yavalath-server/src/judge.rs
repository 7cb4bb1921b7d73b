//! Judge backed by an external program
//!
//! The program is run once per position with the board token as its only
//! argument and must print a judge report as JSON, e.g.
//! `{"outcome":{"Winner":"P0"},"locations":[3,9,27,-1]}`.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use tokio::runtime::{Handle, RuntimeFlavor};
use yavalath_core::{BoardToken, Judge, JudgeReport};

/// Runs an external judge program
#[derive(Clone, Debug)]
pub struct CommandJudge {
    program: PathBuf,
}

impl CommandJudge {
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
        }
    }

    fn run(&self, token: &BoardToken) -> Result<JudgeReport> {
        let output = Command::new(&self.program)
            .arg(token.to_string())
            .output()
            .with_context(|| format!("Failed to run judge {}", self.program.display()))?;

        if !output.status.success() {
            bail!("Judge exited with {}", output.status);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        JudgeReport::from_json(stdout.trim())
            .with_context(|| format!("Unparseable judge output: {}", stdout.trim()))
    }
}

impl Judge for CommandJudge {
    /// A judge that fails is treated as saying the game goes on.
    ///
    /// Judging happens inside handlers, so on a multi-threaded runtime the
    /// wait for the program is moved off the worker thread.
    fn judge(&self, token: &BoardToken) -> JudgeReport {
        let on_multi_thread = Handle::try_current()
            .map(|handle| handle.runtime_flavor() == RuntimeFlavor::MultiThread)
            .unwrap_or(false);
        let result = if on_multi_thread {
            tokio::task::block_in_place(|| self.run(token))
        } else {
            self.run(token)
        };
        result.unwrap_or_else(|e| {
            tracing::warn!("Judge failed for {}: {:#}", token, e);
            JudgeReport::ongoing()
        })
    }
}
