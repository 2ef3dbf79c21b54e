use std::{path::Path, process::Command};

use anyhow::{Context, Result, bail};
use log::debug;

/// Arguments passed to ttfautohint before the input and output paths.
pub const TTFAUTOHINT_ARGS: &[&str] =
    &["-l", "6", "-r", "45", "-D", "latn", "-f", "none", "-S", "-W", "-X", "13-", "-I"];

/// Writes a hinted copy of a TrueType font.
pub trait Hinter {
    fn hint(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Hints with the external `ttfautohint` program.
#[derive(Debug, Clone)]
pub struct Ttfautohint {
    program: String,
}

impl Ttfautohint {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Hinter for Ttfautohint {
    fn hint(&self, input: &Path, output: &Path) -> Result<()> {
        debug!(
            "{} {} {} {}",
            self.program,
            TTFAUTOHINT_ARGS.join(" "),
            input.display(),
            output.display()
        );
        let result = Command::new(&self.program)
            .args(TTFAUTOHINT_ARGS)
            .arg(input)
            .arg(output)
            .output()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            bail!(
                "{} failed on {} ({}): {}",
                self.program,
                input.display(),
                result.status,
                stderr.trim()
            );
        }
        Ok(())
    }
}
