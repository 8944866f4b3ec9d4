use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::error::{InterpError, InterpResult};
use crate::oracle::{InterpolationOracle, InterpolationRequest};
use crate::raster::codec::{load_image, save_image};
use crate::raster::frame::Image;

/// Placeholders substituted into the argument template of a [`CommandOracle`].
pub const PLACEHOLDERS: [&str; 4] = ["{x0}", "{x1}", "{t}", "{out}"];

/// Placeholders the template must reference; `{t}` is optional.
const REQUIRED: [&str; 3] = [PLACEHOLDERS[0], PLACEHOLDERS[1], PLACEHOLDERS[3]];

/// Oracle backed by an external program, e.g. a wrapper script around a FILM checkpoint.
///
/// Per request the two inputs are written as PNGs into a scratch directory and the program is
/// run with `{x0}`, `{x1}`, `{t}` and `{out}` substituted in its arguments. The program must
/// write a PNG of the same size to `{out}`. Inputs pass through 8-bit PNG, so the program sees
/// quantized endpoints.
#[derive(Debug)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
    scratch_dir: PathBuf,
    seq: AtomicU64,
}

impl CommandOracle {
    /// Build from a whitespace-separated command line such as
    /// `python film.py {x0} {x1} {t} {out}`.
    ///
    /// There is no quoting: a program path or argument containing spaces cannot be expressed
    /// here. Use [`CommandOracle::new`] with a pre-split argument vector instead.
    pub fn parse(command_line: &str) -> InterpResult<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| InterpError::validation("oracle command must be non-empty"))?;
        Self::new(program, parts.collect())
    }

    /// Build from a program and its argument template. Arguments are passed verbatim after
    /// placeholder substitution.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> InterpResult<Self> {
        for required in REQUIRED {
            if !args.iter().any(|a| a.contains(required)) {
                return Err(InterpError::validation(format!(
                    "oracle command arguments must reference {required}"
                )));
            }
        }
        let scratch_dir = std::env::temp_dir().join(format!(
            "inbetween_oracle_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(0)
        ));
        Ok(Self {
            program: program.into(),
            args,
            scratch_dir,
            seq: AtomicU64::new(0),
        })
    }

    /// Use `dir` for request files instead of a fresh directory under the system temp dir.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    fn substitute(&self, x0: &Path, x1: &Path, t: f64, out: &Path) -> Vec<String> {
        let t = t.to_string();
        self.args
            .iter()
            .map(|a| {
                a.replace("{x0}", &x0.to_string_lossy())
                    .replace("{x1}", &x1.to_string_lossy())
                    .replace("{t}", &t)
                    .replace("{out}", &out.to_string_lossy())
            })
            .collect()
    }
}

impl InterpolationOracle for CommandOracle {
    fn name(&self) -> &str {
        &self.program
    }

    fn interpolate(&self, req: &InterpolationRequest<'_>) -> InterpResult<Image> {
        std::fs::create_dir_all(&self.scratch_dir).map_err(|e| {
            InterpError::io(format!(
                "create oracle scratch dir '{}': {e}",
                self.scratch_dir.display()
            ))
        })?;

        let n = self.seq.fetch_add(1, Ordering::Relaxed);
        let files = RequestFiles {
            x0: self.scratch_dir.join(format!("req{n:05}_x0.png")),
            x1: self.scratch_dir.join(format!("req{n:05}_x1.png")),
            out: self.scratch_dir.join(format!("req{n:05}_out.png")),
        };
        save_image(req.x0, &files.x0)?;
        save_image(req.x1, &files.x1)?;

        let args = self.substitute(&files.x0, &files.x1, req.time, &files.out);
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                InterpError::oracle(format!("failed to spawn oracle '{}': {e}", self.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InterpError::oracle(format!(
                "oracle '{}' exited with status {} for t={}: {}",
                self.program,
                output.status,
                req.time,
                stderr.trim()
            )));
        }

        load_image(&files.out, None).map_err(|e| {
            InterpError::oracle(format!(
                "oracle '{}' produced no readable frame for t={}: {e}",
                self.program, req.time
            ))
        })
    }
}

impl Drop for CommandOracle {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir(&self.scratch_dir);
    }
}

struct RequestFiles {
    x0: PathBuf,
    x1: PathBuf,
    out: PathBuf,
}

impl Drop for RequestFiles {
    fn drop(&mut self) {
        for p in [&self.x0, &self.x1, &self.out] {
            let _ = std::fs::remove_file(p);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/oracle/command.rs"]
mod tests;
