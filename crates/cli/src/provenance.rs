use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Metadata recorded next to a run's outputs.
pub struct Payload {
    pub params: Value,
    pub outputs: Vec<PathBuf>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            outputs: Vec::new(),
        }
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.outputs.push(path.into());
        self
    }
}

/// Provenance document: code revision, library version, callsite, params, outputs.
#[track_caller]
pub fn document(payload: &Payload) -> Value {
    let callsite = Location::caller();
    json!({
        "code_rev": code_rev(),
        "hullcolor_version": hullcolor::VERSION,
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "params": payload.params,
        "outputs": payload
            .outputs
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
    })
}

/// Write the sidecar for `artifact` (`report.json` → `report.provenance.json`)
/// and return its path. With no outputs listed, the artifact itself is.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, mut payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = artifact.with_extension("provenance.json");
    if let Some(dir) = sidecar.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.is_dir() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
    }
    if payload.outputs.is_empty() {
        payload.outputs.push(artifact.to_path_buf());
    }
    let body = serde_json::to_vec_pretty(&document(&payload))?;
    fs::write(&sidecar, body).with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

/// Revision stamped into sidecars: `HULLCOLOR_REV` at build time, then at run
/// time, then `git describe`, else `"unknown"`.
fn code_rev() -> String {
    let pinned = option_env!("HULLCOLOR_REV")
        .map(str::to_owned)
        .or_else(|| std::env::var("HULLCOLOR_REV").ok())
        .filter(|rev| !rev.trim().is_empty());
    if let Some(rev) = pinned {
        return rev.trim().to_owned();
    }
    match Command::new("git").args(["describe", "--always", "--dirty"]).output() {
        Ok(out) if out.status.success() => {
            let rev = String::from_utf8_lossy(&out.stdout).trim().to_owned();
            if rev.is_empty() {
                "unknown".to_owned()
            } else {
                rev
            }
        }
        _ => "unknown".to_owned(),
    }
}
