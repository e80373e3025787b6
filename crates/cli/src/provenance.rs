use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the subcommand, its inputs and parameters.
pub struct Payload {
    pub command: &'static str,
    pub inputs: Vec<String>,
    pub params: Value,
    pub ring: Option<RingSummary>,
}

/// Shape of the boundary an artifact was derived from.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RingSummary {
    pub vertices: usize,
    pub area_m2: f64,
    pub valid: bool,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            inputs: Vec::new(),
            params,
            ring: None,
        }
    }

    pub fn input<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inputs
            .push(path.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn ring(mut self, summary: RingSummary) -> Self {
        self.ring = Some(summary);
        self
    }
}

/// Write `<artifact stem>.provenance.json` next to `artifact`.
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = provenance_path(artifact);
    if let Some(parent) = sidecar.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    let doc = document(payload, &[artifact.to_string_lossy().into_owned()]);
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

/// Provenance block without writing anything (used by `report`).
pub fn document(payload: Payload, outputs: &[String]) -> Value {
    json!({
        "code_rev": current_git_rev(),
        "boundary_version": boundary::VERSION,
        "command": payload.command,
        "inputs": payload.inputs,
        "params": payload.params,
        "ring": payload.ring,
        "outputs": outputs,
    })
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
