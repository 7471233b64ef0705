//! JSON output files.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use blockworld_core::{PropertyCatalog, SceneRecord};
use blockworld_enumerate::StateSpace;
use blockworld_scene::{ActionKind, State, StateSnapshot, Transition, TransitionSampler};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while storing or reloading samples.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to access file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Generation failed: {0}")]
    Generation(#[from] blockworld_core::Error),
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub fn save_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Reads a JSON file written by [`save_json`].
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, OutputError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// File name for the `index`-th output of a kind, zero padded.
pub fn numbered(dir: &Path, prefix: &str, index: usize) -> PathBuf {
    dir.join(format!("{prefix}_{index:06}.json"))
}

/// One sampled transition, with one or more renders per side.
#[derive(Debug, Serialize)]
pub struct SampleFile {
    /// Comma-separated action names.
    pub action: String,
    /// Renders of the state before the actions.
    pub pre: Vec<SceneRecord>,
    /// Renders of the state after the actions.
    pub suc: Vec<SceneRecord>,
}

/// Noiseless states of one sampled transition.
///
/// Stored next to the rendered records so that a later run can reload the
/// same transition and render more wiggled samples of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFile {
    /// Actions applied, in order.
    pub actions: Vec<ActionKind>,
    /// State before the actions.
    pub pre: StateSnapshot,
    /// State after the actions.
    pub suc: StateSnapshot,
}

impl From<&Transition> for SnapshotFile {
    fn from(transition: &Transition) -> Self {
        Self {
            actions: transition.actions.clone(),
            pre: transition.pre.snapshot(),
            suc: transition.suc.snapshot(),
        }
    }
}

impl SnapshotFile {
    /// Rebuilds the transition. Fails if either stored state is implausible.
    pub fn restore(self, catalog: Arc<PropertyCatalog>) -> blockworld_core::Result<Transition> {
        Ok(Transition {
            pre: State::from_snapshot(catalog.clone(), self.pre)?,
            suc: State::from_snapshot(catalog, self.suc)?,
            actions: self.actions,
        })
    }
}

/// Reloads the transition stored at `path`, or samples a fresh one and
/// stores it there. The flag is true when the transition was reloaded.
pub fn load_or_sample<R: Rng + ?Sized>(
    sampler: &TransitionSampler,
    path: &Path,
    rng: &mut R,
) -> Result<(Transition, bool), OutputError> {
    if path.exists() {
        let file: SnapshotFile = load_json(path)?;
        return Ok((file.restore(sampler.catalog().clone())?, true));
    }
    let transition = sampler.sample_transition(rng)?;
    save_json(path, &SnapshotFile::from(&transition))?;
    Ok((transition, false))
}

/// An edge of the enumerated graph.
#[derive(Debug, Serialize)]
pub struct TransitionEntry {
    /// Index of the state before the action.
    pub pre: usize,
    /// Index of the state after the action.
    pub suc: usize,
    /// Action name.
    pub action: String,
}

/// Renderer-facing view of an explored state space.
#[derive(Debug, Serialize)]
pub struct StateSpaceFile {
    /// Distinct states in discovery order.
    pub states: Vec<SceneRecord>,
    /// Distinct transitions.
    pub transitions: Vec<TransitionEntry>,
}

impl From<&StateSpace> for StateSpaceFile {
    fn from(space: &StateSpace) -> Self {
        Self {
            states: space
                .states()
                .iter()
                .map(|s| SceneRecord::new(s.records()))
                .collect(),
            transitions: space
                .transitions()
                .iter()
                .map(|t| TransitionEntry {
                    pre: t.pre,
                    suc: t.suc,
                    action: t.action.name().to_string(),
                })
                .collect(),
        }
    }
}
