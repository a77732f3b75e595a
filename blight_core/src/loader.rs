//! Reads the world width argument and the seven JSON input tables.

use std::{
    env, fs, io,
    num::ParseFloatError,
    path::{Path, PathBuf},
};

use blight_schema::{Coordinate, InputTables};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub const RING_LIST_FILE: &str = "ring_list.json";
pub const PROB_SC_FILE: &str = "prob_SC_list.json";
pub const PROB_PF_FILE: &str = "prob_PF_list.json";
pub const PROB_HN_FILE: &str = "prob_HN_list.json";
pub const CANDIDATES_FILE: &str = "potential_trees.json";
pub const NEWLY_INFECTED_FILE: &str = "trees_newly_infected.json";
pub const LOSING_INFECTION_FILE: &str = "trees_losing_infection.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("world width {input:?} is not a number: {source}")]
    WorldWidth {
        input: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to locate the running executable: {0}")]
    Executable(#[source] io::Error),
}

pub fn parse_world_width(input: &str) -> Result<f64, LoadError> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|source| LoadError::WorldWidth {
            input: input.to_string(),
            source,
        })
}

/// Directory holding the running executable; tables live beside it by default.
pub fn default_data_dir() -> Result<PathBuf, LoadError> {
    let exe = env::current_exe().map_err(LoadError::Executable)?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

pub fn load_input_tables(dir: &Path) -> Result<InputTables, LoadError> {
    let tables = InputTables {
        rings: read_table::<Vec<Vec<Coordinate>>>(dir, RING_LIST_FILE)?,
        prob_sc: read_table(dir, PROB_SC_FILE)?,
        prob_pf: read_table(dir, PROB_PF_FILE)?,
        prob_hn: read_table(dir, PROB_HN_FILE)?,
        candidates: read_table(dir, CANDIDATES_FILE)?,
        newly_infected: read_table(dir, NEWLY_INFECTED_FILE)?,
        losing_infection: read_table(dir, LOSING_INFECTION_FILE)?,
    };

    debug!(
        target: "blight::loader",
        dir = %dir.display(),
        rings = tables.rings.len(),
        candidates = tables.candidates.len(),
        "tables.loaded"
    );
    Ok(tables)
}

fn read_table<T: DeserializeOwned>(dir: &Path, name: &str) -> Result<T, LoadError> {
    let path = dir.join(name);
    let contents = fs::read_to_string(&path).map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LoadError::Parse { path, source })
}
