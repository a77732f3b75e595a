//! Data contracts shared by the blight engine, its loader and its consumers.
//!
//! Everything here is plain serde data: coordinates, probability vectors, the
//! raw input tables as they sit on disk, and the exported result records.

mod coordinate;
mod probabilities;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub use coordinate::Coordinate;
pub use probabilities::{Probabilities, ProbabilityChannel};

pub type CoordinateSet = HashSet<Coordinate, ahash::RandomState>;
pub type CoordinateMap<V> = HashMap<Coordinate, V, ahash::RandomState>;

/// All inputs of one spread step, already parsed.
///
/// `prob_sc` may be shorter than `rings`; `prob_pf` and `prob_hn` must cover
/// every ring index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputTables {
    pub rings: Vec<Vec<Coordinate>>,
    pub prob_sc: Vec<f64>,
    pub prob_pf: Vec<f64>,
    pub prob_hn: Vec<f64>,
    pub candidates: Vec<Coordinate>,
    pub newly_infected: Vec<Coordinate>,
    pub losing_infection: Vec<Coordinate>,
}

/// One exported tree and its net probabilities.
///
/// The tree is wrapped in a one-element list on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(rename = "Tree")]
    pub tree: Vec<Coordinate>,
    #[serde(rename = "Probabilities")]
    pub probabilities: Probabilities,
}

impl ExportRecord {
    pub fn new(coordinate: Coordinate, probabilities: Probabilities) -> Self {
        Self {
            tree: vec![coordinate],
            probabilities,
        }
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.tree.first().copied()
    }
}

pub fn encode_export(records: &[ExportRecord]) -> bincode::Result<Vec<u8>> {
    bincode::serialize(records)
}

pub fn decode_export(data: &[u8]) -> bincode::Result<Vec<ExportRecord>> {
    bincode::deserialize(data)
}

pub fn encode_export_json(records: &[ExportRecord]) -> serde_json::Result<String> {
    serde_json::to_string(records)
}

pub fn decode_export_json(data: &str) -> serde_json::Result<Vec<ExportRecord>> {
    serde_json::from_str(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_record_wire_shape() {
        let record = ExportRecord::new(Coordinate::new(1.0, 0.0), Probabilities::new(0.1, 0.2, 0.3));
        let json = encode_export_json(&[record.clone()]).unwrap();
        assert_eq!(json, r#"[{"Tree":[[1.0,0.0]],"Probabilities":[0.1,0.2,0.3]}]"#);
        assert_eq!(decode_export_json(&json).unwrap(), vec![record]);
    }

    #[test]
    fn bincode_export_decodes() {
        let records = vec![
            ExportRecord::new(Coordinate::new(2.0, 3.5), Probabilities::new(-0.5, 0.0, 0.25)),
            ExportRecord::new(Coordinate::new(0.0, -0.5), Probabilities::ZERO),
        ];
        let bytes = encode_export(&records).unwrap();
        assert_eq!(decode_export(&bytes).unwrap(), records);
    }

    #[test]
    fn coordinate_map_uses_exact_keys() {
        let mut map: CoordinateMap<u32> = CoordinateMap::default();
        map.insert(Coordinate::new(1.0, 2.0), 7);
        assert_eq!(map.get(&Coordinate::new(1.0, 2.0)), Some(&7));
        assert_eq!(map.get(&Coordinate::new(1.0, 2.000_000_1)), None);
    }
}
