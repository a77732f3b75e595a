use blight_schema::{Coordinate, CoordinateSet};

/// Exact-value membership index over the trees allowed in the output.
///
/// Built once before any ring worker starts and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    members: CoordinateSet,
}

impl CandidateIndex {
    pub fn from_coordinates(coordinates: &[Coordinate]) -> Self {
        coordinates.iter().copied().collect()
    }

    #[inline]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.members.contains(coordinate)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<Coordinate> for CandidateIndex {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut members =
            CoordinateSet::with_capacity_and_hasher(iter.size_hint().0, Default::default());
        members.extend(iter);
        Self { members }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        let index = CandidateIndex::from_coordinates(&[
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(2.0, 0.5),
        ]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn membership_is_exact() {
        let index = CandidateIndex::from_coordinates(&[Coordinate::new(0.1 + 0.2, 0.0)]);
        assert!(index.contains(&Coordinate::new(0.1 + 0.2, 0.0)));
        assert!(!index.contains(&Coordinate::new(0.3, 0.0)));
    }
}
