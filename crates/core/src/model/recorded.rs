use ovenpilot_protocol::ProfilePoint;

/// The measured temperature trace reported back by the controller.
///
/// Append-only between resets. Merging is idempotent: a point equal to an
/// existing entry in both coordinates is dropped, so a repeated poll of
/// unchanged data leaves the series as it was.
#[derive(Debug, Clone, Default)]
pub struct RecordedSeries {
    points: Vec<ProfilePoint>,
}

impl RecordedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<ProfilePoint> {
        self.points.last().copied()
    }

    /// Append unless an identical (x, y) pair is already present.
    /// Returns whether the point was added.
    pub fn merge(&mut self, point: ProfilePoint) -> bool {
        if self.points.iter().any(|p| p.x == point.x && p.y == point.y) {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_drops_exact_duplicates() {
        let mut series = RecordedSeries::new();
        assert!(series.merge(ProfilePoint::new(0.0, 25.0)));
        assert!(series.merge(ProfilePoint::new(2.0, 26.1)));
        assert!(!series.merge(ProfilePoint::new(2.0, 26.1)));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn same_x_different_y_is_kept() {
        // dedup is on the exact pair, not on the timestamp alone
        let mut series = RecordedSeries::new();
        assert!(series.merge(ProfilePoint::new(2.0, 26.1)));
        assert!(series.merge(ProfilePoint::new(2.0, 26.4)));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn merging_a_batch_twice_equals_merging_once() {
        let batch = [
            ProfilePoint::new(0.0, 25.0),
            ProfilePoint::new(2.0, 26.1),
            ProfilePoint::new(4.0, 27.9),
        ];
        let mut series = RecordedSeries::new();
        for p in batch {
            series.merge(p);
        }
        let once = series.points().to_vec();
        for p in batch {
            series.merge(p);
        }
        assert_eq!(series.points(), &once[..]);
    }
}
