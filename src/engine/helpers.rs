use geo_types::LineString;

use crate::{
    entities::{Coordinates, SegmentDraft},
    risk::RiskSource,
};

/// Only this many leading coordinates of a route are cut into segments.
pub const MAX_SEGMENT_COORDINATES: usize = 1000;

/// Cuts a route into segments between adjacent coordinates and assesses each.
pub fn draft_segments(coordinates: &[Coordinates], risk: &dyn RiskSource) -> Vec<SegmentDraft> {
    let end = coordinates.len().min(MAX_SEGMENT_COORDINATES);
    let line: LineString<f64> = coordinates[..end].iter().copied().collect();

    line.lines()
        .map(|line| {
            let start = Coordinates::from(line.start);
            let end = Coordinates::from(line.end);

            SegmentDraft {
                start,
                end,
                risk: risk.assess(&start, &end),
            }
        })
        .collect()
}

/// Treats empty strings like missing values.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[test]
fn segments_join_adjacent_coordinates() {
    use crate::{entities::RiskInputs, risk::FixedRiskSource};

    let risk = FixedRiskSource(RiskInputs::default());
    let coordinates = vec![
        Coordinates::new(0.0, 0.0),
        Coordinates::new(0.0, 1.0),
        Coordinates::new(1.0, 1.0),
    ];

    let drafts = draft_segments(&coordinates, &risk);
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].start, coordinates[0]);
    assert_eq!(drafts[0].end, coordinates[1]);
    assert_eq!(drafts[1].end, coordinates[2]);

    assert!(draft_segments(&coordinates[..1], &risk).is_empty());
    assert!(draft_segments(&[], &risk).is_empty());
}

#[test]
fn long_routes_are_capped() {
    use crate::{entities::RiskInputs, risk::FixedRiskSource};

    let risk = FixedRiskSource(RiskInputs::default());
    let coordinates: Vec<Coordinates> = (0..1500)
        .map(|i| Coordinates::new(0.0, i as f64 * 0.001))
        .collect();

    assert_eq!(draft_segments(&coordinates, &risk).len(), MAX_SEGMENT_COORDINATES - 1);
}

#[test]
fn blank_values_are_missing() {
    assert_eq!(present(Some("".into())), None);
    assert_eq!(present(Some(" x ".into())), Some(" x ".into()));
    assert_eq!(present(None), None);
}
