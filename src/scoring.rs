//! Safety score calculation.
//!
//! A route's safety score blends the average user rating with the average
//! environmental risk of its segments. Scores range from 1.0 to 5.0 when the
//! rating lies in [0, 5].

use crate::entities::RiskInputs;

const LIGHTING_WEIGHT: f64 = 0.4;
const TRAFFIC_WEIGHT: f64 = 0.3;
const CRIME_WEIGHT: f64 = 0.3;

const USER_RATING_WEIGHT: f64 = 0.6;
const RISK_RATING_WEIGHT: f64 = 0.4;

/// Risk assumed for a route with no segments.
const NEUTRAL_RISK: f64 = 0.5;

/// Risk of a single segment in [0, 1]. Darker, busier and higher-crime
/// segments are riskier.
pub fn compute_segment_risk(inputs: &RiskInputs) -> f64 {
    let darkness = clamp(1.0 - inputs.lighting, 0.0, 1.0);
    let traffic = clamp(inputs.traffic, 0.0, 1.0);
    let crime = clamp(inputs.crime_index, 0.0, 1.0);

    LIGHTING_WEIGHT * darkness + TRAFFIC_WEIGHT * traffic + CRIME_WEIGHT * crime
}

/// Mean risk over all segments, or the neutral risk when there are none.
pub fn average_risk<'a, I>(segments: I) -> f64
where
    I: IntoIterator<Item = &'a RiskInputs>,
{
    let (total, count) = segments
        .into_iter()
        .fold((0.0, 0usize), |(total, count), inputs| {
            (total + compute_segment_risk(inputs), count + 1)
        });

    if count == 0 {
        return NEUTRAL_RISK;
    }

    total / count as f64
}

pub fn calculate_safety_score<'a, I>(average_user_rating: f64, segments: I) -> f64
where
    I: IntoIterator<Item = &'a RiskInputs>,
{
    let user_rating = clamp(average_user_rating, 0.0, 5.0);

    // risk 0 maps to 5, risk 1 maps to 1
    let risk_rating = 1.0 + (1.0 - average_risk(segments)) * 4.0;

    let combined = USER_RATING_WEIGHT * user_rating + RISK_RATING_WEIGHT * risk_rating;
    round_to_tenths(combined)
}

/// Rounds half up at the tenths digit.
fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }

    value.max(min).min(max)
}

#[cfg(test)]
fn no_segments() -> Vec<RiskInputs> {
    vec![]
}

#[test]
fn segment_risk_stays_in_unit_interval() {
    let steps = [0.0, 0.25, 0.5, 0.75, 1.0];

    for lighting in steps {
        for traffic in steps {
            for crime_index in steps {
                let risk = compute_segment_risk(&RiskInputs {
                    lighting,
                    traffic,
                    crime_index,
                });
                assert!((0.0..=1.0).contains(&risk), "risk {} out of range", risk);
            }
        }
    }
}

#[test]
fn segment_risk_clamps_inputs() {
    let wild = RiskInputs {
        lighting: -3.0,
        traffic: 7.0,
        crime_index: 2.0,
    };
    assert!((compute_segment_risk(&wild) - 1.0).abs() < 1e-12);

    let calm = RiskInputs {
        lighting: 4.0,
        traffic: -1.0,
        crime_index: -1.0,
    };
    assert_eq!(compute_segment_risk(&calm), 0.0);
}

#[test]
fn no_segments_and_no_ratings_scores_neutral() {
    assert_eq!(calculate_safety_score(0.0, &no_segments()), 1.2);
}

#[test]
fn perfect_segment_and_perfect_rating_scores_five() {
    let segments = [RiskInputs {
        lighting: 1.0,
        traffic: 0.0,
        crime_index: 0.0,
    }];

    assert_eq!(calculate_safety_score(5.0, &segments), 5.0);
}

#[test]
fn user_rating_is_clamped() {
    assert_eq!(
        calculate_safety_score(9.0, &no_segments()),
        calculate_safety_score(5.0, &no_segments())
    );
    assert_eq!(calculate_safety_score(-2.0, &no_segments()), 1.2);
}

#[test]
fn score_averages_segment_risks() {
    let segments = [
        RiskInputs {
            lighting: 1.0,
            traffic: 0.0,
            crime_index: 0.0,
        },
        RiskInputs {
            lighting: 0.0,
            traffic: 1.0,
            crime_index: 1.0,
        },
    ];

    // average risk 0.5 -> risk rating 3.0 -> 0.6 * 4 + 0.4 * 3
    assert_eq!(calculate_safety_score(4.0, &segments), 3.6);
}

#[test]
fn rounds_half_up_at_tenths() {
    assert_eq!(round_to_tenths(2.25), 2.3);
    assert_eq!(round_to_tenths(2.24), 2.2);
}
