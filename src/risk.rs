use rand_distr::{Distribution, Uniform};

use crate::entities::{Coordinates, RiskInputs};

/// Source of environmental risk inputs for a stretch of road.
pub trait RiskSource: Send + Sync {
    fn assess(&self, start: &Coordinates, end: &Coordinates) -> RiskInputs;
}

/// Stand-in for real lighting, traffic and crime data: draws each input
/// uniformly from a plausible band.
pub struct UniformRiskSource {
    lighting: Uniform<f64>,
    traffic: Uniform<f64>,
    crime_index: Uniform<f64>,
}

impl UniformRiskSource {
    pub fn new() -> Self {
        Self {
            lighting: Uniform::new(0.4, 0.9),
            traffic: Uniform::new(0.2, 0.8),
            crime_index: Uniform::new(0.1, 0.6),
        }
    }
}

impl Default for UniformRiskSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskSource for UniformRiskSource {
    fn assess(&self, _start: &Coordinates, _end: &Coordinates) -> RiskInputs {
        let mut rng = rand::thread_rng();

        RiskInputs {
            lighting: self.lighting.sample(&mut rng),
            traffic: self.traffic.sample(&mut rng),
            crime_index: self.crime_index.sample(&mut rng),
        }
    }
}

/// Returns the same inputs for every segment.
pub struct FixedRiskSource(pub RiskInputs);

impl RiskSource for FixedRiskSource {
    fn assess(&self, _start: &Coordinates, _end: &Coordinates) -> RiskInputs {
        self.0
    }
}

#[test]
fn uniform_inputs_stay_in_their_bands() {
    let source = UniformRiskSource::new();
    let point = Coordinates::new(0.0, 0.0);

    for _ in 0..500 {
        let inputs = source.assess(&point, &point);
        assert!((0.4..0.9).contains(&inputs.lighting));
        assert!((0.2..0.8).contains(&inputs.traffic));
        assert!((0.1..0.6).contains(&inputs.crime_index));
    }
}
