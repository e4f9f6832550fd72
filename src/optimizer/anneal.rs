use crate::config::AnnealParams;
use fastrand::Rng;

/// Metropolis test for a score to be maximised.
///
/// Improvements always pass. Otherwise the move passes when `draw`
/// (uniform in `[0, 1)`) is below `exp(delta / T)`, which is 1 for
/// `delta == 0`, so unchanged scores are always accepted.
#[inline(always)]
pub fn accepts(delta: i64, temperature: f64, draw: f64) -> bool {
    delta > 0 || draw < (delta as f64 / temperature).exp()
}

/// Geometric cooling with a floor, plus the reheating band.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    pub temperature: f64,
    pub temp_min: f64,
    pub cooling_rate: f64,
    pub boost_min: f64,
    pub boost_max: f64,
}

impl Schedule {
    pub fn new(params: &AnnealParams) -> Self {
        Self {
            temperature: params.temp_start.max(params.temp_min),
            temp_min: params.temp_min,
            cooling_rate: params.cooling_rate,
            boost_min: params.boost_min,
            boost_max: params.boost_max,
        }
    }

    #[inline(always)]
    pub fn cool(&mut self) {
        self.temperature = (self.temperature * self.cooling_rate).max(self.temp_min);
    }

    /// Draws a new temperature uniformly from `[boost_min, boost_max]`.
    pub fn reheat(&mut self, rng: &mut Rng) -> f64 {
        let span = self.boost_max - self.boost_min;
        self.temperature =
            (self.boost_min + rng.f64() * span).clamp(self.boost_min, self.boost_max);
        self.temperature
    }

    pub fn in_boost_band(&self) -> bool {
        self.temperature >= self.boost_min && self.temperature <= self.boost_max
    }
}
