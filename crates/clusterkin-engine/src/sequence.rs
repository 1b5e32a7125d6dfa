//! Geometric ramp for the integrator's initial timestep.

/// A value that grows by a constant factor per step up to a cap.
///
/// # Examples
///
/// ```
/// use clusterkin_engine::GrowthFactorStepSequence;
///
/// let mut seq = GrowthFactorStepSequence::new(1.0e-12, 1.0e-9, 10.0);
/// seq.start();
/// seq.step();
/// seq.step();
/// assert!((seq.current() - 1.0e-10).abs() < 1e-24);
/// seq.step();
/// seq.step();
/// assert_eq!(seq.current(), 1.0e-9);
/// assert_eq!(seq.current_step(), 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthFactorStepSequence {
    initial_value: f64,
    final_value: f64,
    growth_factor: f64,
    initial_step: usize,
    current_value: f64,
    current_step: usize,
}

impl GrowthFactorStepSequence {
    /// A sequence from `initial_value` to `final_value` growing by
    /// `growth_factor` per step, starting at step 0.
    pub fn new(initial_value: f64, final_value: f64, growth_factor: f64) -> Self {
        Self::starting_at(initial_value, final_value, growth_factor, 0)
    }

    /// Like [`new`](Self::new) but counting from `initial_step`.
    pub fn starting_at(
        initial_value: f64,
        final_value: f64,
        growth_factor: f64,
        initial_step: usize,
    ) -> Self {
        Self {
            initial_value,
            final_value,
            growth_factor,
            initial_step,
            current_value: initial_value,
            current_step: initial_step,
        }
    }

    /// Reset to the initial value and step.
    pub fn start(&mut self) {
        self.current_step = self.initial_step;
        self.current_value = self.initial_value;
    }

    /// Advance one step.
    pub fn step(&mut self) {
        self.current_value = (self.current_value * self.growth_factor).min(self.final_value);
        self.current_step += 1;
    }

    /// Current value.
    pub fn current(&self) -> f64 {
        self.current_value
    }

    /// Current step number.
    pub fn current_step(&self) -> usize {
        self.current_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_resets_after_stepping() {
        let mut seq = GrowthFactorStepSequence::starting_at(1.0, 100.0, 2.0, 5);
        seq.step();
        seq.step();
        assert_eq!(seq.current(), 4.0);
        assert_eq!(seq.current_step(), 7);
        seq.start();
        assert_eq!(seq.current(), 1.0);
        assert_eq!(seq.current_step(), 5);
    }

    #[test]
    fn value_never_exceeds_the_cap() {
        let mut seq = GrowthFactorStepSequence::new(1.0, 10.0, 3.0);
        seq.start();
        for _ in 0..20 {
            seq.step();
            assert!(seq.current() <= 10.0);
        }
        assert_eq!(seq.current(), 10.0);
    }
}
