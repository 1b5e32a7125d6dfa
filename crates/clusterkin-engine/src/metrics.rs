//! Per-step performance metrics for the evaluator.
//!
//! [`StepMetrics`] captures timing data for the most recent evaluation
//! calls, for telemetry and profiling.

/// Timing data collected by the [`Evaluator`](crate::Evaluator).
///
/// All durations are in microseconds. Each field is overwritten by the
/// call it measures; the others keep their previous values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetrics {
    /// Wall-clock time of the last whole-grid flux evaluation.
    pub flux_us: u64,
    /// Wall-clock time of the last whole-grid Jacobian evaluation.
    pub jacobian_us: u64,
    /// Wall-clock time of the last rate-table refresh.
    pub rate_update_us: u64,
    /// Grid points whose rates were recomputed by the last refresh.
    pub points_recomputed: usize,
    /// Jacobian entries produced by the last whole-grid evaluation.
    pub jacobian_entries: usize,
}

pub(crate) fn elapsed_us(start: std::time::Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.flux_us, 0);
        assert_eq!(m.jacobian_us, 0);
        assert_eq!(m.rate_update_us, 0);
        assert_eq!(m.points_recomputed, 0);
        assert_eq!(m.jacobian_entries, 0);
    }

    #[test]
    fn elapsed_is_monotone() {
        let start = std::time::Instant::now();
        let a = elapsed_us(start);
        let b = elapsed_us(start);
        assert!(b >= a);
    }
}
