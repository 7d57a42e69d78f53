use rand::Rng;
use rand_pcg::Pcg64;

/// A stream of uniform random draws on the open interval (0, 1).
///
/// This is the engine's only source of randomness: every interarrival
/// and service duration is produced by feeding one draw from this
/// trait through [`exponential()`]. The engine depends only on this
/// contract, not on any particular generator algorithm, so two runs
/// fed identical draw sequences produce bit-identical event timelines
/// and reports.
///
/// Implementors must return values strictly inside (0, 1): a draw of
/// exactly 0 would send [`exponential()`] to infinity, and a draw of
/// exactly 1 would collapse it to zero. An implementation is provided
/// for [`Pcg64`], the generator used throughout this crate's tests;
/// for any other [`rand`] generator the same few-line resampling impl
/// applies.
pub trait UniformSource {
    /// Produce the next draw, strictly within (0, 1), advancing the
    /// underlying stream's state.
    fn next_uniform(&mut self) -> f64;
}

impl UniformSource for Pcg64 {
    fn next_uniform(&mut self) -> f64 {
        // random::<f64>() covers [0, 1); resample the measure-zero 0.0
        // to honor the open-interval contract.
        loop {
            let draw: f64 = self.random();
            if draw > 0.0 {
                return draw;
            }
        }
    }
}

/// A [`UniformSource`] that replays a fixed sequence of draws.
///
/// Lets a test or a replay harness pin every stochastic decision of a
/// run in advance, which is how the fixed-trace scenarios in this
/// crate's test suite verify accumulator values analytically.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// Wrap a sequence of draws, each of which must lie in (0, 1).
    pub fn new(draws: Vec<f64>) -> Self {
        debug_assert!(
            draws.iter().all(|draw| 0.0 < *draw && *draw < 1.0),
            "scripted draws must lie strictly within (0, 1)"
        );
        Self { draws, cursor: 0 }
    }

    /// Number of draws left before the script is exhausted.
    pub fn remaining(&self) -> usize {
        self.draws.len() - self.cursor
    }
}

impl UniformSource for ScriptedSource {
    /// # Panics
    ///
    /// Panics when called after the script is exhausted; a scripted
    /// run is expected to know exactly how many draws it consumes.
    fn next_uniform(&mut self) -> f64 {
        let draw = self.draws.get(self.cursor).copied().unwrap_or_else(|| {
            panic!("scripted uniform source exhausted after {} draws", self.cursor)
        });
        self.cursor += 1;
        draw
    }
}

/// Draw an exponentially distributed duration with the given mean,
/// via the inverse transform `-mean * ln(u)`.
///
/// One uniform draw is consumed per call. `mean` must be positive;
/// that is a caller precondition (validated by [`Parameters`]), not a
/// runtime-handled condition, and is only debug-asserted here.
///
/// [`Parameters`]: crate::Parameters
pub fn exponential<S>(source: &mut S, mean: f64) -> f64
where
    S: UniformSource + ?Sized,
{
    debug_assert!(mean > 0.0, "exponential mean must be positive, got {mean}");
    -mean * source.next_uniform().ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn exponential_applies_inverse_transform() {
        let mut source = ScriptedSource::new(vec![0.5]);
        let draw = exponential(&mut source, 1.0);
        assert!(
            (draw - std::f64::consts::LN_2).abs() < 1e-15,
            "-1.0 * ln(0.5) should be ln 2, got {draw}"
        );
    }

    #[test]
    fn exponential_scales_with_mean() {
        let mut source = ScriptedSource::new(vec![0.25, 0.25]);
        let unit = exponential(&mut source, 1.0);
        let tripled = exponential(&mut source, 3.0);
        assert_eq!(3.0 * unit, tripled, "mean should scale the draw linearly");
    }

    #[test]
    fn scripted_source_replays_in_order() {
        let mut source = ScriptedSource::new(vec![0.1, 0.2, 0.3]);
        assert_eq!(3, source.remaining());
        assert_eq!(0.1, source.next_uniform());
        assert_eq!(0.2, source.next_uniform());
        assert_eq!(0.3, source.next_uniform());
        assert_eq!(0, source.remaining());
    }

    #[test]
    #[should_panic(expected = "exhausted")]
    fn scripted_source_panics_when_exhausted() {
        let mut source = ScriptedSource::new(vec![0.5]);
        source.next_uniform();
        source.next_uniform();
    }

    #[test]
    fn pcg_draws_stay_inside_open_interval() {
        let mut rng = Pcg64::seed_from_u64(7);
        for _ in 0..10_000 {
            let draw = rng.next_uniform();
            assert!(0.0 < draw && draw < 1.0, "draw {draw} escaped (0, 1)");
        }
    }

    #[test]
    fn identical_seeds_produce_identical_draws() {
        let mut first = Pcg64::seed_from_u64(42);
        let mut second = Pcg64::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(first.next_uniform(), second.next_uniform());
        }
    }

    #[test]
    fn seeded_exponential_sample_mean_is_close() {
        let mut rng = Pcg64::seed_from_u64(1234);
        let n = 20_000;
        let sum: f64 = (0..n).map(|_| exponential(&mut rng, 2.5)).sum();
        let sample_mean = sum / f64::from(n);
        assert!(
            (sample_mean - 2.5).abs() < 0.1,
            "sample mean {sample_mean} strayed from 2.5"
        );
    }
}
