use super::FULL_TURN;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning constants of the spin loop, in degrees per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinTuning {
    pub acceleration: f64,
    pub max_accelerating_speed: f64,
    pub stop_threshold: f64,
    pub decay_min: f64,
    pub decay_max: f64,
}

impl Default for SpinTuning {
    fn default() -> Self {
        Self {
            acceleration: 25.0,
            max_accelerating_speed: 3.0,
            stop_threshold: 0.2,
            decay_min: 0.85,
            decay_max: 0.96,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("decay range [{0}, {1}) must lie strictly inside (0, 1) and be non-empty")]
    DecayRange(f64, f64),
    #[error("stop threshold must be positive, got {0}")]
    StopThreshold(f64),
    #[error("acceleration must be positive, got {0}")]
    Acceleration(f64),
}

impl SpinTuning {
    /// Rejects values for which a stopping wheel would never settle.
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(0.0 < self.decay_min && self.decay_min < self.decay_max && self.decay_max < 1.0) {
            return Err(TuningError::DecayRange(self.decay_min, self.decay_max));
        }
        if self.stop_threshold <= 0.0 || !self.stop_threshold.is_finite() {
            return Err(TuningError::StopThreshold(self.stop_threshold));
        }
        if self.acceleration <= 0.0 || !self.acceleration.is_finite() {
            return Err(TuningError::Acceleration(self.acceleration));
        }
        Ok(())
    }

    fn sample_decay<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.decay_min..self.decay_max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Spinning,
    /// Speed decays by `decay` every frame. The factor is drawn once per stop.
    Decelerating { decay: f64 },
    Settled,
}

impl Phase {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Decelerating { .. })
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Spinning | Self::Decelerating { .. })
    }
}

/// What the frame driver should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moving,
    Settled,
    Halted,
}

#[derive(Debug, Clone)]
pub struct Motion {
    angle: f64,
    speed: f64,
    phase: Phase,
    tuning: SpinTuning,
}

impl Motion {
    pub fn new(angle: f64, tuning: SpinTuning) -> Self {
        Self {
            angle: angle.rem_euclid(FULL_TURN),
            speed: 0.0,
            phase: Phase::Idle,
            tuning,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R, tuning: SpinTuning) -> Self {
        Self::new(rng.gen_range(0.0..FULL_TURN), tuning)
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Applies new tuning; a deceleration already underway keeps its factor.
    pub fn set_tuning(&mut self, tuning: SpinTuning) {
        self.tuning = tuning;
    }

    /// Returns whether the phase changed.
    pub fn start(&mut self) -> bool {
        if self.phase == Phase::Spinning {
            return false;
        }
        self.phase = Phase::Spinning;
        true
    }

    /// Returns whether the phase changed.
    pub fn stop<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.phase != Phase::Spinning {
            return false;
        }
        let decay = self.tuning.sample_decay(rng);
        log::debug!("Stopping at {:.2}°/frame, decay {:.3}", self.speed, decay);
        self.phase = Phase::Decelerating { decay };
        true
    }

    pub fn tick(&mut self) -> Step {
        if !self.phase.is_animating() {
            return Step::Halted;
        }

        self.angle = (self.angle + self.speed).rem_euclid(FULL_TURN);

        match self.phase {
            Phase::Spinning => {
                if self.speed < self.tuning.max_accelerating_speed {
                    self.speed += self.tuning.acceleration;
                }
                Step::Moving
            }
            Phase::Decelerating { decay } => {
                self.speed = if self.speed > self.tuning.stop_threshold {
                    self.speed * decay
                } else {
                    0.0
                };
                if self.speed == 0.0 {
                    self.phase = Phase::Settled;
                    Step::Settled
                } else {
                    Step::Moving
                }
            }
            Phase::Idle | Phase::Settled => Step::Halted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spinning(rng: &mut StdRng, ticks: usize) -> Motion {
        let mut motion = Motion::new(0.0, SpinTuning::default());
        motion.start();
        for _ in 0..ticks {
            assert_eq!(motion.tick(), Step::Moving);
        }
        assert!(motion.stop(rng));
        motion
    }

    #[test]
    fn test_idle_tick_is_halted() {
        let mut motion = Motion::new(42.0, SpinTuning::default());
        assert_eq!(motion.tick(), Step::Halted);
        assert_eq!(motion.angle(), 42.0);
        assert_eq!(motion.phase(), Phase::Idle);
    }

    #[test]
    fn test_acceleration_caps_speed() {
        let mut motion = Motion::new(0.0, SpinTuning::default());
        motion.start();

        motion.tick();
        assert_eq!(motion.angle(), 0.0);
        assert_eq!(motion.speed(), 25.0);

        // Already above the cap: cruise without accelerating.
        motion.tick();
        assert_eq!(motion.speed(), 25.0);
        assert_eq!(motion.angle(), 25.0);
    }

    #[test]
    fn test_angle_wraps_into_full_turn() {
        let mut motion = Motion::new(350.0, SpinTuning::default());
        motion.start();
        for _ in 0..20 {
            motion.tick();
            assert!((0.0..360.0).contains(&motion.angle()));
        }
        assert_eq!(Motion::new(-30.0, SpinTuning::default()).angle(), 330.0);
    }

    #[test]
    fn test_decay_factor_sampled_once_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut motion = spinning(&mut rng, 3);

        let Phase::Decelerating { decay } = motion.phase() else {
            panic!("expected deceleration, got {:?}", motion.phase());
        };
        assert!((0.85..0.96).contains(&decay));

        let before = motion.speed();
        motion.tick();
        assert!((motion.speed() - before * decay).abs() < 1e-12);
        assert_eq!(motion.phase(), Phase::Decelerating { decay });
    }

    #[test]
    fn test_deceleration_is_monotonic_and_reaches_zero() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut motion = spinning(&mut rng, 5);

            let mut previous = motion.speed();
            let mut steps = 0;
            loop {
                let step = motion.tick();
                assert!(motion.speed() < previous, "seed {}: speed rose", seed);
                previous = motion.speed();
                steps += 1;
                assert!(steps < 1_000, "seed {}: never settled", seed);
                if step == Step::Settled {
                    break;
                }
            }
            assert_eq!(motion.speed(), 0.0);
            assert_eq!(motion.phase(), Phase::Settled);
            assert_eq!(motion.tick(), Step::Halted);
        }
    }

    #[test]
    fn test_stop_is_ignored_unless_spinning() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut motion = Motion::new(0.0, SpinTuning::default());
        assert!(!motion.stop(&mut rng));
        assert_eq!(motion.phase(), Phase::Idle);
    }

    #[test]
    fn test_restart_draws_a_new_factor() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut motion = spinning(&mut rng, 2);
        let first = motion.phase();

        assert!(motion.start());
        assert_eq!(motion.phase(), Phase::Spinning);
        assert!(!motion.start());
        assert!(motion.stop(&mut rng));
        assert!(motion.phase().is_locked());
        assert_ne!(motion.phase(), first);
    }

    #[test]
    fn test_tuning_validation() {
        assert!(SpinTuning::default().validate().is_ok());

        let inverted = SpinTuning {
            decay_min: 0.96,
            decay_max: 0.85,
            ..SpinTuning::default()
        };
        assert_eq!(
            inverted.validate(),
            Err(TuningError::DecayRange(0.96, 0.85))
        );

        let no_decay = SpinTuning {
            decay_max: 1.0,
            ..SpinTuning::default()
        };
        assert!(no_decay.validate().is_err());

        let zero_threshold = SpinTuning {
            stop_threshold: 0.0,
            ..SpinTuning::default()
        };
        assert_eq!(
            zero_threshold.validate(),
            Err(TuningError::StopThreshold(0.0))
        );
    }
}
