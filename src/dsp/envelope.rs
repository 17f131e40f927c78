/*
Envelope Followers
==================

A follower turns audio into a slowly moving level: how loud is the signal
right now? Two flavours live here.

  peak        Rectify, then chase the result with a one-pole lowpass that
              rises at the attack rate and falls at the release rate.

                  a = |x|
                  a > y ?  y = (1-AT)·y + AT·a     (attack)
                        :  y = (1-RT)·y            (release)

  rms         Square, average with a single one-pole, take the root.

                  ms = (1-TAV)·ms + TAV·x²
                  y  = √ms


Time Constants
--------------

All three coefficients come from the same formula:

    coeff = 1 - e^(-2.2 / (sr · T_ms · 0.001))

2.2 time constants is where a one-pole reaches 90% of a step (e^-2.2 ≈
0.11), so T is the 10%→90% rise time. The coefficient depends only on
(sr, T); it is recomputed when either changes and never per sample.

A time of 0 gives a coefficient of 1: the follower jumps straight to its
target.
*/

/// One-pole smoothing coefficient reaching 90% of a step in `time_ms`.
#[inline]
pub fn time_coefficient(time_ms: f32, sample_rate: f32) -> f32 {
    if time_ms <= 0.0 {
        return 1.0;
    }
    1.0 - (-2.2 / (sample_rate * time_ms * 0.001)).exp()
}

/// Peak follower with separate attack and release.
#[derive(Debug, Clone)]
pub struct PeakFollower {
    sample_rate: f32,
    attack_ms: f32,
    release_ms: f32,
    attack_coeff: f32,
    release_coeff: f32,
    level: f32,
}

impl PeakFollower {
    pub fn new(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            sample_rate,
            attack_ms: 0.0,
            release_ms: 0.0,
            attack_coeff: 1.0,
            release_coeff: 1.0,
            level: 0.0,
        };
        follower.set_attack(attack_ms);
        follower.set_release(release_ms);
        follower
    }

    pub fn attack(&self) -> f32 {
        self.attack_ms
    }

    pub fn release(&self) -> f32 {
        self.release_ms
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Negative times clamp to 0. Returns the applied time.
    pub fn set_attack(&mut self, attack_ms: f32) -> f32 {
        self.attack_ms = attack_ms.max(0.0);
        self.attack_coeff = time_coefficient(self.attack_ms, self.sample_rate);
        self.attack_ms
    }

    pub fn set_release(&mut self, release_ms: f32) -> f32 {
        self.release_ms = release_ms.max(0.0);
        self.release_coeff = time_coefficient(self.release_ms, self.sample_rate);
        self.release_ms
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_attack(self.attack_ms);
        self.set_release(self.release_ms);
    }

    #[inline]
    pub fn next_sample(&mut self, x: f32) -> f32 {
        let a = x.abs();
        if a > self.level {
            self.level = (1.0 - self.attack_coeff) * self.level + self.attack_coeff * a;
        } else {
            self.level *= 1.0 - self.release_coeff;
        }
        self.level
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}

/// Root-mean-square follower with one averaging time.
#[derive(Debug, Clone)]
pub struct RmsFollower {
    sample_rate: f32,
    time_ms: f32,
    coeff: f32,
    mean_square: f32,
}

impl RmsFollower {
    pub fn new(sample_rate: f32, time_ms: f32) -> Self {
        let mut follower = Self {
            sample_rate,
            time_ms: 0.0,
            coeff: 1.0,
            mean_square: 0.0,
        };
        follower.set_time(time_ms);
        follower
    }

    pub fn time(&self) -> f32 {
        self.time_ms
    }

    pub fn level(&self) -> f32 {
        self.mean_square.sqrt()
    }

    pub fn set_time(&mut self, time_ms: f32) -> f32 {
        self.time_ms = time_ms.max(0.0);
        self.coeff = time_coefficient(self.time_ms, self.sample_rate);
        self.time_ms
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.set_time(self.time_ms);
    }

    #[inline]
    pub fn next_sample(&mut self, x: f32) -> f32 {
        self.mean_square = (1.0 - self.coeff) * self.mean_square + self.coeff * x * x;
        self.mean_square.sqrt()
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.mean_square = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SR: f32 = 44_100.0;

    fn ms_to_samples(ms: f32) -> usize {
        (ms * SR / 1000.0) as usize
    }

    #[test]
    fn coefficient_reaches_ninety_percent_in_time() {
        let coeff = time_coefficient(10.0, SR);
        let steps = ms_to_samples(10.0) as i32;
        let reached = 1.0 - (1.0 - coeff).powi(steps);
        // e^-2.2 leaves about 11% of the step
        let expected = 1.0 - (-2.2f32).exp();
        assert!((reached - expected).abs() < 1e-3, "reached {reached}");

        assert_eq!(time_coefficient(0.0, SR), 1.0);
        assert_eq!(time_coefficient(-5.0, SR), 1.0);
    }

    #[test]
    fn peak_converges_within_five_attack_times() {
        let attack_ms = 5.0;
        let mut follower = PeakFollower::new(SR, attack_ms, 20.0);
        let mut buffer = vec![1.0; ms_to_samples(5.0 * attack_ms)];
        follower.render(&mut buffer);

        let last = buffer[buffer.len() - 1];
        assert!((last - 1.0).abs() < 0.05, "level {last}");
    }

    #[test]
    fn peak_rectifies_and_releases() {
        let mut follower = PeakFollower::new(SR, 0.0, 10.0);
        assert_eq!(follower.next_sample(-0.8), 0.8);

        let mut previous = follower.level();
        for _ in 0..100 {
            let level = follower.next_sample(0.0);
            assert!(level < previous);
            previous = level;
        }
    }

    #[test]
    fn negative_times_clamp_to_zero() {
        let mut follower = PeakFollower::new(SR, 1.0, 20.0);
        assert_eq!(follower.set_attack(-3.0), 0.0);
        assert_eq!(follower.set_release(-1.0), 0.0);
    }

    #[test]
    fn rms_of_full_scale_sine_settles_near_root_half() {
        let mut follower = RmsFollower::new(48_000.0, 50.0);
        let mut buffer: Vec<f32> = (0..48_000)
            .map(|i| (TAU * 1_000.0 * i as f32 / 48_000.0).sin())
            .collect();
        follower.render(&mut buffer);

        let settled = buffer[47_999];
        assert!(
            (settled - std::f32::consts::FRAC_1_SQRT_2).abs() < 0.02,
            "rms {settled}"
        );
    }

    #[test]
    fn reset_returns_to_silence() {
        let mut peak = PeakFollower::new(SR, 1.0, 20.0);
        let mut rms = RmsFollower::new(SR, 4.0);
        for _ in 0..64 {
            peak.next_sample(1.0);
            rms.next_sample(1.0);
        }
        peak.reset();
        rms.reset();

        assert_eq!(peak.level(), 0.0);
        assert_eq!(rms.level(), 0.0);
    }

    #[test]
    fn sample_rate_change_rescales_coefficients() {
        let mut follower = RmsFollower::new(SR, 4.0);
        follower.set_sample_rate(2.0 * SR);

        let mut fresh = RmsFollower::new(2.0 * SR, 4.0);
        assert_eq!(follower.next_sample(1.0), fresh.next_sample(1.0));
    }
}
