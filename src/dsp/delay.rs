//! Fractional delay line (ring buffer with linear interpolation).
//!
//! ```text
//!   |__|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_|_......|_|_|
//!            ^ ->                        ^ ->
//!            | read                      | write
//!            |<- - - - - delay - - - - ->|
//! ```
//!
//! Every sample the caller reads first and writes second. Reading before
//! writing means a delay of `1.0` returns the most recently written sample and
//! the current input never leaks into the output when input and output share
//! a buffer.
//!
//! Fractional delays blend the tap at `write - floor(d)` with its predecessor
//! (one sample older):
//!
//! ```text
//! y = a + frac * (b - a)
//! ```

use tracing::debug;

use crate::error::DspError;

/// Ring buffer of past samples with an interpolated read tap.
///
/// Storage is sized once per sample rate. Reads and writes never allocate;
/// only [`resize`](Self::resize) does.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Number of slots needed to hold `max_delay_ms` at `sample_rate`, plus
    /// one guard slot.
    ///
    /// Saturates at `usize::MAX` for absurd rates, which `resize` then
    /// reports as an allocation failure.
    pub fn capacity_for(sample_rate: f32, max_delay_ms: f32) -> usize {
        let samples = (sample_rate * max_delay_ms / 1000.0).ceil().max(1.0) as usize;
        samples.saturating_add(1)
    }

    /// Create a zeroed delay line with `capacity` slots (at least 2).
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(2)],
            write_pos: 0,
        }
    }

    /// Allocate a delay line long enough for `max_delay_ms` at `sample_rate`.
    pub fn for_duration(sample_rate: f32, max_delay_ms: f32) -> Result<Self, DspError> {
        let mut line = Self {
            buffer: Vec::new(),
            write_pos: 0,
        };
        line.resize(Self::capacity_for(sample_rate, max_delay_ms))?;
        Ok(line)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn write_index(&self) -> usize {
        self.write_pos
    }

    /// Longest delay (in samples) a read can ask for.
    #[inline]
    pub fn max_delay(&self) -> f32 {
        (self.buffer.len() - 1) as f32
    }

    /// Read `delay_samples` behind the write head, interpolating between the
    /// two neighbouring taps.
    ///
    /// Delays of `capacity` or more are a caller error; they wrap instead of
    /// panicking.
    #[inline]
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        debug_assert!(
            delay_samples < self.buffer.len() as f32,
            "delay {} exceeds capacity {}",
            delay_samples,
            self.buffer.len()
        );

        let len = self.buffer.len();
        let delay = delay_samples.max(0.0);
        let whole = delay as usize;
        let frac = delay - whole as f32;

        let offset = whole % len;
        let index_a = (self.write_pos + len - offset) % len;
        let index_b = (index_a + len - 1) % len;

        let a = self.buffer[index_a];
        let b = self.buffer[index_b];
        a + frac * (b - a)
    }

    /// Read a whole number of samples behind the write head.
    #[inline]
    pub fn read(&self, delay_samples: usize) -> f32 {
        let len = self.buffer.len();
        self.buffer[(self.write_pos + len - delay_samples % len) % len]
    }

    /// Store `sample` at the write head and advance it.
    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos += 1;
        if self.write_pos >= self.buffer.len() {
            self.write_pos = 0;
        }
    }

    /// Plain delay over a block: each output is the input `delay_samples` ago.
    pub fn render(&mut self, buffer: &mut [f32], delay_samples: f32) {
        for sample in buffer.iter_mut() {
            let delayed = self.read_interpolated(delay_samples);
            self.write(*sample);
            *sample = delayed;
        }
    }

    /// Zero every slot and rewind the write head.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }

    /// Reallocate to `capacity` slots, zero-filled.
    ///
    /// Old contents are discarded. If the allocation fails the existing buffer
    /// and write head are left untouched.
    pub fn resize(&mut self, capacity: usize) -> Result<(), DspError> {
        let capacity = capacity.max(2);
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(capacity)
            .map_err(|e| DspError::allocation(capacity, e))?;
        buffer.resize(capacity, 0.0);

        debug!(from = self.buffer.len(), to = capacity, "delay line reallocated");
        self.buffer = buffer;
        self.write_pos = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_follows_sample_rate() {
        // 10ms at 44.1kHz is exactly 441 samples, plus one guard slot.
        assert_eq!(DelayLine::capacity_for(44_100.0, 10.0), 442);
        assert_eq!(DelayLine::capacity_for(48_000.0, 100.0), 4801);
        // Fractional lengths round up.
        assert_eq!(DelayLine::capacity_for(44_100.0, 0.05), 4);
    }

    #[test]
    fn capacity_saturates_instead_of_wrapping() {
        assert_eq!(DelayLine::capacity_for(1.0e30, 100.0), usize::MAX);
        assert_eq!(DelayLine::capacity_for(f32::MAX, f32::MAX), usize::MAX);

        let mut dl = DelayLine::new(16);
        assert!(dl.resize(DelayLine::capacity_for(1.0e30, 100.0)).is_err());
        assert_eq!(dl.capacity(), 16);
    }

    #[test]
    fn reads_most_recent_sample_at_unit_delay() {
        let mut dl = DelayLine::new(100);
        dl.write(0.75);

        let result = dl.read_interpolated(1.0);
        assert!((result - 0.75).abs() < 1e-6, "Expected 0.75, got {result}");
    }

    #[test]
    fn interpolates_towards_older_sample() {
        let mut dl = DelayLine::new(100);
        dl.write(0.0);
        dl.write(1.0);

        // 1 back = 1.0, 2 back = 0.0
        let result = dl.read_interpolated(1.5);
        assert!((result - 0.5).abs() < 1e-6, "Expected 0.5, got {result}");
        let result = dl.read_interpolated(1.25);
        assert!((result - 0.75).abs() < 1e-6, "Expected 0.75, got {result}");
    }

    #[test]
    fn ramp_fill_reproduces_linear_interpolation() {
        let capacity = 64;
        let mut dl = DelayLine::new(capacity);
        for i in 0..capacity {
            dl.write(i as f32);
        }

        // The sample written `k` ticks ago holds `capacity - k`.
        let mut d = 1.0f32;
        while d < (capacity - 1) as f32 {
            let expected = capacity as f32 - d;
            let got = dl.read_interpolated(d);
            assert!(
                (got - expected).abs() < 1e-4,
                "delay {d}: expected {expected}, got {got}"
            );
            d += 0.37;
        }
    }

    #[test]
    fn impulse_round_trips_across_the_wrap_point() {
        // 10ms at 44.1kHz
        let mut dl = DelayLine::for_duration(44_100.0, 10.0).unwrap();
        let capacity = dl.capacity();

        // Move the write head close to the end so the read has to wrap.
        for _ in 0..capacity - 3 {
            dl.write(0.0);
        }

        for d in [1usize, 2, 3, 10, 200, capacity - 1] {
            let mut probe = dl.clone();
            probe.write(1.0);
            for tick in 1..=d {
                if tick == d {
                    assert_eq!(probe.read_interpolated(d as f32), 1.0, "delay {d}");
                } else {
                    assert_eq!(probe.read_interpolated(d as f32), 0.0, "delay {d} tick {tick}");
                }
                probe.write(0.0);
            }
        }
    }

    #[test]
    fn wraps_after_capacity_writes() {
        let mut dl = DelayLine::new(4);
        for i in 0..6 {
            dl.write(i as f32);
        }

        assert_eq!(dl.write_index(), 2);
        assert!((dl.read_interpolated(1.0) - 5.0).abs() < 1e-6);
        assert!((dl.read_interpolated(3.0) - 3.0).abs() < 1e-6);
        assert_eq!(dl.read(2), 4.0);
    }

    #[test]
    fn reset_silences_every_tap() {
        let mut dl = DelayLine::new(32);
        for i in 0..50 {
            dl.write(i as f32 * 0.1);
        }
        dl.reset();

        assert_eq!(dl.write_index(), 0);
        for d in 0..31 {
            assert_eq!(dl.read_interpolated(d as f32 + 0.5), 0.0);
        }
    }

    #[test]
    fn resize_discards_contents() {
        let mut dl = DelayLine::new(16);
        for _ in 0..5 {
            dl.write(1.0);
        }

        dl.resize(32).unwrap();
        assert_eq!(dl.capacity(), 32);
        assert_eq!(dl.write_index(), 0);
        assert_eq!(dl.read_interpolated(3.0), 0.0);
    }

    #[test]
    fn failed_resize_keeps_previous_buffer() {
        let mut dl = DelayLine::new(16);
        dl.write(0.5);

        let err = dl.resize(usize::MAX).unwrap_err();
        assert!(matches!(err, DspError::Allocation { samples: usize::MAX, .. }));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(dl.capacity(), 16);
        assert_eq!(dl.read(1), 0.5);
    }

    #[test]
    fn render_delays_block() {
        let mut dl = DelayLine::new(16);
        let mut buffer = [1.0, 2.0, 3.0, 4.0, 5.0];
        dl.render(&mut buffer, 2.0);

        assert_eq!(buffer, [0.0, 0.0, 1.0, 2.0, 3.0]);
    }
}
