/// Emits a burst of `length` ones after each trigger, then silence.
#[derive(Debug, Clone)]
pub struct ImpulseGenerator {
    length: u32,
    remaining: u32,
}

impl ImpulseGenerator {
    pub fn new(length: u32) -> Self {
        Self {
            length: length.max(1),
            remaining: 0,
        }
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    /// Takes effect on the next trigger. Zero clamps to 1.
    pub fn set_length(&mut self, length: u32) -> u32 {
        self.length = length.max(1);
        self.length
    }

    pub fn trigger(&mut self) {
        self.remaining = self.length;
    }

    #[inline]
    pub fn tick(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            1.0
        } else {
            0.0
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.tick();
        }
    }

    pub fn reset(&mut self) {
        self.remaining = 0;
    }
}
