/*
One-Pole Smoothing
==================

The simplest recursive low-pass: blend the incoming sample with the
previous output.

    y[n] = a·x[n] + (1 − a)·y[n−1]

With a = 0.7 the filter barely touches the fundamental of a pan note but
takes the edge off the upper partials, which is where the "warmth" comes
from. At a = 1.0 it is a plain wire.

    gain
    1.0 ┤▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▄▄▄
        │                    ▀▀▄▄▄
    0.5 ┤                         ▀▀▀▀▄▄▄▄
        └──────────────────────────────────→ frequency
        DC                            Nyquist

The filter sits on the mix bus, so there is exactly one `previous` for the
whole instrument, owned by whoever renders.
*/

pub struct OnePole {
    weight: f32,   // a: weight of the incoming sample
    previous: f32, // y[n-1]
}

impl OnePole {
    pub fn new(weight: f32) -> Self {
        Self {
            weight: weight.clamp(0.0, 1.0),
            previous: 0.0,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, input: f32) -> f32 {
        let out = self.weight * input + (1.0 - self.weight) * self.previous;
        self.previous = out;
        out
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn previous(&self) -> f32 {
        self.previous
    }

    pub fn reset(&mut self) {
        self.previous = 0.0;
    }
}
