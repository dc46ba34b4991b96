//! Pipe coloring: palette cycling or novel random colors.

use oorandom::Rand32;

/// 8-bit RGB triple handed to the segment sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// HSV (all components 0..1) to RGB.
    pub fn from_hsv(h: f32, s: f32, v: f32) -> Self {
        let h = (h.rem_euclid(1.0)) * 6.0;
        let i = h.floor() as i32 % 6;
        let f = h - h.floor();
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);
        let (r, g, b) = match i {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self::new(
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
        )
    }
}

/// Fallback palette when none is configured: green, red, blue, yellow.
pub const DEFAULT_PALETTE: [Rgb; 4] = [
    Rgb::new(0, 255, 0),
    Rgb::new(255, 0, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 255, 0),
];

/// Bounded retries for random draws so color-space exhaustion can never
/// hang the engine.
const MAX_REDRAWS: u32 = 8;

enum Source {
    Palette { colors: Vec<Rgb>, index: usize },
    RandomHsv,
}

/// Advances through a palette, or generates novel random colors,
/// avoiding an immediate repeat where possible.
pub struct ColorCycler {
    source: Source,
    current: Rgb,
}

impl ColorCycler {
    /// Cycle a fixed palette in order. An empty palette falls back to
    /// [`DEFAULT_PALETTE`].
    pub fn palette(colors: Vec<Rgb>) -> Self {
        let colors = if colors.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            colors
        };
        let current = colors[0];
        Self {
            source: Source::Palette { colors, index: 0 },
            current,
        }
    }

    /// Fully random HSV colors; the first is drawn from `rng`.
    pub fn random(rng: &mut Rand32) -> Self {
        let current = random_hsv(rng);
        Self {
            source: Source::RandomHsv,
            current,
        }
    }

    pub fn current(&self) -> Rgb {
        self.current
    }

    /// Move to the next color and return it.
    pub fn advance(&mut self, rng: &mut Rand32) -> Rgb {
        self.current = match &mut self.source {
            Source::Palette { colors, index } => {
                *index = (*index + 1) % colors.len();
                colors[*index]
            }
            Source::RandomHsv => {
                let mut next = random_hsv(rng);
                for _ in 0..MAX_REDRAWS {
                    if next != self.current {
                        break;
                    }
                    next = random_hsv(rng);
                }
                next
            }
        };
        self.current
    }
}

fn random_hsv(rng: &mut Rand32) -> Rgb {
    Rgb::from_hsv(rng.rand_float(), rng.rand_float(), rng.rand_float())
}
