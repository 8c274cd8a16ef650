/// A straight (non premultiplied) sRGB colour with an opacity in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Rgba { r, g, b, a }
    }

    /// CSS style `hsl(h s% l% / a)`, with `s`, `l` and `a` given as fractions.
    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgba::rgba(channel(r), channel(g), channel(b), a.clamp(0.0, 1.0))
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Rgba { a: a.clamp(0.0, 1.0), ..self }
    }

    pub fn channels(&self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Source-over compositing onto an opaque destination pixel.
    pub fn blend_over(&self, dst: [f32; 3]) -> [f32; 3] {
        let src = self.channels();
        let mut out = [0.0; 3];
        for i in 0..3 {
            out[i] = src[i] * self.a + dst[i] * (1.0 - self.a);
        }
        out
    }

    pub fn from_channels(px: [f32; 3]) -> Self {
        let c = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Rgba::rgb(c(px[0]), c(px[1]), c(px[2]))
    }

    pub fn luminance(&self) -> f32 {
        0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32
    }
}
