use crate::color::Rgba;
use crate::vector::Vector;

/// Drawing primitives the game renders with. Positions are in pixels.
pub trait Surface {
    /// Paints `wash` over the whole surface. A translucent wash only fades
    /// what was drawn before.
    fn clear(&mut self, wash: Rgba);

    fn fill_rect(&mut self, position: Vector, size: Vector, color: Rgba);

    fn stroke_circle(&mut self, center: Vector, radius: f64, color: Rgba);
}

/// A square software framebuffer with source-over blending.
pub struct Canvas {
    side: i32,
    pixels: Vec<[f32; 3]>,
}

impl Canvas {
    pub fn new(side: i32) -> Self {
        let side = side.max(0);
        Canvas { side, pixels: vec![[0.0; 3]; side as usize * side as usize] }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.index(x, y).map(|i| Rgba::from_channels(self.pixels[i]))
    }

    /// The most luminous pixel of the `size` x `size` block at `(x0, y0)`,
    /// black when the block lies outside the canvas.
    pub fn sample(&self, x0: i32, y0: i32, size: i32) -> Rgba {
        let (xs, ys) = (self.clip(x0, size), self.clip(y0, size));

        let mut best = Rgba::rgb(0, 0, 0);
        for y in ys {
            for x in xs.clone() {
                if let Some(px) = self.pixel(x, y) {
                    if px.luminance() > best.luminance() {
                        best = px;
                    }
                }
            }
        }
        best
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if 0 <= x && x < self.side && 0 <= y && y < self.side {
            Some(y as usize * self.side as usize + x as usize)
        } else {
            None
        }
    }

    fn clip(&self, start: i32, len: i32) -> std::ops::Range<i32> {
        start.max(0)..(start + len).min(self.side)
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.blend_over(self.pixels[i]);
        }
    }
}

impl Surface for Canvas {
    fn clear(&mut self, wash: Rgba) {
        for px in self.pixels.iter_mut() {
            *px = wash.blend_over(*px);
        }
    }

    fn fill_rect(&mut self, position: Vector, size: Vector, color: Rgba) {
        let xs = self.clip(position.x, size.x);
        for y in self.clip(position.y, size.y) {
            for x in xs.clone() {
                self.blend(x, y, color);
            }
        }
    }

    fn stroke_circle(&mut self, center: Vector, radius: f64, color: Rgba) {
        let reach = radius.ceil() as i32 + 1;
        let xs = self.clip(center.x - reach, 2 * reach + 1);

        // One pixel wide ring: every pixel whose centre lies within half a
        // pixel of the circle
        for y in self.clip(center.y - reach, 2 * reach + 1) {
            for x in xs.clone() {
                let d = Vector::new(x - center.x, y - center.y).length();
                if (d - radius).abs() < 0.5 {
                    self.blend(x, y, color);
                }
            }
        }
    }
}
