use super::Color;

/// Paint source for filling geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Full-saturation hue wheel around the shape's centre.
    ///
    /// Hue is the polar angle of the shape-local position measured with +Y
    /// up, after rotating that position by `-rotation` radians, mapped from
    /// `[-π, π]` to `[0, 1]`. Only circles and rings resolve this paint.
    HueWheel { rotation: f32 },
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        match self {
            Paint::Solid(c) => c.a >= 1.0,
            Paint::HueWheel { .. } => true,
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}
