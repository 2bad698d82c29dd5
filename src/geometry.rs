use serde::{Deserialize, Serialize};

/// Box given by two opposite corners: `[x_min, y_min, x_max, y_max]`
///
/// This is the form used by proposal and track documents.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(try_from = "[f32; 4]", into = "[f32; 4]")]
pub struct CornerBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

/// Corner values that cannot be written back as JSON numbers
#[derive(Debug, thiserror::Error)]
#[error("box corners must be finite, got {0:?}")]
pub struct NonFiniteBox(pub [f32; 4]);

/// Box given by its top-left origin and extent, the form trackers consume
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CornerBox {
    #[inline]
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Malformed corners (`x_max < x_min`) give a negative extent; nothing is validated here.
    #[inline]
    pub fn to_region(&self) -> Region {
        Region::new(
            self.x_min,
            self.y_min,
            self.x_max - self.x_min,
            self.y_max - self.y_min,
        )
    }
}

impl Region {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Snap origin and extent to whole pixels
    #[inline]
    pub fn rounded(&self) -> Region {
        Region::new(
            self.x.round(),
            self.y.round(),
            self.width.round(),
            self.height.round(),
        )
    }

    #[inline]
    pub fn to_corners(&self) -> CornerBox {
        CornerBox::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl TryFrom<[f32; 4]> for CornerBox {
    type Error = NonFiniteBox;

    fn try_from(v: [f32; 4]) -> Result<Self, Self::Error> {
        if v.iter().all(|c| c.is_finite()) {
            Ok(CornerBox::new(v[0], v[1], v[2], v[3]))
        } else {
            Err(NonFiniteBox(v))
        }
    }
}

impl From<CornerBox> for [f32; 4] {
    #[inline]
    fn from(b: CornerBox) -> Self {
        [b.x_min, b.y_min, b.x_max, b.y_max]
    }
}
