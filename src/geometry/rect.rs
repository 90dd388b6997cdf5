use crate::util::{RegionMatchError, RegionMatchResult};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in origin + size form.
///
/// Persists as `[x, y, width, height]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Corner-pair form used at the UI boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Corners {
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl Corners {
    pub fn new(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    fn invalid(&self) -> RegionMatchError {
        RegionMatchError::InvalidGeometry {
            xmin: self.xmin,
            ymin: self.ymin,
            xmax: self.xmax,
            ymax: self.ymax,
        }
    }
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Converts corners to origin + size.
    ///
    /// Fails with `InvalidGeometry` for non-positive size, negative origin or
    /// coordinates that do not fit in `u32`.
    pub fn from_corners(corners: Corners) -> RegionMatchResult<Self> {
        let width = corners.xmax - corners.xmin;
        let height = corners.ymax - corners.ymin;
        if width <= 0 || height <= 0 || corners.xmin < 0 || corners.ymin < 0 {
            return Err(corners.invalid());
        }
        let to_u32 = |v: i64| u32::try_from(v).map_err(|_| corners.invalid());
        Ok(Self {
            x: to_u32(corners.xmin)?,
            y: to_u32(corners.ymin)?,
            width: to_u32(width)?,
            height: to_u32(height)?,
        })
    }

    /// Converts back to corners: `xmax = x + width`, `ymax = y + height`.
    pub fn to_corners(self) -> Corners {
        Corners {
            xmin: i64::from(self.x),
            ymin: i64::from(self.y),
            xmax: i64::from(self.x) + i64::from(self.width),
            ymax: i64::from(self.y) + i64::from(self.height),
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Returns the part of the rectangle inside a `width x height` image.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Rect> {
        let x1 = self.right().min(u64::from(width));
        let y1 = self.bottom().min(u64::from(height));
        let x0 = u64::from(self.x);
        let y0 = u64::from(self.y);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(self.x, self.y, (x1 - x0) as u32, (y1 - y0) as u32))
    }

    /// Returns the positive-area intersection with `other`.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= u64::from(x0) || y1 <= u64::from(y0) {
            return None;
        }
        Some(Rect::new(
            x0,
            y0,
            (x1 - u64::from(x0)) as u32,
            (y1 - u64::from(y0)) as u32,
        ))
    }
}

impl From<[u32; 4]> for Rect {
    fn from(v: [u32; 4]) -> Self {
        Rect::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Rect> for [u32; 4] {
    fn from(r: Rect) -> Self {
        [r.x, r.y, r.width, r.height]
    }
}

/// Intersection area divided by the smaller rectangle's area.
///
/// Returns 0 when the rectangles do not share a positive-area region.
pub fn overlap_ratio(a: &Rect, b: &Rect) -> f64 {
    let Some(inter) = a.intersection(b) else {
        return 0.0;
    };
    let smaller = a.area().min(b.area());
    if smaller == 0 {
        return 0.0;
    }
    inter.area() as f64 / smaller as f64
}

/// True when the overlap ratio of `a` and `b` exceeds `threshold`.
pub fn overlaps(a: &Rect, b: &Rect, threshold: f64) -> bool {
    if a.intersection(b).is_none() {
        return false;
    }
    overlap_ratio(a, b) > threshold
}
