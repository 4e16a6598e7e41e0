//! Bounding-box resolution.

use crate::graph::Point;
use serde::{Deserialize, Serialize};

/// A partially specified rectangle: corners (`x1, y1, x2, y2`) or origin plus size
/// (`x1, y1, w, h`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
}

impl BoxSpec {
    pub fn corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: Some(x1),
            y1: Some(y1),
            x2: Some(x2),
            y2: Some(y2),
            ..Default::default()
        }
    }

    pub fn sized(x1: f64, y1: f64, w: f64, h: f64) -> Self {
        Self {
            x1: Some(x1),
            y1: Some(y1),
            w: Some(w),
            h: Some(h),
            ..Default::default()
        }
    }
}

/// A fully resolved rectangle. `width == 0` or `height == 0` is a valid degenerate box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Returned for absent or inconsistent specs.
    pub const EMPTY: BoundingBox = BoundingBox {
        x1: f64::INFINITY,
        y1: f64::INFINITY,
        x2: f64::NEG_INFINITY,
        y2: f64::NEG_INFINITY,
        width: 0.0,
        height: 0.0,
    };

    /// Valid corners win, then origin plus a non-negative size; anything else resolves to
    /// [`BoundingBox::EMPTY`].
    pub fn resolve(spec: Option<&BoxSpec>) -> Self {
        let Some(spec) = spec else {
            return Self::EMPTY;
        };
        let (Some(x1), Some(y1)) = (spec.x1, spec.y1) else {
            return Self::EMPTY;
        };
        let corners = match (spec.x2, spec.y2) {
            (Some(x2), Some(y2)) if x2 >= x1 && y2 >= y1 => Some((x2, y2)),
            _ => None,
        };
        if let Some((x2, y2)) = corners {
            return Self {
                x1,
                y1,
                x2,
                y2,
                width: x2 - x1,
                height: y2 - y1,
            };
        }
        match (spec.w, spec.h) {
            (Some(w), Some(h)) if w >= 0.0 && h >= 0.0 => Self {
                x1,
                y1,
                x2: x1 + w,
                y2: y1 + h,
                width: w,
                height: h,
            },
            _ => Self::EMPTY,
        }
    }

    pub fn from_size(x1: f64, y1: f64, width: f64, height: f64) -> Self {
        Self::resolve(Some(&BoxSpec::sized(x1, y1, width, height)))
    }

    /// Smallest box covering rectangles given as `(center, width, height)`.
    pub fn hull(rects: impl IntoIterator<Item = (Point, f64, f64)>) -> Self {
        let mut bb = Self::EMPTY;
        for (c, w, h) in rects {
            bb.x1 = bb.x1.min(c.x - w / 2.0);
            bb.y1 = bb.y1.min(c.y - h / 2.0);
            bb.x2 = bb.x2.max(c.x + w / 2.0);
            bb.y2 = bb.y2.max(c.y + h / 2.0);
        }
        if bb.x1.is_finite() {
            bb.width = bb.x2 - bb.x1;
            bb.height = bb.y2 - bb.y1;
        }
        bb
    }

    pub fn is_empty(&self) -> bool {
        !self.x1.is_finite() || !self.y1.is_finite()
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Top-left corner; the origin for the empty box.
    pub fn origin(&self) -> Point {
        if self.is_empty() {
            Point::default()
        } else {
            Point::new(self.x1, self.y1)
        }
    }

    pub fn center(&self) -> Point {
        if self.is_empty() {
            return Point::default();
        }
        Point::new(self.x1 + self.width / 2.0, self.y1 + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }
}
