use crate::foundation::core::Rect;

/// Integer size in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Build a size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Integer 2D offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Offset {
    /// Horizontal component.
    pub x: i32,
    /// Vertical component.
    pub y: i32,
}

impl Offset {
    /// No displacement.
    pub const ZERO: Self = Self::new(0, 0);

    /// Build an offset.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The opposite displacement, or `None` when a component is `i32::MIN`.
    pub fn checked_neg(self) -> Option<Offset> {
        Some(Offset::new(self.x.checked_neg()?, self.y.checked_neg()?))
    }
}

/// Integer rectangle `[x, x + width) x [y, y + height)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RectI {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width, never negative.
    pub width: i32,
    /// Height, never negative.
    pub height: i32,
}

impl RectI {
    /// Build a rect. Negative extents are clamped to zero.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// A rect at the origin covering `size`.
    pub fn from_size(size: Size) -> Self {
        Self::new(
            0,
            0,
            i32::try_from(size.width).unwrap_or(i32::MAX),
            i32::try_from(size.height).unwrap_or(i32::MAX),
        )
    }

    /// A rect from left/top/right/bottom edges.
    pub fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }

    /// Exclusive right edge.
    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Size of the rect.
    pub fn size(self) -> Size {
        Size::new(self.width.max(0) as u32, self.height.max(0) as u32)
    }

    /// Whether the rect covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Number of covered pixels.
    pub fn area(self) -> u64 {
        self.size().area()
    }

    /// Whether pixel `(x, y)` is inside.
    pub fn contains_point(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` lies entirely inside. Empty rects are contained everywhere.
    pub fn contains(self, other: RectI) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    /// Overlap of two rects; empty (at the origin) when they do not overlap.
    pub fn intersect(self, other: RectI) -> RectI {
        let l = self.x.max(other.x);
        let t = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        if l >= r || t >= b {
            return RectI::default();
        }
        RectI::from_ltrb(l, t, r, b)
    }

    /// Whether the rects overlap in at least one pixel.
    pub fn intersects(self, other: RectI) -> bool {
        !self.intersect(other).is_empty()
    }

    /// Smallest rect containing both. Empty inputs are ignored.
    pub fn union(self, other: RectI) -> RectI {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        RectI::from_ltrb(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Shrink each edge inward by the given amounts.
    pub fn inset(self, left: i32, top: i32, right: i32, bottom: i32) -> RectI {
        RectI::from_ltrb(
            self.x.saturating_add(left),
            self.y.saturating_add(top),
            self.right().saturating_sub(right),
            self.bottom().saturating_sub(bottom),
        )
    }

    /// Translate by `offset`, saturating the origin at the `i32` range.
    pub fn offset(self, offset: Offset) -> RectI {
        RectI::new(
            self.x.saturating_add(offset.x),
            self.y.saturating_add(offset.y),
            self.width,
            self.height,
        )
    }

    /// Translate by `offset`, or `None` if either edge leaves the `i32` range.
    pub fn checked_offset(self, offset: Offset) -> Option<RectI> {
        let x = self.x.checked_add(offset.x)?;
        let y = self.y.checked_add(offset.y)?;
        x.checked_add(self.width)?;
        y.checked_add(self.height)?;
        Some(RectI::new(x, y, self.width, self.height))
    }

    /// Float rect with the same edges.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.right()),
            f64::from(self.bottom()),
        )
    }

    /// Smallest integer rect containing `rect`.
    pub fn enclosing(rect: Rect) -> RectI {
        let rect = rect.abs();
        let clamp = |v: f64| v.clamp(f64::from(i32::MIN / 2), f64::from(i32::MAX / 2)) as i32;
        RectI::from_ltrb(
            clamp(rect.x0.floor()),
            clamp(rect.y0.floor()),
            clamp(rect.x1.ceil()),
            clamp(rect.y1.ceil()),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/rect.rs"]
mod tests;
