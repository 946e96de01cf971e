use crate::geometry::rect::RectI;

/// A set of pixels stored as disjoint rectangles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<RectI>,
}

impl Region {
    /// Empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Region covering one rect.
    pub fn from_rect(rect: RectI) -> Self {
        let mut r = Self::new();
        r.union_rect(rect);
        r
    }

    /// The disjoint rects making up the region, in insertion order.
    pub fn rects(&self) -> &[RectI] {
        &self.rects
    }

    /// Whether no pixel is covered.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Number of covered pixels.
    pub fn area(&self) -> u64 {
        self.rects.iter().map(|r| r.area()).sum()
    }

    /// Bounding rect of all covered pixels.
    pub fn bounds(&self) -> RectI {
        self.rects
            .iter()
            .fold(RectI::default(), |acc, r| acc.union(*r))
    }

    /// Whether pixel `(x, y)` is covered.
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.rects.iter().any(|r| r.contains_point(x, y))
    }

    /// Whether every pixel of `rect` is covered.
    pub fn contains_rect(&self, rect: RectI) -> bool {
        if rect.is_empty() {
            return true;
        }
        let mut rest = Region::from_rect(rect);
        for r in &self.rects {
            rest.subtract_rect(*r);
            if rest.is_empty() {
                return true;
            }
        }
        rest.is_empty()
    }

    /// Add `rect` to the region.
    pub fn union_rect(&mut self, rect: RectI) {
        if rect.is_empty() {
            return;
        }
        let mut pieces = vec![rect];
        for existing in &self.rects {
            pieces = pieces
                .into_iter()
                .flat_map(|p| subtract(p, *existing))
                .collect();
            if pieces.is_empty() {
                return;
            }
        }
        self.rects.extend(pieces);
    }

    /// Add every rect of `other`.
    pub fn union(&mut self, other: &Region) {
        for r in &other.rects {
            self.union_rect(*r);
        }
    }

    /// Remove `rect` from the region.
    pub fn subtract_rect(&mut self, rect: RectI) {
        if rect.is_empty() {
            return;
        }
        self.rects = self
            .rects
            .iter()
            .flat_map(|r| subtract(*r, rect))
            .collect();
    }

    /// Keep only the part inside `rect`.
    pub fn intersect_rect(&mut self, rect: RectI) {
        self.rects = self
            .rects
            .iter()
            .map(|r| r.intersect(rect))
            .filter(|r| !r.is_empty())
            .collect();
    }
}

/// `a - b` as up to four disjoint rects (top band, bottom band, left and right of the middle).
fn subtract(a: RectI, b: RectI) -> Vec<RectI> {
    let overlap = a.intersect(b);
    if overlap.is_empty() {
        return vec![a];
    }
    let candidates = [
        RectI::from_ltrb(a.x, a.y, a.right(), overlap.y),
        RectI::from_ltrb(a.x, overlap.bottom(), a.right(), a.bottom()),
        RectI::from_ltrb(a.x, overlap.y, overlap.x, overlap.bottom()),
        RectI::from_ltrb(overlap.right(), overlap.y, a.right(), overlap.bottom()),
    ];
    candidates.into_iter().filter(|r| !r.is_empty()).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/region.rs"]
mod tests;
