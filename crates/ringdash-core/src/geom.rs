use serde::{Deserialize, Serialize};

/// Axis-aligned box in screen space (y grows down). `(x, y)` is the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Strict overlap: boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Box grown by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Aabb {
        Aabb::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b), "Shared edge must not count as overlap");
    }

    #[test]
    fn center_and_edges() {
        let a = Aabb::new(10.0, 20.0, 4.0, 6.0);
        assert_eq!(a.center(), (12.0, 23.0));
        assert_eq!(a.right(), 14.0);
        assert_eq!(a.bottom(), 26.0);
        assert_eq!(a.inflate(1.0), Aabb::new(9.0, 19.0, 6.0, 8.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn overlap_is_symmetric(
                ax in -500.0f32..500.0, ay in -500.0f32..500.0,
                bx in -500.0f32..500.0, by in -500.0f32..500.0,
                w in 1.0f32..200.0, h in 1.0f32..200.0,
            ) {
                let a = Aabb::new(ax, ay, w, h);
                let b = Aabb::new(bx, by, h, w);
                prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
            }
        }
    }
}
