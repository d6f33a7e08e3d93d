/// Pixel-accurate collision between positioned silhouettes.

use crate::sprite::Mask;

/// Anything with a top-left origin and a silhouette.
pub trait Collidable {
    fn origin(&self) -> (i32, i32);
    fn mask(&self) -> &Mask;
}

/// A bare mask at a position, for ad-hoc checks.
#[derive(Clone, Copy, Debug)]
pub struct Placed<'a> {
    pub x: i32,
    pub y: i32,
    pub mask: &'a Mask,
}

impl<'a> Placed<'a> {
    pub fn new(x: i32, y: i32, mask: &'a Mask) -> Self {
        Placed { x, y, mask }
    }
}

impl Collidable for Placed<'_> {
    fn origin(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn mask(&self) -> &Mask {
        self.mask
    }
}

/// True iff the two silhouettes share at least one opaque pixel.
///
/// Symmetric: `collide(a, b) == collide(b, a)`.
pub fn collide<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    let (ax, ay) = a.origin();
    let (bx, by) = b.origin();
    a.mask().overlap(b.mask(), (bx - ax, by - ay)).is_some()
}
