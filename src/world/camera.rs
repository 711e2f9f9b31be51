//! Player view-point on the grid plane.
//!
//! The camera is a 2-D basis: a unit `forward` vector and a `plane`
//! vector perpendicular to it whose length sets the field of view
//! (0.66 ≈ the classic 66° horizontal FoV at square aspect).  Rays for
//! screen column `x` travel along `forward + plane * (x/W - 0.5)`.

use glam::{Mat2, Vec2};

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pos: Vec2,
    forward: Vec2,
    plane: Vec2,
}

impl Camera {
    /// Create a camera at `pos` looking along `forward` (normalised here)
    /// with the given half-plane length.
    pub fn new(pos: Vec2, forward: Vec2, plane_ratio: f32) -> Self {
        let forward = forward.normalize_or(Vec2::X);
        Self {
            pos,
            forward,
            plane: forward.perp() * plane_ratio,
        }
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector the camera looks along.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        self.forward
    }

    /// Unit vector to the camera's right.
    #[inline]
    pub fn right(&self) -> Vec2 {
        self.forward.perp()
    }

    /// Side-plane vector (right-scaled by the FoV ratio).
    #[inline]
    pub fn plane(&self) -> Vec2 {
        self.plane
    }

    /// Inverse of the 2×2 basis whose columns are `plane` and `forward`.
    /// Multiplying a camera-relative offset by this yields
    /// `(lateral, depth)` in camera space.
    #[inline]
    pub fn inv_matrix(&self) -> Mat2 {
        Mat2::from_cols(self.plane, self.forward).inverse()
    }

    /// Transform a world point into camera space:
    ///  `.x` = lateral offset (+ right), `.y` = depth along forward.
    #[inline]
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        self.inv_matrix() * (p - self.pos)
    }

    /*──────────────────────── mutation ──────────────────────────────*/

    /// Rotate the whole basis by `radians` (positive = counter-clockwise).
    pub fn rotate(&mut self, radians: f32) {
        let rot = Mat2::from_angle(radians);
        self.forward = rot * self.forward;
        self.plane = rot * self.plane;
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
