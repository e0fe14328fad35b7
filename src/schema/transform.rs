//! Affine placement of the sampling plane.

use glam::{EulerRot, Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Local corners of the canonical unit square: top-left, top-right,
/// bottom-right, bottom-left.
pub const UNIT_SQUARE: [Vec3; 4] = [
    Vec3::new(-0.5, 0.5, 0.0),
    Vec3::new(0.5, 0.5, 0.0),
    Vec3::new(0.5, -0.5, 0.0),
    Vec3::new(-0.5, -0.5, 0.0),
];

/// Position, rotation and scale of the unit square in volume space.
///
/// A plain value: the sampler reads it, never mutates it, and every
/// [`Sample`](crate::compute::Sample) keeps its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for PlaneTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PlaneTransform {
    /// Unit square centered at the origin, facing +Z.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Rebuild a transform from a column-major matrix snapshot such as
    /// [`to_cols_array`](Self::to_cols_array) or
    /// [`Sample::transform_matrix`](crate::compute::Sample::transform_matrix).
    ///
    /// A mirrored matrix comes back with a negative `scale.x`; the rebuilt
    /// matrix equals the snapshot up to rounding. Singular matrices yield a
    /// non-finite rotation, see [`is_finite`](Self::is_finite).
    pub fn from_cols_array(cols: &[f32; 16]) -> Self {
        let (scale, rotation, translation) =
            Mat4::from_cols_array(cols).to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_translation(self, translation: Vec3) -> Self {
        Self {
            translation,
            ..self
        }
    }

    pub fn with_rotation(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }

    pub fn with_scale(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }

    /// Move by `delta` in world space.
    pub fn translated(self, delta: Vec3) -> Self {
        self.with_translation(self.translation + delta)
    }

    /// Rotate in the plane's local frame.
    pub fn rotated(self, rotation: Quat) -> Self {
        self.with_rotation((self.rotation * rotation).normalize())
    }

    /// Rotate by Euler angles (radians, XYZ order) in the local frame.
    pub fn rotated_euler(self, angles: Vec3) -> Self {
        self.rotated(Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z))
    }

    /// Multiply the current scale component-wise.
    pub fn scaled(self, factor: Vec3) -> Self {
        self.with_scale(self.scale * factor)
    }

    /// Local-to-world matrix.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Column-major 16-element snapshot of [`matrix`](Self::matrix).
    pub fn to_cols_array(&self) -> [f32; 16] {
        self.matrix().to_cols_array()
    }

    /// World-space corners in [`UNIT_SQUARE`] order.
    pub fn corners(&self) -> [Vec3; 4] {
        let matrix = self.matrix();
        UNIT_SQUARE.map(|corner| matrix.transform_point3(corner))
    }

    /// Physical width and height of the plane.
    pub fn plane_size(&self) -> (f32, f32) {
        (self.scale.x.abs(), self.scale.y.abs())
    }

    /// Unit normal of the plane in world space. A negative `scale.z`
    /// mirrors the plane and flips the normal.
    pub fn normal(&self) -> Vec3 {
        (self.rotation * Vec3::Z).normalize_or(Vec3::Z) * self.scale.z.signum()
    }

    /// Plane equation `(n.x, n.y, n.z, d)` with `n . p = d` for every point
    /// `p` on the plane. Shaders use it to clip the cube against the slice.
    pub fn clipping_plane(&self) -> Vec4 {
        let normal = self.normal();
        normal.extend(normal.dot(self.translation))
    }

    /// True if every component is finite and the rotation is normalizable.
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite()
            && self.rotation.is_finite()
            && self.scale.is_finite()
            && self.rotation.length_squared() > 0.0
    }
}
