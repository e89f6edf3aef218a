use core::ops;
use core::fmt;

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::vec::{Vec3f, Vec4f};
use crate::mat::{Mat3f, Mat4f};

/// Rotation quaternion, `(x, y, z)` is the vector part and `w` the scalar part.
///
/// Unit length is not enforced. [`Quat::axis_angle`] returns a unit
/// quaternion for a unit axis, but sums and differences of quaternions are
/// generally not unit length anymore.
#[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self { x: 0., y: 0., z: 0., w: 1. }
    }

    #[inline]
    pub fn re(&self) -> f32 {
        self.w
    }

    #[inline]
    pub fn im(&self) -> Vec3f {
        Vec3f { x: self.x, y: self.y, z: self.z }
    }

    #[inline]
    pub fn from_slice(a: &[f32; 4]) -> Self {
        bytemuck::cast(*a)
    }

    #[inline]
    pub fn to_slice(self) -> [f32; 4] {
        bytemuck::cast(self)
    }

    pub fn from_vec4(v: Vec4f) -> Self {
        Self { x: v.x, y: v.y, z: v.z, w: v.w }
    }

    pub fn to_vec4(self) -> Vec4f {
        Vec4f::new(self.x, self.y, self.z, self.w)
    }

    #[inline]
    pub fn conj(self) -> Self {
        Quat {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    #[inline]
    pub fn norm2(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    #[inline]
    pub fn norm(self) -> f32 {
        self.norm2().sqrt()
    }

    #[inline]
    pub fn normalized(self) -> Self {
        let n = self.norm();
        Self {
            x: self.x / n,
            y: self.y / n,
            z: self.z / n,
            w: self.w / n,
        }
    }

    /// Rotation of `angle` radians around `axis`. The axis is used as given,
    /// pass a unit vector to get a unit quaternion.
    #[inline]
    pub fn axis_angle(axis: Vec3f, angle: f32) -> Self {
        let s = (angle * 0.5).sin();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: (angle * 0.5).cos(),
        }
    }

    /// Composes `self` with an incremental rotation applied on the right,
    /// i.e. in the local frame of the current orientation.
    #[inline]
    pub fn rotate_axis_angle(self, axis: Vec3f, angle: f32) -> Self {
        self * Quat::axis_angle(axis, angle)
    }

    pub fn to_mat3(self) -> Mat3f {
        let qxx = self.x * self.x;
        let qyy = self.y * self.y;
        let qzz = self.z * self.z;
        let qxz = self.x * self.z;
        let qxy = self.x * self.y;
        let qyz = self.y * self.z;
        let qwx = self.w * self.x;
        let qwy = self.w * self.y;
        let qwz = self.w * self.z;

        Mat3f::from_rows([
            Vec3f::new(1. - 2. * (qyy + qzz), 2. * (qxy + qwz), 2. * (qxz - qwy)),
            Vec3f::new(2. * (qxy - qwz), 1. - 2. * (qxx + qzz), 2. * (qyz + qwx)),
            Vec3f::new(2. * (qxz + qwy), 2. * (qyz - qwx), 1. - 2. * (qxx + qyy)),
        ])
    }

    #[inline]
    pub fn to_mat4(self) -> Mat4f {
        Mat4f::from_mat3(self.to_mat3())
    }

    /// Extracts the rotation stored in the upper-left 3x3 block of `m`.
    ///
    /// Four candidate magnitudes are computed from the diagonal and the
    /// largest one picks the branch, which keeps the divisor away from zero.
    /// The first candidate reads `m[(0, 1)]` where a trace would read
    /// `m[(1, 1)]`, so near-identity rotations only come back exactly when
    /// those two entries agree.
    pub fn from_mat4(m: Mat4f) -> Self {
        let s0 = m[(0, 0)] + m[(0, 1)] + m[(2, 2)];
        let s1 = m[(0, 0)] - m[(1, 1)] - m[(2, 2)];
        let s2 = m[(1, 1)] - m[(0, 0)] - m[(2, 2)];
        let s3 = m[(2, 2)] - m[(0, 0)] - m[(1, 1)];

        let mut biggest_index = 0;
        let mut biggest_val = s0;
        for (i, s) in [s1, s2, s3].into_iter().enumerate() {
            if s > biggest_val {
                biggest_val = s;
                biggest_index = i + 1;
            }
        }

        let s = (1. + biggest_val).sqrt() * 0.5;
        let mult = 0.25 / s;

        match biggest_index {
            0 => Quat {
                w: s,
                x: (m[(1, 2)] - m[(2, 1)]) * mult,
                y: (m[(2, 0)] - m[(0, 2)]) * mult,
                z: (m[(0, 1)] - m[(1, 0)]) * mult,
            },
            1 => Quat {
                w: (m[(1, 2)] - m[(2, 1)]) * mult,
                x: s,
                y: (m[(0, 1)] + m[(1, 0)]) * mult,
                z: (m[(2, 0)] + m[(0, 2)]) * mult,
            },
            2 => Quat {
                w: (m[(2, 0)] - m[(0, 2)]) * mult,
                x: (m[(0, 1)] + m[(1, 0)]) * mult,
                y: s,
                z: (m[(1, 2)] + m[(2, 1)]) * mult,
            },
            _ => Quat {
                w: (m[(0, 1)] - m[(1, 0)]) * mult,
                x: (m[(2, 0)] + m[(0, 2)]) * mult,
                y: (m[(1, 2)] + m[(2, 1)]) * mult,
                z: s,
            },
        }
    }

    #[inline]
    pub fn from_mat3(m: Mat3f) -> Self {
        Quat::from_mat4(Mat4f::from_mat3(m))
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Quat(x: {:.prec$}, y: {:.prec$}, z: {:.prec$}, w: {:.prec$})",
               self.x, self.y, self.z, self.w,
               prec = f.precision().unwrap_or(3))
    }
}

impl ops::Add<Quat> for Quat {
    type Output = Quat;

    #[inline]
    fn add(self, rhs: Quat) -> Quat {
        Quat::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl ops::Sub<Quat> for Quat {
    type Output = Quat;

    #[inline]
    fn sub(self, rhs: Quat) -> Quat {
        Quat::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl ops::AddAssign<Quat> for Quat {
    #[inline]
    fn add_assign(&mut self, rhs: Quat) {
        *self = *self + rhs;
    }
}

impl ops::SubAssign<Quat> for Quat {
    #[inline]
    fn sub_assign(&mut self, rhs: Quat) {
        *self = *self - rhs;
    }
}

impl ops::Neg for Quat {
    type Output = Quat;

    #[inline]
    fn neg(self) -> Quat {
        Quat::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl ops::Mul<Quat> for f32 {
    type Output = Quat;

    #[inline]
    fn mul(self, rhs: Quat) -> Quat {
        Quat {
            x: rhs.x * self,
            y: rhs.y * self,
            z: rhs.z * self,
            w: rhs.w * self }
    }
}

impl ops::Mul<f32> for Quat {
    type Output = Quat;

    #[inline]
    fn mul(self, rhs: f32) -> Quat {
        rhs * self
    }
}

impl ops::Mul<Quat> for Quat {
    type Output = Quat;

    /// Not commutative: `a * b` and `b * a` differ in the sign of the cross
    /// term, which decides the order rotations compose in.
    ///
    /// The scalar part adds the vector dot product. Composing rotations about
    /// orthogonal axes stays unit length; other axis pairs do not.
    #[inline]
    fn mul(self, rhs: Quat) -> Quat {
        let a = self.im();
        let b = rhs.im();

        let v = b * self.re() + a * rhs.re() + a.cross(b);
        let w = self.re() * rhs.re() + a.dot(b);
        Quat {
            x: v.x,
            y: v.y,
            z: v.z,
            w,
        }
    }
}

impl ops::MulAssign<Quat> for Quat {
    #[inline]
    fn mul_assign(&mut self, rhs: Quat) {
        *self = *self * rhs;
    }
}

impl ops::Mul<Vec3f> for Quat {
    type Output = Vec3f;

    #[inline]
    fn mul(self, rhs: Vec3f) -> Vec3f {
        self.to_mat3() * rhs
    }
}

impl AbsDiffEq for Quat {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Quat, epsilon: f32) -> bool {
        self.to_vec4().abs_diff_eq(&other.to_vec4(), epsilon)
    }
}

impl RelativeEq for Quat {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Quat, epsilon: f32, max_relative: f32) -> bool {
        self.to_vec4().relative_eq(&other.to_vec4(), epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use core::f32::consts::PI;

    #[test]
    fn conjugate() {
        let q = Quat::new(1., -2., 3., 4.);
        assert_eq!(q.conj(), Quat::new(-1., 2., -3., 4.));
        assert_eq!(q.conj().conj(), q);
    }

    #[test]
    fn product_formula() {
        let a = Quat::new(1., 2., 3., 4.);
        let b = Quat::new(5., 6., 7., 8.);
        assert_eq!(a * b, Quat::new(24., 48., 48., 70.));
        assert_eq!(b * a, Quat::new(32., 32., 56., 70.));
        assert_ne!(a * b, b * a);

        let mut c = a;
        c *= b;
        assert_eq!(c, a * b);
    }

    #[test]
    fn identity_is_neutral() {
        let q = Quat::axis_angle(Vec3f::new(0., 0.6, 0.8), 1.3);
        assert_eq!(Quat::identity() * q, q);
        assert_eq!(q * Quat::identity(), q);
    }

    #[test]
    fn axis_angle_is_unit_for_unit_axis() {
        let q = Quat::axis_angle(Vec3f::new(0., 0.6, 0.8), 2.0);
        assert_abs_diff_eq!(q.norm(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q.w, 1.0_f32.cos(), epsilon = 1e-6);
        assert_abs_diff_eq!(q.y, 0.6 * 1.0_f32.sin(), epsilon = 1e-6);
    }

    #[test]
    fn rotate_axis_angle_multiplies_on_the_right() {
        let q = Quat::axis_angle(Vec3f::unit_x(), 0.7);
        let r = q.rotate_axis_angle(Vec3f::unit_y(), 0.4);
        assert_eq!(r, q * Quat::axis_angle(Vec3f::unit_y(), 0.4));
        assert_eq!(Quat::identity().rotate_axis_angle(Vec3f::unit_y(), 0.4),
                   Quat::axis_angle(Vec3f::unit_y(), 0.4));
    }

    #[test]
    fn add_sub_do_not_keep_unit_length() {
        let a = Quat::identity();
        let b = Quat::axis_angle(Vec3f::unit_z(), PI / 2.);
        assert_abs_diff_eq!((a - b) + b, a, epsilon = 1e-6);
        assert!(((a + b).norm() - 1.0).abs() > 0.1);
        assert_eq!(-a, Quat::new(0., 0., 0., -1.));
    }

    #[test]
    fn half_turn_yaw_flips_x() {
        let q = Quat::axis_angle(Vec3f::unit_y(), PI);
        let v = q.to_mat3() * Vec3f::unit_x();
        assert_abs_diff_eq!(v, Vec3f::new(-1., 0., 0.), epsilon = 1e-6);
        assert_abs_diff_eq!(q * Vec3f::unit_x(), v);
    }

    #[test]
    fn rotation_preserves_length() {
        let q = Quat::axis_angle(Vec3f::new(1., 2., 3.).normalized(), 0.9);
        let m = q.to_mat3();
        for v in [Vec3f::new(1., 0., 0.), Vec3f::new(-3., 4., 12.), Vec3f::new(0.1, 0.2, -0.3)] {
            assert_abs_diff_eq!((m * v).length(), v.length(), epsilon = 1e-4);
        }
    }

    fn assert_same_rotation(a: Quat, b: Quat) {
        let same = a.abs_diff_eq(&b, 1e-5) || a.abs_diff_eq(&-b, 1e-5);
        assert!(same, "{} != {}", a, b);
    }

    #[test]
    fn matrix_round_trip_each_branch() {
        let cases = [
            // branch 0, the (0, 1) entry equals the (1, 1) entry at 45 degrees
            (Vec3f::unit_z(), PI / 4.),
            // branch 1
            (Vec3f::unit_x(), 2.0),
            (Vec3f::new(2., -2., 1.).normalized(), 3.0),
            // branch 2
            (Vec3f::unit_y(), 2.2),
            (Vec3f::new(0.3, 1.0, 0.2).normalized(), 2.8),
            // branch 3
            (Vec3f::unit_z(), 2.4),
            (Vec3f::new(1., 2., 3.).normalized(), 2.5),
        ];
        for (axis, angle) in cases {
            let q = Quat::axis_angle(axis, angle);
            let m = Mat4f::from_mat3(q.to_mat3());
            assert_same_rotation(Quat::from_mat4(m), q);
            assert_same_rotation(Quat::from_mat3(q.to_mat3()), q);
            assert_same_rotation(Quat::from_mat4(q.to_mat4()), q);
        }
    }

    #[test]
    fn half_turns_pick_axis_branches() {
        assert_same_rotation(Quat::from_mat3(Mat3f::rotation(Vec3f::unit_x(), PI)),
                             Quat::new(1., 0., 0., 0.));
        assert_same_rotation(Quat::from_mat3(Mat3f::rotation(Vec3f::unit_y(), PI)),
                             Quat::new(0., 1., 0., 0.));
        assert_same_rotation(Quat::from_mat3(Mat3f::rotation(Vec3f::unit_z(), PI)),
                             Quat::new(0., 0., 1., 0.));
    }

    #[test]
    fn ties_pick_lowest_branch() {
        // s1 == s2 == 1, s0 == -0.5, s3 == -1
        let m = Mat4f::from_rows([
            Vec4f::new(0.0, 0.5, 0.0, 0.0),
            Vec4f::new(0.25, 0.0, 0.5, 0.0),
            Vec4f::new(0.0, 0.0, -1.0, 0.0),
            Vec4f::new(0.0, 0.0, 0.0, 1.0),
        ]);
        let s = (1.0_f32 + 1.0).sqrt() * 0.5;
        let mult = 0.25 / s;

        let q = Quat::from_mat4(m);
        assert_eq!(q.x, s);
        assert_abs_diff_eq!(q.y, 0.75 * mult, epsilon = 1e-6);
        assert_abs_diff_eq!(q.z, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q.w, 0.5 * mult, epsilon = 1e-6);
    }

    #[test]
    fn first_candidate_reads_raw_fields() {
        // s0 = 1 + 0 + 1, so w comes out as sqrt(3) / 2 for the identity
        let q = Quat::from_mat4(Mat4f::identity());
        assert_abs_diff_eq!(q.w, 3.0_f32.sqrt() * 0.5, epsilon = 1e-6);
        assert_eq!(q.im(), Vec3f::default());
    }
}
