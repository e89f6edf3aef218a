use core::ops::{self, Add, Mul, Sub};
use core::fmt;

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::MathError;

// Integer vectors are instantiated with the wrapping_* methods so overflow
// wraps in every build profile; float vectors use the plain ops.

macro_rules! vec_op_impl {
    ($trait: ident, $func: ident, $op: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<$v> for $v {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $v) -> $v {
                $v { $( $e: self.$e.$op(rhs.$e), )* }
            }
        }
    }
}

macro_rules! vec_assign_op_impl {
    ($trait: ident, $func: ident, $op: ident, $v: ident, $($e: ident),*) => {
        impl ops::$trait<$v> for $v {
            #[inline]
            fn $func(&mut self, rhs: $v) {
                $( self.$e = self.$e.$op(rhs.$e); )*
            }
        }
    }
}

macro_rules! scalar_op_impl {
    ($trait: ident, $func: ident, $op: ident, $v: ident, $t: ident, $($e: ident),*) => {

        impl ops::$trait<$t> for $v {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $t) -> $v {
                $v { $( $e: self.$e.$op(rhs), )* }
            }
        }

        impl ops::$trait<$v> for $t {
            type Output = $v;

            #[inline]
            fn $func(self, rhs: $v) -> $v {
                $v { $( $e: self.$op(rhs.$e), )* }
            }
        }
    }
}

macro_rules! scalar_assign_op_impl {
    ($trait: ident, $func: ident, $op: ident, $v: ident, $t: ident, $($e: ident),*) => {

        impl ops::$trait<$t> for $v {
            #[inline]
            fn $func(&mut self, rhs: $t) {
                $( self.$e = self.$e.$op(rhs); )*
            }
        }
    }
}

macro_rules! neg_impl {
    ($v: ident, $op: path, $($e: ident),*) => {
        impl ops::Neg for $v {
            type Output = $v;

            #[inline]
            fn neg(self) -> $v {
                $v { $( $e: $op(self.$e), )* }
            }
        }
    }
}

// Float vectors also scale by an integer; the scalar is converted first.
macro_rules! int_scalar_promote_impl {
    ($v: ident, $t: ident) => {
        impl ops::Mul<i32> for $v {
            type Output = $v;

            #[inline]
            fn mul(self, rhs: i32) -> $v {
                self * (rhs as $t)
            }
        }

        impl ops::Mul<$v> for i32 {
            type Output = $v;

            #[inline]
            fn mul(self, rhs: $v) -> $v {
                (self as $t) * rhs
            }
        }

        impl ops::MulAssign<i32> for $v {
            #[inline]
            fn mul_assign(&mut self, rhs: i32) {
                *self *= rhs as $t;
            }
        }
    }
}

macro_rules! vec_float_utils_impl {
    ($v: ident, $t: ident, $($e: ident),*) => {
        impl $v {
            #[inline]
            pub fn dot(self, b: $v) -> $t {
                // Adding negative zero (-0.0) is a nop in IEEE 754 floating
                // point, while adding positive zero can change the sign of
                // negative zero, thus llvm only optimizes out (-0.0):
                //
                // (-0.0 + -0.0) = -0.0
                // (-0.0 +  0.0) =  0.0
                // ( 0.0 + -0.0) =  0.0
                // ( 0.0 +  0.0) =  0.0
                $( self.$e * b.$e + )* (-0.0)
            }

            #[inline]
            pub fn length2(self) -> $t {
                $v::dot(self, self)
            }

            #[inline]
            pub fn length(self) -> $t {
                $v::length2(self).sqrt()
            }

            #[inline]
            pub fn norm(self) -> $t {
                $v::length(self)
            }

            /// Returns `self` divided by its length.
            ///
            /// A zero vector produces NaN components, use
            /// [`try_normalized`](Self::try_normalized) when the input may be
            /// degenerate.
            #[inline]
            pub fn normalized(self) -> $v {
                let len = $v::length(self);
                $v { $( $e: self.$e / len, )* }
            }

            /// In-place version of [`normalized`](Self::normalized).
            #[inline]
            pub fn normalize(&mut self) {
                *self = self.normalized();
            }

            /// Like [`normalized`](Self::normalized) but returns
            /// [`MathError::ZeroLength`] for a zero or non-finite length.
            pub fn try_normalized(self) -> Result<$v, MathError> {
                let len = $v::length(self);
                if len == 0.0 || !len.is_finite() {
                    return Err(MathError::ZeroLength);
                }
                Ok($v { $( $e: self.$e / len, )* })
            }

            /// Linear interpolation, `t = 0` gives `self` and `t = 1` gives `b`.
            #[inline]
            pub fn lerp(self, b: $v, t: $t) -> $v {
                $v { $( $e: self.$e + (b.$e - self.$e) * t, )* }
            }
        }

        impl AbsDiffEq for $v {
            type Epsilon = $t;

            fn default_epsilon() -> $t {
                $t::EPSILON
            }

            fn abs_diff_eq(&self, other: &$v, epsilon: $t) -> bool {
                $( self.$e.abs_diff_eq(&other.$e, epsilon) )&&*
            }
        }

        impl RelativeEq for $v {
            fn default_max_relative() -> $t {
                $t::EPSILON
            }

            fn relative_eq(&self, other: &$v, epsilon: $t, max_relative: $t) -> bool {
                $( self.$e.relative_eq(&other.$e, epsilon, max_relative) )&&*
            }
        }

        vec_op_impl!(Add, add, add, $v, $($e),*);
        vec_op_impl!(Sub, sub, sub, $v, $($e),*);
        vec_op_impl!(Mul, mul, mul, $v, $($e),*);

        vec_assign_op_impl!(AddAssign, add_assign, add, $v, $($e),*);
        vec_assign_op_impl!(SubAssign, sub_assign, sub, $v, $($e),*);
        vec_assign_op_impl!(MulAssign, mul_assign, mul, $v, $($e),*);

        scalar_op_impl!(Mul, mul, mul, $v, $t, $($e),*);
        scalar_assign_op_impl!(MulAssign, mul_assign, mul, $v, $t, $($e),*);

        int_scalar_promote_impl!($v, $t);

        neg_impl!($v, ops::Neg::neg, $($e),*);
    }
}

macro_rules! vec_int_utils_impl {
    ($v: ident, $t: ident, $($e: ident),*) => {
        impl $v {
            #[inline]
            pub fn dot(self, b: $v) -> $t {
                (0 as $t) $( .wrapping_add(self.$e.wrapping_mul(b.$e)) )*
            }

            #[inline]
            pub fn length2(self) -> $t {
                $v::dot(self, self)
            }

            /// Euclidean length. Components are promoted to `f32` before
            /// squaring, so unlike [`length2`](Self::length2) it does not wrap.
            #[inline]
            pub fn length(self) -> f32 {
                ($( (self.$e as f32) * (self.$e as f32) + )* 0.0).sqrt()
            }
        }

        vec_op_impl!(Add, add, wrapping_add, $v, $($e),*);
        vec_op_impl!(Sub, sub, wrapping_sub, $v, $($e),*);
        vec_op_impl!(Mul, mul, wrapping_mul, $v, $($e),*);

        vec_assign_op_impl!(AddAssign, add_assign, wrapping_add, $v, $($e),*);
        vec_assign_op_impl!(SubAssign, sub_assign, wrapping_sub, $v, $($e),*);
        vec_assign_op_impl!(MulAssign, mul_assign, wrapping_mul, $v, $($e),*);

        scalar_op_impl!(Mul, mul, wrapping_mul, $v, $t, $($e),*);
        scalar_assign_op_impl!(MulAssign, mul_assign, wrapping_mul, $v, $t, $($e),*);

        neg_impl!($v, $t::wrapping_neg, $($e),*);
    }
}

macro_rules! vec_impl {
    ($v: ident, $t: ident, $n: expr, $($e: ident),*) => {

        #[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[repr(C)]
        pub struct $v {
            $( pub $e : $t, )*
        }

        impl $v {
            #[inline]
            pub const fn new($( $e: $t, )*) -> $v {
                $v { $( $e : $e, )* }
            }

            #[inline]
            pub const fn from_scalar(a: $t) -> $v {
                $v { $( $e : a, )* }
            }

            #[inline]
            pub fn from_slice(a: &[$t; $n]) -> $v {
                bytemuck::cast(*a)
            }

            #[inline]
            pub fn to_slice(self) -> [$t; $n] {
                bytemuck::cast(self)
            }

            /// Views the components as a contiguous array, e.g. for upload.
            #[inline]
            pub fn as_array(&self) -> &[$t; $n] {
                bytemuck::cast_ref(self)
            }

            #[inline]
            pub fn as_array_mut(&mut self) -> &mut [$t; $n] {
                bytemuck::cast_mut(self)
            }

            #[inline]
            pub fn clamp(a: $v, min: $v, max: $v) -> $v {
                $v { $( $e: a.$e.clamp(min.$e, max.$e),)* }
            }

            #[inline]
            pub fn min(a: $v, b: $v) -> $v {
                $v { $( $e: a.$e.min(b.$e),)* }
            }

            #[inline]
            pub fn max(a: $v, b: $v) -> $v {
                $v { $( $e: a.$e.max(b.$e),)* }
            }
        }

        impl ops::Index<usize> for $v {
            type Output = $t;

            #[inline]
            fn index(&self, i: usize) -> &$t {
                &self.as_array()[i]
            }
        }

        impl ops::IndexMut<usize> for $v {
            #[inline]
            fn index_mut(&mut self, i: usize) -> &mut $t {
                &mut self.as_array_mut()[i]
            }
        }

        impl fmt::Display for $v {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}({})", stringify!($v),
                        vec![$(
                           format!("{:.prec$}", self.$e, prec = f.precision().unwrap_or(3)),
                        )*].join(", "))
            }
        }
    }
}

macro_rules! vec3_utils_impl {
    ($v: ident) => {
        impl $v {
            #[inline]
            pub fn cross(self, b: $v) -> $v {
                $v {
                    x: self.y * b.z - self.z * b.y,
                    y: -self.x * b.z + self.z * b.x,
                    z: self.x * b.y - self.y * b.x,
                }
            }
        }
    }
}

vec_impl!(Vec3i, i32, 3, x, y, z);
vec_impl!(Vec4i, i32, 4, x, y, z, w);

vec_impl!(Vec3f, f32, 3, x, y, z);
vec_impl!(Vec4f, f32, 4, x, y, z, w);

vec_int_utils_impl!(Vec3i, i32, x, y, z);
vec_int_utils_impl!(Vec4i, i32, x, y, z, w);

vec_float_utils_impl!(Vec3f, f32, x, y, z);
vec_float_utils_impl!(Vec4f, f32, x, y, z, w);

vec3_utils_impl!(Vec3f);

impl Vec3i {
    #[inline]
    pub fn cross(self, b: Vec3i) -> Vec3i {
        Vec3i {
            x: self.y.wrapping_mul(b.z).wrapping_sub(self.z.wrapping_mul(b.y)),
            y: self.x.wrapping_mul(b.z).wrapping_neg().wrapping_add(self.z.wrapping_mul(b.x)),
            z: self.x.wrapping_mul(b.y).wrapping_sub(self.y.wrapping_mul(b.x)),
        }
    }
}

impl Vec3f {
    #[inline]
    pub const fn unit_x() -> Vec3f {
        Vec3f::new(1.0, 0.0, 0.0)
    }

    #[inline]
    pub const fn unit_y() -> Vec3f {
        Vec3f::new(0.0, 1.0, 0.0)
    }

    #[inline]
    pub const fn unit_z() -> Vec3f {
        Vec3f::new(0.0, 0.0, 1.0)
    }
}

impl Vec4f {
    #[inline]
    pub const fn from_vec3(v: Vec3f, w: f32) -> Vec4f {
        Vec4f { x: v.x, y: v.y, z: v.z, w }
    }

    #[inline]
    pub const fn xyz(self) -> Vec3f {
        Vec3f { x: self.x, y: self.y, z: self.z }
    }
}
