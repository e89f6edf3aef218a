use core::ops;
use core::fmt;

use approx::{AbsDiffEq, RelativeEq};
use bytemuck::{Pod, Zeroable};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::vec::*;

// Matrices are row-major and store their rows as vectors, so every product
// below is a dot product between rows.
macro_rules! mat_impl {
    ($m: ident, $v: ident, $n: literal) => {

        #[derive(Debug, Default, Copy, Clone, PartialEq, Pod, Zeroable)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[repr(C)]
        pub struct $m {
            pub rows: [$v; $n],
        }

        impl $m {
            #[inline]
            pub fn new() -> $m {
                $m::default()
            }

            #[inline]
            pub const fn from_rows(rows: [$v; $n]) -> $m {
                $m { rows }
            }

            #[inline]
            pub fn identity() -> $m {
                $m::scale_uniform(1.0)
            }

            #[inline]
            pub fn scale_uniform(d: f32) -> $m {
                let mut m = $m::new();
                for i in 0..$n {
                    m[(i, i)] = d;
                }
                m
            }

            #[inline]
            pub fn scale(v: $v) -> $m {
                let mut m = $m::new();
                for i in 0..$n {
                    m[(i, i)] = v[i];
                }
                m
            }

            #[inline]
            pub fn row(&self, i: usize) -> &$v {
                &self.rows[i]
            }

            #[inline]
            pub fn row_mut(&mut self, i: usize) -> &mut $v {
                &mut self.rows[i]
            }

            #[inline]
            pub fn columns(&self) -> [$v; $n] {
                self.transpose().rows
            }

            #[inline]
            pub fn transpose(&self) -> $m {
                let mut m = $m::new();

                for j in 0..$n {
                    for i in 0..$n {
                        m[(j, i)] = self[(i, j)];
                    }
                }
                m
            }

            /// Transposes without building a second matrix, only the pairs
            /// above and below the diagonal are swapped.
            #[inline]
            pub fn transpose_in_place(&mut self) {
                for i in 0..$n {
                    for j in (i + 1)..$n {
                        let upper = self[(i, j)];
                        self[(i, j)] = self[(j, i)];
                        self[(j, i)] = upper;
                    }
                }
            }

            /// Row-major view of the elements.
            #[inline]
            pub fn as_slice(&self) -> &[f32] {
                bytemuck::cast_slice(&self.rows)
            }
        }

        impl ops::Index<(usize, usize)> for $m {
            type Output = f32;

            #[inline]
            fn index(&self, (row, col): (usize, usize)) -> &f32 {
                assert!(row < $n && col < $n,
                        "{} index ({}, {}) out of range", stringify!($m), row, col);
                &self.rows[row][col]
            }
        }

        impl ops::IndexMut<(usize, usize)> for $m {
            #[inline]
            fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
                assert!(row < $n && col < $n,
                        "{} index ({}, {}) out of range", stringify!($m), row, col);
                &mut self.rows[row][col]
            }
        }

        impl ops::Mul<$m> for $m {
            type Output = $m;

            #[inline]
            fn mul(self, rhs: $m) -> $m {
                let mut m = $m::new();

                let bt = rhs.transpose();

                for j in 0..$n {
                    for i in 0..$n {
                        m[(j, i)] = $v::dot(self.rows[j], bt.rows[i]);
                    }
                }
                m
            }
        }

        impl ops::MulAssign<$m> for $m {
            #[inline]
            fn mul_assign(&mut self, rhs: $m) {
                *self = *self * rhs;
            }
        }

        impl ops::Mul<$v> for $m {
            type Output = $v;

            #[inline]
            fn mul(self, rhs: $v) -> $v {
                let mut v = [0.0; $n];

                for i in 0..$n {
                    v[i] = self.rows[i].dot(rhs);
                }
                $v::from_slice(&v)
            }
        }

        /// Row vector times matrix, the same as `m.transpose() * v`.
        impl ops::Mul<$m> for $v {
            type Output = $v;

            #[inline]
            fn mul(self, rhs: $m) -> $v {
                rhs.transpose() * self
            }
        }

        impl AbsDiffEq for $m {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::EPSILON
            }

            fn abs_diff_eq(&self, other: &$m, epsilon: f32) -> bool {
                self.rows.iter()
                    .zip(other.rows.iter())
                    .all(|(a, b)| a.abs_diff_eq(b, epsilon))
            }
        }

        impl RelativeEq for $m {
            fn default_max_relative() -> f32 {
                f32::EPSILON
            }

            fn relative_eq(&self, other: &$m, epsilon: f32, max_relative: f32) -> bool {
                self.rows.iter()
                    .zip(other.rows.iter())
                    .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
            }
        }

        impl fmt::Display for $m {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                let prec = f.precision().unwrap_or(3);
                writeln!(f, "{}[", stringify!($m))?;
                for r in self.rows.iter() {
                    writeln!(f, "    {:.prec$}", r, prec = prec)?;
                }
                write!(f, "]")
            }
        }
    }
}

mat_impl!(Mat4f, Vec4f, 4);
mat_impl!(Mat3f, Vec3f, 3);

impl Mat3f {
    /// Rotation of `angle` radians around the unit vector `axis`, laid out
    /// like [`Quat::to_mat3`](crate::quat::Quat::to_mat3).
    pub fn rotation(axis: Vec3f, angle: f32) -> Self {
        let a = axis.x;
        let b = axis.y;
        let c = axis.z;

        let cos_alpha = angle.cos();
        let sin_alpha = angle.sin();

        let k = 1. - cos_alpha;

        let mut m = Mat3f::new();
        m[(0, 0)] = a * a * k + cos_alpha;
        m[(1, 1)] = b * b * k + cos_alpha;
        m[(2, 2)] = c * c * k + cos_alpha;

        m[(0, 1)] = a * b * k + c * sin_alpha;
        m[(0, 2)] = a * c * k - b * sin_alpha;
        m[(1, 2)] = b * c * k + a * sin_alpha;

        m[(1, 0)] = a * b * k - c * sin_alpha;
        m[(2, 0)] = a * c * k + b * sin_alpha;
        m[(2, 1)] = b * c * k - a * sin_alpha;

        m
    }
}

impl Mat4f {
    #[inline]
    pub fn rotation(axis: Vec3f, angle: f32) -> Self {
        Mat4f::from_mat3(Mat3f::rotation(axis, angle))
    }

    /// Embeds `m` in the upper-left corner, the last row and column are
    /// `(0, 0, 0, 1)`.
    pub fn from_mat3(m: Mat3f) -> Self {
        Mat4f::from_rows([
            Vec4f::from_vec3(m.rows[0], 0.),
            Vec4f::from_vec3(m.rows[1], 0.),
            Vec4f::from_vec3(m.rows[2], 0.),
            Vec4f::new(0., 0., 0., 1.),
        ])
    }
}
