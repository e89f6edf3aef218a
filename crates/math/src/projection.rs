//! View and projection matrices for a renderer.
//!
//! Both builders store the camera basis in columns and the translation in the
//! bottom row, so points go through them as row vectors (`p * view`). The
//! `try_*` versions reject the inputs that would otherwise produce NaN or
//! infinite entries.

use core::f32::consts::PI;

use crate::error::MathError;
use crate::mat::Mat4f;
use crate::vec::{Vec3f, Vec4f};

/// Perspective projection with a vertical field of view of `fovy` radians.
///
/// Note the argument order, `far` comes before `near`.
pub fn perspective(fovy: f32, aspect: f32, far: f32, near: f32) -> Mat4f {
    let tan_half_fovy = (fovy / 2.).tan();

    let mut m = Mat4f::new();
    m[(0, 0)] = 1. / (aspect * tan_half_fovy);
    m[(1, 1)] = 1. / tan_half_fovy;
    m[(2, 2)] = (far + near) / (far - near);
    m[(3, 2)] = 1.;
    m[(2, 3)] = -(2. * far * near) / (far - near);

    m
}

/// Checked [`perspective`], returns [`MathError::FieldOfView`],
/// [`MathError::AspectRatio`] or [`MathError::DepthRange`] for a degenerate frustum.
pub fn try_perspective(fovy: f32, aspect: f32, far: f32, near: f32) -> Result<Mat4f, MathError> {
    if !(fovy > 0. && fovy < PI) {
        return Err(MathError::FieldOfView(fovy));
    }
    if aspect == 0. || !aspect.is_finite() {
        return Err(MathError::AspectRatio(aspect));
    }
    if far == near {
        return Err(MathError::DepthRange(near));
    }

    Ok(perspective(fovy, aspect, far, near))
}

/// View matrix for a camera at `eye` looking at `at`.
///
/// `up` only has to be roughly up, the basis is re-orthogonalized. If it is
/// parallel to the viewing direction the result is NaN.
pub fn look_at(eye: Vec3f, at: Vec3f, up: Vec3f) -> Mat4f {
    let look = (at - eye).normalized();
    let tangent = look.cross(up).normalized();
    let true_up = tangent.cross(look);

    view_from_basis(eye, look, tangent, true_up)
}

/// Checked [`look_at`], returns [`MathError::ZeroLength`] when `eye == at` and
/// [`MathError::ParallelUp`] when `up` is parallel to the viewing direction.
pub fn try_look_at(eye: Vec3f, at: Vec3f, up: Vec3f) -> Result<Mat4f, MathError> {
    let look = (at - eye).try_normalized()?;
    let tangent = look.cross(up)
        .try_normalized()
        .map_err(|_| MathError::ParallelUp)?;
    let true_up = tangent.cross(look);

    Ok(view_from_basis(eye, look, tangent, true_up))
}

fn view_from_basis(eye: Vec3f, look: Vec3f, tangent: Vec3f, true_up: Vec3f) -> Mat4f {
    Mat4f::from_rows([
        Vec4f::new(tangent.x, true_up.x, -look.x, 0.),
        Vec4f::new(tangent.y, true_up.y, -look.y, 0.),
        Vec4f::new(tangent.z, true_up.z, -look.z, 0.),
        Vec4f::new(-eye.dot(tangent), -eye.dot(true_up), eye.dot(look), 1.),
    ])
}
