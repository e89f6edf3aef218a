pub mod vec;
pub mod mat;
pub mod quat;
pub mod projection;
pub mod error;

pub use error::MathError;
pub use mat::{Mat3f, Mat4f};
pub use quat::Quat;
pub use vec::{Vec3f, Vec3i, Vec4f, Vec4i};

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use core::f32::consts::PI;

    use crate::*;

    #[test]
    fn test() {
        let x = Vec3f::new(10.0, 2.0, 0.0);
        let y = Vec3f::new(3.0, 3.0, 3.0);

        let a = Mat3f::scale_uniform(3.0);
        let b = Mat3f::scale_uniform(2.0) * a;

        let mut z = x;
        z += Vec3f::from_scalar(1.0);

        assert_eq!(b * z, Vec3f::new(66.0, 18.0, 6.0));
        assert_eq!(Vec3f::clamp(y, Vec3f::new(5.0, 2.0, 0.0), x), Vec3f::new(5.0, 2.0, 0.0));
    }

    #[test]
    fn orbit_then_project() {
        // yaw half a turn, then look at the point we now face
        let orientation = Quat::identity().rotate_axis_angle(Vec3f::unit_y(), PI);
        let forward = orientation.to_mat3() * Vec3f::unit_z();
        assert_abs_diff_eq!(forward, Vec3f::new(0.0, 0.0, -1.0), epsilon = 1e-6);

        let eye = Vec3f::new(0.0, 0.0, 2.0);
        let view = projection::look_at(eye, eye + forward, Vec3f::unit_y());
        let proj = projection::perspective(PI / 2.0, 1.0, 100.0, 1.0);

        let target = Vec4f::from_vec3(Vec3f::new(0.0, 0.0, -3.0), 1.0);
        let clip = target * (view * proj);
        let staged = (target * view) * proj;
        assert_abs_diff_eq!(clip, staged, epsilon = 1e-4);
        assert_abs_diff_eq!(clip.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(clip.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn rotation_matrix_survives_embedding() {
        let q = Quat::axis_angle(Vec3f::new(0.0, 0.6, -0.8), 2.6);
        let m3 = q.to_mat3();
        let m4 = Mat4f::from_mat3(m3);

        let v = Vec3f::new(0.5, -1.0, 2.0);
        let rotated = m4 * Vec4f::from_vec3(v, 1.0);
        assert_abs_diff_eq!(rotated.xyz(), m3 * v, epsilon = 1e-6);
        assert_eq!(rotated.w, 1.0);
        assert_eq!(q.to_mat4(), m4);
    }
}
