use log::{debug, trace};
use serde::Deserialize;
use thiserror::Error;

use math::{
    projection,
    MathError, Mat3f, Mat4f, Quat, Vec3f,
};

use core::f32::consts::PI;

// Looking straight up or down leaves no horizontal forward direction.
const MAX_PITCH: f32 = PI * 0.5 * 0.99;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
    Forward,
    Backward
}

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("invalid projection: {0}")]
    Projection(#[from] MathError),

    #[error("world up vector must be non-zero and finite")]
    WorldUp,

    #[error("{name} must be positive and finite, got {value}")]
    Speed { name: &'static str, value: f32 },
}

/// Everything needed to build a [`Camera`], usually read from a config file.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3f,
    pub world_up: Vec3f,

    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,

    pub walk_speed: f32,
    pub turn_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3f::new(0., 0., -1.3),
            world_up: Vec3f::unit_y(),
            fov: PI / 2.,
            aspect_ratio: 1.,
            near: 0.1,
            far: 100.,
            walk_speed: 0.1,
            turn_speed: 0.05,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ray {
    pub origin: Vec3f,
    pub direction: Vec3f,
}

/// First person camera: a position plus pitch and yaw angles.
///
/// `look` rotates camera space (+z forward, +x right) into world space.
/// `forward` and `right` are its forward and right axes flattened onto the
/// ground plane, they are what walking moves along.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3f,

    pub pitch: f32,
    pub yaw: f32,

    pub orientation: Quat,
    pub look: Mat3f,

    pub forward: Vec3f,
    pub right: Vec3f,

    pub world_up: Vec3f,

    pub near: f32,
    pub far: f32,

    pub fov: f32,
    pub aspect_ratio: f32,

    pub walk_speed: f32,
    pub turn_speed: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Result<Camera, CameraError> {
        projection::try_perspective(config.fov, config.aspect_ratio, config.far, config.near)?;

        let world_up = config.world_up
            .try_normalized()
            .map_err(|_| CameraError::WorldUp)?;

        for (name, value) in [("walk_speed", config.walk_speed), ("turn_speed", config.turn_speed)] {
            if !(value.is_finite() && value > 0.) {
                return Err(CameraError::Speed { name, value });
            }
        }

        let mut c = Self {
            position: config.eye,
            pitch: 0.,
            yaw: 0.,
            orientation: Quat::identity(),
            look: Mat3f::identity(),
            forward: Vec3f::unit_z(),
            right: Vec3f::unit_x(),
            world_up,
            near: config.near,
            far: config.far,
            fov: config.fov,
            aspect_ratio: config.aspect_ratio,
            walk_speed: config.walk_speed,
            turn_speed: config.turn_speed,
        };
        c.update_look_matrix();

        debug!("camera at {} fov {:.2} aspect {:.2} near {} far {}",
               c.position, c.fov, c.aspect_ratio, c.near, c.far);
        Ok(c)
    }

    /// Direction the camera faces, including pitch.
    pub fn facing(&self) -> Vec3f {
        self.look * Vec3f::unit_z()
    }

    pub fn view(&self) -> Mat4f {
        projection::look_at(
            self.position,
            self.position + self.facing(),
            self.world_up,
        )
    }

    pub fn projection(&self) -> Mat4f {
        projection::perspective(
            self.fov, self.aspect_ratio, self.far, self.near,
        )
    }

    /// Combined transform for row vectors, `p * view_projection()`.
    pub fn view_projection(&self) -> Mat4f {
        self.view() * self.projection()
    }

    pub fn move_in_direction(&mut self, dir: Direction, dt: f32) {
        let delta = dt * self.walk_speed;
        match dir {
            Direction::Right    => self.position += self.right     * delta,
            Direction::Left     => self.position -= self.right     * delta,
            Direction::Up       => self.position += self.world_up  * delta,
            Direction::Down     => self.position -= self.world_up  * delta,
            Direction::Forward  => self.position += self.forward   * delta,
            Direction::Backward => self.position -= self.forward   * delta,
        }
        trace!("moved {:?} to {}", dir, self.position);
    }

    /// Adds to pitch and yaw, both scaled by `turn_speed`. Pitch stays just
    /// short of straight up or down.
    pub fn turn(&mut self, pitch: f32, yaw: f32) {
        self.pitch = f32::clamp(self.pitch + pitch * self.turn_speed, -MAX_PITCH, MAX_PITCH);
        self.yaw = f32::rem_euclid(self.yaw + yaw * self.turn_speed, 2. * PI);
        self.update_look_matrix();
    }

    /// Ray through pixel `(x, y)` of a `width` x `height` image, not normalized.
    pub fn primary_ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let dir = Vec3f::new(
            (x as f32 / width as f32) - 0.5,
            (y as f32 / height as f32) - 0.5,
            1.,
        );
        Ray {
            origin: self.position,
            direction: self.look * dir,
        }
    }

    fn update_look_matrix(&mut self) {
        self.orientation = Quat::identity()
            .rotate_axis_angle(Vec3f::unit_x(), self.pitch)
            .rotate_axis_angle(Vec3f::unit_y(), self.yaw);

        self.look = self.orientation.to_mat3();
        self.forward = flatten(self.look * Vec3f::unit_z());
        self.right = flatten(self.look * Vec3f::unit_x());

        trace!("pitch {:.3} yaw {:.3} forward {} right {}",
               self.pitch, self.yaw, self.forward, self.right);
    }
}

fn flatten(v: Vec3f) -> Vec3f {
    Vec3f::new(v.x, 0., v.z).normalized()
}
