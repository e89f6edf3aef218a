use std::path::Path;

use anyhow::Context;
use log::{debug, info, warn};

use scene::{Camera, CameraConfig, Direction};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

// How long each scripted key is held, in the units of walk_speed.
const KEY_HOLD: f32 = 1.0;

enum Action {
    Move(Direction),
    Turn { pitch: f32, yaw: f32 },
}

fn action_for_key(key: char) -> Option<Action> {
    let action = match key.to_ascii_uppercase() {
        'W' => Action::Move(Direction::Forward),
        'A' => Action::Move(Direction::Left),
        'S' => Action::Move(Direction::Backward),
        'D' => Action::Move(Direction::Right),
        'Q' => Action::Move(Direction::Down),
        'E' => Action::Move(Direction::Up),
        'I' => Action::Turn { pitch: -1., yaw: 0. },
        'K' => Action::Turn { pitch: 1., yaw: 0. },
        'J' => Action::Turn { pitch: 0., yaw: 1. },
        'L' => Action::Turn { pitch: 0., yaw: -1. },
        _ => return None,
    };
    Some(action)
}

fn load_config(path: &Path) -> anyhow::Result<CameraConfig> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading camera config {}", path.display()))?;
    let config = serde_json::from_str(&data)
        .with_context(|| format!("parsing camera config {}", path.display()))?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config(Path::new(&path))?,
        None => CameraConfig::default(),
    };
    let script = args.next().unwrap_or_else(|| "wwwwlllliidd".to_string());

    let mut camera = Camera::new(&config).context("building camera")?;
    info!("camera at {} looking along {}", camera.position, camera.facing());

    for key in script.chars() {
        match action_for_key(key) {
            Some(Action::Move(dir)) => camera.move_in_direction(dir, KEY_HOLD),
            Some(Action::Turn { pitch, yaw }) => camera.turn(pitch, yaw),
            None => {
                warn!("ignoring unknown key {:?}", key);
                continue;
            }
        }
        debug!("{:?} -> position {} forward {} right {}",
               key, camera.position, camera.forward, camera.right);
    }

    info!("orientation {}", camera.orientation);
    info!("look {}", camera.look);
    info!("view {}", camera.view());
    info!("projection {}", camera.projection());

    for (x, y) in [(0, 0), (WIDTH - 1, 0), (WIDTH / 2, HEIGHT / 2), (0, HEIGHT - 1), (WIDTH - 1, HEIGHT - 1)] {
        let ray = camera.primary_ray(x, y, WIDTH, HEIGHT);
        let target = ray.origin + ray.direction;
        let clip = math::vec::Vec4f::from_vec3(target, 1.) * camera.view_projection();
        info!("pixel ({}, {}) dir {} clip {}", x, y, ray.direction, clip);
    }

    if camera.world_up.cross(camera.facing()).length() < 1e-3 {
        warn!("camera faces along world up {}, view matrix is degenerate", camera.world_up);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn_with(key: char) -> Camera {
        let mut camera = Camera::new(&CameraConfig::default()).unwrap();
        match action_for_key(key) {
            Some(Action::Turn { pitch, yaw }) => camera.turn(pitch, yaw),
            _ => panic!("{} is not a turn key", key),
        }
        camera
    }

    #[test]
    fn yaw_keys_turn_towards_their_side() {
        let right = Camera::new(&CameraConfig::default()).unwrap().right;
        assert!(turn_with('j').facing().dot(right) < 0.);
        assert!(turn_with('L').facing().dot(right) > 0.);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert!(action_for_key('x').is_none());
        assert!(matches!(action_for_key('w'), Some(Action::Move(Direction::Forward))));
    }
}
