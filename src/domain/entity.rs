/// Entities: Player and Enemy.
///
/// Positions are continuous pixel-space, velocities are applied per tick.
/// The player's velocity is set directly from input (no acceleration);
/// enemies hold a wander direction chosen by `ai`.

use super::animation::Animator;
use super::physics::Rect;
use super::tile::TILE_SIZE;

/// Nominal bounding-box edge length, in pixels. Matches the tile size;
/// the hitbox inset from config shrinks it for corner sampling.
pub const ENTITY_SIZE: f32 = 40.0;

/// Cardinal movement direction (continuous while key held).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// Velocity vector for this direction at the given speed.
    pub fn velocity(self, speed: f32) -> (f32, f32) {
        match self {
            Dir::Up => (0.0, -speed),
            Dir::Down => (0.0, speed),
            Dir::Left => (-speed, 0.0),
            Dir::Right => (speed, 0.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub speed: f32,
    pub anim: Animator,
}

impl Player {
    pub fn new(x: f32, y: f32, speed: f32, anim_cadence_ms: u64) -> Self {
        Player {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            speed,
            anim: Animator::new(anim_cadence_ms),
        }
    }

    /// Instantaneous velocity set/clear from the held direction.
    pub fn set_direction(&mut self, dir: Option<Dir>) {
        let (vx, vy) = match dir {
            Some(d) => d.velocity(self.speed),
            None => (0.0, 0.0),
        };
        self.vx = vx;
        self.vy = vy;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, ENTITY_SIZE, ENTITY_SIZE)
    }

    /// The tile under the center of the bounding box.
    pub fn occupied_tile(&self) -> (usize, usize) {
        let (cx, cy) = self.bounds().center();
        ((cx / TILE_SIZE) as usize, (cy / TILE_SIZE) as usize)
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub dir: Dir,
    pub speed: f32,
    pub anim: Animator,
}

impl Enemy {
    pub fn new(x: f32, y: f32, dir: Dir, speed: f32, anim_cadence_ms: u64) -> Self {
        Enemy {
            x,
            y,
            dir,
            speed,
            anim: Animator::new(anim_cadence_ms),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, ENTITY_SIZE, ENTITY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_velocities() {
        assert_eq!(Dir::Up.velocity(4.0), (0.0, -4.0));
        assert_eq!(Dir::Down.velocity(4.0), (0.0, 4.0));
        assert_eq!(Dir::Left.velocity(4.0), (-4.0, 0.0));
        assert_eq!(Dir::Right.velocity(4.0), (4.0, 0.0));
    }

    #[test]
    fn set_direction_is_instantaneous() {
        let mut p = Player::new(0.0, 0.0, 4.0, 200);
        p.set_direction(Some(Dir::Right));
        assert_eq!((p.vx, p.vy), (4.0, 0.0));
        p.set_direction(Some(Dir::Up));
        assert_eq!((p.vx, p.vy), (0.0, -4.0));
        p.set_direction(None);
        assert_eq!((p.vx, p.vy), (0.0, 0.0));
    }

    #[test]
    fn occupied_tile_uses_box_center() {
        let p = Player::new(40.0, 80.0, 4.0, 200);
        assert_eq!(p.occupied_tile(), (1, 2));
        // 21 px over: the center crosses into the next column
        let p = Player::new(61.0, 80.0, 4.0, 200);
        assert_eq!(p.occupied_tile(), (2, 2));
    }
}
