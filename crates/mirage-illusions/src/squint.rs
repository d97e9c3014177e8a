//! Squint: a ring of spinning hue wheels around a set of grey arrows.
//! Staring at the centre while the wheels turn makes the static arrows
//! appear to drift.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::{Mat2, Vec2};
use mirage_engine::paint::{Color, Paint};

use crate::shape::{SceneObject, ShapeKind};
use crate::view::Illusion;
use crate::world::OrthoCamera;

pub const BACKGROUND: u32 = 0x808080;
pub const ARROW: u32 = 0x666666;

const CAMERA_HALF_HEIGHT: f32 = 12.5;

const RING_COUNT: usize = 12;
const RING_INNER: f32 = 0.8;
const RING_OUTER: f32 = 1.6;
const RING_PLACEMENT: f32 = 7.0;
/// Radians per second, clockwise.
const SPIN_SPEED: f32 = 16.0;

const ARROW_DISTANCE: f32 = 1.5;
const ARROW_INTERVAL: f32 = 3.0;

const STEM_WIDTH: f32 = 0.6;
const STEM_LENGTH: f32 = 0.7;
const HEAD_WIDTH: f32 = 1.2;
const HEAD_LENGTH: f32 = 0.7;

/// Hue-wheel rotation shared by every ring at `elapsed` seconds.
pub fn ring_rotation(elapsed: f32) -> f32 {
    -elapsed * SPIN_SPEED
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Counter-clockwise rotation turning an up arrow into this one.
    fn rotation(self) -> f32 {
        match self {
            Direction::Up => 0.0,
            Direction::Down => PI,
            Direction::Left => FRAC_PI_2,
            Direction::Right => -FRAC_PI_2,
        }
    }

    fn offset(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, ARROW_DISTANCE),
            Direction::Down => Vec2::new(0.0, -ARROW_DISTANCE),
            Direction::Left => Vec2::new(-ARROW_DISTANCE, 0.0),
            Direction::Right => Vec2::new(ARROW_DISTANCE, 0.0),
        }
    }
}

/// Which arrows show; cycles every [`ARROW_INTERVAL`] seconds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ArrowState {
    Vertical,
    Horizontal,
    UpOnly,
    All,
}

impl ArrowState {
    pub fn at(elapsed: f32) -> Self {
        match ((elapsed / ARROW_INTERVAL).floor() as i64).rem_euclid(4) {
            0 => ArrowState::Vertical,
            1 => ArrowState::Horizontal,
            2 => ArrowState::UpOnly,
            _ => ArrowState::All,
        }
    }

    pub fn shows(self, dir: Direction) -> bool {
        match self {
            ArrowState::Vertical => matches!(dir, Direction::Up | Direction::Down),
            ArrowState::Horizontal => matches!(dir, Direction::Left | Direction::Right),
            ArrowState::UpOnly => dir == Direction::Up,
            ArrowState::All => true,
        }
    }
}

/// Up-pointing arrow centred on the origin, as a triangle list.
pub fn arrow_triangles() -> Vec<Vec2> {
    let (sw, hw) = (STEM_WIDTH / 2.0, HEAD_WIDTH / 2.0);
    let base = -STEM_LENGTH / 2.0;
    let neck = STEM_LENGTH / 2.0;
    let tip = neck + HEAD_LENGTH;
    vec![
        Vec2::new(-sw, base),
        Vec2::new(sw, base),
        Vec2::new(sw, neck),
        Vec2::new(-sw, base),
        Vec2::new(sw, neck),
        Vec2::new(-sw, neck),
        Vec2::new(-hw, neck),
        Vec2::new(hw, neck),
        Vec2::new(0.0, tip),
    ]
}

fn arrow(dir: Direction) -> SceneObject {
    let rot = Mat2::from_angle(dir.rotation());
    let points = arrow_triangles().into_iter().map(|p| rot * p + dir.offset()).collect();
    SceneObject::new(ShapeKind::Triangles { points, color: Color::from_hex(ARROW) }, 0.0)
}

/// Demo state.
pub struct Squint {
    rings: Vec<SceneObject>,
    /// Indexed like [`Direction::ALL`].
    arrows: Vec<SceneObject>,
    state: ArrowState,
    dirty: bool,
}

impl Squint {
    pub fn new() -> Self {
        let rings = (0..RING_COUNT)
            .map(|i| {
                let angle = i as f32 / RING_COUNT as f32 * TAU;
                let center = Vec2::new(angle.cos(), angle.sin()) * RING_PLACEMENT;
                // Each wheel starts turned by its own placement angle.
                let paint = Paint::HueWheel { rotation: angle };
                SceneObject::new(ShapeKind::Ring { center, inner: RING_INNER, outer: RING_OUTER, paint }, 0.0)
            })
            .collect();
        let arrows = Direction::ALL.into_iter().map(arrow).collect();
        let mut squint = Self { rings, arrows, state: ArrowState::Vertical, dirty: true };
        squint.apply_arrow_state();
        squint
    }

    pub fn rings(&self) -> &[SceneObject] {
        &self.rings
    }

    pub fn arrow_state(&self) -> ArrowState {
        self.state
    }

    pub fn arrow_visible(&self, dir: Direction) -> bool {
        Direction::ALL
            .iter()
            .position(|d| *d == dir)
            .is_some_and(|i| self.arrows[i].visible)
    }

    fn apply_arrow_state(&mut self) {
        for (dir, arrow) in Direction::ALL.into_iter().zip(&mut self.arrows) {
            arrow.visible = self.state.shows(dir);
        }
    }
}

impl Default for Squint {
    fn default() -> Self {
        Self::new()
    }
}

impl Illusion for Squint {
    fn camera(&self) -> OrthoCamera {
        OrthoCamera::new(CAMERA_HALF_HEIGHT)
    }

    fn objects(&self) -> Vec<&SceneObject> {
        self.rings.iter().chain(&self.arrows).collect()
    }

    fn advance(&mut self, elapsed: f32) {
        let rotation = ring_rotation(elapsed);
        for ring in &mut self.rings {
            if let ShapeKind::Ring { paint, .. } = &mut ring.kind {
                *paint = Paint::HueWheel { rotation };
            }
        }
        let state = ArrowState::at(elapsed);
        if state != self.state {
            log::debug!("squint: arrows {:?}", state);
            self.state = state;
            self.apply_arrow_state();
        }
        self.dirty = true;
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── arrow cycle ───────────────────────────────────────────────────────

    #[test]
    fn arrow_state_follows_three_second_table() {
        assert_eq!(ArrowState::at(0.0), ArrowState::Vertical);
        assert_eq!(ArrowState::at(2.99), ArrowState::Vertical);
        assert_eq!(ArrowState::at(3.0), ArrowState::Horizontal);
        assert_eq!(ArrowState::at(6.5), ArrowState::UpOnly);
        assert_eq!(ArrowState::at(11.0), ArrowState::All);
        assert_eq!(ArrowState::at(12.0), ArrowState::Vertical);
    }

    #[test]
    fn arrow_cycle_has_twelve_second_period() {
        for i in 0..48 {
            let t = i as f32 * 0.25;
            assert_eq!(ArrowState::at(t), ArrowState::at(t + 12.0), "t = {t}");
        }
    }

    #[test]
    fn visible_arrows_match_state() {
        let mut s = Squint::new();
        s.advance(7.0);
        assert!(s.arrow_visible(Direction::Up));
        assert!(!s.arrow_visible(Direction::Down));
        assert!(!s.arrow_visible(Direction::Left));
        s.advance(9.5);
        assert!(Direction::ALL.iter().all(|d| s.arrow_visible(*d)));
        s.advance(4.0);
        assert!(s.arrow_visible(Direction::Left) && s.arrow_visible(Direction::Right));
        assert!(!s.arrow_visible(Direction::Up));
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn arrow_outline_spans_stem_and_head() {
        let pts = arrow_triangles();
        assert_eq!(pts.len() % 3, 0);
        let top = pts.iter().map(|p| p.y).fold(f32::MIN, f32::max);
        let bottom = pts.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        let widest = pts.iter().map(|p| p.x.abs()).fold(0.0, f32::max);
        assert!((top - 1.05).abs() < 1e-6);
        assert!((bottom + 0.35).abs() < 1e-6);
        assert!((widest - 0.6).abs() < 1e-6);
    }

    #[test]
    fn left_arrow_points_left() {
        let ShapeKind::Triangles { points, .. } = arrow(Direction::Left).kind else {
            panic!("arrows are triangle lists");
        };
        // The tip is the last vertex.
        let tip = points[8];
        assert!((tip.x - (-1.5 - 1.05)).abs() < 1e-5);
        assert!(tip.y.abs() < 1e-5);
    }

    #[test]
    fn rings_sit_on_a_circle_of_radius_seven() {
        let s = Squint::new();
        assert_eq!(s.rings().len(), 12);
        for ring in s.rings() {
            let ShapeKind::Ring { center, inner, outer, .. } = ring.kind else { unreachable!() };
            assert!((center.length() - 7.0).abs() < 1e-4);
            assert_eq!((inner, outer), (0.8, 1.6));
        }
    }

    // ── spin ──────────────────────────────────────────────────────────────

    #[test]
    fn rings_share_a_clockwise_rotation() {
        let mut s = Squint::new();
        s.advance(0.5);
        assert_eq!(ring_rotation(0.5), -8.0);
        for ring in s.rings() {
            let ShapeKind::Ring { paint, .. } = ring.kind else { unreachable!() };
            assert_eq!(paint, Paint::HueWheel { rotation: -8.0 });
        }
        assert!(s.take_dirty());
    }
}
