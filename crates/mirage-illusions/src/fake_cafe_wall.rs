//! The café wall turned inside out: the mortar lines really are slanted,
//! yet the tile pattern makes them look like the straight-but-wedged lines
//! of the classic illusion.

use crate::cafe_wall::CafeWallConfig;
use crate::error::ConfigError;
use crate::shape::SceneObject;
use crate::view::Illusion;
use crate::world::OrthoCamera;

pub use crate::cafe_wall::BACKGROUND;

pub const SHOW_GUIDE: &str = "Show Straight Guide";
pub const HIDE_GUIDE: &str = "Hide Straight Guide";
pub const REMOVE_PATTERN: &str = "Remove Pattern";
pub const SHOW_PATTERN: &str = "Show Pattern";
pub const SLANT_SUFFIX: &str = "°";

#[derive(Debug, Clone, PartialEq)]
pub struct FakeCafeWallConfig {
    pub wall: CafeWallConfig,
    pub slant_default_deg: f32,
    pub slant_max_deg: f32,
    pub slant_step_deg: f32,
}

impl Default for FakeCafeWallConfig {
    fn default() -> Self {
        Self {
            wall: CafeWallConfig { guide_thickness: 0.03, ..CafeWallConfig::default() },
            slant_default_deg: 3.0,
            slant_max_deg: 10.0,
            slant_step_deg: 0.5,
        }
    }
}

impl FakeCafeWallConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.wall.validate()?;
        let (min, max, default) = (0.0, self.slant_max_deg, self.slant_default_deg);
        if !(min <= max && min <= default && default <= max) {
            return Err(ConfigError::SlantRange { min, max, default });
        }
        if !(self.slant_step_deg > 0.0) {
            return Err(ConfigError::NonPositive { field: "slant_step_deg", value: self.slant_step_deg });
        }
        Ok(())
    }

    /// Clamps into `[0, slant_max_deg]` and rounds to the nearest step; NaN
    /// maps to `0`.
    pub fn snap_slant(&self, deg: f32) -> f32 {
        if deg.is_nan() {
            return 0.0;
        }
        let deg = deg.clamp(0.0, self.slant_max_deg);
        if self.slant_step_deg > 0.0 {
            ((deg / self.slant_step_deg).round() * self.slant_step_deg).clamp(0.0, self.slant_max_deg)
        } else {
            deg
        }
    }
}

/// Mortar rotation in radians for a slant in degrees.
pub fn mortar_rotation(slant_deg: f32) -> f32 {
    slant_deg.to_radians()
}

/// Slider readout, e.g. `3.5°`.
pub fn slant_label(slant_deg: f32) -> String {
    format!("{slant_deg}{SLANT_SUFFIX}")
}

/// Demo state.
pub struct FakeCafeWall {
    config: FakeCafeWallConfig,
    slant_deg: f32,
    guides_visible: bool,
    pattern_removed: bool,
    tiles: Vec<SceneObject>,
    mortar: Vec<SceneObject>,
    guides: Vec<SceneObject>,
    dirty: bool,
}

impl FakeCafeWall {
    pub fn new(config: FakeCafeWallConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let slant_deg = config.snap_slant(config.slant_default_deg);
        if slant_deg != config.slant_default_deg {
            log::warn!(
                "slant {}° is off the {}° grid, starting at {}",
                config.slant_default_deg,
                config.slant_step_deg,
                slant_label(slant_deg)
            );
        }
        let mut wall = Self {
            slant_deg,
            config,
            guides_visible: false,
            pattern_removed: false,
            tiles: Vec::new(),
            mortar: Vec::new(),
            guides: Vec::new(),
            dirty: true,
        };
        wall.rebuild();
        Ok(wall)
    }

    pub fn config(&self) -> &FakeCafeWallConfig {
        &self.config
    }

    pub fn slant_angle(&self) -> f32 {
        self.slant_deg
    }

    pub fn guides_visible(&self) -> bool {
        self.guides_visible
    }

    pub fn pattern_removed(&self) -> bool {
        self.pattern_removed
    }

    pub fn tiles(&self) -> &[SceneObject] {
        &self.tiles
    }

    pub fn mortar(&self) -> &[SceneObject] {
        &self.mortar
    }

    pub fn guides(&self) -> &[SceneObject] {
        &self.guides
    }

    /// Clamps and snaps like [`FakeCafeWallConfig::snap_slant`]; returns the
    /// applied angle.
    pub fn set_slant_angle(&mut self, deg: f32) -> f32 {
        let deg = self.config.snap_slant(deg);
        if deg != self.slant_deg {
            log::debug!("fake cafe wall: slant {}", slant_label(deg));
            self.slant_deg = deg;
            self.rebuild();
        }
        deg
    }

    pub fn toggle_guides(&mut self) -> bool {
        self.guides_visible = !self.guides_visible;
        log::debug!("fake cafe wall: guides {}", if self.guides_visible { "shown" } else { "hidden" });
        self.rebuild();
        self.guides_visible
    }

    /// Returns whether the pattern is now removed.
    pub fn toggle_pattern(&mut self) -> bool {
        self.pattern_removed = !self.pattern_removed;
        log::debug!("fake cafe wall: pattern {}", if self.pattern_removed { "removed" } else { "shown" });
        self.rebuild();
        self.pattern_removed
    }

    pub fn guides_label(&self) -> &'static str {
        if self.guides_visible { HIDE_GUIDE } else { SHOW_GUIDE }
    }

    pub fn pattern_label(&self) -> &'static str {
        if self.pattern_removed { SHOW_PATTERN } else { REMOVE_PATTERN }
    }

    pub fn rebuild(&mut self) {
        let wall = &self.config.wall;
        if self.pattern_removed {
            self.tiles.clear();
            self.mortar.clear();
        } else {
            // The odd-row offset is always on here.
            self.tiles = wall.tile_objects(true);
            self.mortar = wall.mortar_objects(mortar_rotation(self.slant_deg));
        }
        self.guides = if self.guides_visible { wall.guide_objects() } else { Vec::new() };
        self.dirty = true;
    }
}

impl Illusion for FakeCafeWall {
    fn camera(&self) -> OrthoCamera {
        OrthoCamera::new(self.config.wall.camera_half_height)
    }

    fn objects(&self) -> Vec<&SceneObject> {
        self.tiles.iter().chain(&self.mortar).chain(&self.guides).collect()
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;

    fn wall() -> FakeCafeWall {
        FakeCafeWall::new(FakeCafeWallConfig::default()).unwrap()
    }

    fn rotations(objects: &[SceneObject]) -> Vec<f32> {
        objects
            .iter()
            .map(|o| match o.kind {
                ShapeKind::Rect { rotation, .. } => rotation,
                _ => panic!("mortar is rectangular"),
            })
            .collect()
    }

    // ── slant ─────────────────────────────────────────────────────────────

    #[test]
    fn mortar_rotation_matches_slant_exactly() {
        let mut w = wall();
        let mut deg = 0.0;
        while deg <= w.config().slant_max_deg {
            w.set_slant_angle(deg);
            let expected = mortar_rotation(deg);
            assert!((expected - deg * std::f32::consts::PI / 180.0).abs() < 1e-6);
            assert!(rotations(w.mortar()).iter().all(|r| *r == expected), "at {deg}°");
            deg += 0.5;
        }
    }

    #[test]
    fn slant_setter_clamps_into_range() {
        let mut w = wall();
        assert_eq!(w.set_slant_angle(-4.0), 0.0);
        assert_eq!(w.set_slant_angle(25.0), 10.0);
        assert_eq!(w.slant_angle(), 10.0);
        assert_eq!(w.set_slant_angle(f32::NAN), 0.0);
    }

    #[test]
    fn off_grid_default_starts_on_the_nearest_step() {
        let cfg = FakeCafeWallConfig { slant_default_deg: 4.3, ..Default::default() };
        let w = FakeCafeWall::new(cfg).unwrap();
        assert_eq!(w.slant_angle(), 4.5);
        assert!(rotations(w.mortar()).iter().all(|r| *r == mortar_rotation(4.5)));
        assert_eq!(slant_label(w.slant_angle()), "4.5°");
    }

    #[test]
    fn setter_snaps_to_the_step() {
        let mut w = wall();
        assert_eq!(w.set_slant_angle(6.2), 6.0);
        assert_eq!(w.set_slant_angle(6.3), 6.5);
        assert_eq!(w.slant_angle(), 6.5);
    }

    #[test]
    fn slider_label_has_degree_suffix() {
        assert_eq!(slant_label(3.0), "3°");
        assert_eq!(slant_label(7.5), "7.5°");
    }

    #[test]
    fn guides_stay_straight_whatever_the_slant() {
        let mut w = wall();
        w.toggle_guides();
        w.set_slant_angle(8.0);
        assert!(rotations(w.guides()).iter().all(|r| *r == 0.0));
    }

    // ── toggles ───────────────────────────────────────────────────────────

    #[test]
    fn removing_the_pattern_keeps_guides() {
        let mut w = wall();
        w.toggle_guides();
        assert!(w.toggle_pattern());
        assert!(w.tiles().is_empty());
        assert!(w.mortar().is_empty());
        assert_eq!(w.guides().len(), 11);
        assert_eq!(w.pattern_label(), SHOW_PATTERN);

        assert!(!w.toggle_pattern());
        assert_eq!(w.tiles().len(), 12 * 16);
        assert_eq!(w.mortar().len(), 11);
        assert_eq!(w.pattern_label(), REMOVE_PATTERN);
    }

    #[test]
    fn odd_rows_are_always_offset() {
        let cfg = FakeCafeWallConfig::default();
        let w = wall();
        let row1_first = w.tiles()[cfg.wall.tiles_per_row as usize].clone();
        match row1_first.kind {
            ShapeKind::Rect { center, .. } => {
                assert!((center.x - cfg.wall.row_start_x(1, true)).abs() < 1e-5)
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn guide_labels_follow_state() {
        let mut w = wall();
        assert_eq!(w.guides_label(), SHOW_GUIDE);
        w.toggle_guides();
        assert_eq!(w.guides_label(), HIDE_GUIDE);
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn validate_rejects_default_outside_range() {
        let cfg = FakeCafeWallConfig { slant_default_deg: 12.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::SlantRange { .. })));
        let cfg = FakeCafeWallConfig { slant_max_deg: -1.0, slant_default_deg: 0.0, ..Default::default() };
        assert!(cfg.validate().is_err());
        assert!(FakeCafeWallConfig::default().validate().is_ok());
    }

    #[test]
    fn unchanged_slant_does_not_dirty() {
        let mut w = wall();
        w.take_dirty();
        w.set_slant_angle(3.0);
        assert!(!w.take_dirty());
        w.set_slant_angle(3.5);
        assert!(w.take_dirty());
    }
}
