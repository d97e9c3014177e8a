//! Café wall: rows of alternating black and white tiles separated by thin
//! grey mortar. Shifting every other row by half a tile makes the perfectly
//! parallel mortar lines look wedge-shaped.

use glam::Vec2;
use mirage_engine::paint::Color;

use crate::error::ConfigError;
use crate::shape::SceneObject;
use crate::view::Illusion;
use crate::world::OrthoCamera;

pub const BACKGROUND: u32 = 0x808080;
pub const MORTAR: u32 = 0x808080;
pub const GUIDE: u32 = 0xff0000;

pub const SHOW_GUIDES: &str = "Show Guide Lines";
pub const HIDE_GUIDES: &str = "Hide Guide Lines";
pub const REMOVE_OFFSET: &str = "Remove Offset";
pub const ADD_OFFSET: &str = "Add Offset";

const TILE_Z: f32 = 0.0;
const MORTAR_Z: f32 = 0.01;
const GUIDE_Z: f32 = 0.02;

/// Wall geometry in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct CafeWallConfig {
    pub rows: u32,
    pub tiles_per_row: u32,
    pub tile_width: f32,
    pub tile_height: f32,
    pub mortar_thickness: f32,
    /// Horizontal extent of every mortar and guide line.
    pub mortar_length: f32,
    pub guide_thickness: f32,
    pub camera_half_height: f32,
}

impl Default for CafeWallConfig {
    fn default() -> Self {
        Self {
            rows: 12,
            tiles_per_row: 16,
            tile_width: 1.2,
            tile_height: 0.8,
            mortar_thickness: 0.15,
            mortar_length: 20.0,
            guide_thickness: 0.02,
            camera_half_height: 6.0,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TileColor {
    Black,
    White,
}

impl TileColor {
    pub fn color(self) -> Color {
        match self {
            TileColor::Black => Color::BLACK,
            TileColor::White => Color::WHITE,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TilePlacement {
    pub row: u32,
    pub col: u32,
    pub center: Vec2,
    pub color: TileColor,
}

/// Black on even columns, white on odd ones.
pub fn tile_color(col: u32) -> TileColor {
    if col % 2 == 0 { TileColor::Black } else { TileColor::White }
}

impl CafeWallConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 {
            return Err(ConfigError::ZeroRows);
        }
        if self.tiles_per_row == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        for (field, value) in [
            ("tile_width", self.tile_width),
            ("tile_height", self.tile_height),
            ("mortar_thickness", self.mortar_thickness),
            ("mortar_length", self.mortar_length),
            ("guide_thickness", self.guide_thickness),
            ("camera_half_height", self.camera_half_height),
        ] {
            // `!(v > 0)` also rejects NaN.
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }

    /// Half a tile.
    #[inline]
    pub fn offset_amount(&self) -> f32 {
        self.tile_width / 2.0
    }

    /// Vertical distance between neighbouring row centres.
    #[inline]
    pub fn row_pitch(&self) -> f32 {
        self.tile_height + self.mortar_thickness
    }

    /// Rows are centred on y = 0, row 0 at the top.
    pub fn row_center_y(&self, row: u32) -> f32 {
        (self.rows as f32 - 1.0) * self.row_pitch() / 2.0 - row as f32 * self.row_pitch()
    }

    /// Centre x of the first tile in `row`.
    pub fn row_start_x(&self, row: u32, offset_enabled: bool) -> f32 {
        let base = -(self.tiles_per_row as f32 * self.tile_width) / 2.0 + self.tile_width / 2.0;
        if offset_enabled && row % 2 == 1 { base + self.offset_amount() } else { base }
    }

    /// Every tile, row-major.
    pub fn tile_layout(&self, offset_enabled: bool) -> Vec<TilePlacement> {
        let mut tiles = Vec::with_capacity((self.rows * self.tiles_per_row) as usize);
        for row in 0..self.rows {
            let y = self.row_center_y(row);
            let start = self.row_start_x(row, offset_enabled);
            for col in 0..self.tiles_per_row {
                tiles.push(TilePlacement {
                    row,
                    col,
                    center: Vec2::new(start + col as f32 * self.tile_width, y),
                    color: tile_color(col),
                });
            }
        }
        tiles
    }

    /// Centre y of the mortar gap below each row but the last.
    pub fn mortar_line_ys(&self) -> Vec<f32> {
        (0..self.rows.saturating_sub(1))
            .map(|row| self.row_center_y(row) - self.row_pitch() / 2.0)
            .collect()
    }

    pub(crate) fn tile_objects(&self, offset_enabled: bool) -> Vec<SceneObject> {
        let size = Vec2::new(self.tile_width, self.tile_height);
        self.tile_layout(offset_enabled)
            .into_iter()
            .map(|t| SceneObject::rect(t.center, size, t.color.color(), TILE_Z))
            .collect()
    }

    /// Mortar strips, rotated counter-clockwise by `rotation` radians.
    pub(crate) fn mortar_objects(&self, rotation: f32) -> Vec<SceneObject> {
        let size = Vec2::new(self.mortar_length, self.mortar_thickness);
        let color = Color::from_hex(MORTAR);
        self.mortar_line_ys()
            .into_iter()
            .map(|y| SceneObject::rotated_rect(Vec2::new(0.0, y), size, rotation, color, MORTAR_Z))
            .collect()
    }

    pub(crate) fn guide_objects(&self) -> Vec<SceneObject> {
        let size = Vec2::new(self.mortar_length, self.guide_thickness);
        let color = Color::from_hex(GUIDE);
        self.mortar_line_ys()
            .into_iter()
            .map(|y| SceneObject::rect(Vec2::new(0.0, y), size, color, GUIDE_Z))
            .collect()
    }
}

/// Demo state.
pub struct CafeWall {
    config: CafeWallConfig,
    guides_visible: bool,
    offset_enabled: bool,
    tiles: Vec<SceneObject>,
    mortar: Vec<SceneObject>,
    guides: Vec<SceneObject>,
    dirty: bool,
}

impl CafeWall {
    pub fn new(config: CafeWallConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut wall = Self {
            config,
            guides_visible: false,
            offset_enabled: true,
            tiles: Vec::new(),
            mortar: Vec::new(),
            guides: Vec::new(),
            dirty: true,
        };
        wall.rebuild();
        Ok(wall)
    }

    pub fn config(&self) -> &CafeWallConfig {
        &self.config
    }

    pub fn guides_visible(&self) -> bool {
        self.guides_visible
    }

    pub fn offset_enabled(&self) -> bool {
        self.offset_enabled
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

    /// Returns the new visibility.
    pub fn toggle_guides(&mut self) -> bool {
        self.guides_visible = !self.guides_visible;
        log::debug!("cafe wall: guides {}", if self.guides_visible { "shown" } else { "hidden" });
        self.rebuild();
        self.guides_visible
    }

    /// Returns whether odd rows are now offset.
    pub fn toggle_offset(&mut self) -> bool {
        self.offset_enabled = !self.offset_enabled;
        log::debug!("cafe wall: offset {}", if self.offset_enabled { "on" } else { "off" });
        self.rebuild();
        self.offset_enabled
    }

    /// Label of the guide button: the action a click performs.
    pub fn guides_label(&self) -> &'static str {
        if self.guides_visible { HIDE_GUIDES } else { SHOW_GUIDES }
    }

    pub fn offset_label(&self) -> &'static str {
        if self.offset_enabled { REMOVE_OFFSET } else { ADD_OFFSET }
    }

    pub fn rebuild(&mut self) {
        self.tiles = self.config.tile_objects(self.offset_enabled);
        self.mortar = self.config.mortar_objects(0.0);
        self.guides = if self.guides_visible { self.config.guide_objects() } else { Vec::new() };
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

impl Illusion for CafeWall {
    fn camera(&self) -> OrthoCamera {
        OrthoCamera::new(self.config.camera_half_height)
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

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn colour_alternates_by_column_parity() {
        let cfg = CafeWallConfig::default();
        for offset in [true, false] {
            for t in cfg.tile_layout(offset) {
                let expected = if t.col % 2 == 0 { TileColor::Black } else { TileColor::White };
                assert_eq!(t.color, expected, "row {} col {}", t.row, t.col);
            }
        }
    }

    #[test]
    fn odd_rows_shift_by_half_a_tile_only_when_enabled() {
        let cfg = CafeWallConfig::default();
        for row in 0..cfg.rows {
            let shift = cfg.row_start_x(row, true) - cfg.row_start_x(row, false);
            let expected = if row % 2 == 1 { cfg.tile_width / 2.0 } else { 0.0 };
            assert!(approx(shift, expected), "row {row}: {shift}");
        }
    }

    #[test]
    fn default_wall_row_one_starts_point_six_right_of_row_zero() {
        let cfg = CafeWallConfig::default();
        let row0 = cfg.row_start_x(0, true);
        let row1 = cfg.row_start_x(1, true);
        assert!(approx(row0, -9.0));
        assert!(approx(row1, row0 + 0.6));
    }

    #[test]
    fn rows_are_centred_on_the_origin() {
        let cfg = CafeWallConfig::default();
        let top = cfg.row_center_y(0);
        let bottom = cfg.row_center_y(cfg.rows - 1);
        assert!(approx(top, -bottom));
        assert!(approx(top - cfg.row_center_y(1), 0.95));
    }

    #[test]
    fn mortar_sits_between_rows() {
        let cfg = CafeWallConfig::default();
        let ys = cfg.mortar_line_ys();
        assert_eq!(ys.len(), 11);
        for (row, y) in ys.iter().enumerate() {
            let above = cfg.row_center_y(row as u32);
            let below = cfg.row_center_y(row as u32 + 1);
            assert!(approx(*y, (above + below) / 2.0));
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let cfg = CafeWallConfig::default();
        assert_eq!(cfg.tile_layout(true), cfg.tile_layout(true));
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn validate_rejects_empty_and_negative_walls() {
        let zero_rows = CafeWallConfig { rows: 0, ..Default::default() };
        assert_eq!(zero_rows.validate(), Err(ConfigError::ZeroRows));
        let zero_cols = CafeWallConfig { tiles_per_row: 0, ..Default::default() };
        assert_eq!(zero_cols.validate(), Err(ConfigError::ZeroColumns));
        let bad = CafeWallConfig { tile_height: -0.8, ..Default::default() };
        assert!(matches!(bad.validate(), Err(ConfigError::NonPositive { field: "tile_height", .. })));
        let nan = CafeWallConfig { mortar_thickness: f32::NAN, ..Default::default() };
        assert!(nan.validate().is_err());
        assert!(CafeWall::new(zero_rows).is_err());
    }

    #[test]
    fn single_row_wall_has_no_mortar() {
        let cfg = CafeWallConfig { rows: 1, ..Default::default() };
        assert!(cfg.mortar_line_ys().is_empty());
    }

    // ── demo state ────────────────────────────────────────────────────────

    #[test]
    fn groups_match_generator_after_every_toggle() {
        let mut wall = CafeWall::new(CafeWallConfig::default()).unwrap();
        let check = |w: &CafeWall| {
            let cfg = w.config();
            assert_eq!(w.tiles().len(), (cfg.rows * cfg.tiles_per_row) as usize);
            assert_eq!(w.mortar().len(), cfg.rows as usize - 1);
            let guides = if w.guides_visible() { cfg.rows as usize - 1 } else { 0 };
            assert_eq!(w.guides().len(), guides);
        };
        check(&wall);
        wall.toggle_guides();
        check(&wall);
        wall.toggle_offset();
        check(&wall);
        wall.toggle_guides();
        check(&wall);
    }

    #[test]
    fn labels_follow_state() {
        let mut wall = CafeWall::new(CafeWallConfig::default()).unwrap();
        assert_eq!(wall.guides_label(), SHOW_GUIDES);
        assert_eq!(wall.offset_label(), REMOVE_OFFSET);
        assert!(wall.toggle_guides());
        assert!(!wall.toggle_offset());
        assert_eq!(wall.guides_label(), HIDE_GUIDES);
        assert_eq!(wall.offset_label(), ADD_OFFSET);
    }

    #[test]
    fn toggles_mark_the_scene_dirty() {
        let mut wall = CafeWall::new(CafeWallConfig::default()).unwrap();
        assert!(wall.take_dirty());
        assert!(!wall.take_dirty());
        wall.toggle_offset();
        assert!(wall.is_dirty());
        assert!(wall.take_dirty());
    }

    #[test]
    fn layers_stack_tiles_mortar_guides() {
        let mut wall = CafeWall::new(CafeWallConfig::default()).unwrap();
        wall.toggle_guides();
        assert!(wall.tiles().iter().all(|o| o.z == 0.0));
        assert!(wall.mortar().iter().all(|o| o.z == 0.01));
        assert!(wall.guides().iter().all(|o| o.z == 0.02));
    }
}
