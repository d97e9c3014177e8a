//! Ames room: a trapezoidal room that looks rectangular from one point.
//!
//! The far wall recedes to the left, so a sphere walking that way shrinks
//! while the room's texture, projected from the peephole, hides the
//! distortion. Leave the peephole (WASD, drag to look) to see the trick;
//! R puts the viewer back.

use std::cell::RefCell;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use mirage_engine::coords::{Rect, Vec2};
use mirage_engine::input::Key;
use mirage_engine::paint::Color;
use mirage_engine::scene::shapes::mesh::{
    Fog, Lighting, Material, Mesh, MeshCmd, MeshDraw, SurfacePattern,
};
use mirage_ui::prelude::{Constraints, EventResult, LayoutCtx, Painter, UiEvent, Widget};

pub const SKY: u32 = 0x87ceeb;

const FOV_Y_DEG: f32 = 35.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

const MOVE_SPEED: f32 = 5.0;
/// Sphere oscillation phase per second.
const TIME_SCALE: f32 = 0.5;
const LOOK_SENSITIVITY: f32 = 0.002;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.001;

const SPHERE_RADIUS: f32 = 0.5;
pub const FAR_POSITION: Vec3 = Vec3::new(-6.0, -4.5, -18.0);
pub const NEAR_POSITION: Vec3 = Vec3::new(2.5, -2.5, -10.0);

// ── room geometry ─────────────────────────────────────────────────────────

/// The eight distorted corners. The near face is a square; the far corners
/// sit at different depths so the back wall recedes to the left.
pub mod corner {
    use glam::Vec3;

    pub const NEAR_BOTTOM_LEFT: Vec3 = Vec3::new(-3.0, -3.0, -8.0);
    pub const NEAR_BOTTOM_RIGHT: Vec3 = Vec3::new(3.0, -3.0, -8.0);
    pub const NEAR_TOP_LEFT: Vec3 = Vec3::new(-3.0, 3.0, -8.0);
    pub const NEAR_TOP_RIGHT: Vec3 = Vec3::new(3.0, 3.0, -8.0);
    pub const FAR_BOTTOM_LEFT: Vec3 = Vec3::new(-8.0, -6.0, -20.0);
    pub const FAR_BOTTOM_RIGHT: Vec3 = Vec3::new(4.0, -4.0, -12.0);
    pub const FAR_TOP_LEFT: Vec3 = Vec3::new(-8.0, 6.0, -20.0);
    pub const FAR_TOP_RIGHT: Vec3 = Vec3::new(4.0, 4.0, -12.0);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Face {
    Floor,
    Ceiling,
    BackWall,
    LeftWall,
    RightWall,
}

impl Face {
    /// Order of the faces in [`room_vertices`].
    pub const ALL: [Face; 5] = [Face::Floor, Face::Ceiling, Face::BackWall, Face::LeftWall, Face::RightWall];

    fn material(self) -> Material {
        match self {
            Face::Floor => Material::plain(Color::WHITE).with_pattern(SurfacePattern::Wood, [4.0, 4.0]),
            Face::Ceiling => {
                Material::plain(tinted(0xe8dcc4, 0xfaf0e6)).with_pattern(SurfacePattern::Plaster, [1.0, 1.0])
            }
            Face::BackWall | Face::LeftWall | Face::RightWall => {
                Material::plain(tinted(0xe8dcc4, 0xe8dcc4)).with_pattern(SurfacePattern::Plaster, [1.0, 1.0])
            }
        }
    }
}

/// Plaster colour `texture` under a material tint, multiplied in linear space.
fn tinted(texture: u32, tint: u32) -> Color {
    let [r, g, b] = Color::from_hex(texture).to_linear_rgb();
    let [tr, tg, tb] = Color::from_hex(tint).to_linear_rgb();
    Color::from_straight(r * tr, g * tg, b * tb, 1.0)
}

/// Two triangles per face, faces in [`Face::ALL`] order, wound to face
/// into the room.
pub fn room_vertices() -> [Vec3; 30] {
    use corner::*;
    let (nbl, nbr, ntl, ntr) = (NEAR_BOTTOM_LEFT, NEAR_BOTTOM_RIGHT, NEAR_TOP_LEFT, NEAR_TOP_RIGHT);
    let (fbl, fbr, ftl, ftr) = (FAR_BOTTOM_LEFT, FAR_BOTTOM_RIGHT, FAR_TOP_LEFT, FAR_TOP_RIGHT);
    [
        nbl, fbr, nbr, nbl, fbl, fbr, // floor
        ntl, ftr, ntr, ntl, ftl, ftr, // ceiling
        fbl, ftr, fbr, fbl, ftl, ftr, // back wall
        nbl, ftl, fbl, nbl, ntl, ftl, // left wall
        nbr, ftr, fbr, nbr, ntr, ftr, // right wall
    ]
}

// ── peephole projection ───────────────────────────────────────────────────

/// Virtual camera at the origin looking down −Z. Only used to derive UVs:
/// every vertex gets the screen position it has from the peephole, so the
/// textures line up as if painted on a flat canvas.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PeepholeCamera {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PeepholeCamera {
    pub fn new(aspect: f32) -> Self {
        Self { fov_y: FOV_Y_DEG.to_radians(), aspect, near: NEAR, far: FAR }
    }

    /// Square frustum whose edges pass exactly through the near face.
    pub fn framing_near_face() -> Self {
        let half = corner::NEAR_TOP_RIGHT.y / -corner::NEAR_TOP_RIGHT.z;
        Self { fov_y: 2.0 * half.atan(), aspect: 1.0, near: NEAR, far: FAR }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Normalized device coordinates, after the perspective divide.
    pub fn project(&self, vertex: Vec3) -> Vec3 {
        self.projection().project_point3(vertex)
    }

    pub fn uv_for(&self, vertex: Vec3) -> [f32; 2] {
        let ndc = self.project(vertex);
        [(ndc.x + 1.0) / 2.0, (ndc.y + 1.0) / 2.0]
    }
}

pub fn room_uvs(vertices: &[Vec3], camera: &PeepholeCamera) -> Vec<[f32; 2]> {
    vertices.iter().map(|v| camera.uv_for(*v)).collect()
}

/// Red sphere position `t` radians into its oscillation.
pub fn sphere_position(t: f32) -> Vec3 {
    FAR_POSITION.lerp(NEAR_POSITION, (t.sin() + 1.0) / 2.0)
}

// ── viewer ────────────────────────────────────────────────────────────────

/// First-person camera the room is rendered from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewerCamera {
    pub position: Vec3,
    /// Radians about +Y; zero looks down −Z.
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for ViewerCamera {
    fn default() -> Self {
        Self { position: Vec3::ZERO, yaw: 0.0, pitch: 0.0 }
    }
}

impl ViewerCamera {
    /// Mouse-look from a pointer delta in logical pixels.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * LOOK_SENSITIVITY;
        self.pitch = (self.pitch - dy * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Horizontal view direction.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(-self.pitch)
            * Mat4::from_rotation_y(-self.yaw)
            * Mat4::from_translation(-self.position)
    }
}

// ── demo state ────────────────────────────────────────────────────────────

pub struct AmesRoom {
    peephole: PeepholeCamera,
    /// One mesh per face, [`Face::ALL`] order.
    faces: Vec<Arc<Mesh>>,
    sphere: Arc<Mesh>,
    viewer: ViewerCamera,
    time: f32,
}

impl AmesRoom {
    pub fn new(aspect: f32) -> Self {
        let peephole = PeepholeCamera::new(aspect);
        Self {
            faces: face_meshes(&peephole),
            peephole,
            sphere: Arc::new(Mesh::uv_sphere(SPHERE_RADIUS, 64, 64)),
            viewer: ViewerCamera::default(),
            time: 0.0,
        }
    }

    pub fn viewer(&self) -> &ViewerCamera {
        &self.viewer
    }

    pub fn peephole(&self) -> &PeepholeCamera {
        &self.peephole
    }

    pub fn red_sphere_position(&self) -> Vec3 {
        sphere_position(self.time)
    }

    /// Re-derives the UVs when the viewport aspect changes.
    pub fn set_aspect(&mut self, aspect: f32) {
        if !aspect.is_finite() || aspect <= 0.0 || (aspect - self.peephole.aspect).abs() < 1e-4 {
            return;
        }
        log::debug!("ames room: reprojecting UVs for aspect {aspect:.3}");
        self.peephole = PeepholeCamera::new(aspect);
        self.faces = face_meshes(&self.peephole);
    }

    pub fn look(&mut self, dx: f32, dy: f32) {
        self.viewer.look(dx, dy);
    }

    /// Moves the viewer for held WASD keys and animates the red sphere.
    pub fn advance(&mut self, dt: f32, keys_down: &[Key]) {
        let step = MOVE_SPEED * dt;
        for key in keys_down {
            match key {
                Key::W => self.viewer.move_forward(step),
                Key::S => self.viewer.move_forward(-step),
                Key::A => self.viewer.move_right(-step),
                Key::D => self.viewer.move_right(step),
                _ => {}
            }
        }
        self.time += dt * TIME_SCALE;
    }

    pub fn reset(&mut self) {
        log::info!("Illusion restored (viewer back at the peephole)");
        self.viewer.reset();
    }

    /// The lit room pass for `rect`.
    pub fn mesh_cmd(&self, rect: Rect) -> MeshCmd {
        let proj = Mat4::perspective_rh(FOV_Y_DEG.to_radians(), rect.aspect(), NEAR, FAR);

        let mut draws: Vec<MeshDraw> = Face::ALL
            .iter()
            .zip(&self.faces)
            .map(|(face, mesh)| MeshDraw { mesh: mesh.clone(), translation: Vec3::ZERO, material: face.material() })
            .collect();
        draws.push(MeshDraw {
            mesh: self.sphere.clone(),
            translation: self.red_sphere_position(),
            material: Material::plain(Color::from_hex(0xff3333)).with_emissive(Color::from_hex(0xff0000), 0.2),
        });
        draws.push(MeshDraw {
            mesh: self.sphere.clone(),
            translation: NEAR_POSITION,
            material: Material::plain(Color::from_hex(0x3333ff)).with_emissive(Color::from_hex(0x0000ff), 0.2),
        });

        MeshCmd {
            rect,
            view_proj: proj * self.viewer.view_matrix(),
            eye: self.viewer.position,
            lighting: lighting(),
            fog: Some(Fog { color: Color::from_hex(SKY), near: 10.0, far: 50.0 }),
            draws,
        }
    }
}

fn face_meshes(peephole: &PeepholeCamera) -> Vec<Arc<Mesh>> {
    let vertices = room_vertices();
    let uvs = room_uvs(&vertices, peephole);
    vertices
        .chunks_exact(6)
        .zip(uvs.chunks_exact(6))
        .map(|(v, uv)| Arc::new(Mesh::from_triangles(v, uv)))
        .collect()
}

fn lighting() -> Lighting {
    Lighting {
        ambient: 0.4,
        hemisphere_sky: Color::from_hex(0xffffbb),
        hemisphere_ground: Color::from_hex(0x080820),
        hemisphere_intensity: 0.6,
        // Fixed at the peephole, not at the moving viewer.
        point_position: Vec3::ZERO,
        point_intensity: 0.8,
        point_range: 50.0,
        directional_from: Vec3::new(5.0, 10.0, 5.0),
        directional_intensity: 0.5,
    }
}

// ── widget ────────────────────────────────────────────────────────────────

/// Renders the room and handles the viewer controls.
pub struct RoomView {
    state: Rc<RefCell<AmesRoom>>,
}

impl RoomView {
    pub fn new(state: Rc<RefCell<AmesRoom>>) -> Self {
        Self { state }
    }
}

impl Widget for RoomView {
    fn measure(&self, constraints: Constraints, _ctx: &LayoutCtx) -> Vec2 {
        let w = if constraints.max.x.is_finite() { constraints.max.x } else { 0.0 };
        let h = if constraints.max.y.is_finite() { constraints.max.y } else { 0.0 };
        constraints.constrain(Vec2::new(w, h))
    }

    fn paint(&self, painter: &mut Painter, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let mut state = self.state.borrow_mut();
        state.set_aspect(rect.aspect());
        painter.mesh(state.mesh_cmd(rect));
    }

    fn on_event(&mut self, event: &UiEvent, rect: Rect, _ctx: &LayoutCtx) -> EventResult {
        match event {
            UiEvent::Drag { start, delta, .. } if rect.contains(*start) => {
                self.state.borrow_mut().look(delta.x, delta.y);
                EventResult::Consumed
            }
            UiEvent::KeyPress { key: Key::R, .. } => {
                self.state.borrow_mut().reset();
                EventResult::Consumed
            }
            UiEvent::Frame { dt, keys_down, .. } => {
                self.state.borrow_mut().advance(*dt, keys_down);
                EventResult::Ignored
            }
            _ => EventResult::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn room_has_five_faces_of_two_triangles() {
        let v = room_vertices();
        assert_eq!(v.len(), 30);
        assert_eq!(&v[..3], &[corner::NEAR_BOTTOM_LEFT, corner::FAR_BOTTOM_RIGHT, corner::NEAR_BOTTOM_RIGHT]);
        // Right wall closes the list.
        assert_eq!(v[29], corner::FAR_TOP_RIGHT);
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn near_corners_are_symmetric_about_the_centre() {
        for aspect in [0.75, 1.0, 16.0 / 9.0, 2.4] {
            let cam = PeepholeCamera::new(aspect);
            let bl = cam.uv_for(corner::NEAR_BOTTOM_LEFT);
            let tr = cam.uv_for(corner::NEAR_TOP_RIGHT);
            let br = cam.uv_for(corner::NEAR_BOTTOM_RIGHT);
            let tl = cam.uv_for(corner::NEAR_TOP_LEFT);
            assert!(approx(bl[0] + tr[0], 1.0) && approx(bl[1] + tr[1], 1.0), "aspect {aspect}");
            assert!(approx(br[0] + tl[0], 1.0) && approx(br[1] + tl[1], 1.0), "aspect {aspect}");
            assert!(bl[0] < 0.5 && bl[1] < 0.5 && tr[0] > 0.5 && tr[1] > 0.5);
        }
    }

    #[test]
    fn framing_camera_maps_near_face_onto_corners() {
        let cam = PeepholeCamera::framing_near_face();
        let expect = [
            (corner::NEAR_BOTTOM_LEFT, [0.0, 0.0]),
            (corner::NEAR_BOTTOM_RIGHT, [1.0, 0.0]),
            (corner::NEAR_TOP_LEFT, [0.0, 1.0]),
            (corner::NEAR_TOP_RIGHT, [1.0, 1.0]),
        ];
        for (v, uv) in expect {
            let got = cam.uv_for(v);
            assert!(approx(got[0], uv[0]) && approx(got[1], uv[1]), "{v:?} -> {got:?}");
        }
    }

    #[test]
    fn reprojection_is_idempotent() {
        let cam = PeepholeCamera::new(16.0 / 9.0);
        let v = room_vertices();
        assert_eq!(room_uvs(&v, &cam), room_uvs(&v, &cam));
    }

    #[test]
    fn aspect_change_rebuilds_meshes_only_when_it_differs() {
        let mut room = AmesRoom::new(1.5);
        let before = room.faces[0].clone();
        room.set_aspect(1.5);
        assert!(Arc::ptr_eq(&before, &room.faces[0]));
        room.set_aspect(2.0);
        assert!(!Arc::ptr_eq(&before, &room.faces[0]));
        assert_eq!(room.peephole().aspect, 2.0);
        room.set_aspect(0.0);
        assert_eq!(room.peephole().aspect, 2.0);
    }

    // ── sphere ────────────────────────────────────────────────────────────

    #[test]
    fn sphere_oscillates_between_far_and_near() {
        let far = sphere_position(-FRAC_PI_2);
        let near = sphere_position(FRAC_PI_2);
        assert!(far.distance(FAR_POSITION) < 1e-5);
        assert!(near.distance(NEAR_POSITION) < 1e-5);
        assert!(sphere_position(0.0).distance((FAR_POSITION + NEAR_POSITION) / 2.0) < 1e-5);
    }

    #[test]
    fn time_advances_at_half_speed() {
        let mut room = AmesRoom::new(1.0);
        room.advance(1.0, &[]);
        assert!(room.red_sphere_position().distance(sphere_position(0.5)) < 1e-6);
    }

    // ── viewer ────────────────────────────────────────────────────────────

    #[test]
    fn forward_at_zero_yaw_decreases_z() {
        let mut v = ViewerCamera::default();
        v.move_forward(1.0);
        assert!(v.position.z < 0.0);
        assert!(approx(v.position.x, 0.0) && approx(v.position.y, 0.0));
    }

    #[test]
    fn wasd_moves_five_units_per_second() {
        let mut room = AmesRoom::new(1.0);
        room.advance(0.5, &[Key::W, Key::D]);
        let p = room.viewer().position;
        assert!(approx(p.z, -2.5) && approx(p.x, 2.5));
    }

    #[test]
    fn motion_stays_horizontal_when_looking_down() {
        let mut v = ViewerCamera::default();
        v.look(0.0, 400.0);
        v.move_forward(2.0);
        assert_eq!(v.position.y, 0.0);
        assert!(approx(v.position.z, -2.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut v = ViewerCamera::default();
        v.look(0.0, -1.0e6);
        assert!(v.pitch <= FRAC_PI_2 && v.pitch > 1.5);
    }

    #[test]
    fn drag_right_turns_right() {
        let mut v = ViewerCamera::default();
        v.look(100.0, 0.0);
        assert!(v.forward().x > 0.0);
    }

    #[test]
    fn reset_restores_the_origin() {
        let mut room = AmesRoom::new(1.0);
        room.look(120.0, -40.0);
        room.advance(1.0, &[Key::S, Key::A]);
        room.reset();
        assert_eq!(*room.viewer(), ViewerCamera::default());
        assert_eq!(room.viewer().view_matrix(), Mat4::IDENTITY);
    }

    // ── render pass ───────────────────────────────────────────────────────

    #[test]
    fn pass_draws_room_and_both_spheres() {
        let room = AmesRoom::new(1.0);
        let cmd = room.mesh_cmd(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(cmd.draws.len(), 7);
        assert_eq!(cmd.draws[5].translation, room.red_sphere_position());
        assert_eq!(cmd.draws[6].translation, NEAR_POSITION);
        assert_eq!(cmd.draws[0].material.pattern, SurfacePattern::Wood);
        assert_eq!(cmd.fog.map(|f| (f.near, f.far)), Some((10.0, 50.0)));
    }

    #[test]
    fn clip_w_is_view_depth_for_fog() {
        let mut room = AmesRoom::new(1.0);
        room.look(200.0, 0.0);
        room.advance(0.4, &[Key::W]);
        let cmd = room.mesh_cmd(Rect::new(0.0, 0.0, 800.0, 600.0));
        let v = room.viewer();
        let ahead = v.position + v.forward() * 20.0;
        let aside = ahead + v.right() * 8.0;
        let w = |p: Vec3| (cmd.view_proj * p.extend(1.0)).w;
        // Off-axis points at the same depth fog the same.
        assert!((w(ahead) - 20.0).abs() < 1e-3);
        assert!((w(aside) - 20.0).abs() < 1e-3);
    }
}
