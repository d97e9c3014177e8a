//! Ebbinghaus: two identical orange discs, one ringed by large discs and
//! one by small ones. The first looks smaller.

use std::f32::consts::TAU;

use glam::Vec2;
use mirage_engine::paint::Color;

use crate::shape::SceneObject;
use crate::view::Illusion;
use crate::world::OrthoCamera;

pub const BACKGROUND: u32 = 0xffffff;

pub const HIDE_SURROUNDING: &str = "Hide Surrounding Circles";
pub const SHOW_SURROUNDING: &str = "Show Surrounding Circles";

const CAMERA_HALF_HEIGHT: f32 = 10.0;
const CENTRAL: u32 = 0xff6600;
const SURROUNDING: u32 = 0x333333;
const CENTRAL_RADIUS: f32 = 1.5;
const SURROUNDING_Z: f32 = -0.1;

/// One ring of surrounding discs.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Surround {
    pub center: Vec2,
    pub count: u32,
    pub distance: f32,
    pub radius: f32,
}

pub const LARGE: Surround = Surround { center: Vec2::new(-6.0, 0.0), count: 6, distance: 4.2, radius: 2.0 };
pub const SMALL: Surround = Surround { center: Vec2::new(6.0, 0.0), count: 12, distance: 2.5, radius: 0.6 };

impl Surround {
    /// Disc centres, evenly spaced starting on the +x axis.
    pub fn positions(&self) -> Vec<Vec2> {
        (0..self.count)
            .map(|i| {
                let angle = i as f32 / self.count as f32 * TAU;
                self.center + Vec2::new(angle.cos(), angle.sin()) * self.distance
            })
            .collect()
    }
}

/// Demo state.
pub struct Ebbinghaus {
    central: [SceneObject; 2],
    surrounding: Vec<SceneObject>,
    surrounding_visible: bool,
    dirty: bool,
}

impl Ebbinghaus {
    pub fn new() -> Self {
        let orange = Color::from_hex(CENTRAL);
        let central = [
            SceneObject::disc(LARGE.center, CENTRAL_RADIUS, orange, 0.0),
            SceneObject::disc(SMALL.center, CENTRAL_RADIUS, orange, 0.0),
        ];
        let grey = Color::from_hex(SURROUNDING);
        let surrounding = [LARGE, SMALL]
            .iter()
            .flat_map(|s| {
                s.positions()
                    .into_iter()
                    .map(move |p| SceneObject::disc(p, s.radius, grey, SURROUNDING_Z))
            })
            .collect();
        Self { central, surrounding, surrounding_visible: true, dirty: true }
    }

    pub fn surrounding(&self) -> &[SceneObject] {
        &self.surrounding
    }

    pub fn surrounding_visible(&self) -> bool {
        self.surrounding_visible
    }

    /// Returns the new visibility.
    pub fn toggle_surrounding(&mut self) -> bool {
        self.surrounding_visible = !self.surrounding_visible;
        for disc in &mut self.surrounding {
            disc.visible = self.surrounding_visible;
        }
        log::debug!(
            "ebbinghaus: surrounding circles {}",
            if self.surrounding_visible { "shown" } else { "hidden" }
        );
        self.dirty = true;
        self.surrounding_visible
    }

    pub fn surrounding_label(&self) -> &'static str {
        if self.surrounding_visible { HIDE_SURROUNDING } else { SHOW_SURROUNDING }
    }
}

impl Default for Ebbinghaus {
    fn default() -> Self {
        Self::new()
    }
}

impl Illusion for Ebbinghaus {
    fn camera(&self) -> OrthoCamera {
        OrthoCamera::new(CAMERA_HALF_HEIGHT)
    }

    fn objects(&self) -> Vec<&SceneObject> {
        self.surrounding.iter().chain(&self.central).collect()
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;

    fn discs(e: &Ebbinghaus, radius: f32) -> Vec<Vec2> {
        e.surrounding()
            .iter()
            .filter_map(|o| match o.kind {
                ShapeKind::Disc { center, radius: r, .. } if r == radius => Some(center),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn six_large_and_twelve_small_at_their_distances() {
        let e = Ebbinghaus::new();
        let large = discs(&e, 2.0);
        let small = discs(&e, 0.6);
        assert_eq!(large.len(), 6);
        assert_eq!(small.len(), 12);
        assert!(large.iter().all(|p| (p.distance(Vec2::new(-6.0, 0.0)) - 4.2).abs() < 1e-4));
        assert!(small.iter().all(|p| (p.distance(Vec2::new(6.0, 0.0)) - 2.5).abs() < 1e-4));
        assert!(e.surrounding().iter().all(|o| o.z == -0.1));
    }

    #[test]
    fn first_disc_of_each_ring_sits_on_the_x_axis() {
        let p = LARGE.positions()[0];
        assert!((p - Vec2::new(-1.8, 0.0)).length() < 1e-5);
    }

    #[test]
    fn toggle_hides_and_restores_surrounding_only() {
        let mut e = Ebbinghaus::new();
        assert_eq!(e.surrounding_label(), HIDE_SURROUNDING);
        assert!(!e.toggle_surrounding());
        assert!(e.surrounding().iter().all(|o| !o.visible));
        assert_eq!(e.surrounding_label(), SHOW_SURROUNDING);
        assert_eq!(e.objects().iter().filter(|o| o.visible).count(), 2);

        assert!(e.toggle_surrounding());
        assert!(e.surrounding().iter().all(|o| o.visible));
        assert_eq!(e.surrounding().len(), 18);
    }
}
