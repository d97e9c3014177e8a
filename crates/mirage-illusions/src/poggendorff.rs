//! Poggendorff: a diagonal line interrupted by a grey bar seems to resume
//! at the wrong height. Revealing fades the bar and draws the true
//! continuation.

use glam::Vec2;
use mirage_engine::paint::Color;

use crate::shape::{Dash, SceneObject, ShapeKind};
use crate::view::Illusion;
use crate::world::OrthoCamera;

pub const BACKGROUND: u32 = 0xffffff;

pub const REVEAL: &str = "Reveal Illusion";
pub const HIDE: &str = "Hide Illusion";

/// Token sent to the quiz observer when the illusion is revealed.
pub const QUIZ_TOKEN: &str = "walkingFeet";

const CAMERA_HALF_HEIGHT: f32 = 15.0;
const LINE_WIDTH_PX: f32 = 5.0;
const CONNECTOR_WIDTH_PX: f32 = 2.0;
const BAR_OPACITY: f32 = 1.0;
const BAR_REVEALED_OPACITY: f32 = 0.2;

fn line(from: Vec2, to: Vec2, rgb: u32) -> SceneObject {
    SceneObject::new(
        ShapeKind::Line { from, to, width_px: LINE_WIDTH_PX, color: Color::from_hex(rgb), dash: None },
        0.0,
    )
}

/// Demo state.
pub struct Poggendorff {
    bar: SceneObject,
    lines: [SceneObject; 3],
    connector: SceneObject,
    revealed: bool,
    on_quiz_passed: Option<Box<dyn FnMut(&str)>>,
    dirty: bool,
}

impl Poggendorff {
    pub fn new() -> Self {
        let bar = SceneObject::rect(Vec2::ZERO, Vec2::new(4.0, 30.0), Color::from_hex(0x808080), 0.1);
        let lines = [
            line(Vec2::new(-8.0, 11.0), Vec2::new(-2.0, 2.0), 0x000000),
            // The true continuation of the black line.
            line(Vec2::new(2.0, -4.0), Vec2::new(8.0, -13.0), 0xcc0000),
            line(Vec2::new(2.0, -2.5), Vec2::new(8.0, -11.5), 0x0000ff),
        ];
        let connector = SceneObject::new(
            ShapeKind::Line {
                from: Vec2::new(-2.0, 2.0),
                to: Vec2::new(2.0, -4.0),
                width_px: CONNECTOR_WIDTH_PX,
                color: Color::from_hex(0x555555),
                dash: Some(Dash { dash: 0.5, gap: 0.25 }),
            },
            0.05,
        )
        .hidden();
        Self { bar, lines, connector, revealed: false, on_quiz_passed: None, dirty: true }
    }

    /// Called with [`QUIZ_TOKEN`] every time the illusion is revealed.
    pub fn on_quiz_passed(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_quiz_passed = Some(Box::new(f));
        self
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn bar_opacity(&self) -> f32 {
        self.bar.opacity
    }

    pub fn connector_visible(&self) -> bool {
        self.connector.visible
    }

    /// Returns whether the illusion is now revealed.
    pub fn toggle_reveal(&mut self) -> bool {
        self.revealed = !self.revealed;
        self.bar.opacity = if self.revealed { BAR_REVEALED_OPACITY } else { BAR_OPACITY };
        self.connector.visible = self.revealed;
        self.dirty = true;

        if self.revealed {
            log::info!("poggendorff revealed, quiz passed: {QUIZ_TOKEN}");
            if let Some(f) = &mut self.on_quiz_passed {
                f(QUIZ_TOKEN);
            }
        } else {
            log::debug!("poggendorff: illusion restored");
        }
        self.revealed
    }

    pub fn reveal_label(&self) -> &'static str {
        if self.revealed { HIDE } else { REVEAL }
    }
}

impl Default for Poggendorff {
    fn default() -> Self {
        Self::new()
    }
}

impl Illusion for Poggendorff {
    fn camera(&self) -> OrthoCamera {
        OrthoCamera::new(CAMERA_HALF_HEIGHT)
    }

    fn objects(&self) -> Vec<&SceneObject> {
        let mut objects: Vec<&SceneObject> = self.lines.iter().collect();
        objects.push(&self.connector);
        objects.push(&self.bar);
        objects
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::shape::paint_order;

    #[test]
    fn reveal_fades_bar_and_shows_connector() {
        let mut p = Poggendorff::new();
        assert_eq!(p.bar_opacity(), 1.0);
        assert!(!p.connector_visible());
        assert_eq!(p.reveal_label(), REVEAL);

        assert!(p.toggle_reveal());
        assert_eq!(p.bar_opacity(), 0.2);
        assert!(p.connector_visible());
        assert_eq!(p.reveal_label(), HIDE);
    }

    #[test]
    fn toggling_twice_restores_the_illusion() {
        let mut p = Poggendorff::new();
        p.toggle_reveal();
        p.toggle_reveal();
        assert!(!p.is_revealed());
        assert_eq!(p.bar_opacity(), 1.0);
        assert!(!p.connector_visible());
    }

    #[test]
    fn quiz_token_is_sent_only_on_reveal() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut p = Poggendorff::new().on_quiz_passed(move |t| sink.borrow_mut().push(t.to_owned()));

        p.toggle_reveal();
        p.toggle_reveal();
        p.toggle_reveal();
        assert_eq!(*seen.borrow(), vec!["walkingFeet".to_owned(), "walkingFeet".to_owned()]);
    }

    #[test]
    fn bar_paints_over_lines_and_connector() {
        let mut p = Poggendorff::new();
        p.toggle_reveal();
        let objects = p.objects();
        let order = paint_order(objects.iter().copied());
        assert_eq!(order.len(), 5);
        assert_eq!(order.last().map(|o| o.z), Some(0.1));
        assert_eq!(order[3].z, 0.05);
    }
}
