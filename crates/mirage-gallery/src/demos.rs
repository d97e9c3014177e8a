//! One window builder per demo.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use mirage_illusions::ames_room::{self, AmesRoom, RoomView};
use mirage_illusions::cafe_wall::{self, CafeWall};
use mirage_illusions::ebbinghaus::{self, Ebbinghaus};
use mirage_illusions::fake_cafe_wall::{self, FakeCafeWall};
use mirage_illusions::poggendorff::{self, Poggendorff};
use mirage_illusions::squint::{self, Squint};
use mirage_illusions::view::{Illusion, IllusionView};
use mirage_ui::prelude::*;

use crate::cli::{Demo, GalleryArgs};

const LABEL_SIZE: f32 = 15.0;
const MARGIN: f32 = 16.0;

pub(crate) fn run(args: &GalleryArgs, font: Option<Vec<u8>>) -> Result<()> {
    log::info!("opening {}", args.demo.title());
    match args.demo {
        Demo::CafeWall => cafe_wall(args, font),
        Demo::FakeCafeWall => fake_cafe_wall(args, font),
        Demo::Squint => squint(args, font),
        Demo::Poggendorff => poggendorff(args, font),
        Demo::Ebbinghaus => ebbinghaus(args, font),
        Demo::AmesRoom => ames_room(args, font),
    }
}

fn window(args: &GalleryArgs, background: u32, mode: RedrawMode, font: Option<Vec<u8>>) -> Application {
    let app = Application::new()
        .title(args.demo.title())
        .size(args.width, args.height)
        .background(Color::from_hex(background))
        .redraw_mode(mode);
    match font {
        Some(bytes) => app.font("body", bytes),
        None => app,
    }
}

/// A button toggling one setting of the demo in `state`.
///
/// `label` reads the caption from the demo; `captions` lists both so the
/// button keeps its width.
fn toggle<T: 'static>(
    state: &Rc<RefCell<T>>,
    font: Option<FontId>,
    captions: [&'static str; 2],
    label: fn(&T) -> &'static str,
    flip: fn(&mut T),
) -> Element {
    let (reader, writer) = (state.clone(), state.clone());
    ToggleButton::new(font, LABEL_SIZE, move || label(&reader.borrow()))
        .reserve(captions)
        .on_toggle(move || flip(&mut writer.borrow_mut()))
        .into()
}

/// The scene filling the window with a row of controls in the top-left.
fn with_controls<T: Illusion>(
    state: Rc<RefCell<T>>,
    redraw: RedrawHandle,
    controls: Vec<Element>,
) -> Element {
    let row = controls.into_iter().fold(Row::new().spacing(8.0), |row, c| row.child(c));
    Stack::new()
        .item(StackItem::fill(IllusionView::new(state).redraw_handle(redraw)))
        .item(StackItem::new(row).left(AnchorVal::Px(MARGIN)).top(AnchorVal::Px(MARGIN)))
        .into()
}

fn cafe_wall(args: &GalleryArgs, font: Option<Vec<u8>>) -> Result<()> {
    let state = Rc::new(RefCell::new(CafeWall::new(args.wall_config())?));
    let app = window(args, cafe_wall::BACKGROUND, RedrawMode::OnDemand, font);
    let redraw = app.redraw_handle();

    app.run_widget(move |fonts| {
        let font = fonts.primary();
        let guides = toggle(
            &state,
            font,
            [cafe_wall::SHOW_GUIDES, cafe_wall::HIDE_GUIDES],
            CafeWall::guides_label,
            |w| {
                w.toggle_guides();
            },
        );
        let offset = toggle(
            &state,
            font,
            [cafe_wall::REMOVE_OFFSET, cafe_wall::ADD_OFFSET],
            CafeWall::offset_label,
            |w| {
                w.toggle_offset();
            },
        );
        with_controls(state, redraw, vec![guides, offset])
    })
}

fn fake_cafe_wall(args: &GalleryArgs, font: Option<Vec<u8>>) -> Result<()> {
    let state = Rc::new(RefCell::new(FakeCafeWall::new(args.fake_wall_config())?));
    let app = window(args, fake_cafe_wall::BACKGROUND, RedrawMode::OnDemand, font);
    let redraw = app.redraw_handle();

    app.run_widget(move |fonts| {
        let font = fonts.primary();
        let (cfg, slant_deg) = {
            let wall = state.borrow();
            (wall.config().clone(), wall.slant_angle())
        };
        let guides = toggle(
            &state,
            font,
            [fake_cafe_wall::SHOW_GUIDE, fake_cafe_wall::HIDE_GUIDE],
            FakeCafeWall::guides_label,
            |w| {
                w.toggle_guides();
            },
        );
        let pattern = toggle(
            &state,
            font,
            [fake_cafe_wall::REMOVE_PATTERN, fake_cafe_wall::SHOW_PATTERN],
            FakeCafeWall::pattern_label,
            |w| {
                w.toggle_pattern();
            },
        );
        let slant = {
            let state = state.clone();
            Slider::new(0.0, cfg.slant_max_deg)
                .step(cfg.slant_step_deg)
                .value(slant_deg)
                .value_label(font, LABEL_SIZE, fake_cafe_wall::SLANT_SUFFIX)
                .on_change(move |deg| {
                    state.borrow_mut().set_slant_angle(deg);
                })
        };
        let slant_caption = Text::new("Slant", font, LABEL_SIZE, Color::WHITE);
        with_controls(
            state,
            redraw,
            vec![guides, pattern, slant_caption.into(), slant.into()],
        )
    })
}

fn squint(args: &GalleryArgs, font: Option<Vec<u8>>) -> Result<()> {
    let state = Rc::new(RefCell::new(Squint::new()));
    let app = window(args, squint::BACKGROUND, RedrawMode::Continuous, font);
    let redraw = app.redraw_handle();
    app.run_widget(move |_| with_controls(state, redraw, Vec::new()))
}

fn poggendorff(args: &GalleryArgs, font: Option<Vec<u8>>) -> Result<()> {
    let state = Rc::new(RefCell::new(
        Poggendorff::new().on_quiz_passed(|token| log::debug!("quiz observer notified: {token}")),
    ));
    let app = window(args, poggendorff::BACKGROUND, RedrawMode::OnDemand, font);
    let redraw = app.redraw_handle();

    app.run_widget(move |fonts| {
        let reveal = toggle(
            &state,
            fonts.primary(),
            [poggendorff::REVEAL, poggendorff::HIDE],
            Poggendorff::reveal_label,
            |p| {
                p.toggle_reveal();
            },
        );
        with_controls(state, redraw, vec![reveal])
    })
}

fn ebbinghaus(args: &GalleryArgs, font: Option<Vec<u8>>) -> Result<()> {
    let state = Rc::new(RefCell::new(Ebbinghaus::new()));
    let app = window(args, ebbinghaus::BACKGROUND, RedrawMode::OnDemand, font);
    let redraw = app.redraw_handle();

    app.run_widget(move |fonts| {
        let surrounding = toggle(
            &state,
            fonts.primary(),
            [ebbinghaus::HIDE_SURROUNDING, ebbinghaus::SHOW_SURROUNDING],
            Ebbinghaus::surrounding_label,
            |e| {
                e.toggle_surrounding();
            },
        );
        with_controls(state, redraw, vec![surrounding])
    })
}

fn ames_room(args: &GalleryArgs, font: Option<Vec<u8>>) -> Result<()> {
    let state = Rc::new(RefCell::new(AmesRoom::new((args.width / args.height) as f32)));
    let app = window(args, ames_room::SKY, RedrawMode::Continuous, font);
    log::info!("drag to look around, WASD to move, R to reset");

    app.run_widget(move |fonts| {
        let font = fonts.primary();
        let reset = {
            let state = state.clone();
            Button::new(Text::new("Reset View", font, LABEL_SIZE, Color::WHITE)).on_click(move || {
                state.borrow_mut().reset();
            })
        };
        let help = Text::new("Drag to look · WASD to move · R to reset", font, LABEL_SIZE, Color::BLACK);
        let panel = Column::new().spacing(8.0).child(reset).child(help);
        Stack::new()
            .item(StackItem::fill(RoomView::new(state)))
            .item(StackItem::new(panel).left(AnchorVal::Px(MARGIN)).bottom(AnchorVal::Px(MARGIN)))
            .into()
    })
}
