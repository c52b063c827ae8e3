// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behavior of a scene driven like a host would drive it.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use stipple::{
    DeltaMode, Modifiers, Occlusion, PointId, PointInput, Scene, SceneCallbacks, SceneConfig,
    Transform, ValidationError,
};
use stipple_timing::FrameBudgetConfig;
use tracing_test::traced_test;

type Log = Rc<RefCell<Vec<String>>>;

fn recording_callbacks(log: &Log) -> SceneCallbacks {
    let hover = Rc::clone(log);
    let click = Rc::clone(log);
    let background = Rc::clone(log);
    let zoom_start = Rc::clone(log);
    let zoom_end = Rc::clone(log);
    let settled = Rc::clone(log);
    SceneCallbacks::default()
        .on_hover(move |p| {
            let entry = p.map_or_else(|| "hover none".to_owned(), |p| format!("hover {}", p.id));
            hover.borrow_mut().push(entry);
        })
        .on_click(move |p| click.borrow_mut().push(format!("click {}", p.id)))
        .on_background_click(move || background.borrow_mut().push("background".to_owned()))
        .on_zoom_start(move || zoom_start.borrow_mut().push("zoom start".to_owned()))
        .on_zoom_end(move || zoom_end.borrow_mut().push("zoom end".to_owned()))
        .on_decollision_complete(move |s| settled.borrow_mut().push(format!("settled {}", s.len())))
}

fn scene_with(config: SceneConfig, log: &Log) -> Scene {
    let mut scene = Scene::new(config).with_callbacks(recording_callbacks(log));
    scene.attach_renderer(|_: Transform| {});
    scene
}

fn settle(scene: &mut Scene, mut now: u64) -> u64 {
    for _ in 0..2_000 {
        now += 16;
        scene.frame(now);
        if scene.is_settled() && !scene.camera().is_interacting() {
            break;
        }
    }
    now
}

fn canvas_of(scene: &Scene, x: f64, y: f64) -> Point {
    scene.screen_transform().apply(Point::new(x, y))
}

#[test]
fn fit_centers_content_in_unoccluded_region() {
    let log = Log::default();
    let config = SceneConfig {
        occlusion: Occlusion {
            left: 250.0,
            ..Occlusion::NONE
        },
        margin_fraction: 0.1,
        default_radius: 0.0,
        decollide: false,
        ..SceneConfig::default()
    };
    let mut scene = scene_with(config, &log);
    scene.set_points(
        [
            PointInput::new(1_i64, 0.0, 0.0),
            PointInput::new(2_i64, 100.0, 50.0),
        ],
        0,
    );
    // Content arrives before the canvas is laid out; the fit waits for it.
    assert_eq!(scene.transform(), Transform::IDENTITY);
    scene.resize(Size::new(1000.0, 500.0), 0);

    let visible = scene.camera().viewport().visible_canvas_rect();
    assert!((visible.width() / visible.height() - 750.0 / 500.0).abs() < 1e-9);
    let centroid = canvas_of(&scene, 50.0, 25.0);
    assert!((centroid.x - 625.0).abs() < 1e-6, "{centroid:?}");
    assert!((centroid.y - 250.0).abs() < 1e-6, "{centroid:?}");
    for (x, y) in [(0.0, 0.0), (100.0, 50.0)] {
        assert!(visible.contains(canvas_of(&scene, x, y)));
    }
    assert_eq!(scene.visible_count(), 2);
}

#[test]
fn resize_is_debounced_and_refits() {
    let log = Log::default();
    let config = SceneConfig {
        default_radius: 0.0,
        decollide: false,
        ..SceneConfig::default()
    };
    let mut scene = scene_with(config, &log);
    scene.resize(Size::new(1000.0, 500.0), 0);
    scene.set_points(
        [
            PointInput::new(1_i64, 0.0, 0.0),
            PointInput::new(2_i64, 100.0, 50.0),
        ],
        0,
    );

    scene.resize(Size::new(800.0, 400.0), 1_000);
    scene.resize(Size::new(600.0, 600.0), 1_050);
    scene.frame(1_100);
    assert_eq!(scene.camera().viewport().canvas_size(), Size::new(1000.0, 500.0));
    scene.frame(1_200);
    assert_eq!(scene.camera().viewport().canvas_size(), Size::new(600.0, 600.0));

    let centroid = canvas_of(&scene, 50.0, 25.0);
    assert!((centroid.x - 300.0).abs() < 1e-6, "{centroid:?}");
    assert!((centroid.y - 300.0).abs() < 1e-6, "{centroid:?}");
}

#[test]
fn hover_click_and_background_click() {
    let log = Log::default();
    let config = SceneConfig {
        decollide: false,
        default_radius: 5.0,
        ..SceneConfig::default()
    };
    let mut scene = scene_with(config, &log);
    scene.resize(Size::new(400.0, 400.0), 0);
    scene.set_points(
        [
            PointInput::new("a", 0.0, 0.0),
            PointInput::new("b", 100.0, 100.0),
        ],
        0,
    );
    let now = settle(&mut scene, 0);
    log.borrow_mut().clear();

    let a = canvas_of(&scene, 0.0, 0.0);
    scene.pointer_move(a, now);
    scene.pointer_move(a + Vec2::new(1.0, 0.0), now + 5);
    scene.pointer_down(a, now + 10);
    scene.pointer_up(a + Vec2::new(2.0, 1.0), now + 100);
    assert_eq!(scene.hovered().map(|p| p.id.clone()), Some(PointId::from("a")));

    let empty = canvas_of(&scene, 50.0, 50.0);
    scene.pointer_move(empty, now + 200);
    scene.pointer_down(empty, now + 210);
    scene.pointer_up(empty, now + 260);
    scene.frame(now + 300);

    assert_eq!(
        *log.borrow(),
        [
            "hover a",
            "click a",
            "hover none",
            "background",
            "zoom start",
            "zoom end",
        ]
    );
}

#[test]
fn hover_is_suppressed_while_panning_with_the_wheel() {
    let log = Log::default();
    let config = SceneConfig {
        decollide: false,
        default_radius: 5.0,
        ..SceneConfig::default()
    };
    let mut scene = scene_with(config, &log);
    scene.resize(Size::new(400.0, 400.0), 0);
    scene.set_points([PointInput::new(7_i64, 0.0, 0.0)], 0);
    let now = settle(&mut scene, 0);
    log.borrow_mut().clear();

    let before = scene.transform();
    scene.wheel(
        Point::new(200.0, 200.0),
        Vec2::new(0.0, 30.0),
        DeltaMode::Pixel,
        Modifiers::empty(),
        now,
    );
    scene.frame(now + 16);
    assert_ne!(scene.transform(), before);
    assert!(scene.camera().is_interacting());

    let dot = canvas_of(&scene, 0.0, 0.0);
    scene.pointer_move(dot, now + 20);
    assert!(scene.hovered().is_none());

    // The wheel goes quiet; the interaction ends and hover resumes.
    scene.frame(now + 400);
    scene.pointer_move(dot, now + 410);
    assert_eq!(*log.borrow(), ["zoom start", "zoom end", "hover 7"]);
}

#[test]
fn decollision_separates_overlaps_and_reports_once() {
    let log = Log::default();
    let mut scene = scene_with(SceneConfig::default(), &log);
    scene.resize(Size::new(600.0, 600.0), 0);
    let input = [
        PointInput::new(1_i64, 0.0, 0.0).with_radius(5.0),
        PointInput::new(2_i64, 100.0, 100.0).with_radius(5.0),
        PointInput::new(3_i64, 7.0, 0.0).with_radius(5.0),
    ];
    scene.set_points(input.clone(), 0);
    let now = settle(&mut scene, 0);

    let layout = scene.layout();
    let p1 = layout.get(&PointId::Int(1)).unwrap();
    let p3 = layout.get(&PointId::Int(3)).unwrap();
    assert!((p1 - p3).hypot() >= 10.0 - scene.config().relaxation.tolerance);
    assert_eq!(layout.get(&PointId::Int(2)), Some(Point::new(100.0, 100.0)));
    assert_eq!(scene.stable_layout(), Some(layout));
    let settled = |log: &Log| log.borrow().iter().filter(|e| e.starts_with("settled")).count();
    assert_eq!(settled(&log), 1);

    // Moving only the isolated point reruns the layout; it settles with a
    // change, so the owner hears about it once more.
    let mut moved = input.to_vec();
    moved[1] = PointInput::new(2_i64, 200.0, 100.0).with_radius(5.0);
    scene.set_points(moved, now);
    settle(&mut scene, now);
    assert_eq!(settled(&log), 2);
    assert_eq!(
        scene.layout().get(&PointId::Int(2)),
        Some(Point::new(200.0, 100.0))
    );
}

#[test]
fn unchanged_layout_is_not_reported_again() {
    let log = Log::default();
    let mut scene = scene_with(SceneConfig::default(), &log);
    let apart = [
        PointInput::new(1_i64, 0.0, 0.0).with_radius(2.0),
        PointInput::new(2_i64, 50.0, 0.0).with_radius(2.0),
    ];
    scene.set_points(apart.clone(), 0);
    let now = settle(&mut scene, 0);
    scene.set_points(apart, now);
    settle(&mut scene, now);
    let settled = log.borrow().iter().filter(|e| e.starts_with("settled")).count();
    assert_eq!(settled, 1);
}

#[test]
fn cancelled_layout_reverts_to_data_positions() {
    let log = Log::default();
    let config = SceneConfig {
        frame_budget: FrameBudgetConfig {
            max_iterations_per_frame: 1,
            ..FrameBudgetConfig::default()
        },
        ..SceneConfig::default()
    };
    let mut scene = scene_with(config, &log);
    scene.set_points(
        [
            PointInput::new(1_i64, 0.0, 0.0).with_radius(10.0),
            PointInput::new(2_i64, 1.0, 0.0).with_radius(10.0),
        ],
        0,
    );
    scene.frame(16);
    assert!(!scene.is_settled());
    assert!(scene.cancel_layout());
    scene.frame(32);
    assert!(scene.is_settled());
    assert!(scene.stable_layout().is_none());
    assert_eq!(scene.layout().get(&PointId::Int(2)), Some(Point::new(1.0, 0.0)));
}

#[test]
fn wheel_pan_can_move_everything_out_of_view() {
    let log = Log::default();
    let config = SceneConfig {
        decollide: false,
        ..SceneConfig::default()
    };
    let mut scene = scene_with(config, &log);
    scene.resize(Size::new(400.0, 300.0), 0);
    scene.set_points(
        (0..10).map(|i| PointInput::new(i64::from(i), f64::from(i) * 10.0, 0.0)),
        0,
    );
    let now = settle(&mut scene, 0);
    assert_eq!(scene.visible_count(), 10);

    scene.wheel(
        Point::new(200.0, 150.0),
        Vec2::new(5_000.0, 0.0),
        DeltaMode::Pixel,
        Modifiers::empty(),
        now,
    );
    scene.frame(now + 16);
    assert_eq!(scene.visible_count(), 0);
}

#[test]
#[traced_test]
fn json_input_with_bad_records() {
    let inputs: Vec<PointInput> = serde_json::from_str(
        r#"[
            { "id": 1, "x": 0.0, "y": 0.0 },
            { "id": "two", "x": 5.0 },
            { "id": "three", "x": 10.0, "y": 4.0, "radius": 2.5, "color": "teal" }
        ]"#,
    )
    .unwrap();
    let mut scene = Scene::default();
    let errors = scene.set_points(inputs, 0);

    assert_eq!(errors.len(), 1);
    assert!(matches!(
        &errors[0],
        ValidationError::MissingCoordinate { id: PointId::Str(id), .. } if id == "two"
    ));
    assert_eq!(scene.points().len(), 2);
    let three = scene.point(&PointId::from("three")).unwrap();
    assert_eq!(three.radius, 2.5);
    assert_eq!(three.color.as_deref(), Some("teal"));
    assert!(logs_contain("point dropped"));
    assert!(logs_contain("points replaced"));
}

#[test]
fn config_from_partial_json() {
    let config: SceneConfig = serde_json::from_str(
        r#"{
            "occlusion": { "left": 250, "top": 40 },
            "camera": { "zoom_extent": { "min": 0.25, "max": 8.0 } },
            "relaxation": { "tolerance": 0.05 },
            "decollide": false
        }"#,
    )
    .unwrap();
    let defaults = SceneConfig::default();
    assert_eq!(config.occlusion.left, 250.0);
    assert_eq!(config.occlusion.right, 0.0);
    assert_eq!(config.camera.zoom_extent.max(), 8.0);
    assert_eq!(config.camera.wheel_end_delay_ms, defaults.camera.wheel_end_delay_ms);
    assert_eq!(config.relaxation.tolerance, 0.05);
    assert_eq!(config.relaxation.max_iterations, defaults.relaxation.max_iterations);
    assert!(!config.decollide);
    assert_eq!(config.margin_fraction, defaults.margin_fraction);

    let round_trip: SceneConfig =
        serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(round_trip.occlusion, config.occlusion);
    assert_eq!(round_trip.relaxation, config.relaxation);
}
