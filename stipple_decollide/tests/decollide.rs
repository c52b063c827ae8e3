// Copyright 2025 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end relaxation behavior.

use kurbo::Point;
use proptest::prelude::*;
use stipple_decollide::{FramePolicy, LayoutResolver, LayoutRun, LayoutUpdate, RelaxationConfig};
use tracing_test::traced_test;

fn three_points() -> Vec<(u32, Point)> {
    vec![
        (1, Point::new(0.0, 0.0)),
        (2, Point::new(100.0, 100.0)),
        (3, Point::new(7.0, 0.0)),
    ]
}

#[test]
fn overlapping_pair_separates_and_isolated_point_stays() {
    let config = RelaxationConfig::default();
    let out = LayoutRun::new(&three_points(), |_| 5.0, config)
        .settle()
        .unwrap();

    let p1 = out.get(&1).unwrap();
    let p3 = out.get(&3).unwrap();
    assert!((p1 - p3).hypot() >= 10.0 - config.tolerance);
    assert_eq!(out.get(&2), Some(Point::new(100.0, 100.0)));
}

#[test]
fn settled_layout_is_a_fixed_point() {
    let config = RelaxationConfig::default();
    let first = LayoutRun::new(&three_points(), |_| 5.0, config)
        .settle()
        .unwrap();

    // Feed the converged layout back in as data.
    let again: Vec<(u32, Point)> = first.iter().map(|(id, p)| (*id, p)).collect();
    let second = LayoutRun::new(&again, |_| 5.0, config).settle().unwrap();
    for (id, p) in first.iter() {
        let q = second.get(id).unwrap();
        assert!((p - q).hypot() <= config.tolerance, "dot {id} moved from {p:?} to {q:?}");
    }
}

#[test]
fn runs_are_restartable_per_call() {
    let resolver = LayoutResolver::<u32>::new(RelaxationConfig::default());
    let a: Vec<_> = resolver.run(&three_points(), |_| 5.0).collect();
    let b: Vec<_> = resolver.run(&three_points(), |_| 5.0).collect();
    assert_eq!(a.len(), b.len());
    assert_eq!(a.last().unwrap().snapshot, b.last().unwrap().snapshot);
}

#[test]
#[traced_test]
fn incremental_update_skips_intermediate_frames() {
    let mut resolver = LayoutResolver::new(RelaxationConfig::default());
    resolver.start(&three_points(), |_| 5.0, FramePolicy::EveryFrame);
    let mut now = 0;
    while !resolver.is_idle() {
        resolver.step(now, 8);
        now += 16;
    }
    assert!(logs_contain("layout settled"));

    // A new dot lands on dot 2; dots 1 and 3 are already settled.
    let mut next = three_points();
    next.push((4, Point::new(101.0, 100.0)));
    resolver.start(&next, |_| 5.0, FramePolicy::FinalOnly);

    let mut kinds = Vec::new();
    while !resolver.is_idle() {
        if let Some(update) = resolver.step(now, 8) {
            kinds.push(match update {
                LayoutUpdate::Progress(_) => "progress",
                LayoutUpdate::Transition(_) => "transition",
                LayoutUpdate::Settled { .. } => "settled",
                LayoutUpdate::Reverted(_) => "reverted",
                LayoutUpdate::Unconverged(_) => "unconverged",
            });
        }
        now += 16;
    }
    assert!(!kinds.contains(&"progress"));
    assert_eq!(kinds.first(), Some(&"transition"));
    assert_eq!(kinds.last(), Some(&"settled"));
    let stable = resolver.stable().unwrap();
    assert!((stable.get(&2).unwrap() - stable.get(&4).unwrap()).hypot() >= 9.98);
}

#[test]
fn dense_cluster_converges_without_overlap() {
    // A 10x10 block at half-unit spacing: every dot overlaps nearly every other.
    let dots: Vec<(u32, Point)> = (0..100_u32)
        .map(|i| (i, Point::new(f64::from(i % 10) * 0.5, f64::from(i / 10) * 0.5)))
        .collect();
    let config = RelaxationConfig::default();
    let last = LayoutRun::new(&dots, |_| 5.0, config).last().unwrap();
    assert!(last.finished);
    assert!(last.converged, "stopped at {} with overlap {}", last.iteration, last.max_overlap);

    let positions = last.snapshot.positions();
    for (i, p) in positions.iter().enumerate() {
        for q in &positions[i + 1..] {
            let d = (*p - *q).hypot();
            assert!(d >= 10.0 - 5.0 * config.tolerance, "dots {p:?} and {q:?} overlap");
        }
    }

    let mut resolver = LayoutResolver::new(config);
    resolver.start(&dots, |_| 5.0, FramePolicy::EveryFrame);
    let mut now = 0;
    let mut settled = false;
    while !resolver.is_idle() {
        if let Some(LayoutUpdate::Settled { .. }) = resolver.step(now, 50) {
            settled = true;
        }
        now += 16;
    }
    assert!(settled);
    assert_eq!(resolver.stable(), Some(&last.snapshot));
}

#[test]
fn rerun_on_the_same_overlapping_data_reports_no_change() {
    fn run(resolver: &mut LayoutResolver<u32>, mut now: u64) -> Option<LayoutUpdate<u32>> {
        resolver.start(&three_points(), |_| 5.0, FramePolicy::FinalOnly);
        let mut last = None;
        while !resolver.is_idle() {
            if let Some(update) = resolver.step(now, 8) {
                last = Some(update);
            }
            now += 16;
        }
        last
    }

    let mut resolver = LayoutResolver::new(RelaxationConfig::default());
    assert!(matches!(
        run(&mut resolver, 0),
        Some(LayoutUpdate::Settled { changed: true, .. })
    ));
    assert!(matches!(
        run(&mut resolver, 10_000),
        Some(LayoutUpdate::Settled { changed: false, .. })
    ));
}

proptest! {
    #[test]
    fn non_overlapping_input_never_moves(
        cells in prop::collection::hash_set((0_u8..12, 0_u8..12), 1..40),
    ) {
        // Grid spacing 12 with radius 5 leaves a gap between every pair.
        let dots: Vec<(usize, Point)> = cells
            .into_iter()
            .enumerate()
            .map(|(i, (cx, cy))| (i, Point::new(f64::from(cx) * 12.0, f64::from(cy) * 12.0)))
            .collect();
        let out = LayoutRun::new(&dots, |_| 5.0, RelaxationConfig::default())
            .settle()
            .unwrap();
        for (id, p) in &dots {
            prop_assert_eq!(out.get(id), Some(*p));
        }
    }
}
