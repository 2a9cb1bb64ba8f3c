// Copyright 2025 the Tapline Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw pointer script → routed events, with tunnel and bubble logging.
//!
//! This example shows how to combine:
//! - `tapline_tree` for the node tree and hit testing,
//! - `tapline_router` for tunnel/bubble dispatch,
//! - `tapline_input` for click counting and tap gestures.
//!
//! Run:
//! - `cargo run -p tapline_demos --example click_gestures`
//! - `RUST_LOG=tapline_router=trace cargo run -p tapline_demos --example click_gestures`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use tapline_input::config::GestureConfig;
use tapline_input::pointer::RawPointerEvent;
use tapline_input::session::InputSession;
use tapline_router::event::{PRIMARY_POINTER, PointerButton};
use tapline_router::types::{EventKind, Phase};
use tapline_tree::{NodeId, Tree, VisualNode};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = Tree::new();
    let window = tree.insert(
        None,
        VisualNode::with_bounds(Rect::new(0.0, 0.0, 400.0, 300.0)),
    );
    let toolbar = tree.insert(
        Some(window),
        VisualNode::with_bounds(Rect::new(0.0, 0.0, 400.0, 40.0)),
    );
    let button = tree.insert(
        Some(toolbar),
        VisualNode::with_bounds(Rect::new(8.0, 8.0, 88.0, 32.0)),
    );
    let canvas = tree.insert(
        Some(window),
        VisualNode::with_bounds(Rect::new(0.0, 40.0, 400.0, 300.0)),
    );

    let names = [
        (window, "window"),
        (toolbar, "toolbar"),
        (button, "button"),
        (canvas, "canvas"),
    ];
    let name_of = move |id: NodeId| {
        names
            .iter()
            .find(|(n, _)| *n == id)
            .map_or("?", |(_, name)| *name)
    };

    let mut session = InputSession::new(window, GestureConfig::default());
    let lines: Rc<RefCell<Vec<String>>> = Rc::default();

    for (node, _) in names {
        for kind in EventKind::ALL {
            for phase in [Phase::Tunnel, Phase::Bubble] {
                let lines = lines.clone();
                session.add_handler(node, kind, phase, true, move |_, e| {
                    lines.borrow_mut().push(format!(
                        "{:>14} {:?}@{} source={} count={} handled={}",
                        e.descriptor().name,
                        e.phase(),
                        name_of(e.current()),
                        name_of(e.source()),
                        e.click_count,
                        e.is_handled(),
                    ));
                    Ok(())
                });
            }
        }
    }

    // The toolbar consumes presses; taps are still raised as fresh events.
    session.add_handler(toolbar, EventKind::Pressed, Phase::Bubble, false, |_, e| {
        e.mark_handled();
        Ok(())
    });

    // A misbehaving canvas handler: the fault is reported after dispatch.
    session.add_handler(canvas, EventKind::RightTapped, Phase::Bubble, false, |_, _| {
        Err("context menu unavailable".into())
    });

    let on_button = Point::new(20.0, 20.0);
    let on_canvas = Point::new(200.0, 150.0);
    let script = [
        ("click the button", vec![
            RawPointerEvent::down(PRIMARY_POINTER, PointerButton::Primary, on_button, 0),
            RawPointerEvent::up(PRIMARY_POINTER, PointerButton::Primary, on_button, 70),
        ]),
        ("second press on the button", vec![
            RawPointerEvent::down(PRIMARY_POINTER, PointerButton::Primary, on_button, 200),
            RawPointerEvent::up(PRIMARY_POINTER, PointerButton::Primary, on_button, 260),
        ]),
        ("press the button, release over the canvas", vec![
            RawPointerEvent::down(PRIMARY_POINTER, PointerButton::Primary, on_button, 2_000),
            RawPointerEvent::moved(PRIMARY_POINTER, on_canvas, 2_050),
            RawPointerEvent::up(PRIMARY_POINTER, PointerButton::Primary, on_canvas, 2_100),
        ]),
        ("right click the canvas", vec![
            RawPointerEvent::down(PRIMARY_POINTER, PointerButton::Secondary, on_canvas, 4_000),
            RawPointerEvent::up(PRIMARY_POINTER, PointerButton::Secondary, on_canvas, 4_060),
        ]),
    ];

    for (label, signals) in script {
        println!("\n== {label} ==");
        tracing::info!(step = label, signals = signals.len(), "feeding script step");
        for raw in &signals {
            let result = session.handle_raw(&mut tree, raw);
            for line in lines.borrow_mut().drain(..) {
                println!("{line}");
            }
            match result {
                Ok(target) => println!(
                    "  {:?} → {}",
                    raw.kind,
                    target.map_or("nothing", name_of)
                ),
                Err(err) => {
                    println!("  {:?} → {err}", raw.kind);
                    for fault in err.faults() {
                        println!(
                            "    {:?} {:?} at {}: {}",
                            fault.kind,
                            fault.phase,
                            name_of(fault.node),
                            fault.error
                        );
                    }
                }
            }
        }
    }
}
