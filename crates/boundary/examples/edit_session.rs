//! Walk through a short editing session on a sampled site boundary.
//!
//! Usage:
//!   cargo run -p boundary --example edit_session -- [seed]
//!
//! Prints the metrics after a drag, a batch of measured edits and an undo,
//! then the final ring as WKT.

use boundary::geodesic::destination;
use boundary::prelude::*;
use boundary::rand::{draw_ring_radial, RadialCfg, ReplayToken, VertexCount};

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2025);
    let cfg = RadialCfg {
        vertex_count: VertexCount::Fixed(6),
        ..Default::default()
    };
    let ring = draw_ring_radial(cfg, ReplayToken { seed, index: 0 });
    let mut s = Session::new(&ring, SessionCfg::default());
    show("initial", s.metrics());

    // drag vertex 0 outwards in small steps, then release
    let start = s.ring()[0];
    for step in 1..=10 {
        let p = destination(start, step as f64 * 0.5, 0.0);
        if let Err(e) = s.update_vertex_transient(0, p) {
            println!("drag stopped: {e}");
            break;
        }
    }
    let out = s.commit();
    show("after drag", &out.metrics);

    s.start_batch();
    let edits = [s.set_segment_length(1, 25.0), s.set_segment_bearing(2, 90.0)];
    for e in edits.into_iter().filter_map(Result::err) {
        println!("edit refused: {e}");
    }
    match s.end_batch() {
        Ok(out) => show("after batch", &out.metrics),
        Err(e) => println!("batch: {e}"),
    }

    if let Some(out) = s.undo() {
        show("after undo", &out.metrics);
    }
    println!("{}", s.export_wkt());
}

fn show(label: &str, m: &Metrics) {
    println!(
        "{label}: n={} area={:.2} m² perimeter={:.3} m self_intersects={}",
        m.vertices, m.area, m.perimeter, m.self_intersects
    );
}
