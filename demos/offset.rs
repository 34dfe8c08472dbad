//! Path-offset demo.
//!
//! Offsets a slotted square outward and an L-shape inward and prints the
//! resulting subpaths.
//!
//! ```text
//! cargo run --example offset
//! RUST_LOG=curvis=trace cargo run --example offset
//! ```

use curvis::geometry::Path;
use curvis::math::Point2;
use curvis::operations::{FillRule, JoinType, OffsetPath, OffsetStyle};

fn report(label: &str, paths: &[Path]) {
    println!("{label}:");
    for (i, path) in paths.iter().enumerate() {
        println!(
            "  [{i}] {} segs, closed={}, area={:.3}",
            path.segs.len(),
            path.closed,
            path.signed_area()
        );
    }
}

fn main() -> curvis::Result<()> {
    // Default: WARN for everything, INFO for curvis.
    // Override with RUST_LOG (e.g. RUST_LOG=curvis=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("curvis=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let slotted = Path::from_points(
        &[
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(6.5, 10.0),
            Point2::new(6.5, 3.0),
            Point2::new(3.5, 3.0),
            Point2::new(3.5, 10.0),
            Point2::new(0.0, 10.0),
        ],
        true,
    );
    let style = OffsetStyle::new(JoinType::Round, 4.0, FillRule::NonZero)?;
    let out = OffsetPath::new(vec![slotted], 2.0, style).execute()?;
    report("slotted square, outset 2", &out.result);
    report("raw parallels", &out.helper);

    let ell = Path::from_points(
        &[
            Point2::new(0.0, 0.0),
            Point2::new(14.0, 0.0),
            Point2::new(14.0, 14.0),
            Point2::new(8.0, 14.0),
            Point2::new(8.0, 6.0),
            Point2::new(0.0, 6.0),
        ],
        true,
    );
    let out = OffsetPath::new(vec![ell], -2.0, OffsetStyle::default()).execute()?;
    report("L-shape, inset 2", &out.result);

    Ok(())
}
