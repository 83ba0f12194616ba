use geom::{Circle, Distance, Polygon, Pt2D};
use widgetry::{include_labeled_bytes, EventCtx, GeomBatch};

/// Icons are sized in map-space, so they shrink when zooming out like everything else.
pub const MARKER_SIZE: f64 = 60.0;

/// A car icon whose bottom edge sits on `pt`, plus a hitbox covering it.
pub fn vehicle(ctx: &EventCtx, pt: Pt2D) -> (GeomBatch, Polygon) {
    let batch = GeomBatch::load_svg_bytes(ctx, include_labeled_bytes!("../../assets/car.svg"));
    let batch = fit(batch, MARKER_SIZE);
    let center = pt.offset(0.0, -MARKER_SIZE / 2.0);
    let hitbox = Circle::new(center, Distance::meters(MARKER_SIZE / 2.0)).to_polygon();
    (batch.centered_on(center), hitbox)
}

/// A dot centered on `pt`
pub fn journey_start(ctx: &EventCtx, pt: Pt2D) -> (GeomBatch, Polygon) {
    let size = MARKER_SIZE / 2.0;
    let batch = GeomBatch::load_svg_bytes(ctx, include_labeled_bytes!("../../assets/dot.svg"));
    let hitbox = Circle::new(pt, Distance::meters(size / 2.0)).to_polygon();
    (fit(batch, size).centered_on(pt), hitbox)
}

fn fit(batch: GeomBatch, size: f64) -> GeomBatch {
    let dims = batch.get_dims();
    let longest = dims.width.max(dims.height);
    if longest == 0.0 {
        return batch;
    }
    batch.scale(size / longest)
}
