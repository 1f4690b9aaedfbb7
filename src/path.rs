/// Quadratic bezier used to draw a connection between two node centers.
///
/// The control point sits at the midpoint of the two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadraticCurve {
    pub start: (f64, f64),
    pub control: (f64, f64),
    pub end: (f64, f64),
}

impl QuadraticCurve {
    /// Build the connection curve between two centers.
    pub fn between(start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            start,
            control: midpoint(start, end),
            end,
        }
    }

    /// Evaluate the curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f64) -> (f64, f64) {
        let mt = 1.0 - t;
        let a = mt * mt;
        let b = 2.0 * mt * t;
        let c = t * t;
        (
            a * self.start.0 + b * self.control.0 + c * self.end.0,
            a * self.start.1 + b * self.control.1 + c * self.end.1,
        )
    }

    /// Map every point of the curve through `f` (used for canvas→screen projection).
    pub fn map_points<F>(&self, f: F) -> Self
    where
        F: Fn(f64, f64) -> (f64, f64),
    {
        Self {
            start: f(self.start.0, self.start.1),
            control: f(self.control.0, self.control.1),
            end: f(self.end.0, self.end.1),
        }
    }

    /// SVG path command for the curve, e.g. `"M 0 0 Q 50 25 100 50"`.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} Q {} {} {} {}",
            fmt_coord(self.start.0),
            fmt_coord(self.start.1),
            fmt_coord(self.control.0),
            fmt_coord(self.control.1),
            fmt_coord(self.end.0),
            fmt_coord(self.end.1),
        )
    }

    /// Minimum distance from `point` to the curve, sampled at `num_samples`
    /// segments (0 falls back to 20).
    pub fn distance_to(&self, point: (f64, f64), num_samples: usize) -> f64 {
        let num_samples = if num_samples == 0 { 20 } else { num_samples };

        let mut min_dist_sq = f64::MAX;
        let mut prev = self.eval(0.0);
        for i in 1..=num_samples {
            let curr = self.eval(i as f64 / num_samples as f64);
            min_dist_sq = min_dist_sq.min(distance_to_segment_sq(point, prev, curr));
            prev = curr;
        }
        min_dist_sq.sqrt()
    }
}

fn midpoint(a: (f64, f64), b: (f64, f64)) -> (f64, f64) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

/// Round to two decimals and drop trailing zeros so paths stay short and stable.
fn fmt_coord(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    // -0 would otherwise print as "-0"
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

fn distance_to_segment_sq(point: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (point.0 - a.0, point.1 - a.1);
    let ab_len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    if ab_len_sq < f64::EPSILON {
        return ap.0 * ap.0 + ap.1 * ap.1;
    }

    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / ab_len_sq).clamp(0.0, 1.0);
    let dx = point.0 - (a.0 + t * ab.0);
    let dy = point.1 - (a.1 + t * ab.1);
    dx * dx + dy * dy
}
