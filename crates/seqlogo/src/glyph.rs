use std::f64::consts::PI;

const ARC_STEPS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    A,
    C,
    G,
    T,
}

pub type Polygon = Vec<(f64, f64)>;

impl Glyph {
    /// Glyph outline as closed polygons in a unit box with y pointing up.
    pub fn outline(&self) -> Vec<Polygon> {
        match self {
            Glyph::A => vec![
                vec![(0.0, 0.0), (0.5, 1.0), (0.5, 0.8), (0.2, 0.0)],
                vec![(1.0, 0.0), (0.5, 1.0), (0.5, 0.8), (0.8, 0.0)],
                rect(0.225, 0.45, 0.775, 0.55),
            ],
            Glyph::C => vec![ring_arc(45.0, 315.0)],
            Glyph::G => vec![
                ring_arc(45.0, 315.0),
                rect(0.55, 0.4, 0.95, 0.5),
                rect(0.8, 0.12, 0.95, 0.5),
            ],
            Glyph::T => vec![rect(0.0, 0.85, 1.0, 1.0), rect(0.425, 0.0, 0.575, 0.85)],
        }
    }
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
}

// Thick elliptical arc centered in the unit box, opening to the right.
fn ring_arc(from_deg: f64, to_deg: f64) -> Polygon {
    let (outer, inner) = (0.5, 0.3);
    let angle = |step: usize| {
        let frac = step as f64 / ARC_STEPS as f64;
        (from_deg + frac * (to_deg - from_deg)) * PI / 180.0
    };
    let mut points: Polygon = (0..=ARC_STEPS)
        .map(|step| {
            let theta = angle(step);
            (0.5 + outer * theta.cos(), 0.5 + outer * theta.sin())
        })
        .collect();
    points.extend((0..=ARC_STEPS).rev().map(|step| {
        let theta = angle(step);
        (0.5 + inner * theta.cos(), 0.5 + inner * theta.sin())
    }));
    points
}
