use crate::glyph::Polygon;
use crate::logo::{Letter, Logo, RenderConfig};
use std::path::Path;

pub fn generate_string(logo: &Logo, config: &RenderConfig) -> String {
    let mut generator = Generator::new(logo, config);
    generator.generate(logo);
    generator.svg
}

pub fn render_from_string(svg_content: &str, path: &Path) -> Result<(), String> {
    std::fs::write(path, svg_content).map_err(|e| e.to_string())
}

struct Generator {
    svg: String,
    width: f64,
    height: f64,
    pad: f64,
    x_range: (f64, f64),
    y_range: (f64, f64),
}

impl Generator {
    fn new(logo: &Logo, config: &RenderConfig) -> Self {
        let (min_neg, max_pos) = logo.stack_extent();
        let mut height_padding = f64::max(
            min_neg.abs() * config.height_padding_factor,
            max_pos.abs() * config.height_padding_factor,
        );
        if min_neg == max_pos {
            // All-zero logo: keep a unit range around the baseline
            height_padding = 0.5;
        }
        let y_range = (min_neg - height_padding, max_pos + height_padding);
        let x_range = (
            -config.length_padding,
            logo.len() as f64 + config.length_padding,
        );
        Self {
            svg: String::new(),
            width: config.width as f64,
            height: config.height as f64,
            pad: config.pad,
            x_range,
            y_range,
        }
    }

    fn generate(&mut self, logo: &Logo) {
        self.start_svg();
        self.add_background();

        for (pos, column) in logo.weights.iter().enumerate() {
            self.plot_column(pos, column, &logo.letters);
        }

        self.add_baseline();
        self.add_axis();
        self.end_svg();
    }

    // Letters are drawn in order of increasing magnitude so the largest
    // contributions end up furthest from the baseline.
    fn plot_column(&mut self, pos: usize, column: &[f64; 4], letters: &[Letter; 4]) {
        let mut order: Vec<usize> = (0..column.len()).collect();
        order.sort_by(|&a, &b| column[a].abs().total_cmp(&column[b].abs()));

        let mut pos_base = 0.0;
        let mut neg_base = 0.0;
        for index in order {
            let weight = column[index];
            if weight == 0.0 || !weight.is_finite() {
                continue;
            }
            let base = if weight > 0.0 { pos_base } else { neg_base };
            let letter = &letters[index];
            for polygon in letter.glyph.outline() {
                self.add_polygon(&polygon, pos as f64, base, weight, letter.color);
            }
            if weight > 0.0 {
                pos_base += weight;
            } else {
                neg_base += weight;
            }
        }
    }

    fn add_polygon(&mut self, polygon: &Polygon, left: f64, base: f64, height: f64, color: &str) {
        let mut path = String::new();
        for (i, (u, v)) in polygon.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            let x = self.to_x(left + u);
            let y = self.to_y(base + v * height);
            path.push_str(&format!("{}{:.2} {:.2} ", command, x, y));
        }
        path.push('Z');
        self.svg.push_str(&format!(
            "<path d=\"{}\" fill=\"{}\" stroke=\"none\" />\n",
            path, color
        ));
    }

    fn add_baseline(&mut self) {
        let y = self.to_y(0.0);
        let (x1, x2) = (self.to_x(self.x_range.0), self.to_x(self.x_range.1));
        self.svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#808080\" stroke-width=\"0.5\" />\n",
            x1, y, x2, y
        ));
    }

    fn add_axis(&mut self) {
        let x = self.to_x(self.x_range.0);
        let (y1, y2) = (self.to_y(self.y_range.0), self.to_y(self.y_range.1));
        self.svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#000000\" stroke-width=\"1\" />\n",
            x, y1, x, y2
        ));
    }

    fn start_svg(&mut self) {
        self.svg.push_str("<?xml version=\"1.0\"?>\n");
        self.svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">\n",
            self.width, self.height
        ));
    }

    fn end_svg(&mut self) {
        self.svg.push_str("</svg>\n");
    }

    fn add_background(&mut self) {
        self.svg
            .push_str("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    }

    fn to_x(&self, x: f64) -> f64 {
        let span = self.x_range.1 - self.x_range.0;
        self.pad + (x - self.x_range.0) / span * (self.width - 2.0 * self.pad)
    }

    fn to_y(&self, y: f64) -> f64 {
        let span = self.y_range.1 - self.y_range.0;
        self.pad + (self.y_range.1 - y) / span * (self.height - 2.0 * self.pad)
    }
}
