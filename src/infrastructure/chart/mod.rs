//! SVG pie-chart rendering of a category breakdown.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use svg::node::element::{Circle, Path, Rectangle, Text};
use svg::node::Text as Label;
use svg::Document;

use crate::application::errors::ChartError;
use crate::domain::traits::ChartRenderer;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 800.0;
const CENTER: (f64, f64) = (370.0, 440.0);
const RADIUS: f64 = 300.0;

const COLORS: &[&str] = &[
    "red",
    "green",
    "blue",
    "yellow",
    "orange",
    "purple",
    "cyan",
];

/// Renders the category→amount mapping as an SVG pie with a legend.
#[derive(Debug, Default)]
pub struct SvgPieChart;

impl SvgPieChart {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for SvgPieChart {
    fn render(&self, title: &str, slices: &BTreeMap<String, Decimal>) -> Result<Vec<u8>, ChartError> {
        let total: Decimal = slices.values().copied().sum();
        let total = total.to_f64().unwrap_or(0.0);
        if total <= 0.0 {
            return Err(ChartError::Render(
                "no positive amounts to draw".to_string(),
            ));
        }

        let mut document = Document::new()
            .set("viewBox", (0.0, 0.0, WIDTH, HEIGHT))
            .set("width", WIDTH)
            .set("height", HEIGHT)
            .add(
                Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", "white"),
            )
            .add(
                Text::new()
                    .set("x", WIDTH / 2.0)
                    .set("y", 64.0)
                    .set("text-anchor", "middle")
                    .set("font-family", "sans-serif")
                    .set("font-size", 36)
                    .add(Label::new(title)),
            );

        let (cx, cy) = CENTER;
        if slices.len() == 1 {
            // A single slice degenerates to a full disc; an arc from a
            // point back to itself would draw nothing.
            document = document.add(
                Circle::new()
                    .set("cx", cx)
                    .set("cy", cy)
                    .set("r", RADIUS)
                    .set("fill", COLORS[0]),
            );
        } else {
            let mut angle = -FRAC_PI_2;
            for (i, amount) in slices.values().enumerate() {
                let fraction = (amount.to_f64().unwrap_or(0.0) / total).max(0.0);
                let sweep = fraction * TAU;
                let (x0, y0) = rim_point(cx, cy, angle);
                let (x1, y1) = rim_point(cx, cy, angle + sweep);
                let large_arc = i32::from(sweep > PI);
                let outline = format!(
                    "M {:.2} {:.2} L {:.2} {:.2} A {r:.2} {r:.2} 0 {} 1 {:.2} {:.2} Z",
                    cx,
                    cy,
                    x0,
                    y0,
                    large_arc,
                    x1,
                    y1,
                    r = RADIUS,
                );
                document = document.add(
                    Path::new()
                        .set("fill", COLORS[i % COLORS.len()])
                        .set("d", outline),
                );
                angle += sweep;
            }
        }

        let legend_x = 730.0;
        let mut legend_y = 150.0;
        for (i, (label, amount)) in slices.iter().enumerate() {
            let caption = if label.is_empty() {
                format!("(none): {}", amount)
            } else {
                format!("{}: {}", label, amount)
            };
            document = document
                .add(
                    Rectangle::new()
                        .set("x", legend_x)
                        .set("y", legend_y - 18.0)
                        .set("width", 24)
                        .set("height", 24)
                        .set("fill", COLORS[i % COLORS.len()]),
                )
                .add(
                    Text::new()
                        .set("x", legend_x + 34.0)
                        .set("y", legend_y)
                        .set("font-family", "sans-serif")
                        .set("font-size", 22)
                        .add(Label::new(caption)),
                );
            legend_y += 36.0;
        }

        Ok(document.to_string().into_bytes())
    }
}

fn rim_point(cx: f64, cy: f64, angle: f64) -> (f64, f64) {
    (cx + RADIUS * angle.cos(), cy + RADIUS * angle.sin())
}
