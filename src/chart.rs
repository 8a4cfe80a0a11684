//! Dual-axis terminal charts
//!
//! Renders a merged series as a braille-dot line chart with one y-axis
//! per pair: the first pair in red against the left axis, the second in
//! blue against the right. Cells where the lines overlap draw magenta.
//! `ChartSink` keeps rendering behind a seam so the data pipeline stays
//! testable without a terminal.

use colored::Colorize;

use crate::error::{ForexError, Result};
use crate::series::MergedSeries;
use crate::types::Rate;

/// Capability that consumes a merged series and draws it somewhere.
pub trait ChartSink {
    /// Draw the merged series. An empty one is refused.
    fn render(&self, merged: &MergedSeries) -> Result<()>;
}

/// Dot grid per braille cell
const DOTS_X: usize = 2;
const DOTS_Y: usize = 4;

const DEFAULT_WIDTH: usize = 64;
const DEFAULT_HEIGHT: usize = 16;
// Room for two 10-char dates under the axis, and a few rows of slope.
const MIN_WIDTH: usize = 24;
const MIN_HEIGHT: usize = 4;

/// Which line a dot belongs to.
#[derive(Clone, Copy)]
enum Side {
    A,
    B,
}

/// One braille cell. Each line's dots are tracked separately so every
/// cell can keep its own color.
#[derive(Debug, Clone, Copy, Default)]
struct Cell {
    a: u8,
    b: u8,
}

/// Terminal chart renderer
///
/// # Example
/// ```
/// use forex_report::chart::{ChartSink, TerminalChart};
/// # use forex_report::currency::{Currency, CurrencyPair};
/// # use forex_report::series::{MergedSeries, RateSeries};
/// # use forex_report::types::RatesByDate;
/// # use chrono::NaiveDate;
/// # use std::collections::HashMap;
/// # let date = NaiveDate::from_ymd_opt(2022, 1, 14).unwrap();
/// # let mut rates = RatesByDate::new();
/// # rates.insert(date, HashMap::from([("EUR".to_string(), 1.1414)]));
/// # let a = RateSeries::from_rates(&rates, CurrencyPair::new(Currency::USD, Currency::EUR));
/// # let b = RateSeries::from_rates(&rates, CurrencyPair::new(Currency::MXN, Currency::EUR));
/// # let merged = MergedSeries::inner_join(&a, &b);
///
/// let chart = TerminalChart::default();
/// chart.render(&merged)?;
/// # Ok::<(), forex_report::error::ForexError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TerminalChart {
    width: usize,
    height: usize,
}

impl TerminalChart {
    /// Chart with a canvas of `width` by `height` terminal cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(MIN_WIDTH),
            height: height.max(MIN_HEIGHT),
        }
    }

    /// Uncolored chart lines, for captures and tests.
    pub fn render_plain(&self, merged: &MergedSeries) -> Result<Vec<String>> {
        Ok(self.layout(merged)?.lines(false))
    }

    fn layout(&self, merged: &MergedSeries) -> Result<Layout> {
        let (Some((lo_a, hi_a)), Some((lo_b, hi_b)), Some(first), Some(last)) = (
            merged.bounds_a(),
            merged.bounds_b(),
            merged.first_date(),
            merged.last_date(),
        ) else {
            return Err(ForexError::MissingData(
                "Cannot chart an empty merged series".to_string(),
            ));
        };

        let w_px = self.width * DOTS_X;
        let h_px = self.height * DOTS_Y;
        let data = merged.rows();
        let n = data.len();

        // One dot per pixel column, linearly interpolated between rows.
        let mut cells = vec![Cell::default(); self.width * self.height];
        for x in 0..w_px {
            let t = if w_px > 1 {
                x as f64 / (w_px - 1) as f64
            } else {
                0.0
            };
            let pos = t * (n - 1) as f64;
            let i = pos.floor() as usize;
            let j = (i + 1).min(n - 1);
            let frac = pos - i as f64;

            let value_a = data[i].rate_a * (1.0 - frac) + data[j].rate_a * frac;
            let value_b = data[i].rate_b * (1.0 - frac) + data[j].rate_b * frac;

            plot(&mut cells, self.width, x, scale_y(value_a, lo_a, hi_a, h_px), Side::A);
            plot(&mut cells, self.width, x, scale_y(value_b, lo_b, hi_b, h_px), Side::B);
        }

        let top_a = format_rate(hi_a);
        let bottom_a = format_rate(lo_a);
        let left_width = top_a.len().max(bottom_a.len());

        let mut rows = Vec::with_capacity(self.height);
        for row_idx in 0..self.height {
            let left = if row_idx == 0 {
                format!("{:>width$}", top_a, width = left_width)
            } else if row_idx == self.height - 1 {
                format!("{:>width$}", bottom_a, width = left_width)
            } else {
                " ".repeat(left_width)
            };
            let right = if row_idx == 0 {
                format_rate(hi_b)
            } else if row_idx == self.height - 1 {
                format_rate(lo_b)
            } else {
                String::new()
            };

            let start = row_idx * self.width;
            rows.push(Row {
                left,
                cells: cells[start..start + self.width].to_vec(),
                right,
            });
        }

        let axis = format!(
            "{:pad$}└{}┘",
            "",
            "─".repeat(self.width),
            pad = left_width + 1
        );
        let dates = format!(
            "{:pad$}{}{:gap$}{}",
            "",
            first,
            "",
            last,
            pad = left_width + 2,
            gap = self.width.saturating_sub(20)
        );

        Ok(Layout {
            label_a: merged.label_a().to_string(),
            label_b: merged.label_b().to_string(),
            left_width,
            rows,
            axis,
            dates,
        })
    }
}

impl Default for TerminalChart {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl ChartSink for TerminalChart {
    fn render(&self, merged: &MergedSeries) -> Result<()> {
        for line in self.layout(merged)?.lines(true) {
            println!("{}", line);
        }
        Ok(())
    }
}

struct Row {
    left: String,
    cells: Vec<Cell>,
    right: String,
}

struct Layout {
    label_a: String,
    label_b: String,
    left_width: usize,
    rows: Vec<Row>,
    axis: String,
    dates: String,
}

impl Layout {
    fn lines(&self, color: bool) -> Vec<String> {
        let mut out = Vec::with_capacity(self.rows.len() + 3);

        let legend = if color {
            format!(
                "{} {}   {} {}",
                "●".red(),
                self.label_a.red().bold(),
                "●".blue(),
                self.label_b.blue().bold()
            )
        } else {
            format!("● {}   ● {}", self.label_a, self.label_b)
        };
        out.push(format!("{:pad$}{}", "", legend, pad = self.left_width + 2));

        for row in &self.rows {
            let mut body = String::with_capacity(row.cells.len());
            for cell in &row.cells {
                let bits = cell.a | cell.b;
                if color && bits != 0 {
                    let glyph = braille_char(bits).to_string();
                    let painted = if cell.a != 0 && cell.b != 0 {
                        glyph.magenta()
                    } else if cell.a != 0 {
                        glyph.red()
                    } else {
                        glyph.blue()
                    };
                    body.push_str(&painted.to_string());
                } else {
                    body.push(braille_char(bits));
                }
            }

            // Axis ticks only where a bound label sits.
            let (open, close) = if row.left.trim().is_empty() {
                ('│', '│')
            } else {
                ('┤', '├')
            };
            out.push(format!("{} {}{}{} {}", row.left, open, body, close, row.right));
        }

        out.push(self.axis.clone());
        out.push(self.dates.clone());
        out
    }
}

fn scale_y(value: Rate, lo: Rate, hi: Rate, h_px: usize) -> usize {
    // A flat line sits in the middle of the canvas.
    if hi <= lo {
        return h_px / 2;
    }
    let norm = (hi - value) / (hi - lo);
    let y = (norm * (h_px - 1) as f64).round() as usize;
    y.min(h_px - 1)
}

fn plot(cells: &mut [Cell], width: usize, x_px: usize, y_px: usize, side: Side) {
    let cell = &mut cells[(y_px / DOTS_Y) * width + x_px / DOTS_X];
    let bit = braille_bit(x_px % DOTS_X, y_px % DOTS_Y);
    match side {
        Side::A => cell.a |= bit,
        Side::B => cell.b |= bit,
    }
}

/// Dot offsets within a cell, per the U+2800 block layout.
fn braille_bit(x: usize, y: usize) -> u8 {
    match (x, y) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        _ => 0x80,
    }
}

fn braille_char(bits: u8) -> char {
    if bits == 0 {
        return ' ';
    }
    char::from_u32(0x2800 + u32::from(bits)).unwrap_or(' ')
}

/// Rates below 0.1 keep a fifth decimal so small quotes stay readable.
fn format_rate(value: Rate) -> String {
    if value.abs() < 0.1 {
        format!("{:.5}", value)
    } else {
        format!("{:.4}", value)
    }
}
