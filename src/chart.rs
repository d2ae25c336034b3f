use std::io::Cursor;

use anyhow::{Context, Result, bail};
use image::{ImageFormat, Rgb, RgbImage};

use crate::model::NumericColumn;

pub mod font;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_TITLE: &str = "Wikipedia Table Data";
pub const DEFAULT_X_LABEL: &str = "Index";
pub const DEFAULT_Y_LABEL: &str = "Value";

pub const MIN_WIDTH: u32 = 200;
pub const MIN_HEIGHT: u32 = 150;
pub const MAX_WIDTH: u32 = 8192;
pub const MAX_HEIGHT: u32 = 8192;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT: Rgb<u8> = Rgb([51, 51, 51]);
const AXIS: Rgb<u8> = Rgb([102, 102, 102]);
const GRID: Rgb<u8> = Rgb([229, 229, 229]);
pub const SERIES: Rgb<u8> = Rgb([75, 192, 192]);
const FILL_ALPHA: f64 = 0.2;

const MARGIN_LEFT: i32 = 80;
const MARGIN_RIGHT: i32 = 30;
const MARGIN_TOP: i32 = 70;
const MARGIN_BOTTOM: i32 = 60;
const Y_TICK_TARGET: f64 = 5.0;
const X_LABEL_SPACING: i32 = 40;
const POINT_RADIUS: i32 = 3;

#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            x_label: DEFAULT_X_LABEL.to_string(),
            y_label: DEFAULT_Y_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Frame {
    fn width(&self) -> i32 {
        self.right - self.left
    }

    fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Scale {
    low: f64,
    high: f64,
    step: f64,
}

pub fn render_line_chart(column: &NumericColumn, config: &ChartConfig) -> Result<Vec<u8>> {
    if config.width < MIN_WIDTH || config.height < MIN_HEIGHT {
        bail!(
            "chart size {}x{} is below the minimum {}x{}",
            config.width,
            config.height,
            MIN_WIDTH,
            MIN_HEIGHT
        );
    }
    if config.width > MAX_WIDTH || config.height > MAX_HEIGHT {
        bail!(
            "chart size {}x{} is above the maximum {}x{}",
            config.width,
            config.height,
            MAX_WIDTH,
            MAX_HEIGHT
        );
    }

    let mut canvas = Canvas::new(config.width, config.height);
    let frame = Frame {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        right: config.width as i32 - MARGIN_RIGHT,
        bottom: config.height as i32 - MARGIN_BOTTOM,
    };
    let scale = value_scale(&column.values);

    draw_y_grid(&mut canvas, frame, scale);
    draw_series(&mut canvas, frame, scale, &column.values);
    draw_axes(&mut canvas, frame);
    draw_x_ticks(&mut canvas, frame, column.values.len());
    draw_labels(&mut canvas, frame, config, &column.column_name);

    canvas.encode_png()
}

fn value_scale(values: &[f64]) -> Scale {
    let (mut low, mut high) = values
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
            (low.min(value), high.max(value))
        });

    if !low.is_finite() || !high.is_finite() {
        low = 0.0;
        high = 1.0;
    }

    if high - low <= f64::EPSILON * high.abs().max(1.0) {
        let pad = (high.abs() * 0.1).max(1.0);
        low -= pad;
        high += pad;
    } else {
        let pad = (high - low) * 0.05;
        low -= pad;
        high += pad;
    }

    Scale {
        low,
        high,
        step: nice_step((high - low) / Y_TICK_TARGET),
    }
}

fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }

    let magnitude = 10_f64.powi(raw.log10().floor() as i32);
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

fn tick_label(value: f64, step: f64) -> String {
    let decimals = (-step.log10()).ceil().clamp(0.0, 6.0) as usize;
    let label = format!("{value:.decimals$}");
    if label.starts_with('-') && label.trim_start_matches(['-', '0', '.']).is_empty() {
        return label.trim_start_matches('-').to_string();
    }
    label
}

fn y_pixel(frame: Frame, scale: Scale, value: f64) -> i32 {
    let share = (value - scale.low) / (scale.high - scale.low);
    (frame.bottom as f64 - share * frame.height() as f64).round() as i32
}

fn x_pixel(frame: Frame, index: usize, count: usize) -> i32 {
    if count <= 1 {
        return frame.left + frame.width() / 2;
    }

    let share = index as f64 / (count - 1) as f64;
    (frame.left as f64 + share * frame.width() as f64).round() as i32
}

fn draw_y_grid(canvas: &mut Canvas, frame: Frame, scale: Scale) {
    let first = (scale.low / scale.step).ceil() as i64;
    let last = (scale.high / scale.step).floor() as i64;

    for tick in (first..=last).take(50) {
        let value = tick as f64 * scale.step;
        let y = y_pixel(frame, scale, value);
        canvas.hline(frame.left, frame.right, y, GRID);
        canvas.hline(frame.left - 5, frame.left - 1, y, AXIS);

        let label = tick_label(value, scale.step);
        let width = font::text_width(&label, 1) as i32;
        canvas.text(
            frame.left - 8 - width,
            y - font::GLYPH_HEIGHT as i32 / 2,
            &label,
            1,
            TEXT,
        );
    }
}

fn draw_series(canvas: &mut Canvas, frame: Frame, scale: Scale, values: &[f64]) {
    let points = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            (
                x_pixel(frame, index, values.len()),
                y_pixel(frame, scale, *value),
            )
        })
        .collect::<Vec<_>>();

    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        for x in x0..=x1 {
            let share = if x1 == x0 {
                0.0
            } else {
                (x - x0) as f64 / (x1 - x0) as f64
            };
            let y = (y0 as f64 + share * (y1 - y0) as f64).round() as i32;
            for fill_y in y..frame.bottom {
                canvas.blend(x, fill_y, SERIES, FILL_ALPHA);
            }
        }
    }

    for pair in points.windows(2) {
        let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
        canvas.line(x0, y0, x1, y1, SERIES);
        canvas.line(x0, y0 + 1, x1, y1 + 1, SERIES);
    }

    for (x, y) in points {
        canvas.disc(x, y, POINT_RADIUS, SERIES);
    }
}

fn draw_axes(canvas: &mut Canvas, frame: Frame) {
    canvas.hline(frame.left, frame.right, frame.bottom, AXIS);
    canvas.vline(frame.left, frame.top, frame.bottom, AXIS);
}

fn draw_x_ticks(canvas: &mut Canvas, frame: Frame, count: usize) {
    if count == 0 {
        return;
    }

    let max_labels = (frame.width() / X_LABEL_SPACING).max(1) as usize;
    let every = count.div_ceil(max_labels).max(1);

    for index in (0..count).step_by(every) {
        let x = x_pixel(frame, index, count);
        canvas.vline(x, frame.bottom + 1, frame.bottom + 5, AXIS);

        let label = (index + 1).to_string();
        let width = font::text_width(&label, 1) as i32;
        canvas.text(x - width / 2, frame.bottom + 9, &label, 1, TEXT);
    }
}

fn draw_labels(canvas: &mut Canvas, frame: Frame, config: &ChartConfig, column_name: &str) {
    let width = config.width as i32;
    let height = config.height as i32;

    let title_width = font::text_width(&config.title, 2) as i32;
    canvas.text((width - title_width) / 2, 14, &config.title, 2, TEXT);

    let swatch = 30;
    let legend_width = swatch + 8 + font::text_width(column_name, 1) as i32;
    let legend_x = (width - legend_width) / 2;
    canvas.blend_rect(legend_x, 42, swatch, 10, SERIES, FILL_ALPHA);
    canvas.hline(legend_x, legend_x + swatch - 1, 42, SERIES);
    canvas.hline(legend_x, legend_x + swatch - 1, 51, SERIES);
    canvas.vline(legend_x, 42, 51, SERIES);
    canvas.vline(legend_x + swatch - 1, 42, 51, SERIES);
    canvas.text(legend_x + swatch + 8, 44, column_name, 1, TEXT);

    let x_label_width = font::text_width(&config.x_label, 1) as i32;
    canvas.text(
        frame.left + (frame.width() - x_label_width) / 2,
        height - 22,
        &config.x_label,
        1,
        TEXT,
    );

    let y_label = if config.y_label.trim().is_empty() {
        column_name
    } else {
        config.y_label.as_str()
    };
    let y_label_height = font::text_width(y_label, 1) as i32;
    canvas.text_vertical(
        16,
        frame.top + (frame.height() + y_label_height) / 2,
        y_label,
        1,
        TEXT,
    );
}

struct Canvas {
    image: RgbImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, BACKGROUND),
        }
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height()
    }

    fn set(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if self.contains(x, y) {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgb<u8>, alpha: f64) {
        if !self.contains(x, y) {
            return;
        }

        let base = self.image.get_pixel(x as u32, y as u32).0;
        let mixed = std::array::from_fn(|channel| {
            let value = base[channel] as f64 * (1.0 - alpha) + color.0[channel] as f64 * alpha;
            value.round() as u8
        });
        self.image.put_pixel(x as u32, y as u32, Rgb(mixed));
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb<u8>) {
        for py in y..y + height {
            for px in x..x + width {
                self.set(px, py, color);
            }
        }
    }

    fn blend_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb<u8>, alpha: f64) {
        for py in y..y + height {
            for px in x..x + width {
                self.blend(px, py, color, alpha);
            }
        }
    }

    fn hline(&mut self, x0: i32, x1: i32, y: i32, color: Rgb<u8>) {
        for x in x0.min(x1)..=x0.max(x1) {
            self.set(x, y, color);
        }
    }

    fn vline(&mut self, x: i32, y0: i32, y1: i32, color: Rgb<u8>) {
        for y in y0.min(y1)..=y0.max(y1) {
            self.set(x, y, color);
        }
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
        let (mut x, mut y) = (x0, y0);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += sx;
            }
            if doubled <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn disc(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.set(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn text(&mut self, x: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
        let step = scale as i32;
        for (index, ch) in text.chars().enumerate() {
            let origin = x + index as i32 * font::GLYPH_ADVANCE as i32 * step;
            for (row, bits) in font::glyph(ch).iter().enumerate() {
                for col in 0..font::GLYPH_WIDTH {
                    if bits & (0x10 >> col) != 0 {
                        self.fill_rect(
                            origin + col as i32 * step,
                            y + row as i32 * step,
                            step,
                            step,
                            color,
                        );
                    }
                }
            }
        }
    }

    fn text_vertical(&mut self, x: i32, bottom: i32, text: &str, scale: u32, color: Rgb<u8>) {
        let step = scale as i32;
        for (index, ch) in text.chars().enumerate() {
            let origin = bottom - index as i32 * font::GLYPH_ADVANCE as i32 * step;
            for (row, bits) in font::glyph(ch).iter().enumerate() {
                for col in 0..font::GLYPH_WIDTH {
                    if bits & (0x10 >> col) != 0 {
                        self.fill_rect(
                            x + row as i32 * step,
                            origin - (col as i32 + 1) * step,
                            step,
                            step,
                            color,
                        );
                    }
                }
            }
        }
    }

    fn encode_png(self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("failed to encode chart as png")?;
        Ok(bytes)
    }
}
