//! Terminal backend for the render adapter.
//!
//! Draw commands are rasterized into an RGB pixel grid, then two vertically
//! stacked pixels are packed into each terminal cell with an upper
//! half-block glyph (foreground = top pixel, background = bottom pixel).

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Block;

use crate::config::{Rgba, Theme};
use crate::game::{SessionSnapshot, SessionStatus};
use crate::scene::{self, DrawCommand, RectF, Viewport};
use crate::ui::hud::{self, HudInfo};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

const GLYPH_HALF_UPPER: &str = "▀";

/// Converts a theme color to a terminal color, ignoring alpha.
#[must_use]
pub fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Pixel surface (width, height) available inside the play border for a
/// terminal of `area`.
#[must_use]
pub fn play_surface(area: Rect) -> (u16, u16) {
    let (play_area, _) = hud::split_area(area);
    let inner = Block::bordered().inner(play_area);
    (inner.width, inner.height.saturating_mul(2))
}

/// Renders one full frame from an immutable snapshot.
pub fn render(
    frame: &mut Frame<'_>,
    snapshot: &SessionSnapshot,
    info: &HudInfo<'_>,
    clock_ms: u64,
) {
    let (play_area, hud_area) = hud::split_area(frame.area());
    hud::render_hud(frame, hud_area, snapshot, info);

    let theme = info.theme;
    let border = Style::new()
        .fg(to_color(theme.primary_light))
        .bg(to_color(theme.background));
    let block = Block::bordered().border_style(border);
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_field(frame.buffer_mut(), inner, snapshot, theme, clock_ms);

    match snapshot.status {
        SessionStatus::Idle => render_start_menu(frame, play_area, info),
        SessionStatus::Paused => render_pause_menu(frame, play_area, theme),
        SessionStatus::GameOver => render_game_over_menu(
            frame,
            play_area,
            snapshot.score,
            info.high_score,
            snapshot.death_reason,
            theme,
        ),
        SessionStatus::Running => {}
    }
}

fn render_field(
    buffer: &mut Buffer,
    inner: Rect,
    snapshot: &SessionSnapshot,
    theme: &Theme,
    clock_ms: u64,
) {
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let width = usize::from(inner.width);
    let height = usize::from(inner.height) * 2;
    let viewport = Viewport::fit(width as f32, height as f32, snapshot.bounds);

    let mut raster = Raster::new(width, height, theme.background);
    raster.paint(&scene::compose(snapshot, viewport, theme, clock_ms));

    for row in 0..inner.height {
        for column in 0..inner.width {
            let x = usize::from(column);
            let y = usize::from(row) * 2;
            let top = raster.pixel(x, y).unwrap_or(theme.background);
            let bottom = raster.pixel(x, y + 1).unwrap_or(theme.background);
            buffer.set_string(
                inner.x + column,
                inner.y + row,
                GLYPH_HALF_UPPER,
                Style::new().fg(to_color(top)).bg(to_color(bottom)),
            );
        }
    }
}

/// Opaque RGB pixel grid with straight-alpha compositing.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Raster {
    #[must_use]
    pub fn new(width: usize, height: usize, fill: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill.with_alpha(255); width * height],
        }
    }

    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn paint(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            match *command {
                DrawCommand::Clear(color) => self.pixels.fill(color.with_alpha(255)),
                DrawCommand::RoundRect {
                    rect,
                    radius,
                    color,
                } => self.fill_round_rect(rect, radius, color),
                DrawCommand::Circle {
                    cx,
                    cy,
                    radius,
                    color,
                } => {
                    let bounds = RectF {
                        left: cx - radius,
                        top: cy - radius,
                        right: cx + radius,
                        bottom: cy + radius,
                    };
                    let r2 = radius * radius;
                    self.fill_shape(bounds, color, |px, py| {
                        (px - cx).powi(2) + (py - cy).powi(2) <= r2
                    });
                }
                DrawCommand::Oval { rect, color } => {
                    let cx = (rect.left + rect.right) / 2.0;
                    let cy = (rect.top + rect.bottom) / 2.0;
                    let rx = (rect.width() / 2.0).max(f32::EPSILON);
                    let ry = (rect.height() / 2.0).max(f32::EPSILON);
                    self.fill_shape(rect, color, |px, py| {
                        ((px - cx) / rx).powi(2) + ((py - cy) / ry).powi(2) <= 1.0
                    });
                }
            }
        }
    }

    fn fill_round_rect(&mut self, rect: RectF, radius: f32, color: Rgba) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }

        let half_side = rect.width().min(rect.height()) / 2.0;
        let radius = radius.min(half_side).max(0.0);
        let r2 = radius * radius;
        self.fill_shape(rect, color, |px, py| {
            let qx = px.clamp(rect.left + radius, rect.right - radius);
            let qy = py.clamp(rect.top + radius, rect.bottom - radius);
            (px - qx).powi(2) + (py - qy).powi(2) <= r2
        });
    }

    /// Blends `color` into every pixel whose center passes `contains`.
    /// A shape too small to cover any pixel center still marks the pixel
    /// under its own center.
    fn fill_shape(&mut self, bounds: RectF, color: Rgba, contains: impl Fn(f32, f32) -> bool) {
        if self.width == 0 || self.height == 0 || color.a == 0 {
            return;
        }

        let x0 = clamp_index(bounds.left.floor(), self.width);
        let x1 = clamp_index(bounds.right.ceil(), self.width);
        let y0 = clamp_index(bounds.top.floor(), self.height);
        let y1 = clamp_index(bounds.bottom.ceil(), self.height);

        let mut covered = false;
        for y in y0..y1 {
            for x in x0..x1 {
                if contains(x as f32 + 0.5, y as f32 + 0.5) {
                    self.blend(x, y, color);
                    covered = true;
                }
            }
        }

        if !covered {
            let cx = (bounds.left + bounds.right) / 2.0;
            let cy = (bounds.top + bounds.bottom) / 2.0;
            if cx >= 0.0 && cy >= 0.0 && (cx as usize) < self.width && (cy as usize) < self.height
            {
                self.blend(cx as usize, cy as usize, color);
            }
        }
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgba) {
        let index = y * self.width + x;
        let dst = self.pixels[index];
        let alpha = u32::from(color.a);
        let mix = |src: u8, dst: u8| {
            let value = (u32::from(src) * alpha + u32::from(dst) * (255 - alpha) + 127) / 255;
            u8::try_from(value).unwrap_or(u8::MAX)
        };

        self.pixels[index] = Rgba::rgb(
            mix(color.r, dst.r),
            mix(color.g, dst.g),
            mix(color.b, dst.b),
        );
    }
}

fn clamp_index(value: f32, upper: usize) -> usize {
    if value <= 0.0 {
        0
    } else {
        (value as usize).min(upper)
    }
}
