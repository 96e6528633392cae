//! Render adapter: turns a [`SessionSnapshot`] into backend-neutral draw
//! commands in surface pixel coordinates.
//!
//! Composition only reads the snapshot; painting is left to a backend such
//! as [`crate::renderer`].

use std::f32::consts::PI;

use crate::config::{GridSize, Rgba, Theme};
use crate::game::SessionSnapshot;
use crate::grid::{Direction, GridPoint};
use crate::particle::{Particle, ParticleColor};

/// Length of one food pulse cycle.
pub const FOOD_PULSE_PERIOD_MS: u64 = 800;

const SEGMENT_INSET: f32 = 0.1;
const HEAD_CORNER: f32 = 0.4;
const BODY_CORNER: f32 = 0.3;
const HEAD_GLOW_ALPHA: u8 = 120;
const FOOD_RADIUS: f32 = 0.35;
const FOOD_HALO_RADIUS: f32 = 1.5;
const FOOD_HALO_ALPHA: u8 = 100;
/// (radius multiple, alpha) for each glow ring, outermost first.
const FOOD_GLOW_RINGS: [(f32, u8); 3] = [(2.5, 60), (2.0, 100), (1.6, 150)];
const PARTICLE_SIZE: f32 = 0.3;
const EYE_RADIUS: f32 = 0.08;
/// Eye offsets in cells: ahead of the head center, and to either side.
const EYE_FORWARD: f32 = 0.1;
const EYE_SPREAD: f32 = 0.15;
/// Below this cell edge in pixels the eyes would blot out the head.
const EYE_MIN_CELL: f32 = 6.0;

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    #[must_use]
    pub fn inset(self, amount: f32) -> Self {
        Self {
            left: self.left + amount,
            top: self.top + amount,
            right: self.right - amount,
            bottom: self.bottom - amount,
        }
    }

    #[must_use]
    pub fn width(self) -> f32 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f32 {
        self.bottom - self.top
    }
}

/// One primitive, painted in list order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    RoundRect {
        rect: RectF,
        radius: f32,
        color: Rgba,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        color: Rgba,
    },
    Oval { rect: RectF, color: Rgba },
}

/// Placement of the grid on a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cell_size: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Viewport {
    /// Largest square cell size that fits `grid` on the surface, centered.
    #[must_use]
    pub fn fit(surface_width: f32, surface_height: f32, grid: GridSize) -> Self {
        let columns = f32::from(grid.width.max(1));
        let rows = f32::from(grid.height.max(1));
        let fitted = (surface_width / columns).min(surface_height / rows);
        let cell_size = fitted.floor().max(1.0);

        Self {
            cell_size,
            offset_x: ((surface_width - columns * cell_size) / 2.0).max(0.0),
            offset_y: ((surface_height - rows * cell_size) / 2.0).max(0.0),
        }
    }

    #[must_use]
    pub fn cell_rect(self, cell: GridPoint) -> RectF {
        let left = self.offset_x + cell.x as f32 * self.cell_size;
        let top = self.offset_y + cell.y as f32 * self.cell_size;
        RectF {
            left,
            top,
            right: left + self.cell_size,
            bottom: top + self.cell_size,
        }
    }

    #[must_use]
    pub fn cell_center(self, cell: GridPoint) -> (f32, f32) {
        let rect = self.cell_rect(cell);
        (
            rect.left + self.cell_size / 2.0,
            rect.top + self.cell_size / 2.0,
        )
    }
}

/// Grid that fills a surface when every cell is `cell_px` pixels square.
#[must_use]
pub fn grid_for_surface(surface_width: u16, surface_height: u16, cell_px: u16) -> GridSize {
    let cell_px = cell_px.max(1);
    GridSize {
        width: surface_width / cell_px,
        height: surface_height / cell_px,
    }
}

/// Food scale in `[0.85, 1.15]` oscillating with the wall clock.
#[must_use]
pub fn food_pulse(clock_ms: u64) -> f32 {
    let phase = (clock_ms % FOOD_PULSE_PERIOD_MS) as f32 / FOOD_PULSE_PERIOD_MS as f32;
    0.85 + 0.3 * (phase * PI * 4.0).sin().abs()
}

/// Builds the draw list for one frame.
#[must_use]
pub fn compose(
    snapshot: &SessionSnapshot,
    viewport: Viewport,
    theme: &Theme,
    clock_ms: u64,
) -> Vec<DrawCommand> {
    let mut commands =
        Vec::with_capacity(8 + snapshot.segments.len() + snapshot.particles.len());
    commands.push(DrawCommand::Clear(theme.background));

    let cell = viewport.cell_size;
    let (food_x, food_y) = viewport.cell_center(snapshot.food);
    commands.push(DrawCommand::Circle {
        cx: food_x,
        cy: food_y,
        radius: cell * FOOD_HALO_RADIUS,
        color: theme.food_glow.with_alpha(FOOD_HALO_ALPHA),
    });

    compose_snake(&mut commands, snapshot, viewport, theme);

    let radius = cell * FOOD_RADIUS * food_pulse(clock_ms);
    for (multiple, alpha) in FOOD_GLOW_RINGS {
        commands.push(DrawCommand::Circle {
            cx: food_x,
            cy: food_y,
            radius: radius * multiple,
            color: theme.food_glow.with_alpha(alpha),
        });
    }
    commands.push(DrawCommand::Circle {
        cx: food_x,
        cy: food_y,
        radius,
        color: theme.food,
    });
    commands.push(DrawCommand::Circle {
        cx: food_x,
        cy: food_y,
        radius: radius * 0.5,
        color: theme.food_inner,
    });

    commands.extend(
        snapshot
            .particles
            .iter()
            .map(|particle| particle_command(particle, viewport, theme)),
    );

    commands
}

fn compose_snake(
    commands: &mut Vec<DrawCommand>,
    snapshot: &SessionSnapshot,
    viewport: Viewport,
    theme: &Theme,
) {
    let cell = viewport.cell_size;
    let inset = cell * SEGMENT_INSET;

    for (index, segment) in snapshot.segments.iter().enumerate() {
        let rect = viewport.cell_rect(*segment).inset(inset);

        if index == 0 {
            commands.push(DrawCommand::RoundRect {
                rect: rect.inset(-2.0 * inset),
                radius: cell * HEAD_CORNER,
                color: theme.snake_glow.with_alpha(HEAD_GLOW_ALPHA),
            });
            commands.push(DrawCommand::RoundRect {
                rect,
                radius: cell * HEAD_CORNER,
                color: theme.snake_head,
            });
            if cell >= EYE_MIN_CELL {
                compose_eyes(commands, *segment, snapshot.heading, viewport, theme);
            }
        } else {
            commands.push(DrawCommand::RoundRect {
                rect,
                radius: cell * BODY_CORNER,
                color: theme.snake_body,
            });
        }
    }
}

/// Two eyes on the head, turned toward `heading`.
fn compose_eyes(
    commands: &mut Vec<DrawCommand>,
    head: GridPoint,
    heading: Direction,
    viewport: Viewport,
    theme: &Theme,
) {
    let cell = viewport.cell_size;
    let (center_x, center_y) = viewport.cell_center(head);
    let (dx, dy) = heading.offset();
    let (forward_x, forward_y) = (dx as f32, dy as f32);
    // Perpendicular to the heading.
    let (side_x, side_y) = (-forward_y, forward_x);

    for sign in [-1.0, 1.0] {
        commands.push(DrawCommand::Circle {
            cx: center_x + (forward_x * EYE_FORWARD + sign * side_x * EYE_SPREAD) * cell,
            cy: center_y + (forward_y * EYE_FORWARD + sign * side_y * EYE_SPREAD) * cell,
            radius: cell * EYE_RADIUS,
            color: theme.snake_eye,
        });
    }
}

fn particle_command(particle: &Particle, viewport: Viewport, theme: &Theme) -> DrawCommand {
    let cell = viewport.cell_size;
    let left = viewport.offset_x + particle.x * cell;
    let top = viewport.offset_y + particle.y * cell;

    DrawCommand::Oval {
        rect: RectF {
            left,
            top,
            right: left + cell * PARTICLE_SIZE,
            bottom: top + cell * PARTICLE_SIZE,
        },
        color: particle_color(particle.color, theme).with_alpha(particle.alpha()),
    }
}

fn particle_color(token: ParticleColor, theme: &Theme) -> Rgba {
    match token {
        ParticleColor::Spark => theme.particle_spark,
        ParticleColor::FoodGlow => theme.food_glow,
        ParticleColor::SnakeGlow => theme.snake_glow,
        ParticleColor::PrimaryLight => theme.primary_light,
    }
}
