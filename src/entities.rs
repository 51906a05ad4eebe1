//! Visual entity types: drawable objects, moving entities and viruses.
//!
//! Rendering only goes through the `Surface` handed in by the caller, so
//! every type here can be exercised without a terminal.

use rand::Rng;

use crate::host::Surface;
use crate::LANES;

// ── Colours & sprites ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::hex(0x000000);
    pub const WHITE: Rgba = Rgba::hex(0xffffff);

    /// Opaque colour from `0xRRGGBB`.
    pub const fn hex(rgb: u32) -> Self {
        Self::hexa((rgb << 8) | 0xff)
    }

    /// Colour with alpha from `0xRRGGBBAA`.
    pub const fn hexa(rgba: u32) -> Self {
        Self {
            r: (rgba >> 24) as u8,
            g: (rgba >> 16) as u8,
            b: (rgba >> 8) as u8,
            a: rgba as u8,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 0xff
    }

    /// Composite `self` over `below`.
    pub fn over(self, below: Rgba) -> Rgba {
        let a = self.a as u32;
        let mix = |top: u8, bottom: u8| ((top as u32 * a + bottom as u32 * (255 - a)) / 255) as u8;
        Rgba {
            r: mix(self.r, below.r),
            g: mix(self.g, below.g),
            b: mix(self.b, below.b),
            a: 0xff,
        }
    }
}

/// Image assets known to the game. Hosts decide what each one looks like.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Virus,
    Splash,
    Ground,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
}

impl Stroke {
    pub const NONE: Stroke = Stroke {
        color: Rgba::BLACK,
        width: 0.0,
    };

    pub fn new(color: Rgba, width: f64) -> Self {
        Self { color, width }
    }

    /// A stroke is only drawn when it has a positive width.
    pub fn is_active(&self) -> bool {
        self.width > 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Shape {
    Circle,
    #[default]
    Square,
}

/// Colour-mode settings: fill, stroke and shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub fill: Rgba,
    pub stroke: Stroke,
    pub shape: Shape,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: Rgba::BLACK,
            stroke: Stroke::NONE,
            shape: Shape::Square,
        }
    }
}

/// Which render mode a drawable is in. Only image mode carries a payload;
/// the colour settings live on the drawable and survive mode switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Color,
    Image(Sprite),
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ── Drawable object ───────────────────────────────────────────────────────────

/// A positioned box that renders as a coloured shape or a stretched image.
///
/// Anything but image mode draws the paint, so a fresh drawable is a black
/// square. Sizes are not validated: negative or zero dimensions just
/// produce no visible geometry.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Drawable {
    width: f64,
    height: f64,
    pos: Position,
    paint: Paint,
    overlay: Overlay,
}

impl Drawable {
    pub fn new(width: f64, height: f64, pos: Position) -> Self {
        Self {
            width,
            height,
            pos,
            paint: Paint::default(),
            overlay: Overlay::None,
        }
    }

    /// Set the fill and switch to colour mode.
    pub fn set_color(&mut self, color: Rgba) {
        self.paint.fill = color;
        self.overlay = Overlay::Color;
    }

    /// Stroke and shape never change the render mode.
    pub fn set_stroke(&mut self, stroke: Stroke) {
        self.paint.stroke = stroke;
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.paint.shape = shape;
    }

    pub fn set_image(&mut self, sprite: Sprite) {
        self.overlay = Overlay::Image(sprite);
    }

    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    pub fn paint(&self) -> Paint {
        self.paint
    }

    /// Fill colour, if the drawable is in colour mode.
    pub fn color(&self) -> Option<Rgba> {
        match self.overlay {
            Overlay::Color => Some(self.paint.fill),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<Sprite> {
        match self.overlay {
            Overlay::Image(sprite) => Some(sprite),
            _ => None,
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let Position { x, y } = self.pos;
        let (w, h) = (self.width, self.height);
        if let Overlay::Image(sprite) = self.overlay {
            surface.draw_image(sprite, x, y, w, h);
            return;
        }
        let paint = self.paint;
        match paint.shape {
            Shape::Circle => {
                let radius = w / 2.0;
                if radius <= 0.0 {
                    return;
                }
                let (cx, cy) = (x + w / 2.0, y + h / 2.0);
                surface.fill_circle(cx, cy, radius, paint.fill);
                if paint.stroke.is_active() {
                    surface.stroke_circle(cx, cy, radius, paint.stroke);
                }
            }
            Shape::Square => {
                surface.fill_rect(x, y, w, h, paint.fill);
                if paint.stroke.is_active() {
                    surface.stroke_rect(x, y, w, h, paint.stroke);
                }
            }
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_height(&mut self, height: f64) {
        self.height = height;
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn set_pos(&mut self, pos: Position) {
        self.pos = pos;
    }
}

// ── Moving entity ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

/// A drawable with a velocity. It only moves when `tick` is called.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Mover {
    pub body: Drawable,
    velocity: Velocity,
}

impl Mover {
    pub fn new(body: Drawable) -> Self {
        Self {
            body,
            velocity: Velocity::default(),
        }
    }

    pub fn set_velocity(&mut self, vx: f64, vy: f64) {
        self.velocity = Velocity { vx, vy };
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Integrate one frame of motion, then draw. At most once per frame.
    pub fn tick(&mut self, surface: &mut dyn Surface) {
        let Position { x, y } = self.body.pos();
        self.body
            .set_pos(Position::new(x + self.velocity.vx, y + self.velocity.vy));
        self.body.render(surface);
    }
}

// ── Virus ─────────────────────────────────────────────────────────────────────

/// Default number of frames a dead virus stays on screen.
pub const DEATH_FRAMES: u32 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VirusPhase {
    Alive,
    /// Killed; `ticks` frames have passed since.
    Dying { ticks: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Virus {
    pub mover: Mover,
    lane: usize,
    /// Lane width; the unpadded sprite size.
    scale: f64,
    padding: f64,
    phase: VirusPhase,
    death_frames: u32,
}

impl Virus {
    /// A live virus at the top of `lane`, one sprite height above the
    /// visible area so it slides in.
    pub fn new(lane: usize, scale: f64, death_frames: u32) -> Self {
        debug_assert!(lane < LANES, "lane {lane} out of range");
        let mut body = Drawable::new(scale, scale, Position::default());
        body.set_pos(Position::new(scale * lane as f64, -body.height()));
        body.set_image(Sprite::Virus);
        Self {
            mover: Mover::new(body),
            lane,
            scale,
            padding: 0.0,
            phase: VirusPhase::Alive,
            death_frames,
        }
    }

    /// Same as `new` on a uniformly random lane.
    pub fn random(rng: &mut impl Rng, scale: f64, death_frames: u32) -> Self {
        Self::new(rng.gen_range(0..LANES), scale, death_frames)
    }

    /// Shrink the sprite by `padding` and re-centre it in the lane.
    pub fn set_padding(&mut self, padding: f64) {
        self.padding = padding;
        let size = self.scale - padding;
        let body = &mut self.mover.body;
        body.set_width(size);
        body.set_height(size);
        let y = body.pos().y;
        body.set_pos(Position::new(padding / 2.0 + self.scale * self.lane as f64, y));
    }

    /// Kill the virus and swap to the splash sprite. Returns `false` when it
    /// was already dead, in which case nothing changes.
    pub fn kill(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.phase = VirusPhase::Dying { ticks: 0 };
        self.set_padding(0.0);
        self.mover.set_velocity(0.0, 0.0);
        self.mover.body.set_image(Sprite::Splash);
        true
    }

    /// Move one frame down at `speed`. Dead viruses do not move.
    pub fn fall(&mut self, speed: f64, surface: &mut dyn Surface) {
        if !self.is_alive() {
            return;
        }
        self.mover.set_velocity(0.0, speed);
        self.mover.tick(surface);
    }

    /// Advance the death animation one frame. Returns `true` once the
    /// virus has used up its death frames and must be removed.
    pub fn age(&mut self, surface: &mut dyn Surface) -> bool {
        let VirusPhase::Dying { ticks } = self.phase else {
            return false;
        };
        let ticks = ticks + 1;
        self.phase = VirusPhase::Dying { ticks };
        if ticks >= self.death_frames {
            return true;
        }
        self.mover.body.render(surface);
        false
    }

    pub fn is_alive(&self) -> bool {
        self.phase == VirusPhase::Alive
    }

    pub fn phase(&self) -> VirusPhase {
        self.phase
    }

    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn pos(&self) -> Position {
        self.mover.body.pos()
    }

    pub fn width(&self) -> f64 {
        self.mover.body.width()
    }

    pub fn height(&self) -> f64 {
        self.mover.body.height()
    }

    /// Bottom edge; the first part to reach the kill line.
    pub fn leading_edge(&self) -> f64 {
        self.pos().y + self.height()
    }

    /// Top edge; the virus is inside the danger zone once this crosses it.
    pub fn trailing_edge(&self) -> f64 {
        self.pos().y
    }
}
