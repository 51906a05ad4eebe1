//! The backdrop: lane backgrounds, danger-zone strips and the ground.

use crate::config::Config;
use crate::entities::{Drawable, Position, Rgba, Sprite, Stroke};
use crate::host::Surface;
use crate::LANES;

const C_LANE: Rgba = Rgba::hex(0x232d3f);
const C_LANE_BORDER: Rgba = Rgba::hex(0xa9a9a9);
const C_DANGER: Rgba = Rgba::hexa(0xff000050);
const C_GROUND_EVEN: Rgba = Rgba::hex(0x408cb0);
const C_GROUND_ODD: Rgba = Rgba::hex(0x5f62b1);
/// Lane flash shown when the player hits a lane key.
pub const C_PULSE: Rgba = Rgba::hex(0x4f6a8f);

/// A lane background that can flash a colour for a few frames.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneBackground {
    pub body: Drawable,
    base: Rgba,
    pulse_frames: u32,
    /// Frames left before the colour reverts; `None` when not pulsing.
    remaining: Option<u32>,
}

impl LaneBackground {
    pub fn new(mut body: Drawable, base: Rgba, pulse_frames: u32) -> Self {
        body.set_color(base);
        Self {
            body,
            base,
            pulse_frames,
            remaining: None,
        }
    }

    /// Flash `color`, restarting the countdown if a pulse is running.
    pub fn pulse(&mut self, color: Rgba) {
        self.body.set_color(color);
        self.remaining = Some(self.pulse_frames);
    }

    pub fn tick(&mut self) {
        let Some(left) = self.remaining else {
            return;
        };
        let left = left.saturating_sub(1);
        if left == 0 {
            self.body.set_color(self.base);
            self.remaining = None;
        } else {
            self.remaining = Some(left);
        }
    }

    /// Drop any running pulse and show the base colour.
    pub fn reset(&mut self) {
        self.body.set_color(self.base);
        self.remaining = None;
    }

    pub fn is_pulsing(&self) -> bool {
        self.remaining.is_some()
    }

    pub fn base_color(&self) -> Rgba {
        self.base
    }
}

pub struct Scene {
    lanes: Vec<LaneBackground>,
    danger: Vec<Drawable>,
    ground: Vec<Drawable>,
    ground_image: Drawable,
}

impl Scene {
    pub fn new(config: &Config) -> Self {
        let lane_w = config.lane_width();
        let h = config.canvas_height;
        let mut lanes = Vec::with_capacity(LANES);
        let mut danger = Vec::with_capacity(LANES);
        let mut ground = Vec::with_capacity(LANES);

        for i in 0..LANES {
            let x = lane_w * i as f64;

            let mut body = Drawable::new(lane_w, h, Position::new(x, 0.0));
            body.set_color(C_LANE);
            body.set_stroke(Stroke::new(C_LANE_BORDER, 2.0));
            lanes.push(LaneBackground::new(body, C_LANE, config.pulse_frames));

            let mut zone = Drawable::new(
                lane_w,
                config.danger_zone_height,
                Position::new(x, config.danger_line()),
            );
            zone.set_color(C_DANGER);
            danger.push(zone);

            let mut strip = Drawable::new(
                lane_w,
                config.ground_height,
                Position::new(x, config.kill_line()),
            );
            strip.set_color(if i % 2 == 0 { C_GROUND_EVEN } else { C_GROUND_ODD });
            strip.set_stroke(Stroke::new(C_LANE_BORDER, 2.0));
            ground.push(strip);
        }

        let mut ground_image = Drawable::new(
            config.canvas_width - 20.0,
            config.ground_height - 30.0,
            Position::new(10.0, h - (config.ground_height - 20.0)),
        );
        ground_image.set_image(Sprite::Ground);

        Self {
            lanes,
            danger,
            ground,
            ground_image,
        }
    }

    /// Flash lane `lane`. Out-of-range lanes are ignored.
    pub fn pulse(&mut self, lane: usize, color: Rgba) {
        if let Some(bg) = self.lanes.get_mut(lane) {
            bg.pulse(color);
        }
    }

    /// Advance pulse countdowns.
    pub fn tick(&mut self) {
        for lane in &mut self.lanes {
            lane.tick();
        }
    }

    /// Revert every lane to its base colour.
    pub fn reset_pulses(&mut self) {
        for lane in &mut self.lanes {
            lane.reset();
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        for ((lane, zone), strip) in self.lanes.iter().zip(&self.danger).zip(&self.ground) {
            lane.body.render(surface);
            zone.render(surface);
            strip.render(surface);
        }
        self.ground_image.render(surface);
    }

    pub fn lane(&self, lane: usize) -> Option<&LaneBackground> {
        self.lanes.get(lane)
    }
}
