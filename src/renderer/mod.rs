//! Canvas 2D renderer
//!
//! Pure consumer of the sim's drawable primitives: target sprites, trail
//! segments, particle sprites, and the shake intensity. If the 2d context
//! cannot be acquired, construction fails and no session is created.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::SHAKE_MAX_OFFSET;
use crate::sim::{GamePhase, GameState, TargetSprite};

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Display-pixel size; the backing store is scaled by the DPR
    width: f32,
    height: f32,
    dpr: f64,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("could not get 2d canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            canvas,
            ctx,
            width: 0.0,
            height: 0.0,
            dpr: 1.0,
        })
    }

    /// Size the backing store for the device pixel ratio
    pub fn resize(&mut self, display_width: f32, display_height: f32, dpr: f64) {
        self.width = display_width;
        self.height = display_height;
        self.dpr = dpr;
        self.canvas.set_width((display_width as f64 * dpr) as u32);
        self.canvas.set_height((display_height as f64 * dpr) as u32);
    }

    /// Draw one frame. `time` is the RAF timestamp, used only for the shake
    /// jitter - the shake intensity itself is simulation state.
    pub fn render(&self, state: &GameState, time: f64) {
        let ctx = &self.ctx;
        let (w, h) = (self.width as f64, self.height as f64);

        ctx.save();
        let _ = ctx.scale(self.dpr, self.dpr);
        ctx.clear_rect(0.0, 0.0, w, h);
        self.draw_background(w, h);

        if state.screen_shake > 0.0 {
            let amp = state.screen_shake as f64 * SHAKE_MAX_OFFSET as f64;
            let _ = ctx.translate((time * 0.073).sin() * amp, (time * 0.097).cos() * amp);
        }

        if matches!(state.phase, GamePhase::Playing | GamePhase::Paused) {
            for target in &state.targets {
                if target.active && !target.sliced {
                    self.draw_target(&target.sprite());
                }
            }
            self.draw_trail(state);
            self.draw_particles(state);
            if state.combo > 1 {
                self.draw_combo(state.combo, w, h);
            }
        }

        ctx.restore();
    }

    fn draw_background(&self, w: f64, h: f64) {
        let ctx = &self.ctx;
        if let Ok(gradient) =
            ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) / 2.0)
        {
            let _ = gradient.add_color_stop(0.0, "rgba(26, 69, 255, 0.1)");
            let _ = gradient.add_color_stop(1.0, "rgba(10, 1, 26, 0.3)");
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(0.0, 0.0, w, h);
        }
    }

    fn draw_target(&self, sprite: &TargetSprite) {
        let ctx = &self.ctx;
        let (x, y) = (sprite.pos.x as f64, sprite.pos.y as f64);
        let radius = sprite.radius as f64;

        // Outer glow, pulsing with the sim's glow phase
        let glow_size = radius + sprite.glow as f64 * 20.0;
        if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.2, x, y, glow_size) {
            let _ = gradient.add_color_stop(0.0, sprite.color);
            let _ = gradient.add_color_stop(0.6, &format!("{}80", sprite.color));
            let _ = gradient.add_color_stop(1.0, &format!("{}00", sprite.color));
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.begin_path();
            let _ = ctx.arc(x, y, glow_size, 0.0, TAU);
            ctx.fill();
        }

        // Body disc
        ctx.set_fill_style_str(sprite.color);
        ctx.set_shadow_color(sprite.color);
        ctx.set_shadow_blur(25.0);
        ctx.begin_path();
        let _ = ctx.arc(x, y, radius, 0.0, TAU);
        ctx.fill();
        ctx.set_shadow_blur(0.0);

        // Inner highlight
        if let Ok(gradient) =
            ctx.create_radial_gradient(x - radius * 0.4, y - radius * 0.4, 0.0, x, y, radius)
        {
            let _ = gradient.add_color_stop(0.0, "#FFFFFF60");
            let _ = gradient.add_color_stop(1.0, "#FFFFFF00");
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.begin_path();
            let _ = ctx.arc(x, y, radius * 0.7, 0.0, TAU);
            ctx.fill();
        }
    }

    fn draw_trail(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_stroke_style_str("#1A45FF");
        ctx.set_shadow_color("#1A45FF");
        ctx.set_shadow_blur(10.0);
        ctx.set_line_cap("round");
        ctx.set_line_join("round");

        for (from, to, alpha) in state.slicer.trail() {
            ctx.set_global_alpha(alpha as f64);
            ctx.set_line_width((8.0 * alpha).max(2.0) as f64);
            ctx.begin_path();
            ctx.move_to(from.x as f64, from.y as f64);
            ctx.line_to(to.x as f64, to.y as f64);
            ctx.stroke();
        }

        ctx.restore();
    }

    fn draw_particles(&self, state: &GameState) {
        let ctx = &self.ctx;
        ctx.save();
        for p in state.particles.iter() {
            ctx.set_global_alpha(p.alpha as f64);
            ctx.set_fill_style_str(p.color);
            ctx.set_shadow_color(p.color);
            ctx.set_shadow_blur(8.0);
            ctx.begin_path();
            let _ = ctx.arc(p.pos.x as f64, p.pos.y as f64, p.size as f64, 0.0, TAU);
            ctx.fill();
        }
        ctx.restore();
    }

    fn draw_combo(&self, combo: u32, w: f64, h: f64) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_font("bold 48px sans-serif");
        ctx.set_text_align("center");
        ctx.set_fill_style_str("#FF4B8F");
        ctx.set_stroke_style_str("#1A45FF");
        ctx.set_line_width(2.0);
        ctx.set_shadow_color("#FF4B8F");
        ctx.set_shadow_blur(20.0);

        let text = format!("COMBO x{combo}");
        let _ = ctx.stroke_text(&text, w / 2.0, h * 0.2);
        let _ = ctx.fill_text(&text, w / 2.0, h * 0.2);
        ctx.restore();
    }
}
