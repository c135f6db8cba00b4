//! Canvas rendering for the particle field.
//!
//! Each frame is drawn in passes, back to front:
//! 1. Background fill
//! 2. Connection lines between nearby particles
//! 3. Comet trail, head, and flare
//! 4. Click bursts
//! 5. Particles, with halos behind the bright ones
//!
//! All coordinates are CSS pixels; the context transform set up by the
//! component handles the device pixel ratio.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::burst::ClickBurst;
use super::comet::Comet;
use super::parallax::ParallaxOffsets;
use super::state::FieldState;
use super::theme::{Color, FieldTheme};

/// Lens ghosts behind the comet head: (offset along travel, radius, alpha).
const COMET_GHOSTS: [(f64, f64, f64); 3] = [(-35.0, 6.0, 0.1), (-55.0, 9.0, 0.06), (-75.0, 4.0, 0.08)];

/// Renders the complete field to the canvas.
pub fn render(
	state: &FieldState,
	ctx: &CanvasRenderingContext2d,
	theme: &FieldTheme,
) -> Result<(), JsValue> {
	let offsets = ParallaxOffsets::new(&state.viewport, &state.config);

	draw_background(state, ctx, theme);
	draw_connections(state, ctx, theme, &offsets);

	if let Some(comet) = state.comets.comet() {
		draw_comet(ctx, theme, comet, state.config.comet.trail_lifetime)?;
	}
	for burst in &state.bursts {
		draw_burst(ctx, theme, burst)?;
	}

	draw_particles(state, ctx, &offsets)
}

fn draw_background(state: &FieldState, ctx: &CanvasRenderingContext2d, theme: &FieldTheme) {
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

/// Alpha of the line joining two particles `dist_sq` apart.
///
/// Fades linearly to zero at the connection threshold and scales with the
/// inverse of the pair's average depth value.
fn connection_alpha(dist_sq: f64, avg_depth: f64, max_dist_sq: f64, base_alpha: f64) -> f64 {
	let falloff = (base_alpha - dist_sq / max_dist_sq * base_alpha).max(0.0);
	falloff * (1.0 / avg_depth) * 0.9
}

fn draw_connections(
	state: &FieldState,
	ctx: &CanvasRenderingContext2d,
	theme: &FieldTheme,
	offsets: &ParallaxOffsets,
) {
	let particles = &state.store.particles;
	let max_dist_sq = state.config.connection_distance_sq.max(1.0);
	let color = theme.connection;

	ctx.set_line_width(theme.connection_width);

	for (i, a) in particles.iter().enumerate() {
		for b in &particles[i + 1..] {
			let (dx, dy) = (a.x - b.x, a.y - b.y);
			let dist_sq = dx * dx + dy * dy;
			if dist_sq >= max_dist_sq {
				continue;
			}

			let avg_depth = (a.depth.value() + b.depth.value()) / 2.0;
			let alpha = connection_alpha(
				dist_sq,
				avg_depth,
				max_dist_sq,
				state.config.connection_alpha,
			);
			ctx.set_stroke_style_str(&color.with_alpha(alpha).to_css());
			ctx.begin_path();
			ctx.move_to(a.x + offsets.line(a.depth), a.y);
			ctx.line_to(b.x + offsets.line(b.depth), b.y);
			ctx.stroke();
		}
	}
}

fn draw_comet(
	ctx: &CanvasRenderingContext2d,
	theme: &FieldTheme,
	comet: &Comet,
	trail_lifetime: f64,
) -> Result<(), JsValue> {
	let style = &theme.comet;

	for point in &comet.trail {
		let fade = (1.0 - point.age / trail_lifetime).max(0.0);
		ctx.begin_path();
		ctx.set_fill_style_str(&style.trail.with_alpha(fade * 0.7).to_css());
		ctx.arc(point.x, point.y, 2.5 * fade, 0.0, TAU)?;
		ctx.fill();
	}

	if !comet.is_visible() {
		return Ok(());
	}

	let (cx, cy) = comet.position();

	let glow = ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, 18.0)?;
	glow.add_color_stop(0.0, &style.head.to_css())?;
	glow.add_color_stop(0.3, &style.halo.to_css())?;
	glow.add_color_stop(1.0, &style.halo.with_alpha(0.0).to_css())?;
	ctx.begin_path();
	#[allow(deprecated)]
	ctx.set_fill_style(&glow);
	ctx.arc(cx, cy, 18.0, 0.0, TAU)?;
	ctx.fill();

	ctx.save();
	let flare = draw_comet_flare(ctx, theme, cx, cy, comet.vy.atan2(comet.vx));
	ctx.restore();
	flare?;

	ctx.begin_path();
	ctx.set_fill_style_str(&style.core.to_css());
	ctx.arc(cx, cy, 2.5, 0.0, TAU)?;
	ctx.fill();

	Ok(())
}

/// Additive cross flare, bloom, and lens ghosts, rotated to the direction of
/// travel. Caller saves and restores the context.
fn draw_comet_flare(
	ctx: &CanvasRenderingContext2d,
	theme: &FieldTheme,
	cx: f64,
	cy: f64,
	angle: f64,
) -> Result<(), JsValue> {
	let style = &theme.comet;
	ctx.set_global_composite_operation("lighter")?;
	ctx.translate(cx, cy)?;
	ctx.rotate(angle)?;

	let streak = ctx.create_linear_gradient(-80.0, 0.0, 80.0, 0.0);
	for (offset, alpha) in [(0.0, 0.0), (0.35, 0.25), (0.5, 0.5), (0.65, 0.25), (1.0, 0.0)] {
		streak.add_color_stop(offset, &style.streak.with_alpha(alpha).to_css())?;
	}
	#[allow(deprecated)]
	ctx.set_fill_style(&streak);
	ctx.begin_path();
	ctx.ellipse(0.0, 0.0, 80.0, 3.0, 0.0, 0.0, TAU)?;
	ctx.fill();

	let spike = ctx.create_linear_gradient(0.0, -45.0, 0.0, 45.0);
	for (offset, alpha) in [(0.0, 0.0), (0.35, 0.12), (0.5, 0.28), (0.65, 0.12), (1.0, 0.0)] {
		spike.add_color_stop(offset, &style.spike.with_alpha(alpha).to_css())?;
	}
	#[allow(deprecated)]
	ctx.set_fill_style(&spike);
	ctx.begin_path();
	ctx.ellipse(0.0, 0.0, 2.0, 45.0, 0.0, 0.0, TAU)?;
	ctx.fill();

	let bloom = ctx.create_radial_gradient(0.0, 0.0, 0.0, 0.0, 0.0, 40.0)?;
	bloom.add_color_stop(0.0, &style.head.with_alpha(0.2).to_css())?;
	bloom.add_color_stop(0.4, &style.streak.with_alpha(0.08).to_css())?;
	bloom.add_color_stop(1.0, &style.streak.with_alpha(0.0).to_css())?;
	#[allow(deprecated)]
	ctx.set_fill_style(&bloom);
	ctx.begin_path();
	ctx.arc(0.0, 0.0, 40.0, 0.0, TAU)?;
	ctx.fill();

	for (offset, radius, alpha) in COMET_GHOSTS {
		let ghost = ctx.create_radial_gradient(offset, 0.0, 0.0, offset, 0.0, radius)?;
		ghost.add_color_stop(0.0, &style.ghost.with_alpha(alpha).to_css())?;
		ghost.add_color_stop(0.5, &style.ghost.with_alpha(alpha * 0.3).to_css())?;
		ghost.add_color_stop(1.0, &style.ghost.with_alpha(0.0).to_css())?;
		#[allow(deprecated)]
		ctx.set_fill_style(&ghost);
		ctx.begin_path();
		ctx.arc(offset, 0.0, radius, 0.0, TAU)?;
		ctx.fill();
	}

	Ok(())
}

fn draw_burst(
	ctx: &CanvasRenderingContext2d,
	theme: &FieldTheme,
	burst: &ClickBurst,
) -> Result<(), JsValue> {
	let t = burst.progress();

	ctx.begin_path();
	ctx.set_stroke_style_str(&theme.burst.ring.with_alpha(burst.ring_alpha()).to_css());
	ctx.set_line_width(1.5 * (1.0 - t));
	ctx.arc(burst.x, burst.y, burst.ring_radius(), 0.0, 2.0 * PI)?;
	ctx.stroke();

	if let Some((alpha, radius)) = burst.flash() {
		let flash = ctx.create_radial_gradient(burst.x, burst.y, 0.0, burst.x, burst.y, radius)?;
		flash.add_color_stop(0.0, &theme.burst.flash.with_alpha(alpha).to_css())?;
		flash.add_color_stop(1.0, &theme.burst.ring.with_alpha(0.0).to_css())?;
		#[allow(deprecated)]
		ctx.set_fill_style(&flash);
		ctx.begin_path();
		ctx.arc(burst.x, burst.y, radius, 0.0, 2.0 * PI)?;
		ctx.fill();
	}

	Ok(())
}

fn draw_particles(
	state: &FieldState,
	ctx: &CanvasRenderingContext2d,
	offsets: &ParallaxOffsets,
) -> Result<(), JsValue> {
	for p in &state.store.particles {
		let (x, y) = (p.x + offsets.point(p.depth), p.y);
		let fill = p.color.with_alpha(p.base_opacity);

		if p.is_bright {
			let halo = p.size * 6.0;
			let gradient = ctx.create_radial_gradient(x, y, 0.0, x, y, halo)?;
			gradient.add_color_stop(0.0, &fill.to_css())?;
			gradient.add_color_stop(0.6, &p.color.with_alpha(p.base_opacity * 0.18).to_css())?;
			gradient.add_color_stop(1.0, &Color::rgba(0, 0, 0, 0.0).to_css())?;
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill_rect(x - halo, y - halo, halo * 2.0, halo * 2.0);
		}

		ctx.begin_path();
		ctx.set_fill_style_str(&fill.to_css());
		ctx.arc(x, y, p.size, 0.0, TAU)?;
		ctx.fill();
	}

	Ok(())
}
