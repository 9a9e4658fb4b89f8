//! Canvas painter for the retained scene.
//!
//! Draws in three passes for correct z-ordering:
//! 1. Background gradient
//! 2. Lines, with endpoints read from the node registry
//! 3. Nodes in registry order (clusters first, leaves on top), then the
//!    selection ring and labels
//!
//! The painter only reads the scene; all looks come from the `shown` values
//! the scene eases each frame.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::{Scene, SceneLine, SceneNode};
use super::state::TopicGraphState;
use super::theme::Theme;
use super::types::SizeTier;

/// Line height of wrapped labels, as a multiple of the font size.
const LABEL_LINE_HEIGHT: f64 = 1.2;

/// Paint the whole graph.
pub fn render(state: &TopicGraphState, ctx: &CanvasRenderingContext2d) {
	let (width, height) = state.size();
	let theme = state.theme();
	let scene = state.scene();

	draw_background(ctx, width, height, theme);

	for line in scene.lines() {
		draw_line(ctx, scene, line);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());

	let focus = state.highlight().map(|h| h.focus());
	for node in scene.nodes() {
		draw_node(ctx, node, theme, focus == Some(node.id));
	}
}

fn draw_background(ctx: &CanvasRenderingContext2d, width: f64, height: f64, theme: &Theme) {
	let gradient = ctx.create_linear_gradient(0.0, 0.0, 0.0, height);
	let _ = gradient.add_color_stop(0.0, &theme.background.color_top.to_css());
	let _ = gradient.add_color_stop(1.0, &theme.background.color_bottom.to_css());

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, width, height);
}

fn draw_line(ctx: &CanvasRenderingContext2d, scene: &Scene, line: &SceneLine) {
	let Some((a, b)) = scene.endpoints(line) else {
		return;
	};
	// Fade in alongside the endpoints.
	let alpha = line.shown.opacity * line.color.a * a.shown.opacity.min(b.shown.opacity);
	if alpha < 0.01 {
		return;
	}

	ctx.set_stroke_style_str(&line.color.with_alpha(alpha).to_css());
	ctx.set_line_width(line.shown.width);
	match line.dash {
		Some((on, off)) => {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(on),
				&JsValue::from_f64(off),
			));
		}
		None => {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}

	ctx.begin_path();
	ctx.move_to(a.x, a.y);
	ctx.line_to(b.x, b.y);
	ctx.stroke();
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &SceneNode, theme: &Theme, focused: bool) {
	let alpha = node.shown.opacity;
	if alpha < 0.01 {
		return;
	}
	let (x, y) = (node.x, node.y);
	let radius = node.radius * node.shown.scale;

	ctx.set_global_alpha(alpha);

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	let gradient = theme
		.node
		.use_gradient
		.then(|| ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius))
		.and_then(Result::ok);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &node.color.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &node.color.to_css());
			let _ = gradient.add_color_stop(1.0, &node.color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&node.color.to_css()),
	}
	ctx.fill();

	if focused {
		let ring = &theme.node;
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius + ring.ring_offset, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(&ring.ring_color.to_css());
		ctx.set_line_width(ring.ring_width);
		ctx.stroke();
	}

	draw_label(ctx, node, radius, theme);
	ctx.set_global_alpha(1.0);
}

fn draw_label(ctx: &CanvasRenderingContext2d, node: &SceneNode, radius: f64, theme: &Theme) {
	let size = match node.tier {
		SizeTier::Large => theme.node.label_size_large,
		SizeTier::Medium | SizeTier::Small => theme.node.label_size_small,
	};
	let weight = if node.tier == SizeTier::Large { "bold" } else { "normal" };
	let lines = wrap_label(&node.label, max_chars_for(radius, size));

	ctx.set_font(&format!("{weight} {size}px sans-serif"));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str(&theme.node.label_color.to_css());

	let line_height = size * LABEL_LINE_HEIGHT;
	let top = node.y - line_height * (lines.len() as f64 - 1.0) / 2.0;
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, node.x, top + line_height * i as f64);
	}
}

/// Characters that fit across a circle of `radius` at font `size`, assuming
/// an average glyph is ~0.55em wide.
fn max_chars_for(radius: f64, size: f64) -> usize {
	((radius * 1.6) / (size * 0.55)).floor().max(4.0) as usize
}

/// Break `label` into lines of at most `max_chars` characters at word
/// boundaries. Words longer than a line are kept whole on their own line.
pub fn wrap_label(label: &str, max_chars: usize) -> Vec<String> {
	let mut lines = Vec::new();
	let mut current = String::new();
	for word in label.split_whitespace() {
		let fits = current.is_empty()
			|| current.chars().count() + 1 + word.chars().count() <= max_chars;
		if !fits {
			lines.push(std::mem::take(&mut current));
		}
		if !current.is_empty() {
			current.push(' ');
		}
		current.push_str(word);
	}
	if !current.is_empty() {
		lines.push(current);
	}
	lines
}
