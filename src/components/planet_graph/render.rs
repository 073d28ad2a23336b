use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::assets::PlanetObject;
use super::state::{NodeInfo, SceneState, ease_out_cubic};

pub const BACKGROUND: &str = "#020617";
const TOOLTIP_LINE_HEIGHT: f64 = 16.0;
const TOOLTIP_CHAR_WIDTH: f64 = 7.0;

pub fn render(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let t = &state.transform;
	let _ = ctx.translate(t.x, t.y);
	let _ = ctx.scale(t.k, t.k);
	let _ = ctx.rotate(t.angle);
	let _ = ctx.translate(-t.fx, -t.fy);
	draw_links(state, ctx);
	draw_planets(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

fn draw_links(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap) = (2.0 / k, 14.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);
	let has_highlight = state.has_active_highlight();
	let positions = state.positions();

	for (i, link) in state.links().iter().enumerate() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&link.source), positions.get(&link.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		if (dx * dx + dy * dy).sqrt() < 0.001 {
			continue;
		}

		// t=0: every link as styled, t=1: highlighted links widen, others fade
		let base_width = link.width.max(0.5 / k);
		let (alpha, width) = if !has_highlight {
			(1.0, base_width)
		} else if state.is_link_highlighted(i) {
			(1.0, base_width * (1.0 + 0.5 * t))
		} else {
			(1.0 - 0.75 * t, base_width * (1.0 - 0.3 * t))
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(&link.color);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();

		// particles flowing from source to target
		ctx.set_stroke_style_str(&link.particle_color.to_hex());
		ctx.set_line_width((width * 1.5).max(1.5 / k));
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
	ctx.set_global_alpha(1.0);
}

fn draw_planets(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		ctx.set_global_alpha(1.0 - 0.7 * t);
		draw_planet(ctx, x, y, info.radius * (1.0 - 0.15 * t), info);
		ctx.set_global_alpha(1.0);
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = state.is_hovered(idx);

		let (radius, glow_radius) = if is_hovered {
			(info.radius * (1.0 + 0.35 * t), info.radius * (1.8 + 1.2 * t))
		} else {
			(info.radius * (1.0 + 0.2 * t), info.radius * (1.4 + 0.6 * t))
		};

		if t > 0.01 {
			let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
			let _ = draw_glow(ctx, x, y, radius, glow_radius, alpha, &info.color.to_rgba(alpha * 0.3));
		}

		draw_planet(ctx, x, y, radius, info);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}
	});
}

fn draw_glow(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	glow_radius: f64,
	alpha: f64,
	tint: &str,
) -> Result<(), JsValue> {
	let gradient = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius)?;
	gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha))?;
	gradient.add_color_stop(0.6, tint)?;
	gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)")?;
	ctx.begin_path();
	ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI)?;
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
	Ok(())
}

fn draw_planet(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, info: &NodeInfo) {
	let Some(object) = &info.object else {
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color.to_hex());
		ctx.fill();
		return;
	};

	let material = &object.material;
	ctx.save();
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.clip();
	match material.map.canvas() {
		Some(canvas) => {
			let _ = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
				canvas,
				x - radius,
				y - radius,
				radius * 2.0,
				radius * 2.0,
			);
		}
		None => {
			ctx.set_fill_style_str(&info.color.to_hex());
			ctx.fill();
		}
	}
	// emissive wash
	let _ = ctx.set_global_composite_operation("lighter");
	ctx.set_fill_style_str(&material.emissive.to_rgba(material.emissive_intensity * 0.4));
	ctx.fill();
	ctx.restore();

	draw_ring(ctx, x, y, radius, object);
}

fn draw_ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, object: &PlanetObject) {
	let Some(ring) = &object.ring else {
		return;
	};
	let torus = &object.geometry.ring;
	let sphere = object.geometry.sphere.radius.max(f64::EPSILON);
	let unit = radius / sphere;
	let rx = torus.radius * ring.scale * unit;
	// seen edge-on as the tilt approaches a quarter turn
	let ry = (rx * ring.tilt.0.cos().abs()).max(rx * 0.12);

	ctx.set_stroke_style_str(&ring.material.color.to_rgba(ring.material.opacity));
	ctx.set_line_width(torus.tube * 2.0 * unit);
	ctx.begin_path();
	let _ = ctx.ellipse(x, y, rx, ry, ring.tilt.1, 0.0, 2.0 * PI);
	ctx.stroke();
}

fn draw_tooltip(state: &SceneState, ctx: &CanvasRenderingContext2d) {
	let Some((label, px, py)) = state.tooltip() else {
		return;
	};
	let lines: Vec<&str> = label.lines().collect();
	let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
	let (w, h) = (
		widest as f64 * TOOLTIP_CHAR_WIDTH + 16.0,
		lines.len() as f64 * TOOLTIP_LINE_HEIGHT + 10.0,
	);
	let x = (px + 14.0).min(state.width - w).max(0.0);
	let y = (py + 14.0).min(state.height - h).max(0.0);

	ctx.set_fill_style_str("rgba(2, 6, 23, 0.88)");
	ctx.fill_rect(x, y, w, h);
	ctx.set_stroke_style_str("rgba(148, 163, 184, 0.4)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, w, h);

	ctx.set_fill_style_str("#e2e8f0");
	ctx.set_font("12px monospace");
	for (i, line) in lines.iter().enumerate() {
		let _ = ctx.fill_text(line, x + 8.0, y + 17.0 + i as f64 * TOOLTIP_LINE_HEIGHT);
	}
}
