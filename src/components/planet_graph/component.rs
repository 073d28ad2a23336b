use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::assets::AssetRegistry;
use super::deferred::Deferred;
use super::focus::{Focus, LinkSummary, NodeSummary, ScopedFocus};
use super::preset::PRESETS;
use super::render;
use super::state::SceneState;
use super::style::PlanetStyle;
use super::tuner::LayoutTuning;
use super::types::GraphData;
use super::view_model::{LegendEntry, ViewModel};

const FRAME_DT: f32 = 0.016;
const FALLBACK_WIDTH: f64 = 800.0;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Interactive planet graph: a canvas scene with hover panels and a community
/// legend underneath.
#[component]
pub fn PlanetGraph(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = 600.0)] height: f64,
	#[prop(optional)] tuning: Option<LayoutTuning>,
) -> impl IntoView {
	let tuning = tuning.unwrap_or_default();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let assets = StoredValue::new_local(AssetRegistry::new());
	let asset_count = RwSignal::new(0usize);
	let focus = RwSignal::new(ScopedFocus::default());
	// Epoch of the view model the scene is currently showing
	let scene_epoch = Rc::new(Cell::new(0u64));
	let engine_ready = RwSignal::new(false);
	let engine: Deferred<SceneState> = Deferred::new();
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));

	// One planet per community, never fewer than the hand-authored presets
	Effect::new(move |_| {
		let needed = data.with(GraphData::community_count).max(PRESETS.len());
		assets.update_value(|registry| {
			registry.ensure(needed);
		});
		asset_count.set(assets.with_value(AssetRegistry::len));
	});

	let view_model = Memo::new(move |previous: Option<&ViewModel>| {
		asset_count.track();
		data.with(|graph| {
			assets.with_value(|registry| ViewModel::rebuild(previous, graph, registry))
		})
	});
	let current_focus = Memo::new(move |_| {
		let epoch = view_model.with(|view| view.epoch);
		focus.with(|focus| focus.current(epoch))
	});

	let requested = Rc::new(Cell::new(false));
	let (engine_init, resize_init, epoch_init) =
		(engine.clone(), resize_cb.clone(), scene_epoch.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if requested.replace(true) {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("no window, planet graph stays in its loading state");
			return;
		};

		let width = parent_width(&canvas);
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);
		let Some(ctx) = context_2d(&canvas) else {
			error!("canvas 2d context unavailable");
			return;
		};

		let (engine_resize, canvas_resize) = (engine_init.clone(), canvas.clone());
		*resize_init.borrow_mut() = Some(Closure::new(move || {
			let width = parent_width(&canvas_resize);
			canvas_resize.set_width(width as u32);
			engine_resize.with_mut(|scene| scene.resize(width, height));
		}));
		if let Some(ref cb) = *resize_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		// The engine becomes available one frame after the canvas mounts
		let (pending, node_epoch, link_epoch) =
			(engine_init.clone(), epoch_init.clone(), epoch_init.clone());
		let acquire = Closure::once_into_js(move || {
			let mut scene = SceneState::new(width, height);
			scene.on_node_hover(move |node| {
				focus.try_update(|focus| focus.hover_node(node_epoch.get(), node));
			});
			scene.on_link_hover(move |link| {
				focus.try_update(|focus| focus.hover_link(link_epoch.get(), link));
			});
			if !pending.resolve(scene) {
				debug!("planet graph unmounted before its engine was ready");
				return;
			}
			engine_ready.set(true);
			start_loop(pending, ctx);
		});
		let _ = window.request_animation_frame(acquire.unchecked_ref());
	});

	let engine_data = engine.clone();
	Effect::new(move |_| {
		if !engine_ready.get() {
			return;
		}
		view_model.with(|view| {
			assets.with_value(|registry| {
				engine_data.with_mut(|scene| {
					scene.set_data(view, &PlanetStyle::new(registry));
					tuning.apply(Some(scene));
				});
			});
			scene_epoch.set(view.epoch);
		});
	});

	let teardown = StoredValue::new_local((engine.clone(), resize_cb));
	on_cleanup(move || {
		teardown.try_with_value(|(engine, resize_cb)| {
			engine.teardown(|scene| tuning.release(scene));
			if let (Some(cb), Some(window)) = (resize_cb.borrow_mut().take(), web_sys::window()) {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		});
	});

	let engine_md = engine.clone();
	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			engine_md.with_mut(|s| s.pointer_down(x, y));
		}
	};

	let engine_mm = engine.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			engine_mm.with_mut(|s| s.pointer_move(x, y));
		}
	};

	let engine_mu = engine.clone();
	let on_mouseup = move |_: MouseEvent| {
		engine_mu.with_mut(SceneState::pointer_up);
	};

	let engine_ml = engine.clone();
	let on_mouseleave = move |_: MouseEvent| {
		engine_ml.with_mut(SceneState::pointer_leave);
	};

	let engine_wh = engine;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = pointer_position(canvas_ref, &ev) {
			engine_wh.with_mut(|s| s.zoom_at(x, y, ev.delta_y()));
		}
	};

	let node_summary = Memo::new(move |_| {
		asset_count.track();
		current_focus.with(|focus| assets.with_value(|registry| focus.node_summary(registry)))
	});
	let link_summary = Memo::new(move |_| current_focus.with(Focus::link_summary));
	let legend = Signal::derive(move || view_model.with(|view| view.legend.clone()));

	view! {
		<div class="planet-graph">
			<div class="planet-graph-stage" style=format!("position: relative; height: {height}px;")>
				<canvas
					node_ref=canvas_ref
					class="planet-graph-canvas"
					on:mousedown=on_mousedown
					on:mousemove=on_mousemove
					on:mouseup=on_mouseup
					on:mouseleave=on_mouseleave
					on:wheel=on_wheel
					style="display: block; cursor: grab;"
				/>
				<Show when=move || !engine_ready.get()>
					<div class="planet-graph-loading">"Loading 3D graph..."</div>
				</Show>
				<NodePanel summary=node_summary />
				<LinkPanel summary=link_summary />
			</div>
			<Legend entries=legend />
		</div>
	}
}

fn start_loop(engine: Deferred<SceneState>, ctx: CanvasRenderingContext2d) {
	let frame: FrameCallback = Rc::new(RefCell::new(None));
	let next = frame.clone();
	*frame.borrow_mut() = Some(Closure::new(move || {
		if !engine.keep_alive(&next) {
			return;
		}
		engine.with_mut(|scene| {
			scene.tick(FRAME_DT);
			render::render(scene, &ctx);
		});
		if let (Some(cb), Some(window)) = (next.borrow().as_ref(), web_sys::window()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));

	let window: Option<Window> = web_sys::window();
	if let (Some(cb), Some(window)) = (frame.borrow().as_ref(), window) {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn parent_width(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(FALLBACK_WIDTH)
}

fn pointer_position(
	canvas_ref: NodeRef<leptos::html::Canvas>,
	ev: &MouseEvent,
) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
fn NodePanel(#[prop(into)] summary: Signal<Option<NodeSummary>>) -> impl IntoView {
	move || {
		summary.get().map(|node| {
			view! {
				<aside class="planet-graph-panel">
					<header>
						<span class="planet-graph-icon">{node.icon}</span>
						<h3>{node.label}</h3>
					</header>
					<dl>
						<dt>"Planet"</dt>
						<dd>{node.planet}</dd>
						<dt>"Community"</dt>
						<dd>{format!("#{}", node.community)}</dd>
						<dt>"Degree"</dt>
						<dd>{node.degree}</dd>
					</dl>
				</aside>
			}
		})
	}
}

#[component]
fn LinkPanel(#[prop(into)] summary: Signal<Option<LinkSummary>>) -> impl IntoView {
	move || {
		summary.get().map(|link| {
			view! {
				<aside class="planet-graph-panel">
					<header>
						<h3>"Connection"</h3>
					</header>
					<p>{format!("{} ➜ {}", link.source, link.target)}</p>
					<dl>
						<dt>"Weight"</dt>
						<dd>{link.weight}</dd>
					</dl>
					<p class="planet-graph-description">{link.description}</p>
				</aside>
			}
		})
	}
}

#[component]
fn Legend(#[prop(into)] entries: Signal<Vec<LegendEntry>>) -> impl IntoView {
	view! {
		<section class="planet-graph-legend">
			{move || {
				entries
					.get()
					.into_iter()
					.map(|entry| view! { <LegendItem entry /> })
					.collect_view()
			}}
		</section>
	}
}

#[component]
fn LegendItem(entry: LegendEntry) -> impl IntoView {
	let swatch = match entry.preview {
		Some(src) => {
			view! { <img class="planet-graph-swatch" src=src alt=entry.planet_name.clone() /> }
				.into_any()
		}
		None => {
			view! {
				<span
					class="planet-graph-swatch"
					style=format!("background: {};", entry.accent)
				></span>
			}
				.into_any()
		}
	};

	view! {
		<div class="planet-graph-legend-entry">
			{swatch}
			<div>
				<p class="planet-graph-planet">{format!("{} {}", entry.icon, entry.planet_name)}</p>
				<p>{format!("Community #{}", entry.label)}</p>
				<p>{format!("{} nodes", entry.count)}</p>
			</div>
		</div>
	}
}
