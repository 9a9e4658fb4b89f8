//! Leptos component wrapping the topic graph canvas.
//!
//! The component creates an HTML canvas element, a legend, a reset button and
//! a detail panel for the selected topic. Clicks on the canvas are hit-tested
//! against the retained scene and fed to [`TopicGraphState`]. An animation
//! loop runs via `requestAnimationFrame`; each frame polls the reflow trigger,
//! eases element looks, and repaints.
//!
//! Panel buttons do not touch the graph state directly. They post a
//! [`Command`] through a signal, and an effect applies it.
//!
//! The legend, reset button and detail panel float over the canvas, so the
//! component's wrapper is exactly as tall as the canvas and the host element
//! it is measured against does not grow with every reflow.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use log::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Performance, Window};

use super::render;
use super::state::{ClickOutcome, RelatedTopic, TopicDetail, TopicGraphState};
use super::types::{NodeId, TopicDataset};

/// Longest frame step fed to the easing, in seconds.
const MAX_FRAME_DT: f64 = 0.1;

/// Canvas size used when neither a prop nor the container gives one.
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Graph state plus the browser handles the animation loop draws with.
struct GraphContext {
	state: TopicGraphState,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	last_frame: f64,
}

/// Bookkeeping for the `requestAnimationFrame` loop.
#[derive(Debug)]
struct FrameLoop {
	running: Cell<bool>,
	pending: Cell<Option<i32>>,
}

impl FrameLoop {
	fn new() -> Self {
		Self {
			running: Cell::new(true),
			pending: Cell::new(None),
		}
	}

	/// Record the id of the frame just requested.
	fn scheduled(&self, id: i32) {
		self.pending.set(Some(id));
	}

	/// A requested frame fired. Returns whether the loop keeps going.
	fn fired(&self) -> bool {
		self.pending.set(None);
		self.running.get()
	}

	/// Stop the loop, returning the frame still waiting to fire.
	fn stop(&self) -> Option<i32> {
		self.running.set(false);
		self.pending.take()
	}
}

/// Browser resources held by one mounted canvas. Dropping it cancels the
/// animation loop, removes the resize listener and releases the graph state.
struct Mounted {
	context: Rc<RefCell<Option<GraphContext>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	frames: Rc<FrameLoop>,
}

impl Drop for Mounted {
	fn drop(&mut self) {
		let window = web_sys::window();
		if let (Some(id), Some(win)) = (self.frames.stop(), window.as_ref()) {
			let _ = win.cancel_animation_frame(id);
		}
		if let (Some(cb), Some(win)) = (self.resize_cb.borrow_mut().take(), window.as_ref()) {
			let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		// Breaks the closure's reference to itself.
		self.animate.borrow_mut().take();
		if let Ok(mut context) = self.context.try_borrow_mut() {
			context.take();
		}
		debug!("topic-graph: unmounted");
	}
}

/// Requests from the panel and overlay buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
	Select(NodeId),
	ClearSelection,
	Reset,
}

/// Renders the interactive topic graph on a canvas element.
///
/// The dataset is validated when the canvas mounts; invalid data is logged
/// and nothing is drawn. The canvas sizes itself to its parent container by
/// default; set `fullscreen = true` to fill the viewport. Explicit
/// `width`/`height` override automatic sizing. Window resizes are debounced
/// before the layout is recomputed.
///
/// Must be rendered inside a `<Router>`: topics with a route navigate there
/// when selected.
#[component]
pub fn TopicGraphCanvas(
	#[prop(into)] data: Signal<TopicDataset>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let frames = Rc::new(FrameLoop::new());

	let mounted = StoredValue::new_local(Mounted {
		context: context.clone(),
		animate: animate.clone(),
		resize_cb: resize_cb.clone(),
		frames: frames.clone(),
	});
	on_cleanup(move || mounted.dispose());

	let detail = RwSignal::new(None::<TopicDetail>);
	let legend = RwSignal::new(Vec::<(String, String)>::new());
	let command = RwSignal::new(None::<Command>);
	let navigate = use_navigate();

	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("topic-graph: no window, not mounting");
			return;
		};
		let Some(performance) = window.performance() else {
			warn!("topic-graph: no performance clock, not mounting");
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			warn!("topic-graph: canvas 2d context unavailable");
			return;
		};

		let (w, h) = measure(&canvas, &window, fullscreen, width, height);
		let state = match TopicGraphState::from_dataset(&data.get(), w, h) {
			Ok(state) => state,
			Err(e) => {
				error!("topic-graph: invalid dataset: {e}");
				return;
			}
		};
		set_canvas_size(&canvas, state.size());
		info!(
			"topic-graph: mounted {} topics at {w}x{h}",
			state.model().len()
		);
		legend.set(state.legend());
		detail.set(state.detail());

		*context_init.borrow_mut() = Some(GraphContext {
			state,
			canvas: canvas.clone(),
			ctx,
			last_frame: performance.now(),
		});

		if resize_cb_init.borrow().is_none() {
			let (context_resize, performance_resize) = (context_init.clone(), performance.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					let (nw, nh) = measure(&c.canvas, &win, fullscreen, width, height);
					c.state.resize(performance_resize.now(), nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if animate_init.borrow().is_none() {
			let (context_anim, animate_inner, frames_anim) =
				(context_init.clone(), animate_init.clone(), frames.clone());
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				if !frames_anim.fired() {
					return;
				}
				if let Some(ref mut c) = *context_anim.borrow_mut() {
					frame(c, &performance);
				}
				if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
					if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
						frames_anim.scheduled(id);
					}
				}
			}));
			if let Some(ref cb) = *animate_init.borrow() {
				if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
					frames.scheduled(id);
				}
			}
		}
	});

	let (context_cmd, navigate_cmd) = (context.clone(), navigate.clone());
	Effect::new(move |_| {
		let Some(cmd) = command.get() else {
			return;
		};
		let outcome = {
			let mut guard = context_cmd.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			let outcome = match cmd {
				Command::Select(id) => c.state.select(id),
				Command::ClearSelection => {
					c.state.clear_selection();
					ClickOutcome::Ignored
				}
				Command::Reset => {
					c.state.reset();
					ClickOutcome::Ignored
				}
			};
			detail.set(c.state.detail());
			outcome
		};
		follow(&outcome, &navigate_cmd);
	});

	let context_click = context.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = local_point(&canvas, &ev);
		let outcome = {
			let mut guard = context_click.borrow_mut();
			let Some(c) = guard.as_mut() else {
				return;
			};
			let Some(id) = c.state.node_at(x, y) else {
				return;
			};
			let outcome = c.state.click(id);
			detail.set(c.state.detail());
			outcome
		};
		follow(&outcome, &navigate);
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = local_point(&canvas, &ev);
		let hovering = match context_mm.borrow_mut().as_mut() {
			Some(c) => {
				let id = c.state.node_at(x, y);
				c.state.hover(id);
				id.is_some()
			}
			None => false,
		};
		let cursor = if hovering { "pointer" } else { "default" };
		let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
	};

	let context_leave = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(c) = context_leave.borrow_mut().as_mut() {
			c.state.hover(None);
		}
	};

	view! {
		<div class="topic-graph" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="topic-graph-canvas"
				on:click=on_click
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				style="display: block;"
			/>
			<ul class="topic-graph-legend" style="position: absolute; left: 12px; bottom: 12px;">
				{move || {
					legend
						.get()
						.into_iter()
						.map(|(name, color)| {
							view! {
								<li>
									<span class="swatch" style=format!("background-color: {color}")></span>
									{name}
								</li>
							}
						})
						.collect_view()
				}}
			</ul>
			<button
				class="topic-graph-reset"
				style="position: absolute; left: 12px; top: 12px;"
				on:click=move |_| command.set(Some(Command::Reset))
			>
				"Reset view"
			</button>
			{move || detail.get().map(|d| view! { <DetailPanel detail=d command=command /> })}
		</div>
	}
}

/// Side panel describing the selected topic.
#[component]
fn DetailPanel(detail: TopicDetail, command: RwSignal<Option<Command>>) -> impl IntoView {
	let TopicDetail {
		label,
		category,
		color,
		description,
		image,
		route,
		parent,
		related,
		subtopics,
		..
	} = detail;
	let alt = label.clone();

	view! {
		<aside
			class="topic-graph-detail"
			style=format!(
				"position: absolute; right: 12px; top: 12px; max-height: calc(100% - 24px); overflow-y: auto; border-color: {}",
				color.to_css(),
			)
		>
			<button class="close" on:click=move |_| command.set(Some(Command::ClearSelection))>
				"×"
			</button>
			<h2>{label}</h2>
			<p class="category">{category}</p>
			{image.map(|src| view! { <img src=src alt=alt /> })}
			<p class="description">{description}</p>
			{route.map(|href| view! { <A href=href>"Open topic page"</A> })}
			{parent
				.map(|p| {
					let id = p.id;
					view! {
						<button class="parent" on:click=move |_| command.set(Some(Command::Select(id)))>
							{format!("Back to {}", p.label)}
						</button>
					}
				})}
			<TopicList title="Related topics" topics=related command=command />
			<TopicList title="Subtopics" topics=subtopics command=command />
		</aside>
	}
}

/// Buttons selecting each listed topic. Renders nothing for an empty list.
#[component]
fn TopicList(
	title: &'static str,
	topics: Vec<RelatedTopic>,
	command: RwSignal<Option<Command>>,
) -> impl IntoView {
	(!topics.is_empty()).then(|| {
		let items = topics
			.into_iter()
			.map(|t| {
				let id = t.id;
				view! {
					<li>
						<button
							style=format!("border-color: {}", t.color.to_css())
							on:click=move |_| command.set(Some(Command::Select(id)))
						>
							{t.label}
						</button>
					</li>
				}
			})
			.collect_view();
		view! {
			<h3>{title}</h3>
			<ul class="topic-list">{items}</ul>
		}
	})
}

/// One animation frame: apply a due reflow, ease, repaint.
fn frame(c: &mut GraphContext, performance: &Performance) {
	let now = performance.now();
	let dt = ((now - c.last_frame) / 1000.0).clamp(0.0, MAX_FRAME_DT);
	c.last_frame = now;

	if c.state.poll(now) {
		set_canvas_size(&c.canvas, c.state.size());
	}
	c.state.tick(dt);
	render::render(&c.state, &c.ctx);
}

fn follow(outcome: &ClickOutcome, navigate: &impl Fn(&str, NavigateOptions)) {
	if let ClickOutcome::Navigate(route) = outcome {
		info!("topic-graph: navigating to {route}");
		navigate(route, NavigateOptions::default());
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Container size: the viewport when fullscreen, otherwise the host element
/// the component is rendered into, with explicit dimensions taking precedence.
fn measure(
	canvas: &HtmlCanvasElement,
	window: &Window,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	let measured = if fullscreen {
		(
			window.inner_width().ok().and_then(|v| v.as_f64()),
			window.inner_height().ok().and_then(|v| v.as_f64()),
		)
	} else {
		// The canvas's parent is the component's own wrapper, whose size
		// follows the canvas. Measure the element around it.
		let host = canvas.parent_element().and_then(|wrapper| wrapper.parent_element());
		(
			host.as_ref().map(|h| h.client_width() as f64),
			host.as_ref().map(|h| h.client_height() as f64),
		)
	};
	resolve_size((width, height), measured)
}

/// Explicit dimensions win over measured ones; anything still missing falls
/// back to [`FALLBACK_SIZE`].
fn resolve_size(
	(width, height): (Option<f64>, Option<f64>),
	(measured_w, measured_h): (Option<f64>, Option<f64>),
) -> (f64, f64) {
	(
		width.or(measured_w).unwrap_or(FALLBACK_SIZE.0),
		height.or(measured_h).unwrap_or(FALLBACK_SIZE.1),
	)
}

fn set_canvas_size(canvas: &HtmlCanvasElement, (w, h): (f64, f64)) {
	canvas.set_width(w.max(0.0) as u32);
	canvas.set_height(h.max(0.0) as u32);
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}
