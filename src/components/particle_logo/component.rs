//! Leptos component hosting the particle field on a canvas.
//!
//! On mount the component sizes the canvas to its rendered box, starts
//! loading the logo through the fallback chain and attaches pointer and
//! resize listeners. Once an image has loaded, an animation loop runs
//! via `requestAnimationFrame`. Unmounting stops the loop, cancels the
//! pending frame and resize timer, and removes every listener it attached.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use log::{error, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, ContextAttributes2d, Event, EventTarget,
	HtmlCanvasElement, HtmlImageElement, MouseEvent,
};

use super::config::ParticleConfig;
use super::error::ParticleError;
use super::frame_loop::{FrameLoop, ListenerRegistry, ListenerTarget};
use super::pixels::{PixelBuffer, PixelSource};
use super::placement::Placement;
use super::render::CanvasTarget;
use super::sources::SourceChain;
use super::state::ParticleField;

type Listener = Closure<dyn FnMut(Event)>;
type Shared<T> = Rc<RefCell<Option<T>>>;

/// Field, canvas and loop, owned by the mounted component.
struct Host {
	field: ParticleField,
	target: CanvasTarget,
	canvas: HtmlCanvasElement,
	image: Option<HtmlImageElement>,
	frame_loop: FrameLoop,
}

impl Host {
	/// Match the backing store to the rendered box.
	fn fit_canvas(&mut self) -> (u32, u32) {
		let (w, h) = rendered_size(&self.canvas);
		self.canvas.set_width(w);
		self.canvas.set_height(h);
		(w, h)
	}

	/// Sample a freshly loaded image and start the loop. Returns whether the
	/// loop is running, empty or not; a later resize fills it.
	fn load_image(&mut self, image: HtmlImageElement) -> bool {
		let source = CanvasImage {
			image: &image,
			ctx: self.target.context(),
			canvas_size: self.field.size(),
		};
		let result = self.frame_loop.load_and_start(&mut self.field, &source);
		self.image = Some(image);
		match result {
			Ok(count) => info!("particle-logo: sampled {count} particles"),
			Err(e) => error!("particle-logo: {e}"),
		}
		self.frame_loop.is_running()
	}

	fn resize(&mut self) {
		let (w, h) = self.fit_canvas();
		let source = self.image.as_ref().map(|image| CanvasImage {
			image,
			ctx: self.target.context(),
			canvas_size: (w, h),
		});
		if let Err(e) = self.field.resize(w, h, source.as_ref()) {
			warn!("particle-logo: resize to {w}x{h} left the field empty: {e}");
		}
	}

	fn frame(&mut self) -> bool {
		self.frame_loop.run_frame(&mut self.field, &mut self.target)
	}
}

/// An `HtmlImageElement` sampled by drawing it onto the field's own canvas.
///
/// The image is drawn, read back and wiped within one call, so it never
/// shows on screen.
struct CanvasImage<'a> {
	image: &'a HtmlImageElement,
	ctx: &'a CanvasRenderingContext2d,
	canvas_size: (u32, u32),
}

impl PixelSource for CanvasImage<'_> {
	fn natural_size(&self) -> (u32, u32) {
		(self.image.natural_width(), self.image.natural_height())
	}

	fn sample(&self, placement: &Placement) -> Result<PixelBuffer, ParticleError> {
		let (w, h) = (placement.width as f64, placement.height as f64);
		let (cw, ch) = (self.canvas_size.0 as f64, self.canvas_size.1 as f64);

		self.ctx.clear_rect(0.0, 0.0, cw, ch);
		self.ctx
			.draw_image_with_html_image_element_and_dw_and_dh(
				self.image,
				placement.x,
				placement.y,
				w,
				h,
			)
			.map_err(|e| ParticleError::Canvas(format!("{e:?}")))?;
		let data = self.ctx.get_image_data(placement.x, placement.y, w, h);
		self.ctx.clear_rect(0.0, 0.0, cw, ch);

		let data = data.map_err(|e| ParticleError::Tainted(format!("{e:?}")))?;
		PixelBuffer::new(data.width(), data.height(), data.data().0)
	}
}

/// The image element and its fallback chain.
struct ImageLoader {
	image: HtmlImageElement,
	chain: SourceChain,
	_onload: Closure<dyn FnMut()>,
	_onerror: Closure<dyn FnMut()>,
}

impl ImageLoader {
	/// Point the image at the next source. Does nothing once all have failed.
	fn advance(&mut self) {
		if let Some(url) = self.chain.next_url() {
			self.image.set_src(url);
		}
	}

	fn detach(&self) {
		self.image.set_onload(None);
		self.image.set_onerror(None);
	}
}

fn rendered_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
	(
		canvas.offset_width().max(0) as u32,
		canvas.offset_height().max(0) as u32,
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, ParticleError> {
	let options = ContextAttributes2d::new();
	// Every load and resize reads the canvas back.
	options.set_will_read_frequently(true);
	canvas
		.get_context_with_context_options("2d", &options)
		.map_err(|e| ParticleError::Canvas(format!("{e:?}")))?
		.ok_or_else(|| ParticleError::Canvas("no 2d context".into()))?
		.dyn_into()
		.map_err(|_| ParticleError::Canvas("2d context has an unexpected type".into()))
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn attach(
	registry: &mut ListenerRegistry<Listener>,
	target: ListenerTarget,
	element: &EventTarget,
	event: &'static str,
	callback: Listener,
) {
	match element.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
		Ok(()) => registry.register(target, event, callback),
		Err(e) => warn!("particle-logo: could not listen for {event}: {e:?}"),
	}
}

/// Request the next animation frame if the loop is still running.
fn schedule_frame(host: &Shared<Host>, animate: &Shared<Closure<dyn FnMut()>>) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let animate = animate.borrow();
	let Some(cb) = animate.as_ref() else {
		return;
	};
	let mut host = host.borrow_mut();
	let Some(h) = host.as_mut() else {
		return;
	};
	if !h.frame_loop.should_reschedule() || h.frame_loop.has_pending_frame() {
		return;
	}
	match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
		Ok(handle) => h.frame_loop.scheduled(handle),
		Err(e) => error!("particle-logo: requestAnimationFrame failed: {e:?}"),
	}
}

fn start_image_load(
	loader: &Shared<ImageLoader>,
	host: &Shared<Host>,
	animate: &Shared<Closure<dyn FnMut()>>,
	urls: Vec<String>,
) {
	let image = match HtmlImageElement::new() {
		Ok(image) => image,
		Err(e) => {
			error!("particle-logo: cannot create image element: {e:?}");
			return;
		}
	};
	// Without this the canvas is tainted and pixels cannot be read back.
	image.set_cross_origin(Some("anonymous"));

	let (host_load, animate_load, image_load) = (host.clone(), animate.clone(), image.clone());
	let onload = Closure::<dyn FnMut()>::new(move || {
		let start = match *host_load.borrow_mut() {
			Some(ref mut h) => h.load_image(image_load.clone()),
			None => false,
		};
		if start {
			schedule_frame(&host_load, &animate_load);
		}
	});

	let loader_err = loader.clone();
	let onerror = Closure::<dyn FnMut()>::new(move || {
		if let Some(ref mut l) = *loader_err.borrow_mut() {
			l.advance();
		}
	});

	image.set_onload(Some(onload.as_ref().unchecked_ref()));
	image.set_onerror(Some(onerror.as_ref().unchecked_ref()));

	let mut l = ImageLoader {
		image,
		chain: SourceChain::new(urls),
		_onload: onload,
		_onerror: onerror,
	};
	l.advance();
	*loader.borrow_mut() = Some(l);
}

/// Renders the logo as an interactive particle image.
///
/// The canvas fills its parent; give the parent a size. Hovering pushes
/// particles away from the pointer, holding a mouse button pushes harder
/// and further. Pass `config` to override the defaults.
#[component]
pub fn ParticleLogoCanvas(
	/// Engine settings. Defaults apply when omitted.
	#[prop(optional)]
	config: Option<ParticleConfig>,
) -> impl IntoView {
	let config = config.unwrap_or_default();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let host: Shared<Host> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let listeners: Rc<RefCell<ListenerRegistry<Listener>>> =
		Rc::new(RefCell::new(ListenerRegistry::new()));
	let resize_timer: Shared<Timeout> = Rc::new(RefCell::new(None));
	let loader: Shared<ImageLoader> = Rc::new(RefCell::new(None));

	let (host_init, animate_init, listeners_init, timer_init, loader_init) = (
		host.clone(),
		animate.clone(),
		listeners.clone(),
		resize_timer.clone(),
		loader.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if host_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(e) => {
				error!("particle-logo: {e}");
				return;
			}
		};

		let (w, h) = rendered_size(&canvas);
		canvas.set_width(w);
		canvas.set_height(h);
		*host_init.borrow_mut() = Some(Host {
			field: ParticleField::new(config.clone(), w, h),
			target: CanvasTarget::new(ctx),
			canvas: canvas.clone(),
			image: None,
			frame_loop: FrameLoop::new(),
		});

		let (host_anim, animate_inner) = (host_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let again = match *host_anim.borrow_mut() {
				Some(ref mut h) => {
					h.frame_loop.take_handle();
					h.frame()
				}
				None => false,
			};
			if again {
				schedule_frame(&host_anim, &animate_inner);
			}
		}));

		let mut registry = listeners_init.borrow_mut();

		let (host_mm, canvas_mm) = (host_init.clone(), canvas.clone());
		attach(
			&mut registry,
			ListenerTarget::Canvas,
			&canvas,
			"mousemove",
			Closure::new(move |ev: Event| {
				let ev: &MouseEvent = ev.unchecked_ref();
				let (x, y) = pointer_position(&canvas_mm, ev);
				if let Some(ref mut h) = *host_mm.borrow_mut() {
					h.field.pointer_move(x, y, ev.buttons());
				}
			}),
		);

		let host_ml = host_init.clone();
		attach(
			&mut registry,
			ListenerTarget::Canvas,
			&canvas,
			"mouseleave",
			Closure::new(move |_: Event| {
				if let Some(ref mut h) = *host_ml.borrow_mut() {
					h.field.pointer_leave();
				}
			}),
		);

		let (host_md, canvas_md) = (host_init.clone(), canvas.clone());
		attach(
			&mut registry,
			ListenerTarget::Canvas,
			&canvas,
			"mousedown",
			Closure::new(move |ev: Event| {
				let (x, y) = pointer_position(&canvas_md, ev.unchecked_ref());
				if let Some(ref mut h) = *host_md.borrow_mut() {
					h.field.pointer_down(x, y);
				}
			}),
		);

		let host_mu = host_init.clone();
		// On the window, so a button released off the canvas still ends the click.
		attach(
			&mut registry,
			ListenerTarget::Window,
			&window,
			"mouseup",
			Closure::new(move |_: Event| {
				if let Some(ref mut h) = *host_mu.borrow_mut() {
					h.field.pointer_up();
				}
			}),
		);

		let (host_rs, timer_rs) = (host_init.clone(), timer_init.clone());
		let debounce_ms = config.resize_debounce_ms;
		attach(
			&mut registry,
			ListenerTarget::Window,
			&window,
			"resize",
			Closure::new(move |_: Event| {
				let host_fire = host_rs.clone();
				// Replacing the pending timeout drops, and so cancels, it.
				*timer_rs.borrow_mut() = Some(Timeout::new(debounce_ms, move || {
					if let Some(ref mut h) = *host_fire.borrow_mut() {
						h.resize();
					}
				}));
			}),
		);
		drop(registry);

		start_image_load(&loader_init, &host_init, &animate_init, config.sources.urls());
	});

	let teardown = SendWrapper::new(move || {
		let window = web_sys::window();
		let mut listeners = listeners.borrow_mut();
		if let Some(mut h) = host.borrow_mut().take() {
			if let (Some(handle), Some(window)) = (h.frame_loop.stop(), window.as_ref()) {
				let _ = window.cancel_animation_frame(handle);
			}
			for reg in listeners.drain() {
				let target: &EventTarget = match (reg.target, window.as_ref()) {
					(ListenerTarget::Canvas, _) => h.canvas.as_ref(),
					(ListenerTarget::Window, Some(window)) => window.as_ref(),
					(ListenerTarget::Window, None) => continue,
				};
				let _ = target
					.remove_event_listener_with_callback(reg.event, reg.callback.as_ref().unchecked_ref());
			}
			info!("particle-logo: stopped after {} frames", h.frame_loop.frames());
		}
		listeners.drain();
		animate.borrow_mut().take();
		resize_timer.borrow_mut().take();
		if let Some(l) = loader.borrow_mut().take() {
			l.detach();
		}
	});
	on_cleanup(move || teardown.take()());

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-logo-canvas"
			style="width: 100%; height: 100%; position: absolute; top: 0; left: 0; pointer-events: auto;"
		/>
	}
}
