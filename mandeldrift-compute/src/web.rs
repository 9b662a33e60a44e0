//! Browser glue: requestAnimationFrame scheduling, canvas presentation and
//! console logging. Only compiled for wasm32.

use crate::frame_buffer::{FrameBuffer, FrameSink};
use crate::orbit::AnchorPoint;
use crate::renderer::RendererState;
use crate::scheduler::{drive, AnimationHandle, Scheduler, TickCallback};
use crate::surface::RgbaSurface;
use mandeldrift_core::{BackgroundConfig, PixelRect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

/// Install console logging and the panic hook.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(level);
}

/// Get the current time in milliseconds.
pub fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Ticks on the display's refresh via `requestAnimationFrame`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RafScheduler;

impl Scheduler for RafScheduler {
    fn request_next_tick(&self, callback: TickCallback) {
        let Some(window) = web_sys::window() else {
            log::error!("no window; animation loop stopped");
            return;
        };
        let closure = Closure::once_into_js(move |time_ms: f64| callback(time_ms));
        if let Err(e) = window.request_animation_frame(closure.unchecked_ref()) {
            web_sys::console::error_1(&e);
        }
    }
}

/// Get 2D rendering context from canvas.
pub fn get_2d_context(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("No 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Draw RGBA pixel data to canvas at specified position.
fn draw_pixels(
    ctx: &CanvasRenderingContext2d,
    pixels: &[u8],
    width: u32,
    height: u32,
    x: f64,
    y: f64,
) -> Result<(), JsValue> {
    let image_data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(pixels), width, height)?;
    ctx.put_image_data(&image_data, x, y)
}

/// Blits dirty columns of the fractal layer and the whole overlay each tick.
pub struct CanvasSink {
    fractal: CanvasRenderingContext2d,
    overlay: Option<CanvasRenderingContext2d>,
}

impl CanvasSink {
    pub fn new(
        fractal: &HtmlCanvasElement,
        overlay: Option<&HtmlCanvasElement>,
    ) -> Result<Self, JsValue> {
        Ok(Self {
            fractal: get_2d_context(fractal)?,
            overlay: overlay.map(get_2d_context).transpose()?,
        })
    }
}

impl FrameSink for CanvasSink {
    fn present(&mut self, frame: &FrameBuffer, dirty: PixelRect) {
        if dirty.is_empty() {
            return;
        }
        let rgba = frame.rgba_region(dirty);
        if let Err(e) = draw_pixels(
            &self.fractal,
            &rgba,
            dirty.width,
            dirty.height,
            dirty.x as f64,
            dirty.y as f64,
        ) {
            web_sys::console::error_1(&e);
        }
    }

    fn present_overlay(&mut self, overlay: &RgbaSurface) {
        let Some(ctx) = &self.overlay else {
            return;
        };
        if overlay.is_empty() {
            return;
        }
        if let Err(e) = draw_pixels(
            ctx,
            overlay.pixels(),
            overlay.width(),
            overlay.height(),
            0.0,
            0.0,
        ) {
            web_sys::console::error_1(&e);
        }
    }
}

/// Handle the page shell holds on to.
#[wasm_bindgen]
pub struct WebBackground {
    state: Rc<RefCell<RendererState>>,
    handle: AnimationHandle,
}

#[wasm_bindgen]
impl WebBackground {
    /// Start animating onto `fractal` (at render resolution) and, if given,
    /// `overlay` (at display resolution). `config_json` may be empty.
    #[wasm_bindgen(constructor)]
    pub fn start(
        fractal: &HtmlCanvasElement,
        overlay: Option<HtmlCanvasElement>,
        config_json: &str,
    ) -> Result<WebBackground, JsValue> {
        init_logging(log::Level::Info);

        let config = if config_json.trim().is_empty() {
            BackgroundConfig::default()
        } else {
            BackgroundConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let state = RendererState::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let sink = CanvasSink::new(fractal, overlay.as_ref())?;

        let state = Rc::new(RefCell::new(state));
        let handle = drive(
            Rc::clone(&state),
            Rc::new(RafScheduler),
            Rc::new(RefCell::new(sink)),
        );
        Ok(WebBackground { state, handle })
    }

    /// Display size in CSS pixels. The fractal canvas should be sized to
    /// `render_scale` of this.
    pub fn resize(&self, width: u32, height: u32) {
        self.state.borrow_mut().resize(width, height);
    }

    pub fn set_anchor(&self, x: f64, y: f64) {
        self.state.borrow_mut().set_anchor(AnchorPoint::new(x, y));
    }

    pub fn stats_json(&self) -> Result<String, JsValue> {
        self.state
            .borrow()
            .stats()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn stop(&self) {
        self.handle.stop();
    }
}
