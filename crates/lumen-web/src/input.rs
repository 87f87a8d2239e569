use std::cell::RefCell;
use std::rc::Rc;

use lumen_frame::pointer_status;
use wasm_bindgen::prelude::*;

use crate::INFO_ID;

/// Latest pointer position read each frame by the application.
pub struct InputState {
    /// Normalized [0, 1] with y down. Starts at the surface centre.
    pub pointer: [f32; 2],
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pointer: [0.5, 0.5],
        }
    }
}

/// Map an element-relative position to [0, 1] on both axes.
/// A zero-sized element maps everything to its centre.
pub fn normalize_pointer(offset_x: f64, offset_y: f64, width: f64, height: f64) -> [f32; 2] {
    if width <= 0.0 || height <= 0.0 {
        return [0.5, 0.5];
    }
    [
        (offset_x / width).clamp(0.0, 1.0) as f32,
        (offset_y / height).clamp(0.0, 1.0) as f32,
    ]
}

fn write_status(pointer: [f32; 2]) {
    let element = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(INFO_ID));
    if let Some(element) = element {
        element.set_text_content(Some(&pointer_status(pointer)));
    }
}

/// Register the pointer listener on the canvas once at init.
/// The closure is leaked via `.forget()` since it lives for the app lifetime.
pub fn register_input_listeners(
    canvas: &web_sys::HtmlCanvasElement,
    state: Rc<RefCell<InputState>>,
) {
    let target: &web_sys::EventTarget = canvas.as_ref();
    let element = canvas.clone();
    let closure =
        Closure::<dyn FnMut(web_sys::PointerEvent)>::new(move |e: web_sys::PointerEvent| {
            let pointer = normalize_pointer(
                e.offset_x() as f64,
                e.offset_y() as f64,
                element.client_width() as f64,
                element.client_height() as f64,
            );
            let mut s = state.borrow_mut();
            if s.pointer != pointer {
                s.pointer = pointer;
                write_status(pointer);
            }
        });
    if let Err(e) =
        target.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())
    {
        log::error!("failed to add pointermove listener: {e:?}");
    }
    closure.forget();
}
