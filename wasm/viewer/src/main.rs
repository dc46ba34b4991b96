//! Native preview: runs the same app the web canvas hosts.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), eframe::Error> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let ui_visible = std::rc::Rc::new(std::cell::Cell::new(true));
    let pointer_over_ui = std::rc::Rc::new(std::cell::Cell::new(false));
    let pending_spawn = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));

    eframe::run_native(
        "pipeworks",
        eframe::NativeOptions::default(),
        Box::new(move |_cc| {
            Ok(Box::new(pipeworks_viewer::ViewerApp::new(
                seed,
                ui_visible,
                pointer_over_ui,
                pending_spawn,
            )))
        }),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
