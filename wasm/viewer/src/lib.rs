mod app;

#[cfg(target_arch = "wasm32")]
mod web;

pub use app::ViewerApp;

#[cfg(target_arch = "wasm32")]
pub use web::WebHandle;
