use std::collections::HashMap;

use egui::{pos2, vec2, Color32, FontFamily, FontId, Pos2, Rect, Stroke, TextStyle};
use pipeworks::{
    Bounds, Cell, Dir, PipeConfig, PipeGrower, PlacementError, Rgb, SegmentSink, VentConfig,
    VentEvent, VentGrower,
};

/// Which engine the viewer is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Pipes,
    Vent,
}

/// A placed unit the renderer knows how to draw.
#[derive(Debug, Clone, Copy)]
enum SceneUnit {
    Straight { from: Cell, dir: Dir, color: Rgb },
    Bend { at: Cell, to_dir: Dir, color: Rgb },
}

/// Render-side [`SegmentSink`]: stores geometry in a handle-keyed map so
/// the bounded engine can retire (erase) old segments.
#[derive(Default)]
struct Scene {
    next_id: u64,
    units: HashMap<u64, SceneUnit>,
}

impl Scene {
    fn clear(&mut self) {
        self.units.clear();
    }

    fn insert(&mut self, unit: SceneUnit) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.units.insert(id, unit);
        id
    }
}

impl SegmentSink for Scene {
    type Handle = u64;

    fn place_straight(&mut self, from: Cell, dir: Dir, color: Rgb) -> Result<u64, PlacementError> {
        Ok(self.insert(SceneUnit::Straight { from, dir, color }))
    }

    fn place_bend(
        &mut self,
        at: Cell,
        _from_dir: Dir,
        to_dir: Dir,
        color: Rgb,
    ) -> Result<u64, PlacementError> {
        Ok(self.insert(SceneUnit::Bend { at, to_dir, color }))
    }

    fn retire(&mut self, handle: u64) {
        self.units.remove(&handle);
    }
}

/// Renderer: isometric projection + pixel-ish quantization.
struct IsoRenderer {
    scale: f32,
    pixel: f32,
}

impl Default for IsoRenderer {
    fn default() -> Self {
        Self {
            scale: 10.0,
            pixel: 3.0,
        }
    }
}

impl IsoRenderer {
    fn project(&self, x: f32, y: f32, z: f32) -> Pos2 {
        let sx = (x - y) * self.scale;
        let sy = (x + y) * 0.5 * self.scale - z * self.scale;
        pos2(sx, sy)
    }
}

fn to_color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.r, c.g, c.b)
}

fn lighten(base: Color32) -> Color32 {
    let [r, g, b, _] = base.to_array();
    Color32::from_rgb(
        r.saturating_add(50),
        g.saturating_add(50),
        b.saturating_add(50),
    )
}

fn darken(base: Color32) -> Color32 {
    let [r, g, b, _] = base.to_array();
    Color32::from_rgb(r / 2, g / 2, b / 2)
}

const BACKGROUND: Color32 = Color32::from_rgb(8, 12, 16);

/// Failed bounded-engine attempts retried within a single tick. Failures
/// carry no pacing delay, but the driver still has to bound the retry
/// loop to keep a frame from stalling.
const MAX_RETRIES_PER_TICK: u32 = 64;

pub struct ViewerApp {
    pub ui_visible: std::rc::Rc<std::cell::Cell<bool>>,
    pub pointer_over_ui: std::rc::Rc<std::cell::Cell<bool>>,
    pub pending_spawn: std::rc::Rc<std::cell::RefCell<Vec<(f32, f32)>>>,

    renderer: IsoRenderer,
    mode: Mode,
    seed: u64,
    speed: f32,
    accumulator: f32,

    pipes: PipeGrower,
    pipes_scene: Scene,
    vent: VentGrower<u64>,
    vent_scene: Scene,
}

impl ViewerApp {
    pub fn new(
        seed: u64,
        ui_visible: std::rc::Rc<std::cell::Cell<bool>>,
        pointer_over_ui: std::rc::Rc<std::cell::Cell<bool>>,
        pending_spawn: std::rc::Rc<std::cell::RefCell<Vec<(f32, f32)>>>,
    ) -> Self {
        Self {
            ui_visible,
            pointer_over_ui,
            pending_spawn,
            renderer: IsoRenderer::default(),
            mode: Mode::Pipes,
            seed,
            speed: 40.0,
            accumulator: 0.0,
            pipes: Self::make_pipes(seed),
            pipes_scene: Scene::default(),
            vent: Self::make_vent(seed),
            vent_scene: Scene::default(),
        }
    }

    fn make_pipes(seed: u64) -> PipeGrower {
        let cfg = PipeConfig {
            bounds: Bounds::cube(22),
            seed,
            ..Default::default()
        };
        PipeGrower::new(cfg).expect("default pipe config is valid")
    }

    fn make_vent(seed: u64) -> VentGrower<u64> {
        let cfg = VentConfig {
            initial_grid_size: 12,
            initial_max_len: 120,
            seed,
            ..Default::default()
        };
        VentGrower::new(cfg).expect("default vent config is valid")
    }

    fn reset(&mut self) {
        self.seed = self.seed.wrapping_add(1);
        log::info!("resetting engines with seed {}", self.seed);
        self.pipes = Self::make_pipes(self.seed);
        self.pipes_scene.clear();
        self.vent = Self::make_vent(self.seed);
        self.vent_scene.clear();
    }

    /// One simulation tick for the active engine.
    fn tick(&mut self) {
        match self.mode {
            Mode::Pipes => {
                self.pipes.step(&mut self.pipes_scene);
            }
            Mode::Vent => {
                // Pace only successful placements; retries are free.
                for _ in 0..MAX_RETRIES_PER_TICK {
                    if let VentEvent::Placed { .. } = self.vent.step(&mut self.vent_scene) {
                        break;
                    }
                }
            }
        }
    }

    fn iso_centered(&self, rect: Rect, x: f32, y: f32, z: f32) -> Pos2 {
        self.renderer.project(x, y, z) + rect.center().to_vec2()
    }

    /// Software rasterizer: steps along the line drawing snapped squares
    /// so segments keep the chunky 8-bit look.
    fn draw_pixel_line(
        &self,
        painter: &egui::Painter,
        p1: Pos2,
        p2: Pos2,
        color: Color32,
        thickness_in_pixels: f32,
    ) {
        let px = self.renderer.pixel.max(1.0);
        let d = p2 - p1;
        let len = d.length();
        if len < 0.1 {
            return;
        }

        let step_size = px * 0.5;
        let steps = (len / step_size).ceil() as i32;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let pos = p1 + d * t;
            let cx = (pos.x / px).round() * px;
            let cy = (pos.y / px).round() * px;
            let size = px * thickness_in_pixels;
            let r = Rect::from_center_size(pos2(cx, cy), vec2(size, size));
            painter.rect_filled(r, 0.0, color);
        }
    }

    fn draw_tube(&self, painter: &egui::Painter, a: Pos2, b: Pos2, color: Color32) {
        let px = self.renderer.pixel.max(1.0);
        let s = self.renderer.scale;

        let base_thick = ((0.9 * s) / px).max(1.0);
        let shadow_thick = ((1.2 * s) / px).max(1.0);
        let high_thick = ((0.3 * s) / px).max(1.0);

        let d = (b - a).normalized();
        let perp = vec2(-d.y, d.x);

        self.draw_pixel_line(painter, a + perp * px, b + perp * px, darken(color), shadow_thick);
        self.draw_pixel_line(painter, a, b, color, base_thick);
        self.draw_pixel_line(
            painter,
            a - perp * px * 0.5,
            b - perp * px * 0.5,
            lighten(color),
            high_thick,
        );
    }

    fn draw_scene(&self, painter: &egui::Painter, rect: Rect) {
        let scene = match self.mode {
            Mode::Pipes => &self.pipes_scene,
            Mode::Vent => &self.vent_scene,
        };

        struct Cmd {
            from: Cell,
            to: Cell,
            color: Rgb,
            depth: f32,
        }

        let mut cmds: Vec<Cmd> = scene
            .units
            .values()
            .map(|unit| {
                let (from, to, color) = match *unit {
                    SceneUnit::Straight { from, dir, color } => (from, from.step(dir), color),
                    SceneUnit::Bend { at, to_dir, color } => (at, at.step(to_dir), color),
                };
                let depth = (from.x + to.x + from.y + to.y + from.z + to.z) as f32 * 0.5;
                Cmd {
                    from,
                    to,
                    color,
                    depth,
                }
            })
            .collect();

        // Far-to-near so closer segments draw last.
        cmds.sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(std::cmp::Ordering::Equal));

        for cmd in cmds {
            let a = self.iso_centered(
                rect,
                cmd.from.x as f32,
                cmd.from.y as f32,
                cmd.from.z as f32,
            );
            let b = self.iso_centered(rect, cmd.to.x as f32, cmd.to.y as f32, cmd.to.z as f32);
            self.draw_tube(painter, a, b, to_color32(cmd.color));
        }
    }

    fn settings_window(&mut self, ctx: &egui::Context, border: Stroke) {
        egui::Window::new("pipeworks")
            .default_pos((16.0, 16.0))
            .frame(
                egui::Frame::none()
                    .fill(Color32::TRANSPARENT)
                    .rounding(egui::Rounding::ZERO)
                    .stroke(border),
            )
            .show(ctx, |ui| {
                let before = self.mode;
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.mode, Mode::Pipes, "pipes");
                    ui.selectable_value(&mut self.mode, Mode::Vent, "vent");
                });
                if self.mode != before {
                    self.accumulator = 0.0;
                }

                ui.add(egui::Slider::new(&mut self.speed, 5.0..=240.0).text("speed"));
                ui.add(egui::Slider::new(&mut self.renderer.scale, 6.0..=26.0).text("scale"));
                ui.add(egui::Slider::new(&mut self.renderer.pixel, 1.0..=8.0).text("pixel"));

                match self.mode {
                    Mode::Pipes => {
                        if self.pipes.is_exhausted() {
                            ui.label("domain saturated");
                        } else {
                            ui.label(format!(
                                "{} free seed cells",
                                self.pipes.candidates_remaining()
                            ));
                        }
                    }
                    Mode::Vent => {
                        ui.label(format!(
                            "window {}/{} | grid ±{}",
                            self.vent.len(),
                            self.vent.max_len(),
                            self.vent.half_extent()
                        ));
                    }
                }

                if ui.button("reset").clicked() {
                    self.reset();
                }
            });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Dark, high contrast, monospace.
        let mut style = (*ctx.style()).clone();
        style.text_styles = [
            (TextStyle::Heading, FontId::new(18.0, FontFamily::Monospace)),
            (TextStyle::Body, FontId::new(14.0, FontFamily::Monospace)),
            (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
            (TextStyle::Button, FontId::new(14.0, FontFamily::Monospace)),
            (TextStyle::Small, FontId::new(12.0, FontFamily::Monospace)),
        ]
        .into();

        let gray_text = Color32::from_gray(160);
        let gray_border = Stroke::new(1.0, gray_text);

        style.visuals.window_fill = Color32::from_rgba_unmultiplied(0, 0, 0, 120);
        style.visuals.panel_fill = Color32::from_rgba_unmultiplied(0, 0, 0, 120);
        style.visuals.window_rounding = egui::Rounding::ZERO;
        style.visuals.widgets.noninteractive.fg_stroke = gray_border;
        style.visuals.widgets.inactive.fg_stroke = gray_border;
        style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::from_gray(220));
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::from_gray(240));
        style.visuals.widgets.noninteractive.bg_stroke = gray_border;
        style.visuals.widgets.inactive.bg_stroke = gray_border;
        style.visuals.widgets.hovered.bg_stroke = gray_border;
        style.visuals.widgets.active.bg_stroke = gray_border;
        style.visuals.override_text_color = Some(gray_text);
        ctx.set_style(style);

        // Drain click events (unused for now).
        self.pending_spawn.borrow_mut().clear();

        // Step simulation based on time. The bounded engine's pacing
        // hint stretches its tick interval relative to the speed knob.
        let dt = ctx.input(|i| i.unstable_dt).max(0.0);
        let rate = match self.mode {
            Mode::Pipes => self.speed,
            Mode::Vent => self.speed / self.vent.pace().max(0.05),
        };
        self.accumulator += dt * rate;
        while self.accumulator >= 1.0 {
            self.tick();
            self.accumulator -= 1.0;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 0.0, BACKGROUND);
                self.draw_scene(&painter, rect);
            });

        self.pointer_over_ui.set(ctx.is_pointer_over_area());

        if self.ui_visible.get() {
            self.settings_window(ctx, gray_border);
        }

        ctx.request_repaint();
    }
}
