//! Interactive metaball viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the simulation state
//! (circles, field grid, configuration, mesh buffers) and implements
//! [`eframe::App`] to drive and render the simulation through an egui
//! UI. It is the frame driver: it computes and clamps the per-frame
//! time delta, runs the core pipeline, and rasterizes the resulting
//! vertex buffers as egui meshes.

use eframe::App;
use glam::Vec2;
use metaball_core::{
    circle::CircleSet,
    config::{Config, Rgba},
    pipeline::{self, MeshMode, SimState},
    weights,
};

/// Width of the glow→blob blend band above the iso level, matching the
/// fragment-stage ramp the weight path was designed for.
const BLUR_DELTA: f32 = 0.01;

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation core: [`SimState`], [`Config`], the mesh mode.
/// - The static grid tessellation for the weight path (rebuilt only
///   when the grid resolution changes).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If `running`, clamp the elapsed time and call [`SimState::step`].
/// 3. Rasterize the frame's vertex buffer as an egui mesh.
///
/// ### Fields
/// - `state` - Circles, field grid and per-frame mesh buffers.
/// - `cfg` - Global configuration (colors, speed, grid resolution,
///   physics constants).
/// - `mode` - Which geometry path produces the frame's vertices.
///
/// - `positions` - Static tessellation for the weight path; kept in
///   sync with `cfg.cell_count` via [`Viewer::ensure_positions`].
///
/// - `rng` - Random number generator used for respawning circles.
///
/// - `running` - Whether the simulation is currently auto-advancing.
/// - `follow_cursor` - Pin the first circle to the hovered position.
/// - `show_circles` - Overlay circle centers and influence rings.
/// - `spawn_count` - Number of circles the Respawn button creates.
///
/// - `previous_time` - Time stamp of the previous frame (egui time).
/// - `last_elapsed` - The clamped, speed-scaled delta of the last step
///   (for display only).
pub struct Viewer {
    state: SimState,
    cfg: Config,
    mode: MeshMode,

    positions: Vec<f32>,
    positions_cell_count: usize,

    rng: rand::rngs::ThreadRng,

    running: bool,
    follow_cursor: bool,
    show_circles: bool,
    spawn_count: usize,

    previous_time: f64,
    last_elapsed: f32,
}

impl Viewer {
    /// Creates a viewer with the default configuration and the
    /// canonical four-circle scene, auto-running in contour mode.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a viewer from an already-validated configuration.
    pub fn with_config(cfg: Config) -> Self {
        Self {
            state: SimState::new(CircleSet::default_set(), &cfg),
            cfg,
            mode: MeshMode::Contour,
            positions: weights::grid_positions(cfg.cell_count),
            positions_cell_count: cfg.cell_count,
            rng: rand::rng(),
            running: true,
            follow_cursor: false,
            show_circles: false,
            spawn_count: 4,
            previous_time: 0.0,
            last_elapsed: 0.0,
        }
    }

    /// Resets the scene to the canonical circles, keeping the current
    /// configuration and camera-free view settings.
    fn reset(&mut self) {
        self.state = SimState::new(CircleSet::default_set(), &self.cfg);
        self.last_elapsed = 0.0;
    }

    /// Replaces the scene with `spawn_count` random circles.
    fn respawn(&mut self) {
        let circles = CircleSet::random_in_domain(self.spawn_count, &mut self.rng);
        self.state = SimState::new(circles, &self.cfg);
    }

    /// Runs one pipeline step from a raw millisecond delta: clamp per
    /// the frame-delta policy, scale by the configured speed, step.
    fn step_frame(&mut self, raw_ms: f32) {
        let elapsed = pipeline::clamp_elapsed(raw_ms, &self.cfg) * self.cfg.speed;
        self.state.step(elapsed, &self.cfg, self.mode);
        self.last_elapsed = elapsed;
    }

    /// Rebuilds the static tessellation when the grid resolution
    /// changed since it was last generated.
    fn ensure_positions(&mut self) {
        if self.positions_cell_count != self.cfg.cell_count {
            self.positions = weights::grid_positions(self.cfg.cell_count);
            self.positions_cell_count = self.cfg.cell_count;
            log::debug!(
                "rebuilt static tessellation for cell_count = {}",
                self.cfg.cell_count
            );
        }
    }

    /// Scale factor mapping the `[-1, 1]` domain into `rect`, fitting
    /// the largest centered square.
    fn view_scale(rect: egui::Rect) -> f32 {
        0.5 * rect.width().min(rect.height())
    }

    /// Converts a world-space position to screen-space.
    ///
    /// The fixed `[-1, 1]²` domain is centered in `rect`; the y-axis is
    /// flipped so that positive y goes up in world space.
    fn world_to_screen(p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let scale = Self::view_scale(rect);
        let center = rect.center();
        egui::pos2(center.x + p.x * scale, center.y - p.y * scale)
    }

    /// Converts a screen-space position back to world-space; the
    /// inverse of [`Viewer::world_to_screen`] up to rounding.
    fn screen_to_world(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let scale = Self::view_scale(rect);
        let center = rect.center();
        Vec2::new((p.x - center.x) / scale, (center.y - p.y) / scale)
    }

    /// Color for one field weight, porting the original fragment ramp:
    /// background→glow below the iso level, glow→blob across a narrow
    /// blur band, solid blob above it.
    fn weight_color(&self, w: f32) -> egui::Color32 {
        let iso = self.cfg.iso_level;
        let rgba = if w < iso {
            let factor = ((w / iso - 0.5).max(0.0)) * 2.0;
            mix(self.cfg.background, self.cfg.glow, factor)
        } else if w < iso + BLUR_DELTA {
            let factor = (w - iso) / BLUR_DELTA;
            mix(self.cfg.glow, self.cfg.blob, factor)
        } else {
            self.cfg.blob
        };
        to_color32(rgba)
    }

    /// Draws the weight path: the static tessellation with per-vertex
    /// ramp colors, letting the rasterizer interpolate across
    /// triangles.
    fn draw_weight_mesh(&self, painter: &egui::Painter, rect: egui::Rect) {
        let weights = &self.state.weights;
        if weights.is_empty() || weights.len() * 2 != self.positions.len() {
            return;
        }

        let mut mesh = egui::Mesh::default();
        for (k, &w) in weights.iter().enumerate() {
            let world = Vec2::new(self.positions[2 * k], self.positions[2 * k + 1]);
            mesh.colored_vertex(Self::world_to_screen(world, rect), self.weight_color(w));
        }
        mesh.indices = (0..weights.len() as u32).collect();
        painter.add(egui::Shape::mesh(mesh));
    }

    /// Draws the contour path: background fill plus the extracted
    /// iso-contour triangles in the blob color.
    fn draw_contour_mesh(&self, painter: &egui::Painter, rect: egui::Rect) {
        painter.rect_filled(rect, egui::CornerRadius::ZERO, to_color32(self.cfg.background));

        let triangles = &self.state.triangles;
        if triangles.is_empty() {
            return;
        }

        let color = to_color32(self.cfg.blob);
        let mut mesh = egui::Mesh::default();
        for p in triangles.chunks(2) {
            mesh.colored_vertex(Self::world_to_screen(Vec2::new(p[0], p[1]), rect), color);
        }
        mesh.indices = (0..(triangles.len() / 2) as u32).collect();
        painter.add(egui::Shape::mesh(mesh));
    }

    /// Overlay with circle centers and influence rings.
    fn draw_circles(&self, painter: &egui::Painter, rect: egui::Rect) {
        let scale = Self::view_scale(rect);
        for c in &self.state.circles.circles {
            let p = Self::world_to_screen(c.pos, rect);
            painter.circle_stroke(p, c.r * scale, egui::Stroke::new(1.0, egui::Color32::WHITE));
            painter.circle_filled(p, 2.0, egui::Color32::WHITE);
        }
    }

    /// Builds the top panel UI (run controls, mesh mode, speed, grid).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                if ui.button("Step").clicked() {
                    // A zero delta takes the substitution path and steps
                    // by the full frame cap.
                    self.step_frame(0.0);
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                ui.selectable_value(&mut self.mode, MeshMode::Contour, "Contour");
                ui.selectable_value(&mut self.mode, MeshMode::Weights, "Weights");

                ui.separator();
                ui.add(
                    egui::DragValue::new(&mut self.cfg.speed)
                        .prefix("speed = ")
                        .range(0.05..=10.0)
                        .speed(0.05),
                );
                ui.add(
                    egui::DragValue::new(&mut self.cfg.cell_count)
                        .prefix("cells = ")
                        .range(1..=256)
                        .speed(1),
                );
            });
        });
    }

    /// Builds the bottom status bar (frame delta, buffer sizes).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt = {:.1} ms", self.last_elapsed));
                ui.separator();
                let vertices = match self.mode {
                    MeshMode::Contour => self.state.triangles.len() / 2,
                    MeshMode::Weights => self.state.weights.len(),
                };
                ui.label(format!("vertices = {vertices}"));
                ui.label(format!("circles = {}", self.state.circles.circles.len()));
            });
        });
    }

    /// Builds the right-hand configuration panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Colors");
                Self::color_row(ui, "background:", &mut self.cfg.background);
                Self::color_row(ui, "glow:", &mut self.cfg.glow);
                Self::color_row(ui, "blob:", &mut self.cfg.blob);

                ui.separator();
                ui.label("Circles");
                ui.horizontal(|ui| {
                    ui.label("count:");
                    ui.add(egui::DragValue::new(&mut self.spawn_count).range(1..=64).speed(1));
                    if ui.button("Respawn").clicked() {
                        self.respawn();
                    }
                });
                ui.checkbox(&mut self.follow_cursor, "cursor drives first circle");
                ui.checkbox(&mut self.show_circles, "show circle outlines");

                ui.separator();
                if ui.button("Reset config to default").clicked() {
                    self.cfg = Config::default();
                }
            });
    }

    /// Helper to draw a labeled RGBA color button editing an [`Rgba`].
    fn color_row(ui: &mut egui::Ui, label: &str, color: &mut Rgba) {
        ui.horizontal(|ui| {
            ui.label(label);
            let mut arr = color.to_array();
            if ui.color_edit_button_rgba_unmultiplied(&mut arr).changed() {
                *color = Rgba::new(arr[0], arr[1], arr[2], arr[3]);
            }
        });
    }

    /// Builds the central panel: input handling, the pipeline step and
    /// the mesh rasterization.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pin the first circle to the cursor while enabled.
            if self.follow_cursor
                && let Some(pos) = response.hover_pos()
                && let Some(first) = self.state.circles.circles.first_mut()
            {
                let world = Self::screen_to_world(pos, rect);
                first.pos = world.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
            }

            let now = ctx.input(|i| i.time);
            let raw_ms = ((now - self.previous_time) * 1000.0) as f32;
            self.previous_time = now;

            if self.running {
                self.step_frame(raw_ms);
                ctx.request_repaint();
            }

            self.ensure_positions();

            match self.mode {
                MeshMode::Contour => self.draw_contour_mesh(&painter, rect),
                MeshMode::Weights => self.draw_weight_mesh(&painter, rect),
            }

            if self.show_circles {
                self.draw_circles(&painter, rect);
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

fn mix(a: Rgba, b: Rgba, t: f32) -> Rgba {
    Rgba::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}

fn to_color32(c: Rgba) -> egui::Color32 {
    let ch = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(ch(c.r), ch(c.g), ch(c.b), ch(c.a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let rect = test_rect();
        let eps = 1e-5;

        for p in [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(-0.35, 0.825),
        ] {
            let screen = Viewer::world_to_screen(p, rect);
            let back = Viewer::screen_to_world(screen, rect);
            assert!(
                (back.x - p.x).abs() < eps && (back.y - p.y).abs() < eps,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
    }

    #[test]
    fn domain_center_maps_to_rect_center() {
        let rect = test_rect();
        let center = Viewer::world_to_screen(Vec2::ZERO, rect);
        assert_eq!(center, rect.center());
    }

    #[test]
    fn weight_ramp_hits_the_documented_anchors() {
        let viewer = Viewer::new();
        let cfg = viewer.cfg;

        // Far outside: pure background. At the iso level: pure glow.
        // Past the blur band: pure blob.
        assert_eq!(viewer.weight_color(0.0), to_color32(cfg.background));
        assert_eq!(viewer.weight_color(cfg.iso_level), to_color32(cfg.glow));
        assert_eq!(
            viewer.weight_color(cfg.iso_level + BLUR_DELTA),
            to_color32(cfg.blob)
        );
        assert_eq!(viewer.weight_color(cfg.field_cap), to_color32(cfg.blob));

        // Halfway up the below-iso ramp: an even background/glow mix.
        assert_eq!(
            viewer.weight_color(0.75),
            to_color32(mix(cfg.background, cfg.glow, 0.5))
        );
    }

    #[test]
    fn step_frame_applies_the_delta_policy() {
        let mut viewer = Viewer::new();
        let before = viewer.state.circles.circles[0].pos;

        // A zero delta substitutes the frame cap.
        viewer.step_frame(0.0);
        assert_eq!(viewer.last_elapsed, viewer.cfg.max_elapsed * viewer.cfg.speed);
        assert_ne!(viewer.state.circles.circles[0].pos, before);

        // A normal delta passes through scaled by speed.
        viewer.step_frame(16.0);
        assert_eq!(viewer.last_elapsed, 16.0 * viewer.cfg.speed);
    }

    #[test]
    fn reset_restores_the_canonical_scene() {
        let mut viewer = Viewer::new();
        viewer.spawn_count = 9;
        viewer.respawn();
        assert_eq!(viewer.state.circles.circles.len(), 9);

        viewer.step_frame(16.0);
        viewer.reset();

        assert_eq!(viewer.state.circles.circles.len(), 4);
        assert_eq!(viewer.last_elapsed, 0.0);
        assert!(viewer.state.triangles.is_empty());
    }

    #[test]
    fn tessellation_follows_the_grid_resolution() {
        let mut viewer = Viewer::new();
        let before = viewer.positions.len();

        viewer.cfg.cell_count = 10;
        viewer.ensure_positions();

        assert_ne!(viewer.positions.len(), before);
        assert_eq!(viewer.positions.len(), 10 * 10 * 12);
    }
}
