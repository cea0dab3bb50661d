//! Interactive n-body viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a [`Simulation`] and
//! implements [`eframe::App`] to draw the bodies and expose the simulation
//! parameters through an egui UI. The kernel is only driven through
//! `create_body`, `advance` and the read accessors.

use eframe::App;
use glam::Vec2;
use log::{info, warn};
use nbody_core::{
    ContactTest, MergePolicy, SimConfig, Simulation,
    distribution::{DiskSpawn, random_launch_velocity},
};
use rand::{SeedableRng, rngs::StdRng};

/// Step used by the "Step" button, in simulation seconds.
const MANUAL_STEP: f32 = 1.0 / 30.0;

/// Longest frame time fed into a single `advance` call.
const MAX_FRAME_DT: f32 = 0.1;

/// How Reset places the initial bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SpawnMode {
    /// Uniform angle and radius inside `spawn.max_radius`.
    Disk,
    /// Centre-heavy cloud sized from `spawn.count` alone.
    Clustered,
}

/// Main application state for the interactive viewer.
///
/// ### Fields
/// - `sim` - The simulation being shown.
/// - `cfg` - Editable copy of the simulation config; applied when it differs.
/// - `spawn` - Initial distribution used by Reset.
/// - `mode` - Which scatter Reset uses.
/// - `rng` - Seeded generator for Reset and click launches.
///
/// - `running` - Whether the simulation advances every frame.
/// - `time_scale` - Simulation seconds per wall-clock second.
/// - `zoom` - World-to-screen scale factor.
/// - `pan` - Screen-space pan offset in pixels.
/// - `draw_polygons` - Draw contact polygons instead of plain discs.
///
/// - `click_mass` - Mass of bodies added with a click.
/// - `click_speed` - Bound on each component of a clicked body's velocity.
///
/// - `last_frame_dt` - Simulation time of the last advance (display only).
pub struct Viewer {
    sim: Simulation,
    cfg: SimConfig,
    spawn: DiskSpawn,
    mode: SpawnMode,
    rng: StdRng,

    running: bool,
    time_scale: f32,
    zoom: f32,
    pan: egui::Vec2,
    draw_polygons: bool,

    click_mass: f32,
    click_speed: f32,

    last_frame_dt: f32,
}

impl Viewer {
    /// Creates a viewer with a freshly seeded set of bodies.
    ///
    /// ### Returns
    /// An error if `cfg` does not validate.
    pub fn new(
        cfg: SimConfig,
        spawn: DiskSpawn,
        mode: SpawnMode,
        seed: u64,
    ) -> nbody_core::Result<Self> {
        let mut viewer = Self {
            sim: Simulation::new(cfg)?,
            cfg,
            spawn,
            mode,
            rng: StdRng::seed_from_u64(seed),
            running: false,
            time_scale: 1.0,
            zoom: 1.0,
            pan: egui::vec2(0.0, 0.0),
            draw_polygons: true,
            click_mass: 10.0,
            click_speed: 30.0,
            last_frame_dt: 0.0,
        };
        viewer.populate()?;
        Ok(viewer)
    }

    fn populate(&mut self) -> nbody_core::Result<()> {
        match self.mode {
            SpawnMode::Disk => self.sim.spawn_disk(&self.spawn, &mut self.rng)?,
            SpawnMode::Clustered => self.sim.spawn_clustered(self.spawn.count, &mut self.rng)?,
        };
        Ok(())
    }

    /// Replaces every body with a new scatter and pauses.
    fn reset(&mut self) {
        self.sim.clear();
        if let Err(e) = self.populate() {
            warn!("reset failed: {e}");
        }
        self.running = false;
        info!("reset to {} bodies", self.sim.count());
    }

    fn clear(&mut self) {
        self.sim.clear();
    }

    /// Advances the simulation by `dt` simulation seconds.
    fn step(&mut self, dt: f32) {
        self.sim.advance(dt);
        self.last_frame_dt = dt;
    }

    /// Adds a body of `click_mass` at `pos` with a random launch velocity.
    fn spawn_at(&mut self, pos: Vec2) {
        let velocity = random_launch_velocity(&mut self.rng, self.click_speed);
        match self.sim.create_body(pos, velocity, self.click_mass) {
            Ok(id) => info!("added {id:?} at {pos}"),
            Err(e) => warn!("could not add body: {e}"),
        }
    }

    /// Pushes the edited config into the simulation if it changed.
    ///
    /// An invalid edit is reported and rolled back to the last good config.
    fn apply_config(&mut self) {
        if self.cfg == *self.sim.config() {
            return;
        }
        if let Err(e) = self.sim.set_config(self.cfg) {
            warn!("rejected config change: {e}");
            self.cfg = *self.sim.config();
        }
    }

    /// Converts a world-space position to screen-space, with y pointing up.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`].
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    fn labeled_drag_f32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f32,
        range: std::ops::RangeInclusive<f32>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel (run controls, stepping, zoom).
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
                    self.step(MANUAL_STEP * self.time_scale);
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Clear").clicked() {
                    self.clear();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.05..=20.0).text("Zoom"));
                ui.checkbox(&mut self.draw_polygons, "Polygons");
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt = {:.4}", self.last_frame_dt));
                ui.separator();
                ui.label(format!("total mass = {:.1}", self.sim.total_mass()));
                ui.label(format!("bodies = {}", self.sim.count()));
            });
        });
    }

    /// Builds the right-hand panel for simulation and spawn parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");

                ui.separator();
                ui.label("Physics");
                Self::labeled_drag_f32(ui, "G:", &mut self.cfg.gravity, 0.0..=100.0, 0.01);
                Self::labeled_drag_f32(
                    ui,
                    "softening:",
                    &mut self.cfg.softening,
                    0.0001..=100.0,
                    0.001,
                );
                Self::labeled_drag_f32(ui, "time scale:", &mut self.time_scale, 0.0..=20.0, 0.05);

                ui.separator();
                ui.label("Contact");
                Self::labeled_drag_usize(
                    ui,
                    "vertices:",
                    &mut self.cfg.vertex_count,
                    3..=64,
                    0.2,
                );
                egui::ComboBox::from_label("test")
                    .selected_text(match self.cfg.contact {
                        ContactTest::PolygonSampling => "polygon",
                        ContactTest::CenterDistance => "distance",
                    })
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.cfg.contact,
                            ContactTest::PolygonSampling,
                            "polygon",
                        );
                        ui.selectable_value(
                            &mut self.cfg.contact,
                            ContactTest::CenterDistance,
                            "distance",
                        );
                    });
                egui::ComboBox::from_label("merge")
                    .selected_text(match self.cfg.merge {
                        MergePolicy::KeepWinner => "keep winner",
                        MergePolicy::ConserveMomentum => "momentum",
                    })
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.cfg.merge,
                            MergePolicy::KeepWinner,
                            "keep winner",
                        );
                        ui.selectable_value(
                            &mut self.cfg.merge,
                            MergePolicy::ConserveMomentum,
                            "momentum",
                        );
                    });

                ui.separator();
                ui.label("Spawning");
                egui::ComboBox::from_label("layout")
                    .selected_text(match self.mode {
                        SpawnMode::Disk => "disk",
                        SpawnMode::Clustered => "clustered",
                    })
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.mode, SpawnMode::Disk, "disk");
                        ui.selectable_value(&mut self.mode, SpawnMode::Clustered, "clustered");
                    });
                Self::labeled_drag_usize(ui, "count:", &mut self.spawn.count, 0..=20_000, 10.0);
                Self::labeled_drag_f32(
                    ui,
                    "disk radius:",
                    &mut self.spawn.max_radius,
                    1.0..=5000.0,
                    1.0,
                );
                Self::labeled_drag_f32(ui, "click mass:", &mut self.click_mass, 0.1..=1000.0, 0.5);
                Self::labeled_drag_f32(ui, "click speed:", &mut self.click_speed, 0.0..=200.0, 0.5);

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = SimConfig::default();
                }
            });
        self.apply_config();
    }

    /// Builds the central panel where bodies are drawn and clicked in.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

            if response.dragged() {
                self.pan += response.drag_delta();
            }

            if response.clicked()
                && let Some(p) = response.interact_pointer_pos()
            {
                let world = self.screen_to_world(p, rect);
                self.spawn_at(world);
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.05, 20.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            for body in self.sim.bodies() {
                let screen_radius = body.radius() * self.zoom;
                if self.draw_polygons && screen_radius >= 1.0 {
                    let points: Vec<egui::Pos2> = body
                        .world_vertices()
                        .map(|v| self.world_to_screen(v, rect))
                        .collect();
                    painter.add(egui::Shape::convex_polygon(
                        points,
                        egui::Color32::WHITE,
                        egui::Stroke::NONE,
                    ));
                } else {
                    let center = self.world_to_screen(body.position(), rect);
                    painter.circle_filled(center, screen_radius.max(1.0), egui::Color32::WHITE);
                }
            }

            if self.running {
                let frame_dt = ctx.input(|i| i.stable_dt).min(MAX_FRAME_DT);
                self.step(frame_dt * self.time_scale);
                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
