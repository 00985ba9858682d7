//! Native GUI viewer using egui
//!
//! Projected globe and route with mouse orbit controls, the launch animation,
//! and the stats overlay (run distance, milestones, cosmic conditions).

use eframe::egui;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::geo;
use crate::journey::{Journey, JourneyState};
use crate::milestone::{self, Milestone, MilestoneTrack};
use crate::projection::{self, GLOBE_RADIUS};

/// How long the milestone-reached banner stays up
const NOTIFICATION_SECS: f64 = 3.0;

/// Run the native GUI viewer
pub fn run_viewer(config: Config) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Cosmic Stride"),
        ..Default::default()
    };

    eframe::run_native(
        "Cosmic Stride",
        options,
        Box::new(|cc| Ok(Box::new(StrideApp::new(cc, config)?))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

/// A route with its computed distances and projected path
struct LoadedRoute {
    name: String,
    path: Vec<[f32; 3]>,
    distance_km: f64,
}

struct StrideApp {
    config: Config,
    track: MilestoneTrack,
    selected_route: String,
    route: Option<LoadedRoute>,
    journey: Journey,
    // Camera state
    camera_angle_x: f32, // Pitch (up/down)
    camera_angle_y: f32, // Yaw (left/right)
    camera_target: [f32; 2], // Pan offset
    zoom: f32,
    // UI state
    show_grid: bool,
    auto_rotate: bool,
    // Milestone notification
    notified_threshold: Option<f64>,
    notification: Option<(Milestone, f64)>,
}

impl StrideApp {
    fn new(cc: &eframe::CreationContext<'_>, config: Config) -> anyhow::Result<Self> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let track = config.milestone_track()?;
        let selected_route = config
            .routes
            .first()
            .map(|r| r.id.clone())
            .unwrap_or_default();

        let mut app = Self {
            config,
            track,
            selected_route,
            route: None,
            journey: Journey::default(),
            camera_angle_x: 0.0,
            camera_angle_y: 0.0,
            camera_target: [0.0, 0.0],
            zoom: 1.0,
            show_grid: false,
            auto_rotate: true,
            notified_threshold: None,
            notification: None,
        };
        app.load_route();
        Ok(app)
    }

    fn load_route(&mut self) {
        let route = match self.config.get_route(&self.selected_route) {
            Some(r) => r,
            None => {
                warn!("Route not found: {}", self.selected_route);
                self.route = None;
                return;
            }
        };

        let distance_km = geo::route_distance_km(&route.points);
        let path = projection::project_route(&route.points);
        info!(
            "Loaded route '{}': {} points, {:.3} km",
            route.id,
            path.len(),
            distance_km
        );

        self.route = Some(LoadedRoute {
            name: route.name.clone(),
            path,
            distance_km,
        });
        self.journey.reset();
        self.notified_threshold = None;
        self.notification = None;
    }

    /// Run distance shown so far: total scaled by animation progress
    fn display_distance_km(&self) -> f64 {
        let total = self.route.as_ref().map(|r| r.distance_km).unwrap_or(0.0);
        total * self.journey.fraction()
    }

    /// Pop the milestone banner when a new threshold is crossed mid-animation
    fn update_notification(&mut self, dt: f64) {
        if let Some((_, remaining)) = &mut self.notification {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.notification = None;
            }
        }

        if !self.journey.is_running() {
            return;
        }
        let d = self.display_distance_km();
        if let Some(current) = self.track.current(d) {
            if self.notified_threshold != Some(current.distance_km) {
                debug!("Milestone reached: {}", current.name);
                self.notified_threshold = Some(current.distance_km);
                self.notification = Some((current.clone(), NOTIFICATION_SECS));
            }
        }
    }

    /// Orthographic camera: yaw then pitch rotation, drop Z, then pan
    fn project_point(&self, p: [f32; 3]) -> [f64; 2] {
        let cos_x = self.camera_angle_x.cos();
        let sin_x = self.camera_angle_x.sin();
        let cos_y = self.camera_angle_y.cos();
        let sin_y = self.camera_angle_y.sin();

        // Rotate around Y axis (yaw)
        let x1 = p[0] * cos_y + p[2] * sin_y;
        let z1 = -p[0] * sin_y + p[2] * cos_y;

        // Rotate around X axis (pitch)
        let y1 = p[1] * cos_x - z1 * sin_x;

        [
            (x1 + self.camera_target[0]) as f64,
            (y1 + self.camera_target[1]) as f64,
        ]
    }

    fn center_view(&mut self) {
        self.camera_angle_x = 0.0;
        self.camera_angle_y = 0.0;
        self.camera_target = [0.0, 0.0];
        self.zoom = 1.0;
    }

    fn stats_panel(&self, ui: &mut egui::Ui) {
        let d = self.display_distance_km();

        ui.heading("Your Run");
        ui.label(
            egui::RichText::new(format!("{:.2} km", d))
                .size(28.0)
                .strong(),
        );
        ui.label(format!(
            "{:.0} km into space (1 km run = 100 km space)",
            milestone::space_distance_simple_km(d)
        ));
        ui.separator();

        if let Some(current) = self.track.current(d) {
            ui.heading("Achievement");
            ui.label(format!("{} {}", current.icon, current.name));
            ui.label(egui::RichText::new(&current.altitude).weak());
            if let Some(desc) = &current.description {
                ui.label(egui::RichText::new(desc).italics().weak());
            }
            ui.separator();
        }

        if let Some(next) = self.track.next(d) {
            ui.heading("Next Goal");
            ui.label(format!("{} {}", next.icon, next.name));
            ui.label(egui::RichText::new(&next.altitude).weak());
            ui.label(format!("{:.1} km to go", next.distance_km - d));
            let progress = self.track.progress_percent(d);
            ui.add(
                egui::ProgressBar::new((progress / 100.0) as f32)
                    .text(format!("{:.1}%", progress)),
            );
            ui.separator();
        }

        ui.heading("Cosmic Conditions");
        let c = &self.config.conditions;
        egui::Grid::new("conditions").num_columns(2).show(ui, |ui| {
            ui.label("UV Index");
            ui.label(format!("{}/11", c.uv_index));
            ui.end_row();
            ui.label("Solar Wind");
            ui.label(format!("{:.0} km/s", c.solar_wind_kms));
            ui.end_row();
            ui.label("Kp Index");
            ui.label(format!("{}/9", c.kp_index));
            ui.end_row();
            ui.label("Temp");
            ui.label(format!("{:.0} \u{b0}C", c.temperature_c));
            ui.end_row();
        });
    }

    fn milestone_list(&self, ui: &mut egui::Ui) {
        let d = self.display_distance_km();
        ui.heading("Milestones");
        egui::ScrollArea::vertical().show(ui, |ui| {
            for m in self.track.milestones() {
                let reached = d >= m.distance_km;
                let marker = if reached { "\u{2713}" } else { "\u{2022}" };
                let text = format!("{} {} {} ({} km)", marker, m.icon, m.name, m.distance_km);
                if reached {
                    ui.colored_label(egui::Color32::from_rgb(120, 220, 160), text);
                } else {
                    ui.weak(text);
                }
            }
        });
    }
}

impl eframe::App for StrideApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Continuous repaint keeps the animation and camera smooth
        ctx.request_repaint();

        let dt = ctx.input(|i| i.stable_dt).min(0.1);
        self.journey.tick(Duration::from_secs_f32(dt));
        self.update_notification(dt as f64);

        if self.auto_rotate && !self.journey.is_running() {
            self.camera_angle_y += 0.2 * dt;
        }

        // Left panel - journey controls and stats
        egui::SidePanel::left("journey_panel").min_width(280.0).show(ctx, |ui| {
            ui.heading("Cosmic Stride");
            ui.label(egui::RichText::new("Every step on Earth is a journey to space").weak());
            ui.separator();

            let old_route = self.selected_route.clone();
            ui.horizontal(|ui| {
                ui.label("Route:");
                egui::ComboBox::from_id_salt("route")
                    .selected_text(
                        self.route
                            .as_ref()
                            .map(|r| r.name.as_str())
                            .unwrap_or("none"),
                    )
                    .show_ui(ui, |ui| {
                        for route in &self.config.routes {
                            ui.selectable_value(
                                &mut self.selected_route,
                                route.id.clone(),
                                &route.name,
                            );
                        }
                    });
            });
            if self.selected_route != old_route {
                self.load_route();
            }

            ui.horizontal(|ui| {
                match self.journey.state() {
                    JourneyState::Idle => {
                        if ui.button("\u{1F680} Launch Journey").clicked() {
                            self.journey.launch();
                        }
                    }
                    JourneyState::Running => {
                        ui.spinner();
                        ui.label(format!(
                            "Traveling... {:.0}%",
                            self.journey.progress_percent()
                        ));
                    }
                    JourneyState::Complete => {
                        if ui.button("\u{1F504} Restart Journey").clicked() {
                            self.journey.launch();
                            self.notified_threshold = None;
                        }
                        if ui.button("Reset").clicked() {
                            self.journey.reset();
                            self.notified_threshold = None;
                        }
                    }
                }
            });

            ui.separator();
            self.stats_panel(ui);
            ui.separator();
            self.milestone_list(ui);
        });

        // Bottom panel - camera controls
        egui::TopBottomPanel::bottom("controls_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.show_grid, "Grid");
                ui.checkbox(&mut self.auto_rotate, "Auto-rotate");

                ui.separator();
                ui.label("Rotate:");
                ui.add(egui::DragValue::new(&mut self.camera_angle_x).speed(0.02).prefix("X:"));
                ui.add(egui::DragValue::new(&mut self.camera_angle_y).speed(0.02).prefix("Y:"));

                ui.separator();
                if ui.button("Center").clicked() {
                    self.center_view();
                }

                ui.separator();
                ui.label("Right-drag: rotate | Middle-drag: pan | Scroll: zoom");
            });
        });

        // Central panel - globe view
        egui::CentralPanel::default().show(ctx, |ui| {
            ctx.input(|i| {
                // Arrow keys for rotation
                if i.key_down(egui::Key::ArrowLeft) {
                    self.camera_angle_y -= 0.03;
                }
                if i.key_down(egui::Key::ArrowRight) {
                    self.camera_angle_y += 0.03;
                }
                if i.key_down(egui::Key::ArrowUp) {
                    self.camera_angle_x -= 0.03;
                }
                if i.key_down(egui::Key::ArrowDown) {
                    self.camera_angle_x += 0.03;
                }
                if i.key_pressed(egui::Key::Home) {
                    self.center_view();
                }
                // Scroll for zoom
                if i.raw_scroll_delta.y != 0.0 {
                    self.zoom *= 1.0 - i.raw_scroll_delta.y * 0.002;
                }
                // Mouse drag rotation (right button) and pan (middle button)
                if i.pointer.secondary_down() {
                    let delta = i.pointer.delta();
                    self.camera_angle_y += delta.x * 0.005;
                    self.camera_angle_x += delta.y * 0.005;
                }
                if i.pointer.middle_down() {
                    let delta = i.pointer.delta();
                    self.camera_target[0] -= delta.x * 0.005;
                    self.camera_target[1] += delta.y * 0.005;
                }
            });

            self.camera_angle_x = self.camera_angle_x.clamp(-1.5, 1.5);
            self.zoom = self.zoom.clamp(0.2, 10.0);

            // The journey animation zooms the view out from 8 to 30
            let view_range = (0.2 * self.journey.camera_distance() * self.zoom) as f64;

            let plot = egui_plot::Plot::new("globe_plot")
                .data_aspect(1.0)
                .show_axes(false)
                .show_grid(self.show_grid)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .include_x(-view_range)
                .include_x(view_range)
                .include_y(-view_range)
                .include_y(view_range);

            plot.show(ui, |plot_ui| {
                // Globe silhouette: the sphere projects to a circle under the
                // orthographic camera regardless of rotation
                let globe: Vec<[f64; 2]> = (0..=64)
                    .map(|i| {
                        let theta = i as f64 / 64.0 * std::f64::consts::TAU;
                        [
                            GLOBE_RADIUS as f64 * theta.cos() + self.camera_target[0] as f64,
                            GLOBE_RADIUS as f64 * theta.sin() + self.camera_target[1] as f64,
                        ]
                    })
                    .collect();
                plot_ui.polygon(
                    egui_plot::Polygon::new(egui_plot::PlotPoints::from(globe))
                        .fill_color(egui::Color32::from_rgb(20, 40, 110))
                        .stroke(egui::Stroke::new(1.5, egui::Color32::from_rgb(77, 124, 255))),
                );

                let Some(route) = &self.route else { return };
                if route.path.is_empty() {
                    return;
                }

                // Full route line
                let route_2d: Vec<[f64; 2]> =
                    route.path.iter().map(|&p| self.project_point(p)).collect();
                plot_ui.line(
                    egui_plot::Line::new(egui_plot::PlotPoints::from(route_2d.clone()))
                        .color(egui::Color32::from_rgb(0, 255, 255))
                        .width(2.0)
                        .name(&route.name),
                );

                // Start and end markers
                plot_ui.points(
                    egui_plot::Points::new(vec![route_2d[0]])
                        .radius(5.0)
                        .color(egui::Color32::from_rgb(0, 255, 0)),
                );
                if let Some(&end) = route_2d.last() {
                    plot_ui.points(
                        egui_plot::Points::new(vec![end])
                            .radius(5.0)
                            .color(egui::Color32::from_rgb(255, 0, 0)),
                    );
                }

                // Trail and runner while the journey is in flight
                if self.journey.state() != JourneyState::Idle {
                    let progress = self.journey.progress_percent();
                    let trail: Vec<[f64; 2]> = projection::trail(&route.path, progress)
                        .iter()
                        .map(|&p| self.project_point(p))
                        .collect();
                    plot_ui.line(
                        egui_plot::Line::new(egui_plot::PlotPoints::from(trail))
                            .color(egui::Color32::GOLD)
                            .width(3.0),
                    );
                    if let Some(runner) = projection::runner_position(&route.path, progress) {
                        plot_ui.points(
                            egui_plot::Points::new(vec![self.project_point(runner)])
                                .radius(6.0)
                                .color(egui::Color32::GOLD),
                        );
                    }
                }
            });
        });

        // Milestone-reached banner
        if let Some((milestone, _)) = self.notification.clone() {
            egui::Window::new("Milestone Reached!")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(&milestone.icon).size(48.0));
                        ui.heading(&milestone.name);
                        ui.label(&milestone.altitude);
                        if let Some(desc) = &milestone.description {
                            ui.label(egui::RichText::new(desc).italics());
                        }
                        if let Some(reward) = milestone.reward {
                            ui.separator();
                            ui.label(format!("Special reward unlocked: {:?}", reward));
                        }
                    });
                });
        }
    }
}
