//! Snapshot Generator
//!
//! Opens a small three-d window, renders each route's journey arc over the
//! globe, captures pixels, and saves as PNG snapshots.

use std::path::Path;
use three_d::*;
use tracing::{info, warn};

use crate::config::Config;
use crate::projection::{self, GLOBE_RADIUS};

/// Generate snapshots for all configured routes
pub fn generate(config: &Config, output_dir: &Path, size: u32) -> anyhow::Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let routes: Vec<(crate::config::Route, String)> = config
        .routes
        .iter()
        .map(|r| (r.clone(), format!("{}.png", r.id)))
        .collect();

    let total = routes.len();
    println!("Generating {} snapshots ({}x{})...", total, size, size);

    let window = Window::new(WindowSettings {
        title: "Cosmic Stride - Snapshot Generator".to_string(),
        max_size: Some((size, size)),
        min_size: (size, size),
        ..Default::default()
    })?;

    let context = window.gl();

    let mut camera = Camera::new_perspective(
        Viewport {
            x: 0,
            y: 0,
            width: size,
            height: size,
        },
        vec3(0.0, 1.0, 4.0),
        vec3(0.0, 0.0, 0.0),
        vec3(0.0, 1.0, 0.0),
        degrees(45.0),
        0.1,
        100.0,
    );

    let mut current_idx: usize = 0;
    let output_dir = output_dir.to_path_buf();
    let mut index_entries: Vec<serde_json::Value> = Vec::new();

    window.render_loop(move |frame_input| {
        if current_idx >= routes.len() {
            let index = serde_json::json!({
                "generated": chrono::Local::now().to_rfc3339(),
                "snapshots": index_entries,
            });
            let index_path = output_dir.join("index.json");
            if let Err(e) = std::fs::write(
                &index_path,
                serde_json::to_string_pretty(&index).unwrap_or_default(),
            ) {
                warn!("Failed to write index.json: {}", e);
            } else {
                info!("Wrote {}", index_path.display());
            }
            println!(
                "\nDone! Generated {} snapshots in {}",
                index_entries.len(),
                output_dir.display()
            );
            return FrameOutput {
                exit: true,
                ..Default::default()
            };
        }

        let (route, filename) = &routes[current_idx];
        print!("\r[{}/{}] {}...", current_idx + 1, total, route.name);

        let path = projection::project_route(&route.points);
        aim_camera_at_route(&path, &mut camera);
        camera.set_viewport(frame_input.viewport);

        let mut renderables: Vec<Box<dyn Object>> = Vec::new();

        // Globe (CpuMesh::sphere is unit radius)
        let mut globe = Gm::new(
            Mesh::new(&context, &CpuMesh::sphere(32)),
            ColorMaterial {
                color: Srgba::new(30, 64, 175, 255),
                ..Default::default()
            },
        );
        globe.set_transformation(Mat4::from_scale(GLOBE_RADIUS));
        renderables.push(Box::new(globe));

        // Route segments as thin cones between consecutive points
        if path.len() >= 2 {
            let color = route_color(&route.id);
            let mut instances = Instances::default();
            instances.transformations = Vec::new();
            instances.colors = Some(Vec::new());

            for i in 0..path.len() - 1 {
                let p1 = vec3(path[i][0], path[i][1], path[i][2]);
                let p2 = vec3(path[i + 1][0], path[i + 1][1], path[i + 1][2]);

                let center = (p1 + p2) * 0.5;
                let dir = p2 - p1;
                let length = dir.magnitude();
                if length <= 1e-5 {
                    continue;
                }

                let radius = 0.004;
                let up = vec3(0.0, 1.0, 0.0);
                let rotation = if dir.normalize().dot(up).abs() > 0.999 {
                    Mat4::identity()
                } else {
                    let axis = up.cross(dir.normalize()).normalize();
                    let angle = up.dot(dir.normalize()).acos();
                    Mat4::from_axis_angle(axis, radians(angle))
                };

                let transform = Mat4::from_translation(center)
                    * rotation
                    * Mat4::from_nonuniform_scale(radius, length * 0.5, radius);

                instances.transformations.push(transform);
                if let Some(ref mut colors) = instances.colors {
                    colors.push(color);
                }
            }

            if !instances.transformations.is_empty() {
                let cone = CpuMesh::cone(12);
                renderables.push(Box::new(Gm::new(
                    InstancedMesh::new(&context, &instances, &cone),
                    ColorMaterial::default(),
                )));
            }

            // Start (green) and end (red) markers
            for (point, marker_color) in [
                (path[0], Srgba::new(0, 255, 0, 255)),
                (path[path.len() - 1], Srgba::new(255, 0, 0, 255)),
            ] {
                let mut sphere = Gm::new(
                    Mesh::new(&context, &CpuMesh::sphere(12)),
                    ColorMaterial {
                        color: marker_color,
                        ..Default::default()
                    },
                );
                sphere.set_transformation(
                    Mat4::from_translation(vec3(point[0], point[1], point[2]))
                        * Mat4::from_scale(0.015),
                );
                renderables.push(Box::new(sphere));
            }
        }

        frame_input
            .screen()
            .clear(ClearState::color_and_depth(0.02, 0.02, 0.06, 1.0, 1.0));

        for obj in &renderables {
            obj.render(&camera, &[]);
        }

        // Capture pixels and save
        let vp = frame_input.viewport;
        let pixels: Vec<[u8; 4]> = frame_input.screen().read_color();
        let flat: Vec<u8> = pixels.iter().flat_map(|p| p.iter().copied()).collect();

        if let Some(img) = image::RgbaImage::from_raw(vp.width, vp.height, flat) {
            let out_path = output_dir.join(filename);
            match img.save(&out_path) {
                Ok(()) => {
                    info!("Saved {}", out_path.display());
                    index_entries.push(serde_json::json!({
                        "id": route.id,
                        "name": route.name,
                        "num_points": route.points.len(),
                        "file": filename,
                    }));
                }
                Err(e) => warn!("Failed to save {}: {}", out_path.display(), e),
            }
        }

        current_idx += 1;
        FrameOutput::default()
    });

    Ok(())
}

/// Point the camera at the route's side of the globe, far enough to frame it
fn aim_camera_at_route(path: &[[f32; 3]], camera: &mut Camera) {
    let center = if path.is_empty() {
        vec3(GLOBE_RADIUS, 0.0, 0.0)
    } else {
        let sum = path
            .iter()
            .fold(vec3(0.0, 0.0, 0.0), |acc, p| acc + vec3(p[0], p[1], p[2]));
        let mean = sum / path.len() as f32;
        if mean.magnitude() > 1e-4 {
            mean.normalize() * GLOBE_RADIUS
        } else {
            vec3(GLOBE_RADIUS, 0.0, 0.0)
        }
    };

    let eye = center.normalize() * (GLOBE_RADIUS * 3.2);
    camera.set_view(eye, vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0));
}

/// Stable per-route color from the route ID
fn route_color(id: &str) -> Srgba {
    let hash = id
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
    let hue = (hash % 360) as f32 / 360.0;
    let rgb = hsv_to_rgb(hue, 0.7, 0.95);
    Srgba::new(
        (rgb[0] * 255.0) as u8,
        (rgb[1] * 255.0) as u8,
        (rgb[2] * 255.0) as u8,
        255,
    )
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}
