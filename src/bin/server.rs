use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::{Json, Router, routing::get, routing::post};
use base64::Engine;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;

use spiralgen::config::{self, Params, ViewParams};
use spiralgen::render;

const IMAGE_W: usize = 1200;
const IMAGE_H: usize = 900;

#[derive(Deserialize)]
struct GenerateRequest {
    // Spiral shape
    v: Option<f64>,
    omega: Option<f64>,
    au: Option<f64>,
    spiral_revolutions: Option<f64>,
    n_spirals: Option<f64>,
    // Spiral sampling
    r_min: Option<f64>,
    r_max: Option<f64>,
    n_r: Option<f64>,
    n_phi: Option<f64>,
    // Reference surface
    sin_amplitude: Option<f64>,
    sin_frequency: Option<f64>,
    x_min: Option<f64>,
    x_max: Option<f64>,
    y_min: Option<f64>,
    y_max: Option<f64>,
    n_xy: Option<f64>,
    // Intersection search
    intersection_threshold: Option<f64>,
    // View
    elev: Option<f64>,
    azim: Option<f64>,
    marker_size: Option<f64>,
}

#[derive(Serialize)]
struct GenerateResponse {
    layers: Vec<Layer>,
    intersections: Vec<[f64; 3]>,
    timings: Vec<TimingEntry>,
    width: usize,
    height: usize,
}

#[derive(Serialize)]
struct Layer {
    name: String,
    data_url: String,
}

#[derive(Serialize)]
struct TimingEntry {
    name: String,
    ms: f64,
}

#[derive(Serialize)]
struct ParamEntry {
    name: &'static str,
    default: f64,
    min: f64,
    max: f64,
}

fn encode_png(rgba: &[u8], w: usize, h: usize) -> String {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new(&mut buf);
    encoder
        .write_image(rgba, w as u32, h as u32, image::ExtendedColorType::Rgba8)
        .expect("PNG encode failed");
    let b64 = base64::engine::general_purpose::STANDARD.encode(&buf);
    format!("data:image/png;base64,{}", b64)
}

fn build_params(req: &GenerateRequest) -> Result<Params, spiralgen::error::ComputeError> {
    let defaults = Params::default();
    let count = |name, raw: Option<f64>, fallback| match raw {
        Some(value) => config::coerce_count(name, value),
        None => Ok(fallback),
    };
    let params = Params {
        v: req.v.unwrap_or(defaults.v),
        omega: req.omega.unwrap_or(defaults.omega),
        au: req.au.unwrap_or(defaults.au),
        spiral_revolutions: req.spiral_revolutions.unwrap_or(defaults.spiral_revolutions),
        n_spirals: count("n_spirals", req.n_spirals, defaults.n_spirals)?,
        r_min: req.r_min.unwrap_or(defaults.r_min),
        r_max: req.r_max.unwrap_or(defaults.r_max),
        n_r: count("n_r", req.n_r, defaults.n_r)?,
        n_phi: count("n_phi", req.n_phi, defaults.n_phi)?,
        sin_amplitude: req.sin_amplitude.unwrap_or(defaults.sin_amplitude),
        sin_frequency: req.sin_frequency.unwrap_or(defaults.sin_frequency),
        x_min: req.x_min.unwrap_or(defaults.x_min),
        x_max: req.x_max.unwrap_or(defaults.x_max),
        y_min: req.y_min.unwrap_or(defaults.y_min),
        y_max: req.y_max.unwrap_or(defaults.y_max),
        n_xy: count("n_xy", req.n_xy, defaults.n_xy)?,
        intersection_threshold: req
            .intersection_threshold
            .unwrap_or(defaults.intersection_threshold),
    };
    params.validate()?;
    Ok(params)
}

async fn generate_handler(
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, (StatusCode, String)> {
    let params =
        build_params(&req).map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let view_defaults = ViewParams::default();
    let view = ViewParams {
        elev: req.elev.unwrap_or(view_defaults.elev),
        azim: req.azim.unwrap_or(view_defaults.azim),
        marker_size: req.marker_size.unwrap_or(view_defaults.marker_size),
    };

    let result: Result<GenerateResponse, spiralgen::error::ComputeError> =
        tokio::task::spawn_blocking(move || {
            let (scene, timings) = spiralgen::generate(&params)?;

            let layers = vec![
                Layer {
                    name: "scene".into(),
                    data_url: encode_png(
                        &render::render_scene(
                            &scene.surfaces,
                            &scene.intersections,
                            &view,
                            IMAGE_W,
                            IMAGE_H,
                        ),
                        IMAGE_W,
                        IMAGE_H,
                    ),
                },
                Layer {
                    name: "projection_yz".into(),
                    data_url: encode_png(
                        &render::render_projection_yz(&scene.intersections, &view, IMAGE_W, IMAGE_H),
                        IMAGE_W,
                        IMAGE_H,
                    ),
                },
                Layer {
                    name: "projection_xy".into(),
                    data_url: encode_png(
                        &render::render_projection_xy(&scene.intersections, &view, IMAGE_W, IMAGE_H),
                        IMAGE_W,
                        IMAGE_H,
                    ),
                },
            ];

            let intersections = scene
                .intersections
                .iter()
                .map(|p| [p.x, p.y, p.z])
                .collect();

            let timing_entries = timings
                .iter()
                .map(|t| TimingEntry {
                    name: t.name.to_string(),
                    ms: t.ms,
                })
                .collect();

            Ok(GenerateResponse {
                layers,
                intersections,
                timings: timing_entries,
                width: IMAGE_W,
                height: IMAGE_H,
            })
        })
        .await
        .expect("generation task panicked");

    result
        .map(Json)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

async fn params_handler() -> Json<Vec<ParamEntry>> {
    let entries = config::BOUNDS
        .iter()
        .map(|&(name, default, min, max)| ParamEntry {
            name,
            default,
            min,
            max,
        })
        .collect();
    Json(entries)
}

#[tokio::main]
async fn main() {
    let frontend = ServeDir::new("frontend");

    let app = Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/params", get(params_handler))
        .fallback_service(frontend);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    eprintln!("spiralgen server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
