use std::path::PathBuf;
use std::process::ExitCode;

use spiralgen::config::{Params, ViewParams};
use spiralgen::render;

const IMAGE_W: usize = 1200;
const IMAGE_H: usize = 900;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let out_dir: PathBuf = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));

    std::fs::create_dir_all(&out_dir).expect("failed to create output directory");

    let params = Params::default();
    let view = ViewParams::default();

    eprintln!(
        "Generating {} spiral(s), {}x{} spiral grid, {}x{} reference grid",
        params.n_spirals, params.n_phi, params.n_r, params.n_xy, params.n_xy
    );

    let (scene, timings) = match spiralgen::generate(&params) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("recomputation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    eprintln!("\nTimings:");
    for t in &timings {
        eprintln!("  {:20} {:8.1} ms", t.name, t.ms);
    }
    eprintln!("\n{} intersection(s) found", scene.intersections.len());

    let save = |name: &str, rgba: &[u8]| {
        let path = out_dir.join(name);
        image::save_buffer(
            &path,
            rgba,
            IMAGE_W as u32,
            IMAGE_H as u32,
            image::ColorType::Rgba8,
        )
        .expect("failed to save image");
        eprintln!("Saved {}", path.display());
    };

    // 1. Pseudo-3D scatter of all surfaces + intersections
    let scene_rgba = render::render_scene(
        &scene.surfaces,
        &scene.intersections,
        &view,
        IMAGE_W,
        IMAGE_H,
    );
    save("scene.png", &scene_rgba);

    // 2. X=0 projection (YZ plane)
    let yz_rgba = render::render_projection_yz(&scene.intersections, &view, IMAGE_W, IMAGE_H);
    save("projection_yz.png", &yz_rgba);

    // 3. Z=0 projection (XY plane)
    let xy_rgba = render::render_projection_xy(&scene.intersections, &view, IMAGE_W, IMAGE_H);
    save("projection_xy.png", &xy_rgba);

    eprintln!("\nDone.");
    ExitCode::SUCCESS
}
