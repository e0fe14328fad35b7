//! GIF Slice CLI - Cut a cross section through an animated GIF.
//!
//! Writes raw RGBA buffers (no image encoding) for the slice and the six
//! cube faces.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use gif_slice::{
    animation::decode_with_limit,
    compute::{Face, Volume, extract_faces, slice},
    schema::SlicerConfig,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <input.gif> [config.json] [out_dir]", args[0]);
        eprintln!();
        eprintln!("Slice an animated GIF as a 3D volume.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  input.gif    Animated GIF to slice");
        eprintln!("  config.json  Slicer configuration (default: built-in)");
        eprintln!("  out_dir      Directory for .rgba outputs (default: .)");
        eprintln!();
        eprintln!("Print an example configuration with --example.");
        std::process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let out_dir = PathBuf::from(args.get(3).map(String::as_str).unwrap_or("."));

    let config: SlicerConfig = match args.get(2) {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => SlicerConfig::default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    }

    let bytes = fs::read(&input_path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", input_path.display(), e);
        std::process::exit(1);
    });

    let start = Instant::now();
    let image = decode_with_limit(&bytes, config.max_canvas_bytes).unwrap_or_else(|e| {
        eprintln!("Error decoding {}: {}", input_path.display(), e);
        std::process::exit(1);
    });
    let decode_time = start.elapsed();

    let volume = Volume::new(&image);
    let dims = volume.dimensions();

    println!("GIF Slice");
    println!("=========");
    println!(
        "Image: {}x{} ({} frames, {:.2}s)",
        image.width(),
        image.height(),
        image.frame_count(),
        image.total_delay() as f32 / 100.0
    );
    println!("Volume: {:.3} x {:.3} x {:.3}", dims.x, dims.y, dims.z);
    println!("Decode: {:.1}ms", decode_time.as_secs_f32() * 1000.0);
    println!();

    let transform = config.plane.initial_transform();
    let start = Instant::now();
    let Some(sample) = slice(
        Some(&image),
        &transform,
        config.sample_width,
        config.sample_height,
    ) else {
        eprintln!("No image loaded");
        std::process::exit(1);
    };
    let slice_time = start.elapsed();

    println!(
        "Slice: {}x{} px, plane {:.2} x {:.2} ({:.1}ms)",
        sample.width,
        sample.height,
        sample.plane_width,
        sample.plane_height,
        slice_time.as_secs_f32() * 1000.0
    );
    println!("Transform: {:?}", sample.transform_matrix());

    write_raw(&out_dir.join("slice.rgba"), &sample.raster);

    let faces = extract_faces(&image);
    for face in Face::ALL {
        let path = out_dir.join(format!("face_{}.rgba", face.name()));
        write_raw(&path, faces.get(face));
    }
    println!(
        "Faces: {}x{} px each, written to {}",
        faces.width,
        faces.height,
        out_dir.display()
    );
}

fn write_raw(path: &Path, data: &[u8]) {
    if let Err(e) = fs::write(path, data) {
        eprintln!("Error writing {}: {}", path.display(), e);
        std::process::exit(1);
    }
    log::debug!("Wrote {} bytes to {}", data.len(), path.display());
}

fn print_example_config() {
    let config = SlicerConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
