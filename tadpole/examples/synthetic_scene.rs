//! Segment a generated culture-dish image and print the region table.
//!
//! ```text
//! cargo run -p tadpole --example synthetic_scene -- [min_area]
//! ```

use anyhow::Context;
use common::log_setup::setup_logging;
use tadpole::{Config, RgbImage, Segmenter, Stage, StageOutput};

const WIDTH: usize = 160;
const HEIGHT: usize = 120;

/// Organisms as `(cx, cy, r)`; the middle pair touches.
const ORGANISMS: [(f32, f32, f32); 5] = [
    (30.5, 30.5, 9.0),
    (70.5, 60.5, 10.0),
    (87.5, 60.5, 9.0),
    (130.5, 35.5, 8.0),
    (45.5, 95.5, 11.0),
];

fn culture_dish() -> anyhow::Result<RgbImage> {
    let mut data = Vec::with_capacity(WIDTH * HEIGHT * 3);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let inside = ORGANISMS.iter().any(|&(cx, cy, r)| {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                dx * dx + dy * dy <= r * r
            });
            let rgb: [u8; 3] = if inside { [200, 210, 60] } else { [40, 70, 180] };
            // Lamp on the left edge.
            let shade = 1.0 - 0.4 * x as f32 / WIDTH as f32;
            data.extend(rgb.map(|c| (c as f32 * shade) as u8));
        }
    }
    RgbImage::from_u8(WIDTH, HEIGHT, 3, &data).context("building synthetic image")
}

fn main() -> anyhow::Result<()> {
    setup_logging("info,tadpole=debug", "logs").context("installing logger")?;

    let min_area_final = match std::env::args().nth(1) {
        Some(arg) => arg.parse().context("min_area must be a pixel count")?,
        None => Config::default().min_area_final,
    };
    let config = Config {
        min_area_final,
        ..Config::default()
    };

    let image = culture_dish()?;
    let mut observer = |stage: Stage, output: StageOutput<'_>| match output {
        StageOutput::Mask(mask) => {
            tracing::info!(%stage, set = mask.count_ones(), "mask");
        }
        StageOutput::Markers(markers) => tracing::info!(
            %stage,
            foreground = markers.foreground.count_ones(),
            background = markers.background.count_ones(),
            "markers"
        ),
        StageOutput::Labels(labels) => {
            tracing::info!(%stage, labels = labels.num_labels(), "labels");
        }
        StageOutput::Intensity(_) | StageOutput::Stats(_) => {}
    };

    let result = Segmenter::from_config(config).segment_with_observer(&image, &mut observer)?;

    println!("{} organisms", result.num_regions());
    for region in &result.stats.regions {
        println!(
            "  #{:<3} area {:>5}  centroid ({:6.1}, {:6.1})  box {}x{}",
            region.label,
            region.area,
            region.centroid.0,
            region.centroid.1,
            region.bbox.width(),
            region.bbox.height()
        );
    }
    if let Some(summary) = result.stats.summary {
        println!(
            "area min {} / mean {:.1} / max {}",
            summary.min, summary.mean, summary.max
        );
    }
    Ok(())
}
