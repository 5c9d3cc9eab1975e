use ab_glyph::FontVec;
use anyhow::{Context, Result};
use clap::Parser;
use dimscan_common::MeasureConfig;
use tracing_subscriber::EnvFilter;

mod contours;
mod edges;
mod measure;
mod pipeline;
mod quad;
mod render;

/// Measure object dimensions from a photo using a reference object of known
/// width placed leftmost in the frame
#[derive(Parser, Debug)]
#[command(name = "dimscan")]
#[command(about = "Measure objects in a photo against a leftmost reference", long_about = None)]
struct Args {
    /// Input image file path
    #[arg(short, long)]
    input: String,

    /// Annotated output image path
    #[arg(short, long, default_value = "annotated.png")]
    output: String,

    /// Known physical width of the reference object
    #[arg(short, long, default_value = "3.0")]
    reference_width: f64,

    /// Unit label for reported dimensions
    #[arg(short, long, default_value = "cm")]
    unit: String,

    /// Minimum contour area in px^2; smaller contours are noise
    #[arg(long, default_value = "100.0")]
    min_area: f64,

    /// Lower Canny threshold
    #[arg(long, default_value = "50.0")]
    canny_low: f32,

    /// Upper Canny threshold
    #[arg(long, default_value = "100.0")]
    canny_high: f32,

    /// Smoothing kernel size (odd integer >= 1)
    #[arg(long, default_value = "3")]
    blur_kernel: u32,

    /// Dilation passes applied to the edge map
    #[arg(long, default_value = "1")]
    dilate: u8,

    /// Erosion passes applied after dilation
    #[arg(long, default_value = "1")]
    erode: u8,

    /// Write the measurement records as JSON to this path
    #[arg(long)]
    json: Option<String>,

    /// TrueType font used for dimension labels; labels are skipped without it
    #[arg(long)]
    font: Option<String>,

    /// Save intermediate images (grayscale, edge map) next to the output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn to_config(&self) -> MeasureConfig {
        MeasureConfig {
            blur_kernel: self.blur_kernel,
            canny_low: self.canny_low,
            canny_high: self.canny_high,
            dilate_iterations: self.dilate,
            erode_iterations: self.erode,
            min_contour_area: self.min_area,
            reference_width: self.reference_width,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.to_config();

    println!("dimscan - reference-calibrated object measurement");
    println!("=================================================");
    println!("Input: {}", args.input);
    println!("Output: {}", args.output);
    println!("Reference width: {}{}", args.reference_width, args.unit);
    println!();

    println!("Step 1: Loading image...");
    let image = image::open(&args.input)
        .with_context(|| format!("failed to open input image {}", args.input))?
        .to_rgb8();
    println!("  {}x{} pixels", image.width(), image.height());

    println!("\nStep 2: Measuring objects...");
    let debug_prefix = args.debug.then(|| debug_prefix_for(&args.output));
    let objects = pipeline::run(&image, &config, debug_prefix.as_deref())
        .context("measurement pipeline failed")?;

    println!("Measured {} object(s), left to right:", objects.len());
    for (idx, object) in objects.iter().enumerate() {
        let role = if idx == 0 { " (reference)" } else { "" };
        match (object.width_units, object.height_units) {
            (Some(w), Some(h)) => println!(
                "  #{idx}{role}: {w:.2}{u} x {h:.2}{u} ({:.1} x {:.1} px)",
                object.width_px,
                object.height_px,
                u = args.unit,
            ),
            _ => println!(
                "  #{idx}{role}: {:.1} x {:.1} px (uncalibrated)",
                object.width_px, object.height_px
            ),
        }
    }

    if let Some(ref json_path) = args.json {
        let report = serde_json::to_string_pretty(&objects)?;
        std::fs::write(json_path, report)
            .with_context(|| format!("failed to write JSON report {json_path}"))?;
        println!("\nWrote JSON report to: {json_path}");
    }

    println!("\nStep 3: Rendering annotated image...");
    let font = match args.font {
        Some(ref path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read font file {path}"))?;
            Some(FontVec::try_from_vec(bytes).context("failed to parse font file")?)
        }
        None => {
            println!("  No font supplied, skipping dimension labels");
            None
        }
    };
    let annotated = render::annotate(&image, &objects, &args.unit, font.as_ref());
    annotated
        .save(&args.output)
        .with_context(|| format!("failed to save annotated image {}", args.output))?;
    println!("Saved annotated image to: {}", args.output);

    Ok(())
}

/// Strip the output extension so debug images land next to it.
fn debug_prefix_for(output: &str) -> String {
    match output.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => output.to_string(),
    }
}
