use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use level_frame::{detect_and_correct, encode_jpeg, lookup_country, post_event, Cli, CorrectionEvent};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load input image
    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read input file: {:?}", cli.input))?;

    let result = detect_and_correct(&bytes, cli.angle, cli.perspective)
        .with_context(|| format!("Failed to correct image: {:?}", cli.input))?;

    if result.detected_angles.is_empty() {
        eprintln!("No significant lines detected; the image stays unrotated unless --angle is given.");
    } else {
        eprintln!(
            "Detected {} skew lines, auto angle: {:.2}°",
            result.detected_angles.len(),
            result.correction_angle
        );
    }

    let applied_angle = cli.angle.unwrap_or(result.correction_angle);
    eprintln!(
        "Applied angle: {:.2}°{}",
        applied_angle,
        if cli.perspective {
            " (with perspective correction)"
        } else {
            ""
        }
    );

    // Save result; JPEG honors the quality flag, anything else goes through
    // the extension-driven encoder
    let output_path = cli.output_path();
    let extension = output_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    if extension.eq_ignore_ascii_case("jpg") || extension.eq_ignore_ascii_case("jpeg") {
        let encoded = encode_jpeg(&result.corrected, cli.quality)?;
        std::fs::write(&output_path, encoded)
            .with_context(|| format!("Failed to save output: {:?}", output_path))?;
    } else {
        result
            .corrected
            .save(&output_path)
            .with_context(|| format!("Failed to save output: {:?}", output_path))?;
    }

    eprintln!("Saved corrected image: {:?}", output_path);
    eprintln!(
        "Dimensions: {}x{} -> {}x{}",
        result.original.width(),
        result.original.height(),
        result.corrected.width(),
        result.corrected.height()
    );

    if let Some(debug_path) = &cli.debug_output {
        result
            .debug
            .save(debug_path)
            .with_context(|| format!("Failed to save debug view: {:?}", debug_path))?;
        eprintln!("Saved detected-lines debug view: {:?}", debug_path);
    }

    // Correction is already on disk; event delivery is best-effort
    if let Some(endpoint) = &cli.log_endpoint {
        let filename = cli
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let event = CorrectionEvent::new(
            &filename,
            result.correction_angle,
            applied_angle,
            result.detected_angles.len(),
            lookup_country(),
            cli.perspective,
            &cli.log_key,
        );
        post_event(endpoint, &event);
    }

    Ok(())
}
