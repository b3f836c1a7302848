use clap::Parser;
use std::path::PathBuf;

/// Manual override range promised by the calling surface.
const MANUAL_ANGLE_LIMIT: f64 = 45.0;

#[derive(Parser, Debug)]
#[command(name = "level-frame")]
#[command(version, about = "Detect dominant lines in a photo and straighten it automatically")]
pub struct Cli {
    /// Input image path (JPEG or PNG)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output path [default: input_leveled.jpg]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Manual rotation in degrees (-45 to 45), replacing the detected angle
    #[arg(short, long, allow_hyphen_values = true, value_parser = parse_angle)]
    pub angle: Option<f64>,

    /// Apply experimental perspective correction after rotation
    #[arg(long)]
    pub perspective: bool,

    /// Write the detected-lines debug view to this path
    #[arg(long)]
    pub debug_output: Option<PathBuf>,

    /// JPEG quality for the corrected output
    #[arg(short, long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Endpoint to receive a correction event after a successful run
    #[arg(long)]
    pub log_endpoint: Option<String>,

    /// Key identifying this client in logged events
    #[arg(long, default_value = "")]
    pub log_key: String,

    /// Show detection details
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let stem = self.input.file_stem().unwrap_or_default().to_string_lossy();
            let parent = self.input.parent().unwrap_or(std::path::Path::new("."));
            parent.join(format!("{}_leveled.jpg", stem))
        })
    }
}

fn parse_angle(s: &str) -> Result<f64, String> {
    let angle: f64 = s
        .parse()
        .map_err(|_| format!("Invalid angle value: {}", s))?;

    if !(-MANUAL_ANGLE_LIMIT..=MANUAL_ANGLE_LIMIT).contains(&angle) {
        return Err(format!(
            "Angle must be between -{} and {} degrees",
            MANUAL_ANGLE_LIMIT, MANUAL_ANGLE_LIMIT
        ));
    }

    Ok(angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_parser_accepts_the_range_inclusive() {
        assert_eq!(parse_angle("45").unwrap(), 45.0);
        assert_eq!(parse_angle("-45").unwrap(), -45.0);
        assert_eq!(parse_angle("0.1").unwrap(), 0.1);
    }

    #[test]
    fn angle_parser_rejects_out_of_range() {
        assert!(parse_angle("45.01").is_err());
        assert!(parse_angle("-90").is_err());
        assert!(parse_angle("not-a-number").is_err());
    }

    #[test]
    fn default_output_lands_beside_the_input() {
        let cli = Cli::parse_from(["level-frame", "shots/door.png"]);
        assert_eq!(cli.output_path(), PathBuf::from("shots/door_leveled.jpg"));
    }

    #[test]
    fn explicit_output_wins() {
        let cli = Cli::parse_from(["level-frame", "door.png", "-o", "out/fixed.png"]);
        assert_eq!(cli.output_path(), PathBuf::from("out/fixed.png"));
    }
}
