//! CLI argument parsing for the roadlog-worker binary.

use clap::{Parser, Subcommand};

use crate::types::LocationInput;

#[derive(Parser)]
#[command(name = "roadlog-worker", about = "RoadLog ELD trip planning backend worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Plan a single trip and print the result as JSON
    Plan {
        /// Current location, as "lat,lng" or a free-form address
        #[arg(long)]
        current: String,
        /// Pickup location, as "lat,lng" or a free-form address
        #[arg(long)]
        pickup: String,
        /// Dropoff location, as "lat,lng" or a free-form address
        #[arg(long)]
        dropoff: String,
        /// Hours already used in the 70hr/8day cycle
        #[arg(long, default_value_t = 0.0)]
        cycle_used_hours: f64,
        /// Trip start time (RFC 3339); defaults to the next full hour
        #[arg(long)]
        start_time: Option<chrono::DateTime<chrono::Utc>>,
    },
}

/// Interpret a waypoint argument: a "lat,lng" pair when both halves
/// parse as numbers, a free-form address otherwise.
pub fn parse_location_arg(raw: &str) -> LocationInput {
    if let Some((lat_raw, lng_raw)) = raw.split_once(',') {
        if let (Ok(lat), Ok(lng)) = (lat_raw.trim().parse::<f64>(), lng_raw.trim().parse::<f64>())
        {
            return LocationInput::from_coordinates(lat, lng);
        }
    }
    LocationInput::from_address(raw.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_no_command_defaults_to_none() {
        let cli = Cli::parse_from(["roadlog-worker"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_serve_command_parses() {
        let cli = Cli::parse_from(["roadlog-worker", "serve"]);
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_cli_plan_command_parses() {
        let cli = Cli::parse_from([
            "roadlog-worker",
            "plan",
            "--current",
            "Chicago, IL",
            "--pickup",
            "39.7684,-86.1581",
            "--dropoff",
            "Louisville, KY",
            "--cycle-used-hours",
            "12.5",
        ]);

        match cli.command {
            Some(Command::Plan {
                current,
                pickup,
                cycle_used_hours,
                start_time,
                ..
            }) => {
                assert_eq!(current, "Chicago, IL");
                assert_eq!(pickup, "39.7684,-86.1581");
                assert_eq!(cycle_used_hours, 12.5);
                assert!(start_time.is_none());
            }
            _ => panic!("expected plan command"),
        }
    }

    #[test]
    fn test_parse_location_arg_coordinates() {
        let input = parse_location_arg("41.8781, -87.6298");
        assert!(input.has_coordinates());
        assert_eq!(input.lat, Some(41.8781));
        assert_eq!(input.lng, Some(-87.6298));
    }

    #[test]
    fn test_parse_location_arg_address() {
        let input = parse_location_arg("500 Main St, Columbus, OH");
        assert!(!input.has_coordinates());
        assert_eq!(input.address.as_deref(), Some("500 Main St, Columbus, OH"));
    }
}
