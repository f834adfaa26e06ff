//! Position to tile conversion.

use clap::Args;
use geocache::config::DEFAULT_ZOOM;
use geocache::coord::{tile_bounds, tile_of, LatLon, MAX_ZOOM};

use crate::error::CliError;

/// Arguments for the `tile` command.
#[derive(Debug, Args)]
pub struct TileArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,

    /// Zoom level
    #[arg(long, default_value_t = DEFAULT_ZOOM)]
    pub zoom: u8,
}

/// Run the `tile` command.
pub fn run(args: TileArgs) -> Result<(), CliError> {
    validate_position(args.lat, args.lon)?;
    if args.zoom > MAX_ZOOM {
        return Err(CliError::InvalidArgument(format!(
            "zoom {} exceeds maximum {}",
            args.zoom, MAX_ZOOM
        )));
    }

    let position = LatLon::new(args.lat, args.lon);
    let tile = tile_of(position, args.zoom);
    let bounds = tile_bounds(tile, args.zoom);

    println!("Position: {}", position);
    println!("Zoom:     {}", args.zoom);
    println!("Tile:     {}", tile);
    println!("Bounds:   {}", bounds);
    Ok(())
}

/// Reject non-finite or out-of-range coordinates.
pub fn validate_position(lat: f64, lon: f64) -> Result<(), CliError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(CliError::InvalidArgument(format!(
            "latitude {} must be within [-90, 90]",
            lat
        )));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(CliError::InvalidArgument(format!(
            "longitude {} must be within [-180, 180]",
            lon
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_position() {
        assert!(validate_position(40.7, -74.0).is_ok());
        assert!(validate_position(90.0, 180.0).is_ok());
        assert!(validate_position(90.1, 0.0).is_err());
        assert!(validate_position(0.0, -180.5).is_err());
        assert!(validate_position(f64::NAN, 0.0).is_err());
        assert!(validate_position(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_run_rejects_excessive_zoom() {
        let args = TileArgs {
            lat: 0.0,
            lon: 0.0,
            zoom: MAX_ZOOM + 1,
        };
        assert!(matches!(run(args), Err(CliError::InvalidArgument(_))));
    }
}
