//! Bounding box queries through a spatial cache backed by a points file.

use std::path::PathBuf;

use clap::Args;
use geocache::config::{self, SpatialCacheConfig};
use geocache::coord::BoundingBox;
use geocache::spatial::SpatialCache;

use super::points::{Point, PointStore};
use super::tile::validate_position;
use crate::error::CliError;

/// Arguments for the `query` command.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Points file (id,lat,lon[,label] per line)
    #[arg(long)]
    pub data: PathBuf,

    /// Query box as MIN_LAT,MIN_LON,MAX_LAT,MAX_LON (repeatable; write
    /// `--bbox=-10,...` when the first value is negative)
    #[arg(long, required = true, value_parser = parse_bbox)]
    pub bbox: Vec<BoundingBox>,

    /// Configuration file (default: ~/.geocache/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the configured tile zoom level
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Override the configured tile capacity
    #[arg(long)]
    pub max_tiles: Option<usize>,
}

/// Run the `query` command.
pub fn run(args: QueryArgs) -> Result<(), CliError> {
    let cache_config = resolve_config(&args)?;
    let store = PointStore::load(&args.data)?;

    let cache = SpatialCache::new(
        cache_config,
        store,
        |p: &Point| p.id,
        |p: &Point| p.position,
    )?;

    for bbox in &args.bbox {
        let mut found = cache.get_in_bbox(bbox)?;
        found.sort_by_key(|p| p.id);

        println!("{}: {} match(es)", bbox, found.len());
        for point in &found {
            match &point.label {
                Some(label) => println!("  {:>8}  {}  {}", point.id, point.position, label),
                None => println!("  {:>8}  {}", point.id, point.position),
            }
        }
    }

    let stats = cache.stats();
    println!();
    println!("Cache statistics:");
    println!("  Tiles cached:     {}", cache.tile_count());
    println!("  Entities cached:  {}", cache.entity_count());
    println!("  Region queries:   {}", stats.bbox_queries);
    println!("  Backing fetches:  {}", stats.fetches);
    println!("  Fetched entities: {}", stats.fetched_entities);
    println!("  Evicted tiles:    {}", stats.evicted_tiles);
    Ok(())
}

/// Configuration file values overlaid with command-line overrides.
fn resolve_config(args: &QueryArgs) -> Result<SpatialCacheConfig, CliError> {
    let path = args.config.clone().unwrap_or_else(config::config_file_path);
    let mut cache_config = config::load_from(&path)?;

    if let Some(zoom) = args.zoom {
        cache_config = cache_config.with_zoom(zoom);
    }
    if let Some(max_tiles) = args.max_tiles {
        cache_config = cache_config.with_max_tiles(max_tiles);
    }

    tracing::debug!(
        path = %path.display(),
        zoom = cache_config.zoom,
        max_tiles = cache_config.max_tiles,
        "Resolved cache configuration"
    );
    Ok(cache_config)
}

/// Parse `MIN_LAT,MIN_LON,MAX_LAT,MAX_LON`.
fn parse_bbox(s: &str) -> Result<BoundingBox, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{}': {}", s, e))?;

    let &[min_lat, min_lon, max_lat, max_lon] = values.as_slice() else {
        return Err(format!(
            "expected MIN_LAT,MIN_LON,MAX_LAT,MAX_LON, got {} value(s)",
            values.len()
        ));
    };

    validate_position(min_lat, min_lon).map_err(|e| e.to_string())?;
    validate_position(max_lat, max_lon).map_err(|e| e.to_string())?;
    if min_lat > max_lat {
        return Err(format!(
            "min latitude {} is north of max latitude {}",
            min_lat, max_lat
        ));
    }

    Ok(BoundingBox::new(min_lat, min_lon, max_lat, max_lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        let bbox = parse_bbox("1.5, -2.0, 3.0, 4.25").unwrap();
        assert_eq!(bbox, BoundingBox::new(1.5, -2.0, 3.0, 4.25));
    }

    #[test]
    fn test_parse_bbox_antimeridian() {
        let bbox = parse_bbox("-10,170,10,-170").unwrap();
        assert!(bbox.crosses_antimeridian());
    }

    #[test]
    fn test_parse_bbox_rejects_malformed() {
        assert!(parse_bbox("1,2,3").is_err());
        assert!(parse_bbox("1,2,3,4,5").is_err());
        assert!(parse_bbox("1,x,3,4").is_err());
        assert!(parse_bbox("5,0,1,1").is_err());
        assert!(parse_bbox("0,0,95,1").is_err());
    }

    #[test]
    fn test_resolve_config_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[spatial_cache]\nzoom = 14\nmax_tiles = 32\n").unwrap();

        let args = QueryArgs {
            data: PathBuf::from("unused.csv"),
            bbox: vec![],
            config: Some(path),
            zoom: None,
            max_tiles: Some(8),
        };
        let resolved = resolve_config(&args).unwrap();

        assert_eq!(resolved, SpatialCacheConfig::new(14, 8));
    }

    #[test]
    fn test_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("points.csv");
        std::fs::write(&data, "1,0.001,0.001,a\n2,0.002,0.002,b\n3,10.0,10.0,far\n").unwrap();

        let args = QueryArgs {
            data,
            bbox: vec![BoundingBox::new(0.0, 0.0, 0.003, 0.003)],
            config: Some(dir.path().join("missing.ini")),
            zoom: Some(16),
            max_tiles: Some(16),
        };

        assert!(run(args).is_ok());
    }

    #[test]
    fn test_run_rejects_zero_capacity() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("points.csv");
        std::fs::write(&data, "1,0,0\n").unwrap();

        let args = QueryArgs {
            data,
            bbox: vec![BoundingBox::new(0.0, 0.0, 1.0, 1.0)],
            config: Some(dir.path().join("missing.ini")),
            zoom: None,
            max_tiles: Some(0),
        };

        assert!(matches!(run(args), Err(CliError::Cache(_))));
    }
}
