//! Quadkey to Web Mercator tile conversion.
//!
//! Each quadkey digit selects one quadrant per zoom level: bit 0 of the digit
//! is the x bit and bit 1 the y bit at that level.

use footprints_core::error::{FootprintsError, Result};
use footprints_core::models::{Bbox, Quadkey};
use std::f64::consts::PI;

/// Deepest zoom level a tile address can carry in `u32` coordinates
pub const MAX_ZOOM: u8 = 31;

/// XYZ tile address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

/// Decode a quadkey into its tile
pub fn quadkey_to_tile(quadkey: &Quadkey) -> Result<Tile> {
    let digits = quadkey.as_str();
    let zoom = quadkey.zoom();
    if zoom > MAX_ZOOM as usize {
        return Err(FootprintsError::InvalidQuadkey {
            value: digits.to_string(),
            reason: format!("zoom {} exceeds maximum of {}", zoom, MAX_ZOOM),
        });
    }

    let mut tile = Tile { x: 0, y: 0, z: zoom as u8 };
    for (level, digit) in digits.chars().enumerate() {
        let mask = 1u32 << (zoom - level - 1);
        match digit {
            '0' => {}
            '1' => tile.x |= mask,
            '2' => tile.y |= mask,
            '3' => {
                tile.x |= mask;
                tile.y |= mask;
            }
            other => {
                return Err(FootprintsError::InvalidQuadkey {
                    value: digits.to_string(),
                    reason: format!("digit '{}' is not in 0-3", other),
                })
            }
        }
    }

    Ok(tile)
}

/// Longitude/latitude of a tile's upper-left corner
fn upper_left(x: f64, y: f64, z: u8) -> (f64, f64) {
    let n = 2f64.powi(z as i32);
    let lon = x / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
    (lon, lat)
}

/// Geographic bounds (WGS 84) of a tile
pub fn tile_bounds(tile: &Tile) -> Bbox {
    let (west, north) = upper_left(tile.x as f64, tile.y as f64, tile.z);
    let (east, south) = upper_left(tile.x as f64 + 1.0, tile.y as f64 + 1.0, tile.z);
    Bbox::new(west, south, east, north)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadkey(s: &str) -> Quadkey {
        Quadkey::parse(s).unwrap()
    }

    #[test]
    fn test_quadkey_to_tile() {
        assert_eq!(quadkey_to_tile(&quadkey("0")).unwrap(), Tile { x: 0, y: 0, z: 1 });
        assert_eq!(quadkey_to_tile(&quadkey("3")).unwrap(), Tile { x: 1, y: 1, z: 1 });
        assert_eq!(quadkey_to_tile(&quadkey("213")).unwrap(), Tile { x: 3, y: 5, z: 3 });
    }

    #[test]
    fn test_leading_zero_changes_tile() {
        let short = quadkey_to_tile(&quadkey("12")).unwrap();
        let padded = quadkey_to_tile(&quadkey("012")).unwrap();
        assert_ne!(short, padded);
        assert_eq!(padded.z, 3);
    }

    #[test]
    fn test_invalid_digit() {
        let err = quadkey_to_tile(&quadkey("1249")).unwrap_err();
        assert!(matches!(err, FootprintsError::InvalidQuadkey { .. }));
    }

    #[test]
    fn test_zoom_limit() {
        assert_eq!(quadkey_to_tile(&quadkey(&"1".repeat(31))).unwrap().z, 31);

        let err = quadkey_to_tile(&quadkey(&"1".repeat(32))).unwrap_err();
        assert!(matches!(err, FootprintsError::InvalidQuadkey { .. }));
    }

    #[test]
    fn test_overlong_padded_quadkey() {
        // 257 digits: the length must not wrap around to a small zoom
        let padded = format!("{}1", "0".repeat(256));
        let err = quadkey_to_tile(&quadkey(&padded)).unwrap_err();
        assert!(matches!(err, FootprintsError::InvalidQuadkey { .. }));
    }

    #[test]
    fn test_world_quadrant_bounds() {
        let bbox = tile_bounds(&Tile { x: 1, y: 0, z: 1 });
        assert!((bbox.min_x - 0.0).abs() < 1e-9);
        assert!((bbox.max_x - 180.0).abs() < 1e-9);
        assert!((bbox.min_y - 0.0).abs() < 1e-9);
        assert!((bbox.max_y - 85.0511287798066).abs() < 1e-9);
    }

    #[test]
    fn test_abyei_tile_bounds() {
        let tile = quadkey_to_tile(&quadkey("122321003")).unwrap();
        assert_eq!(tile, Tile { x: 297, y: 241, z: 9 });

        let bbox = tile_bounds(&tile);
        assert!((bbox.min_x - 28.828125).abs() < 1e-9);
        assert!((bbox.max_x - 29.53125).abs() < 1e-9);
        assert!(bbox.min_y < bbox.max_y);
        assert!(bbox.min_y > 9.7 && bbox.max_y < 10.6);
    }
}
