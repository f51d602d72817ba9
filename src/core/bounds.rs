use crate::core::geo::Coordinate;
use crate::{BridgeError, Result};
use serde::{Deserialize, Serialize};

/// Geographical bounds as reported by `map.getBounds()`.
///
/// Leaflet's `LatLngBounds` crosses the message channel as a plain object with
/// its private corner fields, so the field names are fixed to `_northEast` and
/// `_southWest`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    #[serde(rename = "_northEast")]
    pub north_east: Coordinate,
    #[serde(rename = "_southWest")]
    pub south_west: Coordinate,
}

impl LatLngBounds {
    pub fn new(south_west: Coordinate, north_east: Coordinate) -> Self {
        Self {
            north_east,
            south_west,
        }
    }

    /// Smallest bounds containing every coordinate
    pub fn from_coordinates(coordinates: &[Coordinate]) -> Result<Self> {
        let (first, rest) = coordinates.split_first().ok_or(BridgeError::EmptyBounds)?;
        let mut bounds = Self::new(*first, *first);
        for coordinate in rest {
            bounds.extend(coordinate);
        }
        Ok(bounds)
    }

    /// Checks if the bounds contain a coordinate
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        coordinate.latitude >= self.south_west.latitude
            && coordinate.latitude <= self.north_east.latitude
            && coordinate.longitude >= self.south_west.longitude
            && coordinate.longitude <= self.north_east.longitude
    }

    /// Extends the bounds to include a coordinate
    pub fn extend(&mut self, coordinate: &Coordinate) {
        self.south_west.latitude = self.south_west.latitude.min(coordinate.latitude);
        self.south_west.longitude = self.south_west.longitude.min(coordinate.longitude);
        self.north_east.latitude = self.north_east.latitude.max(coordinate.latitude);
        self.north_east.longitude = self.north_east.longitude.max(coordinate.longitude);
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.south_west.latitude + self.north_east.latitude) / 2.0,
            (self.south_west.longitude + self.north_east.longitude) / 2.0,
        )
    }
}
