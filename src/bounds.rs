use geo_types::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate. Serialized as `[lat, lon]` to match the settings
/// file shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    fn check(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} outside [-90, 90]", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(format!("longitude {} outside [-180, 180]", self.lon));
        }
        Ok(())
    }
}

impl From<[f64; 2]> for LatLon {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<LatLon> for [f64; 2] {
    fn from(p: LatLon) -> Self {
        [p.lat, p.lon]
    }
}

/// A geographic rectangle given by its southwest and northeast corners.
/// Serialized as `[[sw_lat, sw_lon], [ne_lat, ne_lon]]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[LatLon; 2]", into = "[LatLon; 2]")]
pub struct BoundingBox {
    pub southwest: LatLon,
    pub northeast: LatLon,
}

impl From<[LatLon; 2]> for BoundingBox {
    fn from([southwest, northeast]: [LatLon; 2]) -> Self {
        Self {
            southwest,
            northeast,
        }
    }
}

impl From<BoundingBox> for [LatLon; 2] {
    fn from(b: BoundingBox) -> Self {
        [b.southwest, b.northeast]
    }
}

impl BoundingBox {
    pub fn new(southwest: LatLon, northeast: LatLon) -> Self {
        Self {
            southwest,
            northeast,
        }
    }

    /// Validate corner coordinates and corner ordering. Returns a
    /// description of the first problem found.
    pub fn check(&self) -> Result<(), String> {
        self.southwest
            .check()
            .map_err(|e| format!("southwest corner: {e}"))?;
        self.northeast
            .check()
            .map_err(|e| format!("northeast corner: {e}"))?;
        if self.southwest.lat >= self.northeast.lat || self.southwest.lon >= self.northeast.lon {
            return Err(format!(
                "southwest corner [{}, {}] must be south and west of northeast corner [{}, {}]",
                self.southwest.lat, self.southwest.lon, self.northeast.lat, self.northeast.lon,
            ));
        }
        Ok(())
    }

    /// The box as a `geo_types::Rect` in (lon, lat) axis order.
    pub fn rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.southwest.lon,
                y: self.southwest.lat,
            },
            Coord {
                x: self.northeast.lon,
                y: self.northeast.lat,
            },
        )
    }

    pub fn center(&self) -> LatLon {
        let c = self.rect().center();
        LatLon { lat: c.y, lon: c.x }
    }

    pub fn contains(&self, point: LatLon) -> bool {
        (self.southwest.lat..=self.northeast.lat).contains(&point.lat)
            && (self.southwest.lon..=self.northeast.lon).contains(&point.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(sw: [f64; 2], ne: [f64; 2]) -> BoundingBox {
        BoundingBox::new(sw.into(), ne.into())
    }

    #[test]
    fn valid_box_passes() {
        assert!(bbox([48.78, -123.755], [49.7611, -122.5]).check().is_ok());
    }

    #[test]
    fn latitude_out_of_range_rejected() {
        let err = bbox([91.0, 0.0], [92.0, 1.0]).check().unwrap_err();
        assert!(err.contains("latitude"), "{err}");
    }

    #[test]
    fn longitude_out_of_range_rejected() {
        let err = bbox([0.0, -181.0], [1.0, 0.0]).check().unwrap_err();
        assert!(err.contains("longitude"), "{err}");
    }

    #[test]
    fn swapped_corners_rejected() {
        let err = bbox([49.7611, -122.5], [48.78, -123.755]).check().unwrap_err();
        assert!(err.contains("south and west"), "{err}");
    }

    #[test]
    fn serde_uses_nested_array_shape() {
        let b = bbox([48.78, -123.755], [49.7611, -122.5]);
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[[48.78,-123.755],[49.7611,-122.5]]");
        let back: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn center_and_contains() {
        let b = bbox([48.0, -124.0], [50.0, -122.0]);
        let c = b.center();
        assert_eq!(c, LatLon::new(49.0, -123.0));
        assert!(b.contains(c));
        assert!(!b.contains(LatLon::new(47.0, -123.0)));
    }
}
