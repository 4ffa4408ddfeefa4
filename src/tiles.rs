use serde::{Deserialize, Serialize};

const PLACEHOLDER_KEYS: [&str; 3] = ["z", "x", "y"];

/// A raster tile URL template with zoom/x/y placeholders.
///
/// Two placeholder styles occur in the wild and both are accepted:
/// `${z}` (OpenStreetMap-style templates) and `{z}` (ArcGIS-style).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileUrlTemplate(String);

impl TileUrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Require each of the z/x/y placeholders to appear exactly once.
    ///
    /// Counting the `{k}` token also covers the `${k}` style, since the
    /// latter contains the former.
    pub fn check(&self) -> Result<(), String> {
        if self.0.is_empty() {
            return Err("template is empty".into());
        }
        for key in PLACEHOLDER_KEYS {
            let count = self.0.matches(&format!("{{{key}}}")).count();
            if count != 1 {
                return Err(format!(
                    "placeholder for `{key}` appears {count} times in {:?}, expected exactly once",
                    self.0,
                ));
            }
        }
        Ok(())
    }

    /// Substitute concrete tile coordinates into the template.
    pub fn fill(&self, z: u32, x: u32, y: u32) -> String {
        let mut url = self.0.clone();
        for (key, value) in PLACEHOLDER_KEYS.into_iter().zip([z, x, y]) {
            let value = value.to_string();
            url = url.replace(&format!("${{{key}}}"), &value);
            url = url.replace(&format!("{{{key}}}"), &value);
        }
        url
    }
}

/// Slippy-map tile X index for a longitude at the given zoom.
/// Clamped to the grid, so +180 maps onto the last column.
pub fn lon_to_tile(lon: f64, zoom: u32) -> u32 {
    let n = 2_f64.powi(zoom as i32);
    (((lon / 360.0 + 0.5) * n).floor().min(n - 1.0)) as u32
}

/// Slippy-map tile Y index for a latitude at the given zoom.
/// Clamped to the grid, so the south pole maps onto the last row.
pub fn lat_to_tile(lat: f64, zoom: u32) -> u32 {
    let n = 2_f64.powi(zoom as i32);
    ((mercator_y(lat) * n).floor().min(n - 1.0)) as u32
}

/// Convert latitude to Web Mercator Y fraction (0.0 = top, 1.0 = bottom).
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollar_style_template_passes() {
        let t = TileUrlTemplate::new("https://tile.openstreetmap.org/${z}/${x}/${y}.png");
        assert!(t.check().is_ok());
    }

    #[test]
    fn brace_style_template_passes() {
        let t = TileUrlTemplate::new(
            "http://services.arcgisonline.com/arcgis/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}",
        );
        assert!(t.check().is_ok());
    }

    #[test]
    fn missing_placeholder_rejected() {
        let t = TileUrlTemplate::new("https://tiles.example.com/${z}/${x}.png");
        let err = t.check().unwrap_err();
        assert!(err.contains("`y`"), "{err}");
        assert!(err.contains("0 times"), "{err}");
    }

    #[test]
    fn duplicate_placeholder_rejected() {
        let t = TileUrlTemplate::new("https://tiles.example.com/{z}/{x}/{y}/{y}.png");
        let err = t.check().unwrap_err();
        assert!(err.contains("`y`"), "{err}");
        assert!(err.contains("2 times"), "{err}");
    }

    #[test]
    fn empty_template_rejected() {
        assert!(TileUrlTemplate::new("").check().is_err());
    }

    #[test]
    fn fill_dollar_style() {
        let t = TileUrlTemplate::new("https://tile.openstreetmap.org/${z}/${x}/${y}.png");
        assert_eq!(
            t.fill(10, 163, 350),
            "https://tile.openstreetmap.org/10/163/350.png"
        );
    }

    #[test]
    fn fill_brace_style() {
        let t = TileUrlTemplate::new("https://example.com/tile/{z}/{y}/{x}");
        assert_eq!(t.fill(3, 1, 2), "https://example.com/tile/3/2/1");
    }

    #[test]
    fn tile_indices_at_zoom_zero() {
        assert_eq!(lon_to_tile(-123.0, 0), 0);
        assert_eq!(lat_to_tile(49.0, 0), 0);
    }

    #[test]
    fn tile_indices_clamped_at_world_edges() {
        // +180 and the mercator southern limit would otherwise land one
        // column/row past the grid.
        assert_eq!(lon_to_tile(180.0, 4), 15);
        assert_eq!(lat_to_tile(-85.05112878, 4), 15);
        assert_eq!(lon_to_tile(180.0, 0), 0);
        assert_eq!(lat_to_tile(-90.0, 0), 0);
    }

    #[test]
    fn tile_indices_inside_world_range() {
        let x = lon_to_tile(-123.1275, 10);
        let y = lat_to_tile(49.27055, 10);
        assert!(x < 1024 && y < 1024);
        // Western and northern hemisphere: left/top half of the grid.
        assert!(x < 512);
        assert!(y < 512);
    }
}
