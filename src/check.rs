use anyhow::{Context, Result, bail};

use crate::settings::Settings;
use crate::tiles::{TileUrlTemplate, lat_to_tile, lon_to_tile};

/// Probe every remote endpoint the settings point at: the STAC API root and
/// one tile per basemap template, fetched at the center of the initial
/// viewport.
pub async fn run(client: &reqwest::Client, settings: &Settings, zoom: u32) -> Result<()> {
    let mut failures: Vec<String> = Vec::new();

    match probe(client, &settings.stac_api_url).await {
        Ok(status) => eprintln!("STAC_API_URL: {status} — {}", settings.stac_api_url),
        Err(e) => {
            eprintln!("STAC_API_URL: FAILED — {e:#}");
            failures.push("STAC_API_URL".to_string());
        }
    }

    for (name, template) in [("osm_url", &settings.osm_url), ("topo_url", &settings.topo_url)] {
        let url = probe_tile_url(template, settings, zoom);
        match probe(client, &url).await {
            Ok(status) => eprintln!("{name}: {status} — {url}"),
            Err(e) => {
                eprintln!("{name}: FAILED — {e:#}");
                failures.push(name.to_string());
            }
        }
    }

    if !failures.is_empty() {
        bail!("unreachable endpoints: {}", failures.join(", "));
    }
    eprintln!("All endpoints reachable");
    Ok(())
}

/// Concrete tile URL at the center of the initial viewport.
fn probe_tile_url(template: &TileUrlTemplate, settings: &Settings, zoom: u32) -> String {
    let center = settings.init_bounds.center();
    let x = lon_to_tile(center.lon, zoom);
    let y = lat_to_tile(center.lat, zoom);
    template.fill(zoom, x, y)
}

async fn probe(client: &reqwest::Client, url: &str) -> Result<reqwest::StatusCode> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?;
    let status = response.status();
    if !status.is_success() {
        bail!("{url} answered {status}");
    }
    Ok(status)
}
