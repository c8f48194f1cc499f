//! Image information document (`info.json`).
//!
//! Describes one source image to viewers: its full dimensions, the
//! compliance profile, and the tile grid they may request. Only the
//! dimensions come from the image; everything else is fixed or configured.

use crate::imaging::Dimensions;
use serde::Serialize;

pub const CONTEXT: &str = "http://iiif.io/api/image/2/context.json";
pub const PROTOCOL: &str = "http://iiif.io/api/image";
pub const PROFILE: &str = "http://iiif.io/api/image/2/level2.json";

/// Values of the document that do not come from the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoSettings {
    /// Prefix of every `@id`; the identifier is appended verbatim.
    pub base_url: String,
    pub tile_width: u32,
    pub scale_factors: Vec<u32>,
}

impl Default for InfoSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            tile_width: 512,
            scale_factors: vec![1, 2, 4, 8, 16],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tiles {
    pub width: u32,
    #[serde(rename = "scaleFactors")]
    pub scale_factors: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
    pub protocol: &'static str,
    pub width: u32,
    pub height: u32,
    pub profile: Vec<&'static str>,
    pub tiles: Vec<Tiles>,
}

impl ImageInfo {
    pub fn new(identifier: &str, dims: Dimensions, settings: &InfoSettings) -> Self {
        Self {
            context: CONTEXT,
            id: format!("{}{}", settings.base_url, identifier),
            protocol: PROTOCOL,
            width: dims.width,
            height: dims.height,
            profile: vec![PROFILE],
            tiles: vec![Tiles {
                width: settings.tile_width,
                scale_factors: settings.scale_factors.clone(),
            }],
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_shape() {
        let info = ImageInfo::new(
            "g9_20090806_0143.jpg",
            Dimensions {
                width: 3000,
                height: 2000,
            },
            &InfoSettings::default(),
        );

        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({
                "@context": "http://iiif.io/api/image/2/context.json",
                "@id": "http://127.0.0.1:5000/g9_20090806_0143.jpg",
                "protocol": "http://iiif.io/api/image",
                "width": 3000,
                "height": 2000,
                "profile": ["http://iiif.io/api/image/2/level2.json"],
                "tiles": [{"width": 512, "scaleFactors": [1, 2, 4, 8, 16]}]
            })
        );
    }

    #[test]
    fn configured_tiles_and_base() {
        let settings = InfoSettings {
            base_url: "https://images.example.org/iiif/".into(),
            tile_width: 256,
            scale_factors: vec![1, 2],
        };
        let info = ImageInfo::new("a", Dimensions { width: 1, height: 1 }, &settings);

        assert_eq!(info.id, "https://images.example.org/iiif/a");
        assert_eq!(
            info.tiles,
            vec![Tiles {
                width: 256,
                scale_factors: vec![1, 2]
            }]
        );
    }

    #[test]
    fn pretty_json_is_valid() {
        let info = ImageInfo::new("a", Dimensions { width: 5, height: 7 }, &InfoSettings::default());
        let text = info.to_json_pretty().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["width"], 5);
    }
}
