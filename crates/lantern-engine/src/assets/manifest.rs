use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Named image and sound urls to load together.
///
/// JSON shape: `{ "images": { "name": "url" }, "sounds": { "name": "url" } }`; either
/// map may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    #[serde(default)]
    pub images: BTreeMap<String, String>,
    #[serde(default)]
    pub sounds: BTreeMap<String, String>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_image(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.images.insert(name.into(), url.into());
        self
    }

    pub fn with_sound(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.sounds.insert(name.into(), url.into());
        self
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_manifests() {
        let m = AssetManifest::from_json_str(r#"{ "images": { "hero": "img/hero.png" } }"#).unwrap();
        assert_eq!(m.images.get("hero").map(String::as_str), Some("img/hero.png"));
        assert!(m.sounds.is_empty());
        assert_eq!(m.len(), 1);

        assert!(AssetManifest::from_json_str("{}").unwrap().is_empty());
        assert!(AssetManifest::from_json_str("[1, 2]").is_err());
    }
}
