//! Marker icon descriptors and their `L.icon(...)` wire representation.

use crate::Result;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// A 2D vector used for icon sizes and anchors
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Integer pair sent to Leaflet, rounded half away from zero
    pub fn to_wire(self) -> [i32; 2] {
        [self.x.round() as i32, self.y.round() as i32]
    }
}

impl From<[i32; 2]> for Vec2 {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(f64::from(x), f64::from(y))
    }
}

/// Where the icon image comes from
#[derive(Debug, Clone, PartialEq)]
pub enum IconSource {
    Url(String),
    Image(InlineImage),
}

#[derive(Debug)]
struct Materialized {
    location: String,
    width: u32,
    height: u32,
}

#[derive(Debug)]
struct InlineImageInner {
    data: Vec<u8>,
    materialized: OnceCell<Materialized>,
}

/// Encoded image bytes (PNG, JPEG or GIF) shipped with the descriptor.
///
/// The image is written out as PNG the first time it is needed and every clone
/// of the descriptor reuses that location afterwards.
#[derive(Debug, Clone)]
pub struct InlineImage {
    inner: Arc<InlineImageInner>,
}

impl InlineImage {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: Arc::new(InlineImageInner {
                data: data.into(),
                materialized: OnceCell::new(),
            }),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Location of the materialized file, if it has been written
    pub fn location(&self) -> Option<&str> {
        self.inner
            .materialized
            .get()
            .map(|materialized| materialized.location.as_str())
    }

    fn materialize(&self, asset_dir: &Path) -> Result<&Materialized> {
        self.inner.materialized.get_or_try_init(|| {
            let image = image::load_from_memory(&self.inner.data)?;
            std::fs::create_dir_all(asset_dir)?;
            let path = asset_dir.join(format!("{}.png", Uuid::new_v4()));
            image.save_with_format(&path, image::ImageFormat::Png)?;
            log::debug!("materialized inline icon at {}", path.display());
            Ok(Materialized {
                location: path.to_string_lossy().into_owned(),
                width: image.width(),
                height: image.height(),
            })
        })
    }
}

impl PartialEq for InlineImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner.data == other.inner.data
    }
}

/// Describes the icon of a marker
#[derive(Debug, Clone, PartialEq)]
pub struct IconDescriptor {
    pub source: IconSource,
    pub icon_size: Option<Vec2>,
    pub icon_anchor: Option<Vec2>,
    pub popup_anchor: Option<Vec2>,
    pub shadow_url: Option<String>,
    pub shadow_size: Option<Vec2>,
    pub shadow_anchor: Option<Vec2>,
}

impl IconDescriptor {
    pub fn new(source: IconSource) -> Self {
        Self {
            source,
            icon_size: None,
            icon_anchor: None,
            popup_anchor: None,
            shadow_url: None,
            shadow_size: None,
            shadow_anchor: None,
        }
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::new(IconSource::Url(url.into()))
    }

    pub fn image(data: impl Into<Vec<u8>>) -> Self {
        Self::new(IconSource::Image(InlineImage::new(data)))
    }

    pub fn with_icon_size(mut self, width: f64, height: f64) -> Self {
        self.icon_size = Some(Vec2::new(width, height));
        self
    }

    pub fn with_icon_anchor(mut self, x: f64, y: f64) -> Self {
        self.icon_anchor = Some(Vec2::new(x, y));
        self
    }

    pub fn with_popup_anchor(mut self, x: f64, y: f64) -> Self {
        self.popup_anchor = Some(Vec2::new(x, y));
        self
    }

    pub fn with_shadow(mut self, url: impl Into<String>) -> Self {
        self.shadow_url = Some(url.into());
        self
    }

    pub fn with_shadow_size(mut self, width: f64, height: f64) -> Self {
        self.shadow_size = Some(Vec2::new(width, height));
        self
    }

    pub fn with_shadow_anchor(mut self, x: f64, y: f64) -> Self {
        self.shadow_anchor = Some(Vec2::new(x, y));
        self
    }

    /// Builds the options object for `L.icon`. Inline images are materialized
    /// into `asset_dir` on first use; their pixel size stands in for a missing
    /// icon size.
    pub fn to_representation(&self, asset_dir: &Path) -> Result<IconRepresentation> {
        let (icon_url, intrinsic_size) = match &self.source {
            IconSource::Url(url) => (url.clone(), None),
            IconSource::Image(image) => {
                let materialized = image.materialize(asset_dir)?;
                (
                    materialized.location.clone(),
                    Some([materialized.width as i32, materialized.height as i32]),
                )
            }
        };

        Ok(IconRepresentation {
            icon_url,
            icon_size: self.icon_size.map(Vec2::to_wire).or(intrinsic_size),
            icon_anchor: self.icon_anchor.map(Vec2::to_wire),
            popup_anchor: self.popup_anchor.map(Vec2::to_wire),
            shadow_url: self.shadow_url.clone(),
            shadow_size: self.shadow_size.map(Vec2::to_wire),
            shadow_anchor: self.shadow_anchor.map(Vec2::to_wire),
        })
    }
}

impl From<IconRepresentation> for IconDescriptor {
    fn from(representation: IconRepresentation) -> Self {
        Self {
            source: IconSource::Url(representation.icon_url),
            icon_size: representation.icon_size.map(Vec2::from),
            icon_anchor: representation.icon_anchor.map(Vec2::from),
            popup_anchor: representation.popup_anchor.map(Vec2::from),
            shadow_url: representation.shadow_url,
            shadow_size: representation.shadow_size.map(Vec2::from),
            shadow_anchor: representation.shadow_anchor.map(Vec2::from),
        }
    }
}

/// Wire shape of an icon: the options object of `L.icon`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRepresentation {
    pub icon_url: String,
    #[serde(default, deserialize_with = "rounded_pair", skip_serializing_if = "Option::is_none")]
    pub icon_size: Option<[i32; 2]>,
    #[serde(default, deserialize_with = "rounded_pair", skip_serializing_if = "Option::is_none")]
    pub icon_anchor: Option<[i32; 2]>,
    #[serde(default, deserialize_with = "rounded_pair", skip_serializing_if = "Option::is_none")]
    pub popup_anchor: Option<[i32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_url: Option<String>,
    #[serde(default, deserialize_with = "rounded_pair", skip_serializing_if = "Option::is_none")]
    pub shadow_size: Option<[i32; 2]>,
    #[serde(default, deserialize_with = "rounded_pair", skip_serializing_if = "Option::is_none")]
    pub shadow_anchor: Option<[i32; 2]>,
}

fn rounded_pair<'de, D>(deserializer: D) -> std::result::Result<Option<[i32; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let pair = Option::<[f64; 2]>::deserialize(deserializer)?;
    Ok(pair.map(|[x, y]| Vec2::new(x, y).to_wire()))
}
