// SPDX-License-Identifier: GPL-3.0-or-later

use serde::{Deserialize, Serialize};

/// How the image service should crop, scale and encode an image.
///
/// Values are passed through unchecked; the service only serves `jpg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
    /// Area of the source image, e.g. `full` or `x,y,w,h`.
    pub region: String,
    /// Output size, e.g. `full` or `!500,500`.
    pub size: String,
    /// Clockwise rotation in degrees.
    pub rotation: String,
    /// `default`, `gray` or `bitonal`.
    pub quality: String,
    pub format: String,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            region: "full".to_string(),
            size: "full".to_string(),
            rotation: "0".to_string(),
            quality: "default".to_string(),
            format: "jpg".to_string(),
        }
    }
}

impl ImageOptions {
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn rotation(mut self, rotation: impl Into<String>) -> Self {
        self.rotation = rotation.into();
        self
    }

    pub fn quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }
}

/// `{base}/{id}/{region}/{size}/{rotation}/{quality}.{format}`
pub fn image_url(base_url: &str, image_id: &str, options: &ImageOptions) -> String {
    format!(
        "{}/{}/{}/{}/{}/{}.{}",
        base_url.trim_end_matches('/'),
        image_id,
        options.region,
        options.size,
        options.rotation,
        options.quality,
        options.format
    )
}
