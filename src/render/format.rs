//! Raster formats the external renderer is asked to produce

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    #[default]
    Png,
    Gif,
    Jpeg,
    Bmp,
}

impl RasterFormat {
    /// Value passed to Graphviz as `-T<format>`
    pub fn graphviz_name(&self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Gif => "gif",
            RasterFormat::Jpeg => "jpeg",
            RasterFormat::Bmp => "bmp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Gif => "gif",
            RasterFormat::Jpeg => "jpg",
            RasterFormat::Bmp => "bmp",
        }
    }

    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            RasterFormat::Png => image::ImageFormat::Png,
            RasterFormat::Gif => image::ImageFormat::Gif,
            RasterFormat::Jpeg => image::ImageFormat::Jpeg,
            RasterFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.graphviz_name())
    }
}

impl FromStr for RasterFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(RasterFormat::Png),
            "gif" => Ok(RasterFormat::Gif),
            "jpeg" | "jpg" => Ok(RasterFormat::Jpeg),
            "bmp" => Ok(RasterFormat::Bmp),
            other => Err(format!(
                "Unsupported raster format: {}. Must be one of: png, gif, jpeg, bmp",
                other
            )),
        }
    }
}
