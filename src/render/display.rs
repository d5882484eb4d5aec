//! Images handed to the presentation layer

use image::DynamicImage;
use std::path::{Path, PathBuf};

use crate::core::{ViewerError, ViewerResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    /// Decoded from the renderer's output file
    Rendered { path: PathBuf },
    /// Blank stand-in shown after any rendering failure
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct DisplayImage {
    image: DynamicImage,
    origin: ImageOrigin,
}

impl DisplayImage {
    pub fn placeholder() -> Self {
        Self {
            image: DynamicImage::new_rgba8(1, 1),
            origin: ImageOrigin::Placeholder,
        }
    }

    /// Decode the whole file into memory so the path can be overwritten later
    pub fn load(path: &Path) -> ViewerResult<Self> {
        let image = image::open(path).map_err(|source| ViewerError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            image,
            origin: ImageOrigin::Rendered {
                path: path.to_path_buf(),
            },
        })
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn origin(&self) -> &ImageOrigin {
        &self.origin
    }

    pub fn is_placeholder(&self) -> bool {
        self.origin == ImageOrigin::Placeholder
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl Default for DisplayImage {
    fn default() -> Self {
        Self::placeholder()
    }
}
