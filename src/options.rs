/// How far the loader trusts the image sizes declared in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageCheck {
    /// Trust the document; never touch the image files.
    Skip,
    /// Every referenced image must exist on disk.
    #[default]
    Exists,
    /// Every referenced image must exist and its header must match the declared size.
    Dimensions,
}

/// Loader configuration.
///
/// ```
/// use tiled_tileset::{ImageCheck, LoadOptions};
///
/// let opts = LoadOptions::new()
///     .image_check(ImageCheck::Dimensions)
///     .strict_tile_count(false);
/// assert_eq!(opts.image_check, ImageCheck::Dimensions);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Image file validation policy
    pub image_check: ImageCheck,
    /// Fail when `tilecount` disagrees with the number of tile entries
    pub strict_tile_count: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            image_check: ImageCheck::default(),
            strict_tile_count: true,
        }
    }
}

impl LoadOptions {
    /// Default options: images must exist, tile count must match.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the image validation policy.
    pub fn image_check(mut self, check: ImageCheck) -> Self {
        self.image_check = check;
        self
    }

    /// Enables or disables the `tilecount` check.
    pub fn strict_tile_count(mut self, strict: bool) -> Self {
        self.strict_tile_count = strict;
        self
    }
}
