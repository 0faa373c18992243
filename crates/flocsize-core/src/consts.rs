/// ITU-R BT.601 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R BT.601 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R BT.601 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Largest 8-bit grey level. Thresholds and filter strengths are expressed
/// on this scale even though frames are stored in [0.0, 1.0].
pub const MAX_LEVEL: f32 = 255.0;

/// Number of grey levels in 8-bit histograms (Otsu, CLAHE).
pub const GRAY_LEVELS: usize = 256;

/// Physical length covered by one pixel (micrometres per pixel).
pub const DEFAULT_PIXEL_SCALE: f64 = 3.45;

/// Maximum focus-map value a particle must exceed to count as in focus.
pub const DEFAULT_CLARITY_THRESHOLD: f32 = 10.0;

/// Foreground pixel counts must lie strictly above this value.
pub const DEFAULT_AREA_MIN: usize = 3;

/// Foreground pixel counts must lie strictly below this value.
pub const DEFAULT_AREA_MAX: usize = 18_000;

/// Fixed binarization level (8-bit) used when automatic thresholding is off.
pub const DEFAULT_THRESHOLD_VALUE: u8 = 80;

/// Columns of camera artefact removed from the left edge of every image.
pub const DEFAULT_LEFT_BORDER_TRIM: u32 = 11;

/// Background columns/rows required between a particle and the image edge.
pub const DEFAULT_EDGE_MARGIN: u32 = 2;

/// Non-local means filter strength in 8-bit grey levels.
pub const DEFAULT_DENOISE_STRENGTH: f32 = 7.0;

/// Non-local means patch size (odd).
pub const DEFAULT_TEMPLATE_WINDOW: usize = 7;

/// Non-local means search area size (odd).
pub const DEFAULT_SEARCH_WINDOW: usize = 7;

/// Non-local means weights below this value are discarded.
pub const NLM_WEIGHT_THRESHOLD: f64 = 0.001;

/// CLAHE histogram clip limit, relative to a uniform histogram.
pub const DEFAULT_CLAHE_CLIP_LIMIT: f32 = 2.0;

/// CLAHE tiles per image side.
pub const DEFAULT_CLAHE_TILE_GRID: usize = 8;

/// Scale applied to each Sobel derivative before taking the magnitude.
pub const DEFAULT_SOBEL_SCALE: f32 = 0.25;

/// Exponent of the Knud Thomsen ellipsoid surface-area approximation.
pub const THOMSEN_EXPONENT: f64 = 1.6;

/// Image file extensions picked up when scanning an input directory.
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 6] = ["bmp", "png", "tif", "tiff", "jpg", "jpeg"];

/// Percentage of repeated particles above which a run is reported dirty.
pub const DEFAULT_MAX_PERCENT_REMOVED: f64 = 5.0;
