/// Camera fly duration for programmatic view transitions.
pub const FLY_DURATION_MS: u64 = 800;

/// Number of bins in per-channel intensity histograms.
pub const HIST_BINS: usize = 64;

/// Screen-space radius (px) within which an annotation marker reacts to hover.
pub const ANNOTATION_HIT_RADIUS: f32 = 16.0;

/// Vertical offset (px) from an annotation's screen position to the marker's
/// visual anchor point (tip of the pin sits below the icon center).
pub const ANNOTATION_ANCHOR_OFFSET_Y: f32 = 9.0;

/// Fallback channel colors cycled when omero metadata carries no color.
pub const FALLBACK_COLORS: [[u8; 3]; 6] = [
    [255, 128, 0],
    [0, 200, 100],
    [0, 128, 255],
    [255, 220, 0],
    [220, 0, 255],
    [0, 255, 220],
];

/// Contrast window used when channel metadata carries none.
pub const DEFAULT_CONTRAST_WINDOW: [f32; 2] = [0.0, 65535.0];

/// Default annotation marker color.
pub const DEFAULT_ANNOTATION_COLOR: [u8; 3] = [255, 100, 100];

/// Default cap on scale-bar screen width, in pixels.
pub const SCALE_BAR_DEFAULT_MAX_WIDTH: f32 = 100.0;

/// Ascending table of human-friendly scale-bar lengths (physical units).
pub const NICE_STEPS: [f64; 13] = [
    1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0,
];

/// Lower bound on the log2 zoom accepted from user interaction.
pub const MIN_ZOOM: f32 = -12.0;

/// Upper bound on the log2 zoom accepted from user interaction.
pub const MAX_ZOOM: f32 = 8.0;

/// Colormap names offered in merged blend mode.
pub const COLORMAP_OPTIONS: [&str; 25] = [
    "viridis",
    "plasma",
    "inferno",
    "magma",
    "jet",
    "hot",
    "cool",
    "spring",
    "summer",
    "autumn",
    "winter",
    "bluered",
    "rdbu",
    "picnic",
    "rainbow",
    "rainbow_soft",
    "cubehelix",
    "greens",
    "greys",
    "bone",
    "copper",
    "blackbody",
    "electric",
    "portland",
    "earth",
];
