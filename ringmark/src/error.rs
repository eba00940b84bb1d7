use thiserror::Error;

/// Invalid input configuration. Raised before any code or page is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("bits must be between 4 and 16, got {0}")]
    BitWidthOutOfRange(u32),

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("markers total must be at least 1")]
    NoMarkers,

    #[error("marker numbers starting at {start} overflow for {count} markers")]
    NumberOverflow { start: u32, count: usize },

    #[error("fixed grid has no slots")]
    EmptyFixedGrid,

    #[error("custom sheet needs both page_width and page_height")]
    MissingPageSize,

    #[error("unknown sheet '{0}', expected avery-6450, letter, a4, a3 or custom")]
    UnknownSheet(String),

    #[error("invalid config file: {0}")]
    Parse(String),
}

/// More markers were requested than the code set for the bit width holds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "markers total ({requested}) exceeds the {available} rotation-invariant codes available for {bits} bits"
)]
pub struct CapacityError {
    pub bits: u32,
    pub requested: usize,
    pub available: usize,
}

/// A computed grid that cannot be used.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error(
        "no marker fits on a {width}x{height}mm page with margin {margin}mm and pitch {pitch}mm ({columns} columns, {rows} rows)"
    )]
    NoFit {
        width: f64,
        height: f64,
        margin: f64,
        pitch: f64,
        columns: usize,
        rows: usize,
    },
    #[error("a {columns}x{rows} grid has more slots than can be counted")]
    TooManySlots { columns: usize, rows: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("capacity error: {0}")]
    Capacity(#[from] CapacityError),
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}
