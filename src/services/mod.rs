pub mod numbering;
pub mod option_normalizer;
pub mod points;
pub mod validation;

pub use option_normalizer::{normalize_options, scan_options, OptionScan, ScanSource};
pub use points::{effective_points, points_caption};
pub use validation::validate_exam;
