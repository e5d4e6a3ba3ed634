pub mod console;
pub mod document;
pub mod tabular;

pub use console::{format_top, render_section};
pub use document::{SourceReport, TrendDocument, TIMESTAMP_FORMAT};
pub use tabular::{format_average, write_csv, write_csv_file, CSV_HEADER};
