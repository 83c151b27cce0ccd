pub mod bar;
pub mod cache;
pub mod loader;

pub use bar::{validate_series, Bar, DataIntegrityError};
pub use cache::{import_raw_csv, PriceCache};
pub use loader::{load_csv, write_csv};
