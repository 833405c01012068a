mod error;
mod traits;
mod types;

pub use error::{DateRangeError, RepositoryError, Result};
pub use traits::{
    CatalogRepository, CostingRepository, DataStore, InvoiceRepository, JobRepository,
    ReceiptRepository, ReportingRepository,
};
pub use types::DateRange;
