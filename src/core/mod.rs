pub mod envelope;
pub mod fault;
pub mod lenient;
pub mod response;
pub mod service;
pub mod xml;

pub use crate::domain::model::{LoadDetail, LoadSearchApiRequest, LoadSearchCriteria, MultipleLoadDetailReturn};
pub use crate::domain::ports::{ConfigProvider, LoadSearch, Storage};
pub use crate::utils::error::Result;
