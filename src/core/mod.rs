pub mod classify;
pub mod convert;
pub mod etl;
pub mod mapper;
pub mod normalize;
pub mod shapes;

pub use crate::domain::model::{Conversion, OrderLine};
pub use crate::domain::ports::{ConfigProvider, DestinationShape, Pipeline, Storage};
pub use crate::utils::error::Result;
