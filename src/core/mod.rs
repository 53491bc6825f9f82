pub mod aggregate;
pub mod climate;
pub mod encoder;
pub mod engine;
pub mod generator;
pub mod load_shape;
pub mod overlay;
pub mod pipeline;

pub use crate::domain::model::{ProfileResult, UserInputs};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
