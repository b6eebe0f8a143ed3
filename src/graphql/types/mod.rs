pub mod data;
pub mod deep_data;

pub use data::DataType;
pub use deep_data::DeepDataType;
