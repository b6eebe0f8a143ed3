use super::deep_data::DeepDataType;
use async_graphql::Object;

pub const DEFAULT_PIC_SIZE: i32 = 50;

/// Root of the executor benchmark schema. Every field is a constant.
#[derive(Clone, Copy, Default)]
pub struct DataType;

#[Object]
impl DataType {
    async fn a(&self) -> Option<&'static str> {
        Some("Apple")
    }

    async fn b(&self) -> Option<&'static str> {
        Some("Banana")
    }

    async fn c(&self) -> Option<&'static str> {
        Some("Cookie")
    }

    async fn d(&self) -> Option<&'static str> {
        Some("Donut")
    }

    async fn e(&self) -> Option<&'static str> {
        Some("Egg")
    }

    async fn f(&self) -> Option<&'static str> {
        Some("Fish")
    }

    /// Describes a picture of the given size (50 when omitted)
    async fn pic(&self, size: Option<i32>) -> Option<String> {
        Some(format!("Pic of size: {}", size.unwrap_or(DEFAULT_PIC_SIZE)))
    }

    async fn deep(&self) -> Option<DeepDataType> {
        Some(DeepDataType)
    }

    async fn promise(&self) -> Option<DataType> {
        Some(DataType)
    }
}
