use super::data::DataType;
use async_graphql::Object;

#[derive(Clone, Copy, Default)]
pub struct DeepDataType;

#[Object]
impl DeepDataType {
    async fn a(&self) -> Option<&'static str> {
        Some("Already Been Done")
    }

    async fn b(&self) -> Option<&'static str> {
        Some("Boring")
    }

    /// A list with a hole in the middle
    async fn c(&self) -> Option<Vec<Option<&'static str>>> {
        Some(vec![Some("Contrived"), None, Some("Confusing")])
    }

    async fn deeper(&self) -> Option<Vec<Option<DataType>>> {
        Some(vec![Some(DataType), None, Some(DataType)])
    }
}
