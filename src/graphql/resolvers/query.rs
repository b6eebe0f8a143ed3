use async_graphql::Object;

/// Root query object for GraphQL
pub struct Query;

#[Object(name = "RootQueryType")]
impl Query {
    /// Always resolves to "world"
    async fn hello(&self) -> Option<&'static str> {
        Some("world")
    }
}
