use crate::graphql::resolvers::Query;
use async_graphql::{EmptyMutation, EmptySubscription, Schema};

/// The complete GraphQL schema
pub type GraphQLSchema = Schema<Query, EmptyMutation, EmptySubscription>;

/// Create the schema. It is immutable once built; clones share it.
pub fn create_schema() -> GraphQLSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription).finish()
}
