pub mod request;
pub mod resolvers;
pub mod schema;
pub mod types;
pub mod workload;

pub use schema::{create_schema, GraphQLSchema};
