//! In-process executor benchmark: runs a fixed query against a schema
//! repeatedly, with no HTTP involved.

use crate::error::BenchError;
use crate::graphql::schema::{create_schema, GraphQLSchema};
use crate::graphql::types::DataType;
use async_graphql::{EmptyMutation, EmptySubscription, Request, Response, Schema, Variables};
use serde::Serialize;
use std::time::{Duration, Instant};

pub const HELLO_QUERY: &str = "{ hello }";

/// Exercises aliases, fragment spreads, inline fragments, variables and
/// nested lists containing nulls.
pub const EXAMPLE_QUERY: &str = r#"
query Example($size: Int) {
    a,
    b,
    x: c
    ...c
    f
    ...on DataType {
        pic(size: $size)
        promise {
            a
        }
    }
    deep {
        a
        b
        c
        deeper {
            a
            b
        }
    }
}
fragment c on DataType {
    d
    e
}
"#;

pub type WorkloadSchema = Schema<DataType, EmptyMutation, EmptySubscription>;

pub fn create_workload_schema() -> WorkloadSchema {
    Schema::build(DataType, EmptyMutation, EmptySubscription).finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Workload {
    /// `{ hello }` against the HTTP server's schema
    Hello,
    /// The `Example` query against the DataType schema
    Example,
}

/// A built schema paired with the query it is benchmarked with.
pub enum WorkloadRunner {
    Hello(GraphQLSchema),
    Example(WorkloadSchema),
}

impl WorkloadRunner {
    pub fn new(workload: Workload) -> Self {
        match workload {
            Workload::Hello => WorkloadRunner::Hello(create_schema()),
            Workload::Example => WorkloadRunner::Example(create_workload_schema()),
        }
    }

    pub async fn execute(&self) -> Response {
        match self {
            WorkloadRunner::Hello(schema) => schema.execute(request(HELLO_QUERY)).await,
            WorkloadRunner::Example(schema) => schema.execute(request(EXAMPLE_QUERY)).await,
        }
    }
}

fn request(query: &str) -> Request {
    Request::new(query).variables(Variables::default())
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub workload: Workload,
    pub iterations: u64,
    pub total_ms: f64,
    pub ns_per_op: f64,
    pub ops_per_sec: f64,
}

impl BenchReport {
    fn new(workload: Workload, iterations: u64, elapsed: Duration) -> Self {
        let nanos = elapsed.as_nanos() as f64;
        let secs = elapsed.as_secs_f64();
        Self {
            workload,
            iterations,
            total_ms: secs * 1_000.0,
            ns_per_op: if iterations == 0 { 0.0 } else { nanos / iterations as f64 },
            ops_per_sec: if secs > 0.0 { iterations as f64 / secs } else { 0.0 },
        }
    }
}

/// Runs `warmup` untimed executions, then `iterations` timed ones. Stops at
/// the first response carrying errors.
pub async fn run_benchmark(
    workload: Workload,
    iterations: u64,
    warmup: u64,
) -> Result<BenchReport, BenchError> {
    let runner = WorkloadRunner::new(workload);

    for i in 0..warmup {
        check(i, runner.execute().await)?;
    }

    let start = Instant::now();
    for i in 0..iterations {
        check(i, runner.execute().await)?;
    }

    Ok(BenchReport::new(workload, iterations, start.elapsed()))
}

fn check(iteration: u64, response: Response) -> Result<(), BenchError> {
    match response.errors.first() {
        Some(err) => Err(BenchError::Execution {
            iteration,
            message: err.message.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example_data() -> serde_json::Value {
        json!({
            "a": "Apple",
            "b": "Banana",
            "x": "Cookie",
            "d": "Donut",
            "e": "Egg",
            "f": "Fish",
            "pic": "Pic of size: 50",
            "promise": { "a": "Apple" },
            "deep": {
                "a": "Already Been Done",
                "b": "Boring",
                "c": ["Contrived", null, "Confusing"],
                "deeper": [
                    { "a": "Apple", "b": "Banana" },
                    null,
                    { "a": "Apple", "b": "Banana" }
                ]
            }
        })
    }

    #[tokio::test]
    async fn example_query_resolves_every_field() {
        let response = WorkloadRunner::new(Workload::Example).execute().await;

        assert!(response.errors.is_empty(), "{:?}", response.errors);
        assert_eq!(response.data.into_json().unwrap(), example_data());
    }

    #[tokio::test]
    async fn pic_uses_supplied_size() {
        let schema = create_workload_schema();
        let request = Request::new(EXAMPLE_QUERY)
            .variables(Variables::from_json(json!({ "size": 100 })));
        let data = schema.execute(request).await.data.into_json().unwrap();

        assert_eq!(data["pic"], "Pic of size: 100");
    }

    #[tokio::test]
    async fn benchmark_reports_requested_iterations() {
        let report = run_benchmark(Workload::Hello, 25, 5).await.unwrap();

        assert_eq!(report.iterations, 25);
        assert_eq!(report.workload, Workload::Hello);
        assert!(report.ns_per_op >= 0.0);
        assert_eq!(
            serde_json::to_value(&report).unwrap()["workload"],
            json!("hello")
        );
    }

    #[tokio::test]
    async fn zero_iterations_is_not_a_division_by_zero() {
        let report = run_benchmark(Workload::Example, 0, 0).await.unwrap();
        assert_eq!(report.ns_per_op, 0.0);
    }

    #[test]
    fn errors_abort_with_iteration() {
        let response = Response::from_errors(vec![async_graphql::ServerError::new("boom", None)]);
        match check(7, response) {
            Err(BenchError::Execution { iteration, message }) => {
                assert_eq!(iteration, 7);
                assert_eq!(message, "boom");
            }
            Ok(()) => panic!("expected an error"),
        }
    }
}
