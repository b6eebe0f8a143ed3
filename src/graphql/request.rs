//! GraphQL-over-HTTP parameter extraction and response status mapping.

use crate::error::{ErrorBody, RequestError};
use async_graphql::{Request, Value, Variables};
use async_graphql_axum::GraphQLResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

/// Parameters carried in the URL query string.
#[derive(Debug, Default, Deserialize)]
pub struct UrlParams {
    pub query: Option<String>,
    /// JSON-encoded object
    pub variables: Option<String>,
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,
    /// Forces a JSON answer even when the explorer would be shown
    pub raw: Option<String>,
}

impl UrlParams {
    pub fn wants_explorer(&self) -> bool {
        self.query.is_none() && self.raw.is_none()
    }
}

/// Parameters carried in a POST body.
#[derive(Debug, Default, Deserialize)]
pub struct BodyParams {
    pub query: Option<String>,
    pub variables: Option<serde_json::Value>,
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,
}

/// Decodes a POST body according to its content type.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<BodyParams, RequestError> {
    let Some(content_type) = content_type else {
        return Ok(BodyParams::default());
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(BodyParams::default());
            }
            Ok(serde_json::from_slice(body)?)
        }
        "application/graphql" => Ok(BodyParams {
            query: Some(std::str::from_utf8(body)?.to_owned()),
            ..Default::default()
        }),
        _ => Err(RequestError::UnsupportedMediaType(essence)),
    }
}

/// Merges URL and body parameters into an executable request. URL values win.
pub fn build_request(url: UrlParams, body: BodyParams) -> Result<Request, RequestError> {
    let query = url
        .query
        .or(body.query)
        .filter(|q| !q.trim().is_empty())
        .ok_or(RequestError::MissingQuery)?;

    let variables = match url.variables {
        Some(raw) => parse_variables(serde_json::Value::String(raw))?,
        None => match body.variables {
            Some(value) => parse_variables(value)?,
            None => None,
        },
    };

    let mut request = Request::new(query);
    if let Some(variables) = variables {
        request = request.variables(variables);
    }
    if let Some(name) = url.operation_name.or(body.operation_name) {
        request = request.operation_name(name);
    }

    Ok(request)
}

fn parse_variables(value: serde_json::Value) -> Result<Option<Variables>, RequestError> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(raw) if raw.trim().is_empty() => Ok(None),
        serde_json::Value::String(raw) => {
            let decoded: serde_json::Value = serde_json::from_str(&raw)
                .map_err(|e| RequestError::InvalidVariables(e.to_string()))?;
            match decoded {
                serde_json::Value::String(_) => Err(RequestError::InvalidVariables(
                    "expected a JSON object".to_string(),
                )),
                other => parse_variables(other),
            }
        }
        serde_json::Value::Object(map) => {
            Ok(Some(Variables::from_json(serde_json::Value::Object(map))))
        }
        _ => Err(RequestError::InvalidVariables(
            "expected a JSON object".to_string(),
        )),
    }
}

/// A response without data but with errors never reached execution
/// (parse or validation failure) and is reported as a client error.
pub fn response_status(response: &async_graphql::Response) -> StatusCode {
    if response.data == Value::Null && response.is_err() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    }
}

pub fn into_http_response(response: async_graphql::Response) -> Response {
    let status = response_status(&response);
    if status.is_success() {
        return GraphQLResponse::from(response).into_response();
    }

    let body = ErrorBody {
        errors: response.errors,
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn url_query(query: &str) -> UrlParams {
        UrlParams {
            query: Some(query.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn url_query_wins_over_body() {
        let body = BodyParams {
            query: Some("{ goodbye }".to_string()),
            ..Default::default()
        };
        let request = build_request(url_query("{ hello }"), body).unwrap();
        assert_eq!(request.query, "{ hello }");
    }

    #[test]
    fn blank_query_is_missing() {
        let err = build_request(url_query("   "), BodyParams::default()).unwrap_err();
        assert!(matches!(err, RequestError::MissingQuery));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn url_variables_are_decoded() {
        let url = UrlParams {
            variables: Some(r#"{"size": 10}"#.to_string()),
            operation_name: Some("Example".to_string()),
            ..url_query("query Example($size: Int) { hello }")
        };
        let request = build_request(url, BodyParams::default()).unwrap();

        assert_eq!(request.operation_name.as_deref(), Some("Example"));
        assert_eq!(
            request.variables,
            Variables::from_json(json!({ "size": 10 }))
        );
    }

    #[test]
    fn string_encoded_body_variables_are_accepted() {
        let body = BodyParams {
            query: Some("{ hello }".to_string()),
            variables: Some(json!(r#"{"a": 1}"#)),
            operation_name: None,
        };
        let request = build_request(UrlParams::default(), body).unwrap();
        assert_eq!(request.variables, Variables::from_json(json!({ "a": 1 })));
    }

    #[test]
    fn malformed_variables_are_rejected() {
        let url = UrlParams {
            variables: Some("{not json".to_string()),
            ..url_query("{ hello }")
        };
        let err = build_request(url, BodyParams::default()).unwrap_err();
        assert!(matches!(err, RequestError::InvalidVariables(_)));
    }

    #[test]
    fn non_object_variables_are_rejected() {
        let body = BodyParams {
            query: Some("{ hello }".to_string()),
            variables: Some(json!([1, 2])),
            operation_name: None,
        };
        assert!(build_request(UrlParams::default(), body).is_err());
    }

    #[test]
    fn json_body_with_charset() {
        let params = parse_body(
            Some("application/json; charset=utf-8"),
            br#"{"query":"{ hello }","operationName":null}"#,
        )
        .unwrap();
        assert_eq!(params.query.as_deref(), Some("{ hello }"));
        assert!(params.operation_name.is_none());
    }

    #[test]
    fn raw_graphql_body() {
        let params = parse_body(Some("application/graphql"), b"{ hello }").unwrap();
        assert_eq!(params.query.as_deref(), Some("{ hello }"));
    }

    #[test]
    fn raw_graphql_body_must_be_utf8() {
        let err = parse_body(Some("application/graphql"), b"{ hel\xfflo }").unwrap_err();
        assert!(matches!(err, RequestError::InvalidEncoding(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_json_body() {
        let err = parse_body(Some("application/json"), b"{\"query\":").unwrap_err();
        assert!(matches!(err, RequestError::InvalidBody(_)));
    }

    #[test]
    fn unsupported_content_type() {
        let err = parse_body(Some("text/plain"), b"{ hello }").unwrap_err();
        assert_eq!(err.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn missing_content_type_is_an_empty_body() {
        let params = parse_body(None, b"{ hello }").unwrap();
        assert!(params.query.is_none());
    }

    #[test]
    fn explorer_only_without_query_or_raw() {
        assert!(UrlParams::default().wants_explorer());
        assert!(!url_query("{ hello }").wants_explorer());
        let raw = UrlParams {
            raw: Some(String::new()),
            ..Default::default()
        };
        assert!(!raw.wants_explorer());
    }

    #[test]
    fn status_follows_data_presence() {
        let ok = async_graphql::Response::new(Value::from_json(json!({ "hello": "world" })).unwrap());
        assert_eq!(response_status(&ok), StatusCode::OK);

        let failed =
            async_graphql::Response::from_errors(vec![async_graphql::ServerError::new("bad", None)]);
        assert_eq!(response_status(&failed), StatusCode::BAD_REQUEST);
    }
}
