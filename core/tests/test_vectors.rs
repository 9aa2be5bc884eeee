//! Run every verb against the JSON vectors in `test-vectors/verbs.json`.
//!
//! Each case names a verb call, the request the transport must observe, a
//! simulated response, and either the decoded payload or the error message.
//! Bodies are compared as parsed JSON so key order does not matter.

use std::sync::Mutex;

use async_trait::async_trait;
use planner_client::{
    ApiClient, ClientConfig, HttpMethod, HttpRequest, HttpResponse, Params, Transport, TransportError,
};
use serde_json::Value;

/// Records the request it sees and answers with a canned response.
struct Replay {
    response: HttpResponse,
    seen: Mutex<Option<HttpRequest>>,
}

#[async_trait]
impl Transport for Replay {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        *self.seen.lock().unwrap() = Some(request);
        Ok(self.response.clone())
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

#[tokio::test]
async fn verb_test_vectors() {
    let raw = include_str!("../../test-vectors/verbs.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let base_url = case["base_url"].as_str().unwrap();
        let method = parse_method(case["method"].as_str().unwrap());
        let endpoint = case["endpoint"].as_str().unwrap();
        let sim = &case["simulated_response"];

        let transport = Replay {
            response: HttpResponse::new(sim["status"].as_u64().unwrap() as u16, sim["body"].as_str().unwrap()),
            seen: Mutex::new(None),
        };
        let client = ApiClient::new(ClientConfig::new(base_url), transport);

        let query: Option<Params> = case.get("query").and_then(|q| q.as_object().cloned());
        let body: Option<Value> = case.get("body").filter(|b| !b.is_null()).cloned();

        let result: Result<Value, _> = match method {
            HttpMethod::Get => client.get(endpoint, query.as_ref()).await,
            HttpMethod::Post => client.post(endpoint, body.as_ref()).await,
            HttpMethod::Put => client.put(endpoint, body.as_ref()).await,
            HttpMethod::Delete => client.delete(endpoint).await,
        };

        // Verify the request the transport observed
        let expected_req = &case["expected_request"];
        let seen = client.transport().seen.lock().unwrap().clone().expect("request sent");
        assert_eq!(seen.method, method, "{name}: method");
        assert_eq!(
            seen.path,
            format!("{base_url}{}", expected_req["path"].as_str().unwrap()),
            "{name}: path"
        );
        assert_eq!(seen.query, pairs(&expected_req["query"]), "{name}: query");
        assert_eq!(seen.headers, pairs(&expected_req["headers"]), "{name}: headers");
        match seen.body.as_deref() {
            Some(text) => {
                let sent: Value = serde_json::from_str(text).unwrap();
                assert_eq!(sent, expected_req["body"], "{name}: body");
            }
            None => assert!(expected_req["body"].is_null(), "{name}: body"),
        }

        // Verify the outcome
        match case.get("expected_error") {
            Some(message) => {
                let err = result.expect_err(name);
                assert_eq!(err.to_string(), message.as_str().unwrap(), "{name}: error");
                assert_eq!(err.method, method, "{name}: error method");
                assert_eq!(err.endpoint, endpoint, "{name}: error endpoint");
            }
            None => {
                let payload = result.unwrap_or_else(|e| panic!("{name}: {e}"));
                assert_eq!(payload, case["expected_result"], "{name}: payload");
            }
        }
    }
}
