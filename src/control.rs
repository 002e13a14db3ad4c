//! HTTP control surface over the parameter store
//!
//! - `GET /var/{name}[?state=<int>]`: read, or set to int/1000
//! - `GET /color/{name}[?state=<hex>]`: read, or set a 6 digit hex color
//! - `GET /state`, `PUT /state`: the whole store as JSON

use crate::colors::Rgb;
use crate::params::ParamStore;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::io;
use std::thread::{self, JoinHandle};
use tracing::{error, info};

#[derive(Debug, Default, Deserialize)]
pub struct StateQuery {
    pub state: Option<String>,
}

impl StateQuery {
    /// The new value; an empty `state=` is a read
    pub fn value(&self) -> Option<&str> {
        self.state.as_deref().filter(|s| !s.is_empty())
    }
}

/// A rejected request: the message is sent back with 400
#[derive(Debug, PartialEq, Eq)]
pub struct BadRequest(pub &'static str);

fn state_body(value: impl Into<String>) -> String {
    serde_json::json!({ "state": value.into() }).to_string()
}

/// Vars travel as integers in thousandths
pub fn apply_var(params: &ParamStore, name: &str, state: Option<&str>) -> Result<String, BadRequest> {
    if let Some(raw) = state {
        let milli: i64 = raw.trim().parse().map_err(|_| BadRequest("not a number!"))?;
        let value = milli as f64 / 1000.0;
        params.set_var(name, value);
        info!(var = name, value, "var set");
    }
    let milli = (params.get_var(name) * 1000.0).round() as i64;
    Ok(state_body(milli.to_string()))
}

pub fn apply_color(params: &ParamStore, name: &str, state: Option<&str>) -> Result<String, BadRequest> {
    if let Some(raw) = state {
        let color = Rgb::from_hex(raw).map_err(|_| BadRequest("not a color!"))?;
        params.set_color(name, color);
        info!(color = name, hex = %color.to_hex(), "color set");
    }
    Ok(state_body(params.get_color_hex(name)))
}

fn json_response(result: Result<String, BadRequest>) -> Response {
    match result {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(BadRequest(msg)) => (StatusCode::BAD_REQUEST, msg).into_response(),
    }
}

async fn var_handler(
    State(params): State<ParamStore>,
    Path(name): Path<String>,
    Query(query): Query<StateQuery>,
) -> Response {
    json_response(apply_var(&params, &name, query.value()))
}

async fn color_handler(
    State(params): State<ParamStore>,
    Path(name): Path<String>,
    Query(query): Query<StateQuery>,
) -> Response {
    json_response(apply_color(&params, &name, query.value()))
}

async fn get_state_handler(State(params): State<ParamStore>) -> Response {
    match params.state() {
        Ok(json) => ([(header::CONTENT_TYPE, "application/json")], json).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn put_state_handler(State(params): State<ParamStore>, body: Bytes) -> Response {
    let text = match std::str::from_utf8(&body) {
        Ok(text) => text,
        Err(_) => return (StatusCode::BAD_REQUEST, "body is not UTF-8").into_response(),
    };
    match params.load(text) {
        Ok(()) => {
            info!("parameter state replaced");
            get_state_handler(State(params)).await
        }
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

pub fn router(params: ParamStore) -> Router {
    Router::new()
        .route("/var/:name", get(var_handler))
        .route("/color/:name", get(color_handler))
        .route("/state", get(get_state_handler).put(put_state_handler))
        .with_state(params)
}

/// Serve on a dedicated thread. Bind or serve failures are logged only,
/// so rendering goes on without remote control.
pub fn spawn(params: ParamStore, bind: String) -> io::Result<JoinHandle<()>> {
    thread::Builder::new().name("control".into()).spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                error!(error = %e, "cannot start control runtime");
                return;
            }
        };
        runtime.block_on(async move {
            let listener = match tokio::net::TcpListener::bind(&bind).await {
                Ok(listener) => listener,
                Err(e) => {
                    error!(addr = %bind, error = %e, "cannot bind control surface");
                    return;
                }
            };
            info!(addr = %bind, "control surface listening");
            if let Err(e) = axum::serve(listener, router(params)).await {
                error!(error = %e, "control surface stopped");
            }
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(result: Result<String, BadRequest>) -> serde_json::Value {
        serde_json::from_str(&result.unwrap()).unwrap()
    }

    #[test]
    fn var_reads_in_thousandths() {
        let params = ParamStore::new();
        params.set_var("A", 0.25);
        assert_eq!(body(apply_var(&params, "A", None)), serde_json::json!({"state": "250"}));
        assert_eq!(body(apply_var(&params, "nope", None)), serde_json::json!({"state": "0"}));
    }

    #[test]
    fn var_write_divides_by_thousand() {
        let params = ParamStore::new();
        assert_eq!(body(apply_var(&params, "A", Some("900"))), serde_json::json!({"state": "900"}));
        assert_eq!(params.get_var("A"), 0.9);
        apply_var(&params, "brightness", Some("-50")).unwrap();
        assert_eq!(params.get_var("brightness"), -0.05);
    }

    #[test]
    fn var_rejects_non_integers() {
        let params = ParamStore::new();
        params.set_var("A", 0.5);
        assert_eq!(apply_var(&params, "A", Some("0.5")), Err(BadRequest("not a number!")));
        assert_eq!(apply_var(&params, "A", Some("lots")), Err(BadRequest("not a number!")));
        assert_eq!(params.get_var("A"), 0.5);
    }

    #[test]
    fn color_read_and_write() {
        let params = ParamStore::new();
        assert_eq!(body(apply_color(&params, "A", Some("#FF8000"))), serde_json::json!({"state": "ff8000"}));
        assert_eq!(body(apply_color(&params, "A", None)), serde_json::json!({"state": "ff8000"}));
        assert_eq!(apply_color(&params, "A", Some("orange")), Err(BadRequest("not a color!")));
        assert_eq!(params.get_color_hex("A"), "ff8000");
    }

    #[test]
    fn empty_state_reads() {
        let params = ParamStore::new();
        params.set_var("A", 0.5);
        params.set_color("A", Rgb::RED);
        let query = StateQuery { state: Some(String::new()) };
        assert_eq!(query.value(), None);
        assert_eq!(body(apply_var(&params, "A", query.value())), serde_json::json!({"state": "500"}));
        assert_eq!(body(apply_color(&params, "A", query.value())), serde_json::json!({"state": "ff0000"}));
        assert_eq!(StateQuery { state: Some("7".into()) }.value(), Some("7"));
    }

    #[test]
    fn router_builds() {
        let _ = router(ParamStore::new());
    }
}
