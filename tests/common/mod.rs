#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::Value;

/// What the simulated endpoint does for one request.
#[derive(Clone, Debug)]
pub enum Step {
    Reply(u16, &'static str),
    Stall(Duration, &'static str),
}

#[derive(Clone, Debug)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub body: Value,
}

struct Sim {
    steps: Mutex<Vec<Step>>,
    recorded: Mutex<Vec<Recorded>>,
}

/// A running answering endpoint bound to an ephemeral local port.
pub struct Endpoint {
    pub url: String,
    sim: Arc<Sim>,
}

impl Endpoint {
    pub fn requests(&self) -> Vec<Recorded> {
        self.sim.recorded.lock().unwrap().clone()
    }
}

/// Steps are served in order; the last one repeats.
pub async fn spawn_endpoint(steps: Vec<Step>) -> Endpoint {
    assert!(!steps.is_empty());
    let sim = Arc::new(Sim {
        steps: Mutex::new(steps),
        recorded: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/api/chat", post(answer))
        .with_state(sim.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Endpoint {
        url: format!("http://{addr}/api/chat"),
        sim,
    }
}

pub async fn replying(body: &'static str) -> Endpoint {
    spawn_endpoint(vec![Step::Reply(200, body)]).await
}

pub async fn stalling(delay: Duration) -> Endpoint {
    spawn_endpoint(vec![Step::Stall(delay, r#"{"response":"too late"}"#)]).await
}

/// A URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/chat")
}

async fn answer(State(sim): State<Arc<Sim>>, headers: HeaderMap, body: Bytes) -> Response {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    sim.recorded.lock().unwrap().push(Recorded { headers, body });

    let step = {
        let mut steps = sim.steps.lock().unwrap();
        if steps.len() > 1 {
            steps.remove(0)
        } else {
            steps[0].clone()
        }
    };

    match step {
        Step::Reply(status, body) => respond(status, body),
        Step::Stall(delay, body) => {
            tokio::time::sleep(delay).await;
            respond(200, body)
        }
    }
}

fn respond(status: u16, body: &'static str) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    (status, [(CONTENT_TYPE, "application/json")], body).into_response()
}

/// Poll until `check` holds or a second passes.
pub async fn wait_until<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}
