//! Throwaway local HTTP server for tests.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::any;

type Bodies = Arc<Mutex<Vec<String>>>;

#[derive(Clone)]
pub(crate) struct Reply {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

impl Reply {
    pub(crate) fn html(body: impl Into<String>) -> Self {
        Self { status: StatusCode::OK, content_type: "text/html; charset=utf-8", body: body.into() }
    }

    pub(crate) fn json(body: impl Into<String>) -> Self {
        Self { status: StatusCode::OK, content_type: "application/json", body: body.into() }
    }

    pub(crate) fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            content_type: "text/plain",
            body: body.into(),
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

pub(crate) struct TestServer {
    pub base_url: String,
    bodies: Bodies,
}

impl TestServer {
    /// Serve fixed replies keyed by request path. Unknown paths get a 404.
    pub(crate) async fn start(routes: Vec<(&str, Reply)>) -> Self {
        let bodies: Bodies = Arc::new(Mutex::new(Vec::new()));

        let mut app = Router::new();
        for (path, reply) in routes {
            app = app.route(
                path,
                any(move |State(bodies): State<Bodies>, body: String| async move {
                    bodies.lock().unwrap().push(body);
                    reply
                }),
            );
        }
        let app = app
            .fallback(|State(bodies): State<Bodies>, body: String| async move {
                bodies.lock().unwrap().push(body);
                (StatusCode::NOT_FOUND, "not found")
            })
            .with_state(bodies.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{addr}"), bodies }
    }

    pub(crate) fn last_request_body(&self) -> Option<String> {
        self.bodies.lock().unwrap().last().cloned()
    }
}
