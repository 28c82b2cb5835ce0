//! Authorization callback listener
//!
//! A thin one-endpoint HTTP server: it receives the browser redirect at
//! `GET /callback?code=...`, hands the code to the core, answers with a
//! small success page, and is done for the life of the process.

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::mpsc, task::JoinHandle};

use crate::error::{Error, Result};

const RESPONSE: &str = r#"
<!doctype html>
<html>
<head><title>Success</title></head>
<body><h1>Authorization code received.</h1><script>window.close();</script></body>
</html>
"#;

#[derive(Clone)]
struct CallbackState {
    tx: mpsc::Sender<String>,
}

#[derive(Deserialize)]
struct CallbackQuery {
    code: String,
    #[allow(dead_code)]
    state: Option<String>,
}

pub struct CallbackServer {
    local_addr: SocketAddr,
    rx: mpsc::Receiver<String>,
    server: JoinHandle<()>,
}

impl CallbackServer {
    pub async fn bind(addr: SocketAddr) -> Result<Self> {
        let (tx, rx) = mpsc::channel(1);
        let app = Router::new()
            .route("/callback", get(receive_code))
            .with_state(CallbackState { tx });

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind callback listener on {addr}"))?;
        let local_addr = listener
            .local_addr()
            .context("callback listener has no local address")?;
        tracing::info!(%local_addr, "Callback listener ready");

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app.into_make_service()).await {
                tracing::error!(error = %e, "Callback listener failed");
            }
        });

        Ok(Self {
            local_addr,
            rx,
            server,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Block until the browser redirect delivers a code, then shut the
    /// listener down.
    pub async fn wait_for_code(mut self) -> Result<String> {
        let code = self.rx.recv().await.ok_or_else(|| {
            Error::Authorization("callback listener closed before a code arrived".into())
        })?;
        self.server.abort();
        Ok(code)
    }
}

async fn receive_code(
    State(state): State<CallbackState>,
    Query(query): Query<CallbackQuery>,
) -> Html<&'static str> {
    tracing::debug!("Authorization callback hit");
    let _ = state.tx.send(query.code).await;
    Html(RESPONSE)
}
