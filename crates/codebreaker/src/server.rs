//! `CodebreakerServer` builder and server loop.
//!
//! This is the entry point for running a codebreaker server. It ties
//! together all the layers: transport → protocol → session → room.

use std::sync::Arc;
use std::time::Duration;

use codebreaker_protocol::{ErrorKind, JsonCodec, ServerEvent};
use codebreaker_room::{RegistryConfig, RoomRegistry};
use codebreaker_session::{Dispatcher, SessionError};
use codebreaker_transport::{ConnectionId, Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::outbox::Outboxes;
use crate::CodebreakerError;

/// Default for [`ServerConfig::handshake_timeout`].
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// What the server does with an event it rejects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log at `debug` and send nothing back.
    #[default]
    Silent,
    /// Reply to the sender with `error{kind}`.
    Report,
}

impl ErrorPolicy {
    /// Whether a rejection of this kind is sent back to the client.
    ///
    /// Capacity exhaustion is reported under either policy.
    pub fn reports(self, kind: ErrorKind) -> bool {
        self == Self::Report || kind == ErrorKind::CapacityExhausted
    }
}

impl std::str::FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(Self::Silent),
            "report" => Ok(Self::Report),
            other => Err(format!("unknown error policy {other:?}")),
        }
    }
}

/// Runtime settings for a server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: String,
    /// Whether rejected events are reported to the client.
    pub error_policy: ErrorPolicy,
    /// How long a new peer has to finish the WebSocket upgrade.
    pub handshake_timeout: Duration,
    /// Close connections that send nothing for this long. `None` disables.
    pub idle_timeout: Option<Duration>,
    /// Room registry settings.
    pub registry: RegistryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            error_policy: ErrorPolicy::default(),
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            idle_timeout: None,
            registry: RegistryConfig::default(),
        }
    }
}

/// Everything that must change together: the dispatcher's sessions and
/// rooms, and the outboxes their events go to.
pub(crate) struct Hub {
    pub(crate) dispatcher: Dispatcher,
    pub(crate) outboxes: Outboxes,
}

impl Hub {
    /// Logs a rejected event and, if the policy says so, tells the sender.
    pub(crate) fn reject(
        &self,
        conn: ConnectionId,
        err: &SessionError,
        policy: ErrorPolicy,
    ) {
        let Some(kind) = err.kind() else {
            tracing::warn!(%conn, error = %err, "session bookkeeping error");
            return;
        };
        if kind == ErrorKind::CapacityExhausted {
            tracing::warn!(%conn, "room codes exhausted, create_room refused");
        } else {
            tracing::debug!(%conn, %kind, error = %err, "event rejected");
        }
        if policy.reports(kind) {
            self.outboxes.send(conn, ServerEvent::Error { kind });
        }
    }
}

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The single
/// `Mutex` makes every event run to completion before the next one starts.
pub(crate) struct ServerState {
    pub(crate) hub: Mutex<Hub>,
    pub(crate) codec: JsonCodec,
    pub(crate) config: ServerConfig,
}

/// Builder for configuring and starting a codebreaker server.
///
/// # Example
///
/// ```rust,no_run
/// use codebreaker::prelude::*;
///
/// # async fn run() -> Result<(), CodebreakerError> {
/// let server = CodebreakerServer::builder()
///     .bind("0.0.0.0:8080")
///     .error_policy(ErrorPolicy::Report)
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct CodebreakerServerBuilder {
    config: ServerConfig,
    registry: Option<RoomRegistry>,
}

impl CodebreakerServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            registry: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.config.handshake_timeout = timeout;
        self
    }

    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.idle_timeout = timeout;
        self
    }

    pub fn registry_config(mut self, config: RegistryConfig) -> Self {
        self.config.registry = config;
        self
    }

    /// Uses a prebuilt registry, e.g. one with a fixed code source.
    /// Overrides [`registry_config`](Self::registry_config).
    pub fn registry(mut self, registry: RoomRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<CodebreakerServer, CodebreakerError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr).await?;

        let registry = self
            .registry
            .unwrap_or_else(|| RoomRegistry::new(self.config.registry.clone()));
        let state = Arc::new(ServerState {
            hub: Mutex::new(Hub {
                dispatcher: Dispatcher::new(registry),
                outboxes: Outboxes::default(),
            }),
            codec: JsonCodec,
            config: self.config,
        });

        Ok(CodebreakerServer { transport, state })
    }
}

impl Default for CodebreakerServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound codebreaker server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct CodebreakerServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl CodebreakerServer {
    /// Creates a new builder.
    pub fn builder() -> CodebreakerServerBuilder {
        CodebreakerServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted stream; the WebSocket
    /// upgrade runs inside that task. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), CodebreakerError> {
        tracing::info!(
            addr = ?self.local_addr().ok(),
            policy = ?self.state.config.error_policy,
            "codebreaker server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(incoming) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(incoming, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
