//! Users resource HTTP API
//!
//! Routes `(method, path)` pairs to the five user operations, runs them
//! against an injected [`RecordStore`](userstack_store::RecordStore) and
//! wraps the result in the `{data, message}` envelope. The same
//! [`UsersRouter`] serves the axum HTTP surface ([`http::create_app`]) and
//! API Gateway HTTP API events ([`event::handle_event`]).

pub mod envelope;
pub mod event;
pub mod handlers;
pub mod http;
pub mod router;
pub mod routes;
pub mod settings;

pub use envelope::{ApiResponse, Envelope};
pub use event::{handle_event, HttpApiEvent, HttpApiResponse};
pub use handlers::HandlerError;
pub use router::UsersRouter;
pub use routes::Route;
pub use settings::{ApiSettings, CreateMode, ErrorMapping};
