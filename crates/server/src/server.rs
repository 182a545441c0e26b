use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use uuid::Uuid;

use std::sync::Arc;

use crate::{
    ServerError, accounts, auth::JwtKeys, budget, categories, groups, transactions, user,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub keys: JwtKeys,
}

impl ServerState {
    pub fn new(engine: Engine, keys: JwtKeys) -> Self {
        Self {
            engine: Arc::new(engine),
            keys,
        }
    }
}

/// The caller, as proven by a valid bearer token.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub id: Uuid,
}

async fn auth(
    State(state): State<ServerState>,
    auth_header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(Authorization(bearer))) = auth_header else {
        tracing::warn!("missing or malformed Authorization header");
        return Err(ServerError::Unauthenticated(
            "missing bearer token".to_string(),
        ));
    };

    let claims = state.keys.verify(bearer.token()).map_err(|err| {
        tracing::warn!("rejected token: {err}");
        ServerError::Unauthenticated("invalid or expired token".to_string())
    })?;

    request.extensions_mut().insert(AuthUser { id: claims.sub });
    Ok(next.run(request).await)
}

async fn hello() -> &'static str {
    "OK"
}

/// Every route, mounted under `/api/v1`.
pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/accounts/{id}",
            put(accounts::update).delete(accounts::delete),
        )
        .route("/accounts/{id}/transactions", get(accounts::transactions))
        .route("/groups", get(groups::list).post(groups::create))
        .route("/groups/{id}", put(groups::update).delete(groups::delete))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route(
            "/categories/{id}/transactions",
            get(categories::transactions),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            put(transactions::update).delete(transactions::delete),
        )
        .route("/budget", get(budget::overview))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    let api = Router::new()
        .route("/hello", get(hello))
        .route("/users", post(user::signup))
        .route("/login", post(user::login))
        .merge(protected);

    Router::new().nest("/api/v1", api).with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
