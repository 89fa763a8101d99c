use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::response::ApiResponse;
use crate::domain::error::Error;
use crate::domain::types::UserId;
use crate::use_cases::CreditUserBalance;

/// Plazo maximo que un request HTTP espera a que el caso de uso complete
/// su Unit-of-Work: la expresion, del lado HTTP, del contexto de
/// cancelacion con deadline que el caller propaga (ver §5 del diseno).
const REQUEST_DEADLINE: Duration = Duration::from_secs(5);

/// Estado compartido por los handlers HTTP: una sola dependencia, el caso
/// de uso que el unico endpoint expuesto necesita.
pub struct AppState {
    pub credit_use_case: Arc<CreditUserBalance>,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/wallet/", post(credit_wallet))
        .layer(middleware::from_fn(trace_id_middleware))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct CreditWalletRequest {
    pub user_id: UserId,
    pub amount: i64,
}

/// Handler: acreditar saldo a la billetera de un usuario.
/// POST /api/v1/wallet/
///
/// El cuerpo se decodifica primero como `serde_json::Value`: un error de
/// sintaxis JSON cruda ya resulta en `400` via el rechazo por defecto del
/// extractor `Json`, pero un cuerpo bien formado con forma o tipos
/// incorrectos (p.ej. `user_id` que no es un UUID valido) pasaria de largo
/// como `422` si se dejara que `Json<CreditWalletRequest>` lo deserializara
/// directamente. Deserializando manualmente aqui, ese caso se mapea a
/// `Error::Validation` y por lo tanto a `400` tambien, como exige el
/// adaptador HTTP.
pub async fn credit_wallet(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let req: CreditWalletRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::from(Error::Validation(format!("malformed request body: {e}"))))?;

    tokio::time::timeout(
        REQUEST_DEADLINE,
        state.credit_use_case.execute(req.user_id, req.amount),
    )
    .await
    .map_err(|_| ApiError::from(Error::Timeout))??;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "user_id": req.user_id }))),
    ))
}

/// Middleware que asigna un trace id por request y lo adjunta tanto al
/// span de tracing como al header de respuesta `x-trace-id`, sin
/// depender de un crate de propagacion de trazas aparte.
async fn trace_id_middleware(req: Request, next: Next) -> Response {
    let trace_id = Uuid::new_v4();
    let span = tracing::info_span!("http_request", trace_id = %trace_id);

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
        response.headers_mut().insert("x-trace-id", value);
    }
    response
}
