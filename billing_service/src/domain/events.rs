use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::Error;

/// Sobre entrante en la cola `debit-request`: una solicitud de cobro
/// originada por el servicio de despacho de SMS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebitRequestEnvelope {
    pub user_id: Uuid,
    pub sms_id: Uuid,
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
}

/// Sobre entrante en la cola `refund-request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequestEnvelope {
    pub transaction_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Evento saliente publicado tras el commit exitoso de un debito, en la
/// routing key de debito completado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsDebited {
    pub user_id: Uuid,
    pub sms_id: Uuid,
    pub amount: i64,
    pub transaction_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// Puerto de salida para eventos de dominio. Un adaptador concreto lo liga
/// a un exchange y routing key configurados; el core de billetera no sabe
/// nada de como se transportan.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish_sms_debited(&self, event: SmsDebited) -> Result<(), Error>;
}
