use std::sync::Arc;

use futures_util::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, BasicQosOptions,
};
use lapin::types::FieldTable;
use lapin::Channel;
use tokio_util::sync::CancellationToken;

use crate::domain::events::{DebitRequestEnvelope, RefundRequestEnvelope};
use crate::domain::types::{SmsId, TransactionId, UserId};
use crate::use_cases::{DebitUserBalance, RefundTransaction};

use super::{DEBIT_REQUEST_QUEUE, REFUND_REQUEST_QUEUE};

/// Consumidor entrante: se suscribe a las colas `debit-request` y
/// `refund-request`, decodifica cada sobre y despacha al caso de uso
/// correspondiente. QoS de canal fijado en prefetch=1, de modo que a lo
/// sumo un mensaje sin confirmar este en vuelo por canal — esto acota la
/// concurrencia de mutaciones de billetera por worker y coopera con el
/// lock de fila adquirido en `UpdateBalance` para serializar debitos por
/// usuario.
pub struct Consumer {
    channel: Channel,
    debit_use_case: Arc<DebitUserBalance>,
    refund_use_case: Arc<RefundTransaction>,
    shutdown: CancellationToken,
}

impl Consumer {
    pub fn new(
        channel: Channel,
        debit_use_case: Arc<DebitUserBalance>,
        refund_use_case: Arc<RefundTransaction>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            channel,
            debit_use_case,
            refund_use_case,
            shutdown,
        }
    }

    /// Arranca un worker de consumo por cada cola configurada y bloquea
    /// hasta que todos terminen: por error de canal, cierre de conexion, o
    /// cancelacion del token de apagado.
    pub async fn run(self: Arc<Self>, queue_names: Vec<String>) -> Result<(), lapin::Error> {
        self.channel
            .basic_qos(1, BasicQosOptions::default())
            .await?;

        let mut tasks = Vec::with_capacity(queue_names.len());
        for queue_name in queue_names {
            let this = self.clone();
            tasks.push(tokio::spawn(async move {
                if let Err(err) = this.consume_queue(queue_name.clone()).await {
                    tracing::error!(queue = %queue_name, error = %err, "consumer task for queue exited");
                }
            }));
        }

        for task in tasks {
            let _ = task.await;
        }
        Ok(())
    }

    async fn consume_queue(&self, queue_name: String) -> Result<(), lapin::Error> {
        let consumer_tag = format!("billing-service-{queue_name}");
        let mut consumer = self
            .channel
            .basic_consume(
                &queue_name,
                &consumer_tag,
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        tracing::info!(queue = %queue_name, "consumer subscribed");

        loop {
            let delivery = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!(queue = %queue_name, "consumer stopping on shutdown signal");
                    break;
                }
                delivery = consumer.next() => delivery,
            };

            let Some(delivery) = delivery else {
                break;
            };
            let delivery = match delivery {
                Ok(delivery) => delivery,
                Err(err) => {
                    tracing::error!(queue = %queue_name, error = %err, "failed to receive delivery");
                    continue;
                }
            };

            let outcome = match queue_name.as_str() {
                DEBIT_REQUEST_QUEUE => self.handle_debit(&delivery.data).await,
                REFUND_REQUEST_QUEUE => self.handle_refund(&delivery.data).await,
                other => {
                    tracing::warn!(queue = other, "unknown queue in configuration");
                    Ok(())
                }
            };

            let ack_result = match outcome {
                Ok(()) => delivery.ack(BasicAckOptions::default()).await,
                Err(()) => {
                    delivery
                        .nack(BasicNackOptions {
                            requeue: false,
                            ..Default::default()
                        })
                        .await
                }
            };
            if let Err(err) = ack_result {
                tracing::error!(queue = %queue_name, error = %err, "failed to ack/nack delivery");
            }
        }

        Ok(())
    }

    /// Decodifica y despacha una solicitud de debito. Un fallo de decode o
    /// de parseo de UUID se trata como mensaje envenenado: se loguea y se
    /// nack sin reencolar (ver DESIGN.md, politica de mensajes
    /// envenenados).
    async fn handle_debit(&self, payload: &[u8]) -> Result<(), ()> {
        let envelope: DebitRequestEnvelope = serde_json::from_slice(payload).map_err(|err| {
            tracing::error!(error = %err, "failed to decode debit-request envelope");
        })?;

        let user_id = UserId(envelope.user_id);
        let sms_id = SmsId(envelope.sms_id);

        if let Err(err) = self
            .debit_use_case
            .execute(user_id, sms_id, envelope.amount)
            .await
        {
            tracing::error!(
                user_id = %user_id,
                sms_id = %sms_id,
                error = %err,
                "failed to debit user balance"
            );
            return Err(());
        }

        tracing::info!(user_id = %user_id, sms_id = %sms_id, amount = envelope.amount, "debited user balance");
        Ok(())
    }

    /// Decodifica y despacha una solicitud de reembolso.
    async fn handle_refund(&self, payload: &[u8]) -> Result<(), ()> {
        let envelope: RefundRequestEnvelope = serde_json::from_slice(payload).map_err(|err| {
            tracing::error!(error = %err, "failed to decode refund-request envelope");
        })?;

        let transaction_id = TransactionId(envelope.transaction_id);

        if let Err(err) = self.refund_use_case.execute(transaction_id).await {
            tracing::error!(transaction_id = %transaction_id, error = %err, "failed to refund transaction");
            return Err(());
        }

        tracing::info!(transaction_id = %transaction_id, "refunded transaction");
        Ok(())
    }
}
