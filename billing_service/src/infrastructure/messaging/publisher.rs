use async_trait::async_trait;
use lapin::options::BasicPublishOptions;
use lapin::{BasicProperties, Channel};

use crate::domain::error::Error;
use crate::domain::events::{Publisher, SmsDebited};

/// Adaptador de salida que serializa un `SmsDebited` a JSON y lo publica
/// en el exchange/routing key configurados. No sabe nada de semantica de
/// ledger: el caso de uso decide cuando y con que datos llamarlo, y una
/// falla de publicacion aqui nunca deshace un commit ya hecho (ver
/// `DebitUserBalance`).
pub struct RabbitPublisher {
    channel: Channel,
    exchange: String,
    routing_key: String,
}

impl RabbitPublisher {
    pub fn new(channel: Channel, exchange: String, routing_key: String) -> Self {
        Self {
            channel,
            exchange,
            routing_key,
        }
    }
}

#[async_trait]
impl Publisher for RabbitPublisher {
    async fn publish_sms_debited(&self, event: SmsDebited) -> Result<(), Error> {
        let payload = serde_json::to_vec(&event)
            .map_err(|e| Error::Messaging(format!("failed to encode SmsDebited: {e}")))?;

        self.channel
            .basic_publish(
                &self.exchange,
                &self.routing_key,
                BasicPublishOptions::default(),
                &payload,
                BasicProperties::default(),
            )
            .await
            .map_err(|e| Error::Messaging(format!("failed to publish SmsDebited: {e}")))?
            .await
            .map_err(|e| Error::Messaging(format!("broker did not confirm SmsDebited: {e}")))?;

        Ok(())
    }
}
