pub mod consumer;
pub mod publisher;

pub use consumer::Consumer;
pub use publisher::RabbitPublisher;

/// Nombre logico de la cola de solicitudes de debito, tal como la declara
/// la configuracion por defecto (`config.yaml`). El consumidor empareja el
/// nombre configurado contra estas constantes para decidir el handler, tal
/// como lo hace el original via `pkg/rabbit`'s `DebitQueueName`/
/// `RefundQueueName`.
pub const DEBIT_REQUEST_QUEUE: &str = "billing.debit.request";
pub const REFUND_REQUEST_QUEUE: &str = "billing.refund.request";
