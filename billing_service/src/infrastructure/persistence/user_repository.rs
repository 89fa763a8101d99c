use async_trait::async_trait;

use crate::domain::error::{Error, UserError};
use crate::domain::repository::UserRepository;
use crate::domain::types::UserId;
use crate::domain::user::User;

use super::models::UserRow;
use super::unit_of_work::SharedTx;

/// Adaptador de `UserRepository` ligado a la transaccion de almacenamiento
/// abierta por `PostgresUnitOfWork`. El core de billetera solo necesita
/// `get_by_id`: el resto del ciclo de vida de un usuario (registro,
/// edicion de perfil) vive en un servicio colaborador fuera de este
/// alcance.
pub struct PostgresUserRepository {
    tx: SharedTx,
}

impl PostgresUserRepository {
    pub fn scoped(tx: SharedTx) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get_by_id(&self, id: UserId) -> Result<User, Error> {
        let mut guard = self.tx.lock().await;
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, last_name, phone, wallet_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&mut **guard)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?
        .ok_or(UserError::NotFound(id))?;

        Ok(row.into_domain())
    }
}
