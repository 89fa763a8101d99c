use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{UserId, WalletId};

/// Usuario del sistema. El core de billetera solo necesita poder buscarlo
/// por ID (`UserRepository::get_by_id`); el resto de su ciclo de vida
/// (registro, edicion de perfil) pertenece a un servicio colaborador fuera
/// de este alcance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    last_name: String,
    phone: String,
    wallet_id: Option<WalletId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    pub fn reconstitute(
        id: UserId,
        name: String,
        last_name: String,
        phone: String,
        wallet_id: Option<WalletId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            last_name,
            phone,
            wallet_id,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn wallet_id(&self) -> Option<WalletId> {
        self.wallet_id
    }
}
