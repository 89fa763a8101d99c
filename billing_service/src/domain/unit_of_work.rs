use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::sync::Arc;

use crate::domain::error::Error;
use crate::domain::repository::{TransactionRepository, UserRepository, WalletRepository};

/// El conjunto de repositorios ya ligados al alcance de almacenamiento
/// abierto por un `UnitOfWork::with_transaction`. Esta es la expresion en
/// Rust de "rebind de repositorios a un scope": en vez de mutar repos
/// existentes via un metodo `with_tx`, el Unit-of-Work construye repos
/// nuevos ligados a la transaccion y se los entrega al closure como
/// parametro explicito.
pub struct ScopedRepos {
    pub wallets: Arc<dyn WalletRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub users: Arc<dyn UserRepository>,
}

/// Gestor de transacciones de almacenamiento con alcance: corre una funcion
/// con todos los repositorios ligados a un unico alcance atomico.
///
/// Contrato:
/// 1. Abre una transaccion de almacenamiento.
/// 2. Si abrirla falla, retorna el error sin invocar `f`.
/// 3. Invoca `f` con los repositorios ligados al alcance.
/// 4. Si `f` retorna error, hace rollback y retorna ese error intacto.
/// 5. Si `f` entra en panico, el `Drop` de la transaccion subyacente hace
///    rollback antes de que el panico continue propagandose.
/// 6. Si `f` retorna exito, hace commit y retorna el error de commit si lo
///    hay.
///
/// No soporta anidamiento. Un unico metodo sirve tanto para alcances de
/// solo lectura como de lectura-escritura.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn with_transaction(
        &self,
        f: Box<dyn FnOnce(ScopedRepos) -> BoxFuture<'static, Result<(), Error>> + Send>,
    ) -> Result<(), Error>;
}
