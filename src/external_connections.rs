use sqlx::PgConnection;

/// Something which holds onto a live database connection for the duration of a unit of work.
/// Dropping the handle releases the connection back to wherever it came from.
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Provides access to the external systems the application talks to. Business logic
/// only ever sees this trait, so tests can swap in fakes for the real database.
pub trait ExternalConnectivity {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    /// Acquires a database connection which is released when the returned handle is dropped
    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}

/// Connectivity which can open a database transaction, producing a new
/// connectivity object whose database work happens inside that transaction
pub trait Transactable {
    type Handle: TransactionHandle;

    async fn start_transaction(&self) -> Result<Self::Handle, anyhow::Error>;
}

/// Connectivity with an open transaction. If the handle is dropped without calling
/// [TransactionHandle::commit], everything done through it is rolled back.
pub trait TransactionHandle: ExternalConnectivity {
    async fn commit(self) -> Result<(), anyhow::Error>;
}

/// Shorthand for connectivity that can both hand out connections and start transactions
pub trait TransactableExternalConnectivity: ExternalConnectivity + Transactable {}

impl<T> TransactableExternalConnectivity for T where T: ExternalConnectivity + Transactable {}
