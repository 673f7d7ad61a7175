#[derive(Debug)]
pub struct Capability {
    /// When true, the database uses a SQL-based query language.
    pub sql: bool,

    /// When true, the database supports `Start`/`Commit`/`Rollback`
    /// transaction operations. Saves against a database without transactions
    /// are either executed best-effort or refused, depending on the `Db`
    /// configuration.
    pub transactions: bool,
}

impl Capability {
    /// SQLite capabilities.
    pub const SQLITE: Self = Self {
        sql: true,
        transactions: true,
    };

    /// In-memory store capabilities.
    pub const MEMORY: Self = Self {
        sql: false,
        transactions: true,
    };

    /// In-memory store with transactions disabled.
    pub const MEMORY_NON_TRANSACTIONAL: Self = Self {
        transactions: false,
        ..Self::MEMORY
    };
}
