use quilt::driver::{Capability, Driver};
use quilt::{
    db::{Connect, Policy},
    Result,
};

use crate::Setup;

pub struct SetupMemory {
    transactions: bool,

    /// Policy for saves when transactions are disabled
    policy: Policy,
}

impl SetupMemory {
    pub fn new() -> Self {
        Self {
            transactions: true,
            policy: Policy::default(),
        }
    }

    /// A store that reports no transaction support, saved with `policy`.
    pub fn non_transactional(policy: Policy) -> Self {
        Self {
            transactions: false,
            policy,
        }
    }
}

impl Default for SetupMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup for SetupMemory {
    fn driver(&self) -> Result<Box<dyn Driver>> {
        let url = if self.transactions {
            "memory:"
        } else {
            "memory:?transactions=false"
        };
        Ok(Box::new(Connect::new(url)?))
    }

    fn capability(&self) -> &'static Capability {
        if self.transactions {
            &Capability::MEMORY
        } else {
            &Capability::MEMORY_NON_TRANSACTIONAL
        }
    }

    fn configure_builder(&self, builder: &mut quilt::db::Builder) {
        builder.non_transactional(self.policy);
    }
}
