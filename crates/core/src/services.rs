//! Service graph wiring.

use cashora_shared::TerminalPolicy;

use crate::access::AccessGate;
use crate::account::AccountService;
use crate::broadcast::BroadcastService;
use crate::lifecycle::LifecycleManager;
use crate::ports::Ports;
use crate::transaction::TransactionService;

/// Every service, built over one set of ports.
#[derive(Debug, Clone)]
pub struct Services {
    /// Admin gate.
    pub gate: AccessGate,
    /// Account use cases.
    pub accounts: AccountService,
    /// Transaction use cases.
    pub transactions: TransactionService,
    /// Bulk email.
    pub broadcast: BroadcastService,
}

impl Services {
    /// Wires the services. `policy` controls re-transition of terminal
    /// records.
    #[must_use]
    pub fn new(ports: Ports, policy: TerminalPolicy) -> Self {
        let gate = AccessGate::new(ports.accounts.clone());
        let lifecycle = LifecycleManager::new(gate.clone(), ports.notifier.clone(), policy);

        Self {
            accounts: AccountService::new(ports.clone(), gate.clone(), lifecycle.clone()),
            transactions: TransactionService::new(ports.clone(), gate.clone(), lifecycle),
            broadcast: BroadcastService::new(ports, gate.clone()),
            gate,
        }
    }
}
