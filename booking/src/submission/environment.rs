//! Environment dependencies for the submission flow.

use crate::catalog::Catalog;
use crate::confirmation::ConfirmationStore;
use crate::gateway::ReservationGateway;
use cabanamar_core::environment::Clock;
use std::sync::Arc;

/// Injected collaborators of the submission reducer.
#[derive(Clone)]
pub struct SubmissionEnvironment {
    /// The two server boundary calls
    pub gateway: Arc<dyn ReservationGateway>,
    /// Per-customer confirmation persistence
    pub confirmations: Arc<dyn ConfirmationStore>,
    /// Catalog for resolving display labels on the confirmation
    pub catalog: Arc<Catalog>,
    /// Clock for stamping confirmations
    pub clock: Arc<dyn Clock>,
}

impl SubmissionEnvironment {
    /// Creates a new `SubmissionEnvironment`.
    #[must_use]
    pub const fn new(
        gateway: Arc<dyn ReservationGateway>,
        confirmations: Arc<dyn ConfirmationStore>,
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            gateway,
            confirmations,
            catalog,
            clock,
        }
    }
}
