// core/src/booking/slot_checker.rs
use crate::appointment::Slot;
use crate::error::ClinicResult;
use crate::store::AppointmentStore;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Answers whether a slot is occupied by an active appointment.
///
/// The answer is advisory: it can be stale by the time the caller acts on it.
/// The store enforces the slot invariant on write.
#[derive(Clone)]
pub struct SlotChecker {
  store: Arc<dyn AppointmentStore>,
}

impl SlotChecker {
  pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
    Self { store }
  }

  #[instrument(name = "slot_checker::is_slot_taken", skip(self), fields(slot = %slot), err(Display))]
  pub async fn is_slot_taken(&self, slot: &Slot) -> ClinicResult<bool> {
    let active = self.store.count_active_in_slot(slot).await?;
    debug!(active, "Active appointments in slot.");
    Ok(active > 0)
  }
}
