//! C ABI for non-Rust drivers.
//!
//! The destination is always described by a pointer *and* a capacity. The
//! kernel checks the capacity against `simulation_count` before touching
//! memory, so a short buffer is an error code rather than an overrun.

use crate::error::SimulationError;
use crate::params::{RawParameters, SimulationParameters};
use crate::simulation::simulate_into;

/// Status codes returned by [`pfloss_simulate`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 0,
    InvalidParameter = 1,
    BufferCapacity = 2,
    NumericInstability = 3,
    NullPointer = 4,
}

impl From<&SimulationError> for Status {
    fn from(e: &SimulationError) -> Self {
        match e {
            SimulationError::InvalidParameter { .. } => Status::InvalidParameter,
            SimulationError::BufferCapacity { .. } => Status::BufferCapacity,
            SimulationError::NumericInstability { .. } => Status::NumericInstability,
        }
    }
}

/// Fill `out[..params.simulation_count]` with simulated portfolio losses.
///
/// Returns a [`Status`] code. On any non-zero status nothing was written.
///
/// # Safety
///
/// `out` must be null or point to `capacity` writable, properly aligned
/// `f32` values that nothing else accesses for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pfloss_simulate(
    params: RawParameters,
    seed: u64,
    out: *mut f32,
    capacity: usize,
) -> i32 {
    let params = match SimulationParameters::try_from(params) {
        Ok(p) => p,
        Err(e) => return Status::from(&e) as i32,
    };
    if out.is_null() {
        return Status::NullPointer as i32;
    }
    // SAFETY: non-null, and the caller guarantees `capacity` valid elements.
    let out = unsafe { std::slice::from_raw_parts_mut(out, capacity) };
    match simulate_into(&params, seed, out) {
        Ok(()) => Status::Ok as i32,
        Err(e) => Status::from(&e) as i32,
    }
}
