use thiserror::Error;

/// Reasons a kernel run refuses to start or aborts before publishing losses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// An input field lies outside its domain. No draw was run.
    #[error("invalid parameter `{field}`: {reason} (got {value})")]
    InvalidParameter {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Destination storage cannot hold one loss per draw. Nothing was written.
    #[error("destination holds {capacity} losses but {required} draws were requested")]
    BufferCapacity { required: usize, capacity: usize },

    /// A draw produced a non-finite intermediate value. Nothing was written.
    #[error("numeric instability in draw {draw}: {detail}")]
    NumericInstability { draw: usize, detail: String },
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, value: f64, reason: &'static str) -> Self {
        SimulationError::InvalidParameter { field, value, reason }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_field() {
        let e = SimulationError::invalid("assetCorrelation", 1.0, "must be in [0, 1)");
        let msg = e.to_string();
        assert!(msg.contains("assetCorrelation"), "{msg}");
        assert!(msg.contains("[0, 1)"), "{msg}");
    }

    #[test]
    fn capacity_message_reports_both_sizes() {
        let e = SimulationError::BufferCapacity {
            required: 1000,
            capacity: 10,
        };
        assert_eq!(
            e.to_string(),
            "destination holds 10 losses but 1000 draws were requested"
        );
    }
}
