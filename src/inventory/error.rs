use thiserror::Error;

/// Errors that can occur during inventory operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Item id isn't in the inventory at all
    #[error("Item not in inventory: {0}")]
    ItemNotFound(String),

    /// Accessory slot index out of bounds
    #[error("Invalid equipment slot index: {0}")]
    InvalidSlot(usize),

    /// Tried to remove more items than exist
    #[error("Insufficient items (requested: {requested}, available: {available})")]
    InsufficientItems { requested: u32, available: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = InventoryError::InsufficientItems {
            requested: 3,
            available: 1,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient items (requested: 3, available: 1)"
        );
    }
}
