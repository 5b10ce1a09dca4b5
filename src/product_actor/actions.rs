//! Custom actions for the Product actor.

/// Stock operations beyond CRUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    /// Reads the current stock level.
    CheckStock,
    /// Takes units out of stock. Fails without touching the stock if fewer
    /// units are available.
    ReserveStock(u32),
    /// Puts previously reserved units back.
    ReleaseStock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction.
/// Each carries the stock level after the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductActionResult {
    CheckStock(u32),
    ReserveStock(u32),
    ReleaseStock(u32),
}
