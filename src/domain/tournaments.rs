pub const PAYMENT_PENDING: &str = "Pending";
pub const PAYMENT_FREE: &str = "Free";

/// Share of slots taken, as a percentage in `[0, 100]`.
pub fn fill_percent(registered: i64, max_teams: i64) -> f64 {
    if max_teams <= 0 {
        return 0.0;
    }
    (registered as f64 / max_teams as f64 * 100.0).clamp(0.0, 100.0)
}

/// Paid tournaments leave the registration pending until payment.
pub fn payment_status(entry_fee: Option<&str>) -> &'static str {
    match entry_fee.map(str::trim) {
        Some(fee) if !fee.is_empty() => PAYMENT_PENDING,
        _ => PAYMENT_FREE,
    }
}
