/// Expense amounts are stored as SQLite `REAL`, so they travel as `f64`.
pub type Amount = f64;

/// Format an amount with two decimals for display.
/// Example: 15.5 -> "15.50", 3.0 -> "3.00"
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount)
}

/// Parse user input into an amount.
/// Returns `None` for anything that is not a finite decimal number.
/// Example: "12.5" -> Some(12.5), " 7 " -> Some(7.0), "abc" -> None
pub fn parse_amount(input: &str) -> Option<Amount> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
