use std::fmt;

/// Money is represented as whole đồng. VND has no minor unit, so every
/// amount is an exact integer and no floating-point arithmetic is needed.
pub type Amount = i64;

/// Format an amount with thousands separators.
/// Example: 30000 -> "30,000", -1500 -> "-1,500"
pub fn format_amount(amount: Amount) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let digits = amount.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}", sign, grouped)
}

/// Parse a user-entered amount.
/// Accepts plain digits ("15000"), grouped digits ("15,000" or "15.000")
/// and the thousands shorthand used at the till ("15k" -> 15000).
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }

    let shorthand = input
        .strip_suffix('k')
        .or_else(|| input.strip_suffix('K'));
    let (body, multiplier) = match shorthand {
        Some(rest) => (rest.trim_end(), 1000),
        None => (input, 1),
    };

    let digits: String = body.chars().filter(|c| *c != ',' && *c != '.').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseAmountError::InvalidFormat);
    }

    let value: Amount = digits.parse().map_err(|_| ParseAmountError::Overflow)?;
    value
        .checked_mul(multiplier)
        .ok_or(ParseAmountError::Overflow)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
            ParseAmountError::Overflow => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(30000), "30,000");
        assert_eq!(format_amount(1234567), "1,234,567");
        assert_eq!(format_amount(-1500), "-1,500");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("15000"), Ok(15000));
        assert_eq!(parse_amount("15,000"), Ok(15000));
        assert_eq!(parse_amount("15.000"), Ok(15000));
        assert_eq!(parse_amount("15k"), Ok(15000));
        assert_eq!(parse_amount(" 25K "), Ok(25000));
        assert_eq!(parse_amount("0"), Ok(0));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert_eq!(parse_amount(""), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("abc"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("-5000"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("k"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(
            parse_amount("99999999999999999999"),
            Err(ParseAmountError::Overflow)
        );
    }
}
