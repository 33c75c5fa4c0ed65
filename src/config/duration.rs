// src/config/duration.rs

use std::time::Duration;

/// Parse a duration string like `"3s"`, `"250ms"`, `"1.5s"`, `"1m30s"` or
/// `"2h"`.
///
/// A bare `"0"` is accepted and means "no timeout". Any other number needs a
/// unit; supported units are `ns`, `us`/`µs`, `ms`, `s`, `m` and `h`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut rest = s;

    while !rest.is_empty() {
        // Find the boundary between the number and its unit suffix.
        let num_len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
            .map(|(idx, _)| idx)
            .ok_or_else(|| format!("duration '{s}' is missing a unit suffix"))?;
        if num_len == 0 {
            return Err(format!("invalid duration '{s}': expected a number"));
        }
        let (num_part, after_num) = rest.split_at(num_len);

        let unit_len = after_num
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '.')
            .map(|(idx, _)| idx)
            .unwrap_or(after_num.len());
        let (unit_part, remaining) = after_num.split_at(unit_len);

        let unit_nanos: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            other => {
                return Err(format!(
                    "unsupported duration unit '{other}'; expected ns, us, ms, s, m, or h"
                ));
            }
        };

        let nanos = if num_part.contains('.') {
            let value: f64 = num_part
                .parse()
                .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;
            (value * unit_nanos as f64).round() as u64
        } else {
            let value: u64 = num_part
                .parse()
                .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;
            value
                .checked_mul(unit_nanos)
                .ok_or_else(|| format!("duration '{s}' is out of range"))?
        };

        total += Duration::from_nanos(nanos);
        rest = remaining;
    }

    Ok(total)
}
