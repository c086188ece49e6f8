//! Human-readable durations.

/// `MM:SS`, or `HH:MM:SS` once an hour has passed.
pub fn fmt_time(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h:02}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

/// `45m`, `2h`, `1h 30m`.
pub fn fmt_mins(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{minutes}m");
    }
    let (h, rem) = (minutes / 60, minutes % 60);
    if rem == 0 {
        format!("{h}h")
    } else {
        format!("{h}h {rem}m")
    }
}

/// Parse `1h 30m`, `45m`, `2h` or a bare `45` into minutes.
///
/// Returns `None` when nothing recognisable is found.
pub fn parse_minutes(input: &str) -> Option<u32> {
    let input = input.trim();
    if let Ok(n) = input.parse::<u32>() {
        return Some(n);
    }

    let mut total: u32 = 0;
    let mut matched = false;
    let mut digits = String::new();
    for ch in input.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let unit = match ch {
            'h' | 'H' => 60,
            'm' | 'M' => 1,
            _ => {
                digits.clear();
                continue;
            }
        };
        if !digits.is_empty() {
            let n: u32 = digits.parse().ok()?;
            total = total.checked_add(n.checked_mul(unit)?)?;
            matched = true;
            digits.clear();
        }
    }
    matched.then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formats() {
        assert_eq!(fmt_time(0), "00:00");
        assert_eq!(fmt_time(75), "01:15");
        assert_eq!(fmt_time(3600 + 62), "01:01:02");
    }

    #[test]
    fn minute_formats() {
        assert_eq!(fmt_mins(45), "45m");
        assert_eq!(fmt_mins(120), "2h");
        assert_eq!(fmt_mins(90), "1h 30m");
    }

    #[test]
    fn parses_minutes() {
        assert_eq!(parse_minutes("1h 30m"), Some(90));
        assert_eq!(parse_minutes("45m"), Some(45));
        assert_eq!(parse_minutes("2h"), Some(120));
        assert_eq!(parse_minutes(" 25 "), Some(25));
        assert_eq!(parse_minutes("soon"), None);
    }
}
