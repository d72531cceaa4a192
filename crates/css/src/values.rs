pub fn parse_color(value: &str) -> Option<(u8, u8, u8, u8)> {
    let s = value.trim().to_ascii_lowercase();
    // HEX
    if let Some(hex) = s.strip_prefix('#') {
        let channel = |i: usize, width: usize| -> Option<u8> {
            let digits = &hex[i * width..i * width + width];
            if width == 1 {
                u8::from_str_radix(&digits.repeat(2), 16).ok()
            } else {
                u8::from_str_radix(digits, 16).ok()
            }
        };
        if !hex.is_ascii() {
            return None;
        }
        return match hex.len() {
            3 => Some((channel(0, 1)?, channel(1, 1)?, channel(2, 1)?, 255)),
            4 => Some((channel(0, 1)?, channel(1, 1)?, channel(2, 1)?, channel(3, 1)?)),
            6 => Some((channel(0, 2)?, channel(1, 2)?, channel(2, 2)?, 255)),
            8 => Some((channel(0, 2)?, channel(1, 2)?, channel(2, 2)?, channel(3, 2)?)),
            _ => None,
        };
    }

    // rgb(17, 17, 17) / rgba(17, 17, 17, 0.5) / rgb(17 17 17 / 50%)
    if let Some(args) = s
        .strip_prefix("rgba")
        .or_else(|| s.strip_prefix("rgb"))
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let mut parts = args
            .split(|c: char| c == ',' || c == '/' || c.is_ascii_whitespace())
            .filter(|p| !p.is_empty());
        let r = parse_channel(parts.next()?)?;
        let g = parse_channel(parts.next()?)?;
        let b = parse_channel(parts.next()?)?;
        let a = match parts.next() {
            Some(alpha) => parse_alpha(alpha)?,
            None => 255,
        };
        return Some((r, g, b, a));
    }

    let named = match s.as_str() {
        "black" => (0, 0, 0, 255),
        "blue" => (0, 0, 255, 255),
        "cyan" => (0, 255, 255, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        "green" => (0, 128, 0, 255),
        "magenta" => (255, 0, 255, 255),
        "maroon" => (128, 0, 0, 255),
        "navy" => (0, 0, 128, 255),
        "olive" => (128, 128, 0, 255),
        "purple" => (128, 0, 128, 255),
        "red" => (255, 0, 0, 255),
        "silver" => (192, 192, 192, 255),
        "teal" => (0, 128, 128, 255),
        "white" => (255, 255, 255, 255),
        "yellow" => (255, 255, 0, 255),
        _ => return None,
    };
    Some(named)
}

fn parse_channel(raw: &str) -> Option<u8> {
    if let Some(pct) = raw.strip_suffix('%') {
        let v = pct.parse::<f32>().ok()?;
        return Some((v.clamp(0.0, 100.0) * 2.55).round() as u8);
    }
    let v = raw.parse::<f32>().ok()?;
    v.is_finite().then(|| v.clamp(0.0, 255.0).round() as u8)
}

fn parse_alpha(raw: &str) -> Option<u8> {
    if let Some(pct) = raw.strip_suffix('%') {
        let v = pct.parse::<f32>().ok()?;
        return Some((v.clamp(0.0, 100.0) * 2.55).round() as u8);
    }
    let v = raw.parse::<f32>().ok()?;
    v.is_finite().then(|| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// WCAG 2.1 relative luminance: 0.0 for black, 1.0 for white. Alpha is
/// ignored.
pub fn relative_luminance((r, g, b, _): (u8, u8, u8, u8)) -> f64 {
    fn linear(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}
