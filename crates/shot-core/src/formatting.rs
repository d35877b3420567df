/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use shot_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let factor = 10_f64.powi(decimals as i32);
    let rounded = (value.abs() * factor).round() / factor;

    let grouped = group_thousands(&(rounded.trunc() as u64).to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        // "0.50" -> ".50"
        let frac_str = format!("{:.prec$}", rounded.fract(), prec = decimals as usize);
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Chart label for an exposure time: a reciprocal fraction below one second,
/// one decimal place otherwise.
///
/// # Examples
///
/// ```
/// use shot_core::formatting::format_shutter_speed;
///
/// assert_eq!(format_shutter_speed(0.004), "1/250");
/// assert_eq!(format_shutter_speed(0.0333), "1/30");
/// assert_eq!(format_shutter_speed(0.0167), "1/60");
/// assert_eq!(format_shutter_speed(2.0), "2.0");
/// ```
pub fn format_shutter_speed(seconds: f64) -> String {
    if seconds > 0.0 && seconds < 1.0 {
        format!("1/{}", (1.0 / seconds).round() as u64)
    } else {
        format!("{:.1}", seconds)
    }
}

/// `f/2.8` style label.
pub fn format_aperture(f_number: f64) -> String {
    format!("f/{:.1}", f_number)
}

/// `35.0mm` style label.
pub fn format_focal_length(mm: f64) -> String {
    format!("{:.1}mm", mm)
}

/// Insert `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
