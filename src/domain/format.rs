// Display formatting for ward attributes shown in popups and hotspot lists

pub const NOT_AVAILABLE: &str = "N/A";

/// Fraction digits for concentration values (mean / max).
pub const VALUE_DECIMALS: usize = 8;

/// Fraction digits for the exposure index.
pub const EXPOSURE_DECIMALS: usize = 3;

/// Magnitudes below this switch to scientific notation.
const SCIENTIFIC_BELOW: f64 = 0.00001;

/// Format a numeric attribute: scientific with 2 fraction digits for tiny
/// magnitudes, fixed-point with `decimals` digits otherwise.
pub fn format_value(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => {
            if v.abs() < SCIENTIFIC_BELOW {
                to_exponential(v, 2)
            } else {
                to_fixed(v, decimals)
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_concentration(value: Option<f64>) -> String {
    format_value(value, VALUE_DECIMALS)
}

pub fn format_exposure(value: Option<f64>) -> String {
    format_value(value, EXPOSURE_DECIMALS)
}

pub fn format_population(population: Option<u64>) -> String {
    match population {
        Some(p) => group_thousands(p),
        None => NOT_AVAILABLE.to_string(),
    }
}

// Rust rounds exact binary ties to even; browsers round them away from
// zero ("pick the larger n"). Sign is applied to the magnitude afterwards,
// so -0.0 renders like 0.0.
fn to_fixed(value: f64, decimals: usize) -> String {
    let magnitude = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    let wider = format!("{:.*}", decimals + 1, magnitude);
    let rounded = wider
        .replace('.', "")
        .parse::<u128>()
        .ok()
        .filter(|n| is_exact_tie(*n, -(decimals as i32 + 1), magnitude))
        .map(|n| with_point(n / 10 + 1, decimals))
        .unwrap_or_else(|| format!("{:.*}", decimals, magnitude));

    format!("{}{}", sign, rounded)
}

// Rust renders `3.00e-6` / `0.00e0`; browsers always sign the exponent.
fn to_exponential(value: f64, digits: usize) -> String {
    let magnitude = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    let wider = format!("{:.*e}", digits + 1, magnitude);
    let tie = split_exponential(&wider).and_then(|(mantissa, exponent)| {
        let n = mantissa.replace('.', "").parse::<u128>().ok()?;
        if !is_exact_tie(n, exponent - (digits as i32 + 1), magnitude) {
            return None;
        }
        let up = n / 10 + 1;
        // 9.995e-6 rounds up to 1.00e-5
        if up == 10u128.pow(digits as u32 + 1) {
            Some((with_point(up / 10, digits), exponent + 1))
        } else {
            Some((with_point(up, digits), exponent))
        }
    });

    let (mantissa, exponent) = match tie {
        Some(parts) => parts,
        None => {
            let rendered = format!("{:.*e}", digits, magnitude);
            match split_exponential(&rendered) {
                Some((mantissa, exponent)) => (mantissa.to_string(), exponent),
                None => return format!("{}{}", sign, rendered),
            }
        }
    };

    let plus = if exponent >= 0 { "+" } else { "" };
    format!("{}{}e{}{}", sign, mantissa, plus, exponent)
}

fn split_exponential(rendered: &str) -> Option<(&str, i32)> {
    let (mantissa, exponent) = rendered.split_once('e')?;
    Some((mantissa, exponent.parse().ok()?))
}

/// Whether `magnitude` is exactly `n * 10^scale` and that decimal ends in 5,
/// i.e. sits halfway between the two roundings one digit shorter.
fn is_exact_tie(n: u128, scale: i32, magnitude: f64) -> bool {
    if n % 10 != 5 {
        return false;
    }

    // The decimal must be dyadic with a numerator that fits an f64 mantissa
    let numerator = if scale >= 0 {
        5u128
            .checked_pow(scale as u32)
            .and_then(|p| n.checked_mul(p))
    } else {
        5u128
            .checked_pow(scale.unsigned_abs())
            .filter(|p| n % p == 0)
            .map(|p| n / p)
    };

    match numerator {
        Some(m) if m < (1u128 << 53) => format!("{}e{}", n, scale)
            .parse::<f64>()
            .is_ok_and(|exact| exact == magnitude),
        _ => false,
    }
}

fn with_point(digits: u128, decimals: usize) -> String {
    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    if decimals == 0 {
        return padded;
    }
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    format!("{}.{}", whole, fraction)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
