//! Kubernetes resource quantity parsing
//!
//! Handles the suffix forms used for node capacity and container requests:
//! binary (`Ki`..`Ei`), decimal (`k`..`E`), milli (`m`) and exponent
//! (`1e3`) notations.

/// Split a quantity into its numeric part and multiplier
fn split(quantity: &str) -> Option<(f64, f64)> {
    let q = quantity.trim();
    if q.is_empty() {
        return None;
    }

    const SUFFIXES: &[(&str, f64)] = &[
        ("Ki", 1024.0),
        ("Mi", 1_048_576.0),
        ("Gi", 1_073_741_824.0),
        ("Ti", 1_099_511_627_776.0),
        ("Pi", 1_125_899_906_842_624.0),
        ("Ei", 1_152_921_504_606_846_976.0),
        ("m", 0.001),
        ("k", 1e3),
        ("M", 1e6),
        ("G", 1e9),
        ("T", 1e12),
        ("P", 1e15),
        ("E", 1e18),
    ];

    for (suffix, multiplier) in SUFFIXES {
        if let Some(number) = q.strip_suffix(suffix) {
            // "1E" is an exabyte, "1e3" is handled by the float parser below
            return number.parse::<f64>().ok().map(|n| (n, *multiplier));
        }
    }

    q.parse::<f64>().ok().map(|n| (n, 1.0))
}

fn to_base(quantity: &str) -> Option<f64> {
    let (number, multiplier) = split(quantity)?;
    let value = number * multiplier;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Parse a CPU quantity into milli-units (`"500m"` -> 500, `"2"` -> 2000)
pub fn parse_cpu_millis(quantity: &str) -> Option<u64> {
    to_base(quantity).map(|cores| (cores * 1000.0).round() as u64)
}

/// Parse a memory quantity into bytes (`"1Gi"` -> 1073741824)
pub fn parse_bytes(quantity: &str) -> Option<u64> {
    to_base(quantity).map(|bytes| bytes.ceil() as u64)
}
