pub fn ratio(numerator: u32, denominator: u32) -> Option<f64> {
    match denominator {
        positive if positive > 0 => Some(numerator as f64 / denominator as f64),
        _ => None,
    }
}

/// Whole-number percentage, 0 when nothing was counted
pub fn percent(numerator: u32, denominator: u32) -> u32 {
    ratio(numerator, denominator).map_or(0, |r| (r * 100.0).round() as u32)
}
