/// House (1..=12) containing `longitude`.
///
/// House i spans [cusp_i, cusp_{i+1}) measured forward around the circle, so the
/// 12th house closes back onto the 1st cusp without special cases. When no span
/// contains the longitude (degenerate cusps), house 1 is returned.
pub fn house_for_longitude(cusps: &[f64], longitude: f64) -> u8 {
    let n = cusps.len();
    for i in 0..n {
        let start = cusps[i];
        let span = (cusps[(i + 1) % n] - start).rem_euclid(360.0);
        let offset = (longitude - start).rem_euclid(360.0);
        if span > 0.0 && offset < span {
            return i as u8 + 1;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn equal_cusps(start: f64) -> Vec<f64> {
        (0..12).map(|i| (start + i as f64 * 30.0) % 360.0).collect()
    }

    #[test]
    fn test_house_placement_basic() {
        let cusps = equal_cusps(0.0);
        assert_eq!(house_for_longitude(&cusps, 0.0), 1);
        assert_eq!(house_for_longitude(&cusps, 29.999), 1);
        assert_eq!(house_for_longitude(&cusps, 30.0), 2);
        assert_eq!(house_for_longitude(&cusps, 359.9), 12);
    }

    #[test]
    fn test_house_placement_wraps_past_aries() {
        let cusps = equal_cusps(350.0);
        // 12th house runs 320..350, 1st house runs 350..20 across 0°
        assert_eq!(house_for_longitude(&cusps, 355.0), 1);
        assert_eq!(house_for_longitude(&cusps, 5.0), 1);
        assert_eq!(house_for_longitude(&cusps, 20.0), 2);
        assert_eq!(house_for_longitude(&cusps, 349.99), 12);
    }

    #[test]
    fn test_degenerate_cusps_default_to_first_house() {
        let cusps = vec![0.0; 12];
        assert_eq!(house_for_longitude(&cusps, 123.0), 1);
        assert_eq!(house_for_longitude(&[], 123.0), 1);
    }
}
