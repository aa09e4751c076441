//! Unit conversions for distances, areas and travel times

pub const MILES_PER_KM: f64 = 0.621_371;
pub const NAUTICAL_MILES_PER_KM: f64 = 0.539_957;
pub const ACRES_PER_SQUARE_METER: f64 = 0.000_247_105;

/// Average walking speed
pub const WALKING_KMH: f64 = 5.0;
/// Average driving speed
pub const DRIVING_KMH: f64 = 60.0;

pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}

pub fn km_to_miles(km: f64) -> f64 {
    km * MILES_PER_KM
}

pub fn km_to_nautical_miles(km: f64) -> f64 {
    km * NAUTICAL_MILES_PER_KM
}

pub fn square_meters_to_hectares(m2: f64) -> f64 {
    m2 / 10_000.0
}

pub fn square_meters_to_km2(m2: f64) -> f64 {
    m2 / 1_000_000.0
}

pub fn square_meters_to_acres(m2: f64) -> f64 {
    m2 * ACRES_PER_SQUARE_METER
}

/// Whole minutes to cover `km` at `speed_kmh`
pub fn travel_minutes(km: f64, speed_kmh: f64) -> u64 {
    (km / speed_kmh * 60.0).round() as u64
}

/// `90` -> `1h 30m`, `45` -> `45 min`
pub fn format_minutes(minutes: u64) -> String {
    if minutes < 60 {
        format!("{} min", minutes)
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

/// Integer part with thousands separators, two decimals: `1,234,567.89`
pub fn group_thousands(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac) = formatted.split_once('.').unwrap_or((&formatted, "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_units() {
        assert_relative_eq!(meters_to_km(343_560.0), 343.56);
        assert_relative_eq!(km_to_miles(100.0), 62.1371, epsilon = 1e-9);
        assert_relative_eq!(km_to_nautical_miles(1.852), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_area_units() {
        assert_relative_eq!(square_meters_to_hectares(25_000.0), 2.5);
        assert_relative_eq!(square_meters_to_km2(3_000_000.0), 3.0);
        assert_relative_eq!(square_meters_to_acres(4046.86), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_travel_time() {
        assert_eq!(travel_minutes(10.0, WALKING_KMH), 120);
        assert_eq!(travel_minutes(10.0, DRIVING_KMH), 10);
        assert_eq!(travel_minutes(0.0, DRIVING_KMH), 0);
        assert_eq!(format_minutes(45), "45 min");
        assert_eq!(format_minutes(125), "2h 5m");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0), "0.00");
        assert_eq!(group_thousands(999.999), "1,000.00");
        assert_eq!(group_thousands(1_234_567.891), "1,234,567.89");
        assert_eq!(group_thousands(-12_345.5), "-12,345.50");
    }
}
