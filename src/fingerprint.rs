//! Route identity for deduplication.
//!
//! Repeated searches for the same place pair may return polylines that differ
//! slightly. Distance and duration are bucketed and the endpoints rounded so that
//! those searches collapse onto one stored route, while alternates with a
//! different length or travel time stay distinct.

use crate::entities::Coordinates;

const DISTANCE_BUCKET_METERS: f64 = 100.0;
const DURATION_BUCKET_SECONDS: f64 = 60.0;
const ENDPOINT_DECIMALS: usize = 4;

/// Enough fraction digits to print any f64 exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

pub fn route_fingerprint(
    profile: &str,
    source: &str,
    destination: &str,
    distance_meters: f64,
    duration_seconds: f64,
    coordinates: &[Coordinates],
) -> String {
    let distance_bucket = bucket(distance_meters, DISTANCE_BUCKET_METERS);
    let duration_bucket = bucket(duration_seconds, DURATION_BUCKET_SECONDS);

    format!(
        "{}|{}|{}|{}|{}|{}|{}",
        profile,
        normalize_place(source),
        normalize_place(destination),
        distance_bucket,
        duration_bucket,
        endpoint(coordinates.first()),
        endpoint(coordinates.last()),
    )
}

fn normalize_place(place: &str) -> String {
    place.trim().to_lowercase()
}

fn bucket(value: f64, size: f64) -> i64 {
    (coerce(value) / size + 0.5).floor() as i64
}

fn endpoint(coordinates: Option<&Coordinates>) -> String {
    let (lat, lng) = coordinates
        .map(|c| (coerce(c.lat), coerce(c.lng)))
        .unwrap_or((0.0, 0.0));

    format!(
        "{},{}",
        to_fixed(lat, ENDPOINT_DECIMALS),
        to_fixed(lng, ENDPOINT_DECIMALS)
    )
}

/// Fixed-point formatting that rounds ties away from zero, unlike `{:.N}`
/// which rounds exact ties to even.
fn to_fixed(value: f64, decimals: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(decimals))
        .collect();

    // the expansion is exact, so the first dropped digit decides
    if fraction.as_bytes().get(decimals).map_or(false, |d| *d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - decimals;
    let whole = String::from_utf8_lossy(&digits[..split]);
    let fraction = String::from_utf8_lossy(&digits[split..]);

    if decimals == 0 {
        return format!("{}{}", sign, whole);
    }

    format!("{}{}.{}", sign, whole, fraction)
}

/// Non-finite values count as zero. Adding zero also folds `-0.0` into `0.0`.
fn coerce(value: f64) -> f64 {
    if value.is_finite() {
        value + 0.0
    } else {
        0.0
    }
}

#[cfg(test)]
fn sample_path() -> Vec<Coordinates> {
    vec![
        Coordinates::new(28.613912, 77.209021),
        Coordinates::new(28.620001, 77.215502),
        Coordinates::new(28.704059, 77.10249),
    ]
}

#[test]
fn fingerprint_format() {
    let fingerprint = route_fingerprint(
        "driving-car",
        "  Connaught Place ",
        "Rohini",
        12_349.0,
        1_530.0,
        &sample_path(),
    );

    assert_eq!(
        fingerprint,
        "driving-car|connaught place|rohini|123|26|28.6139,77.2090|28.7041,77.1025"
    );
}

#[test]
fn repeated_search_with_jitter_is_stable() {
    let first = route_fingerprint("driving-car", "A", "B", 12_340.0, 1_500.0, &sample_path());

    let mut jittered = sample_path();
    jittered[1] = Coordinates::new(28.6201, 77.2154);
    jittered[0].lat += 0.000_001;
    let second = route_fingerprint("driving-car", "a ", " b", 12_310.0, 1_490.0, &jittered);

    assert_eq!(first, second);
}

#[test]
fn distance_bucket_boundary_changes_fingerprint() {
    let path = sample_path();
    let short = route_fingerprint("driving-car", "a", "b", 12_340.0, 1_500.0, &path);
    let long = route_fingerprint("driving-car", "a", "b", 12_440.0, 1_500.0, &path);

    assert_ne!(short, long);
}

#[test]
fn profile_is_part_of_identity() {
    let path = sample_path();
    let car = route_fingerprint("driving-car", "a", "b", 1_000.0, 60.0, &path);
    let bike = route_fingerprint("cycling-regular", "a", "b", 1_000.0, 60.0, &path);

    assert_ne!(car, bike);
}

#[test]
fn empty_or_malformed_geometry_falls_back_to_zero() {
    let empty = route_fingerprint("driving-car", "a", "b", f64::NAN, 0.0, &[]);
    assert_eq!(empty, "driving-car|a|b|0|0|0.0000,0.0000|0.0000,0.0000");

    let malformed = [Coordinates::new(f64::NAN, -0.0)];
    let fingerprint = route_fingerprint("driving-car", "a", "b", 0.0, 0.0, &malformed);
    assert_eq!(fingerprint, "driving-car|a|b|0|0|0.0000,0.0000|0.0000,0.0000");
}

#[test]
fn exact_ties_round_away_from_zero() {
    let path = [Coordinates::new(28.03125, 77.09375)];
    let fingerprint = route_fingerprint("driving-car", "a", "b", 0.0, 0.0, &path);

    assert_eq!(
        fingerprint,
        "driving-car|a|b|0|0|28.0313,77.0938|28.0313,77.0938"
    );

    assert_eq!(to_fixed(-28.03125, 4), "-28.0313");
    // 0.99999237060546875, exactly representable
    assert_eq!(to_fixed(1.0 - 1.0 / 131_072.0, 4), "1.0000");
    assert_eq!(to_fixed(12.5, 0), "13");
    assert_eq!(to_fixed(0.0, 4), "0.0000");
}
