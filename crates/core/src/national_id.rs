//! Modulo-11 checksum for the 11-digit national identity number.
//!
//! A number is a 9-digit base followed by two check digits. The first check
//! digit weighs the base with `10 - position`; the second weighs the base plus
//! the first check digit with `11 - position`. A weighted sum whose remainder
//! mod 11 is below 2 yields 0, anything else yields `11 - remainder`.

pub const NATIONAL_ID_LENGTH: usize = 11;
pub const BASE_LENGTH: usize = 9;

/// Returns `true` when `value` is exactly 11 ASCII digits whose trailing pair
/// matches the checksum of the first nine.
pub fn is_valid_national_id(value: &str) -> bool {
    let Some(digits) = parse_digits::<NATIONAL_ID_LENGTH>(value) else {
        return false;
    };

    let mut base = [0u8; BASE_LENGTH];
    base.copy_from_slice(&digits[..BASE_LENGTH]);

    check_digits(&base) == [digits[9], digits[10]]
}

/// Computes both check digits for a 9-digit base.
pub fn check_digits(base: &[u8; BASE_LENGTH]) -> [u8; 2] {
    let first = check_digit(base, 10);

    let mut extended = [0u8; BASE_LENGTH + 1];
    extended[..BASE_LENGTH].copy_from_slice(base);
    extended[BASE_LENGTH] = first;
    let second = check_digit(&extended, 11);

    [first, second]
}

/// Appends the check digits to a 9-digit base, e.g. `"111444777"` becomes
/// `"11144477735"`. Returns `None` when the base is not nine ASCII digits.
pub fn complete_national_id(base: &str) -> Option<String> {
    let digits = parse_digits::<BASE_LENGTH>(base)?;
    let [first, second] = check_digits(&digits);

    let mut completed = String::with_capacity(NATIONAL_ID_LENGTH);
    completed.push_str(base);
    completed.push(char::from(b'0' + first));
    completed.push(char::from(b'0' + second));
    Some(completed)
}

fn check_digit(digits: &[u8], initial_weight: u32) -> u8 {
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(position, digit)| u32::from(*digit) * (initial_weight - position as u32))
        .sum();

    match sum % 11 {
        remainder if remainder < 2 => 0,
        remainder => (11 - remainder) as u8,
    }
}

fn parse_digits<const N: usize>(value: &str) -> Option<[u8; N]> {
    let bytes = value.as_bytes();
    if bytes.len() != N {
        return None;
    }

    let mut digits = [0u8; N];
    for (slot, byte) in digits.iter_mut().zip(bytes) {
        if !byte.is_ascii_digit() {
            return None;
        }
        *slot = byte - b'0';
    }
    Some(digits)
}

#[cfg(test)]
mod tests {
    use super::{check_digits, complete_national_id, is_valid_national_id};

    #[test]
    fn forward_computed_vector_is_valid() {
        // base 1 1 1 4 4 4 7 7 7
        // first:  10+9+8+28+24+20+28+21+14 = 162, 162 % 11 = 8 -> 3
        // second: 11+10+9+32+28+24+35+28+21+6 = 204, 204 % 11 = 6 -> 5
        assert_eq!(check_digits(&[1, 1, 1, 4, 4, 4, 7, 7, 7]), [3, 5]);
        assert!(is_valid_national_id("11144477735"));
    }

    #[test]
    fn flipping_the_last_digit_invalidates_the_vector() {
        assert!(!is_valid_national_id("11144477736"));
        assert!(!is_valid_national_id("11144477725"));
    }

    #[test]
    fn well_known_number_is_accepted() {
        assert!(is_valid_national_id("52998224725"));
        assert!(!is_valid_national_id("52998224724"));
    }

    #[test]
    fn remainder_below_two_yields_zero_check_digit() {
        // 0 * anything = 0, 0 % 11 = 0 -> both check digits are 0
        assert_eq!(check_digits(&[0; 9]), [0, 0]);
        assert!(is_valid_national_id("00000000000"));
    }

    #[test]
    fn wrong_shapes_are_rejected_without_panicking() {
        for value in [
            "",
            "1114447773",
            "111444777350",
            "1114447773a",
            "111.444.777-35",
            " 11144477735",
            "11144477735 ",
            "１１１４４４７７７３５",
        ] {
            assert!(!is_valid_national_id(value), "`{value}` should be rejected");
        }
    }

    #[test]
    fn validation_is_deterministic() {
        for base in 0..2_000u64 {
            let candidate = format!("{:011}", base * 4_999_999 + 17);
            let first = is_valid_national_id(&candidate);
            let second = is_valid_national_id(&candidate);
            assert_eq!(first, second, "`{candidate}` gave different answers");
        }
    }

    #[test]
    fn completed_numbers_always_validate() {
        for base in ["111444777", "529982247", "000000001", "987654321"] {
            let completed = complete_national_id(base).expect("nine digit base");
            assert_eq!(completed.len(), 11);
            assert!(completed.starts_with(base));
            assert!(is_valid_national_id(&completed), "`{completed}` should validate");
        }
        assert_eq!(complete_national_id("111444777").as_deref(), Some("11144477735"));
    }

    #[test]
    fn completion_rejects_malformed_base() {
        assert_eq!(complete_national_id("11144477"), None);
        assert_eq!(complete_national_id("1114447770"), None);
        assert_eq!(complete_national_id("11144477x"), None);
    }
}
