use alloy::primitives::U256;
use nexwallet_session_core::{format_units, parse_units, UnitsError};

#[test]
fn format_trims_trailing_fractional_zeros() {
    let one_and_a_half = U256::from(1_500_000_000_000_000_000u64);
    assert_eq!(format_units(one_and_a_half, 18), "1.5");

    let ten = U256::from(10u8) * U256::from(10u64).pow(U256::from(18));
    assert_eq!(format_units(ten, 18), "10");

    assert_eq!(format_units(U256::ZERO, 18), "0");
}

#[test]
fn format_pads_small_amounts() {
    assert_eq!(format_units(U256::from(1u8), 18), "0.000000000000000001");
    assert_eq!(format_units(U256::from(1_000u32), 18), "0.000000000000001");
}

#[test]
fn conversion_round_trips_up_to_total_supply_scale() {
    let cases = [
        U256::ZERO,
        U256::from(1u8),
        U256::from(999u16),
        U256::from(1_500_000_000_000_000_000u64),
        U256::from_str_radix("123456789012345678901234567", 10).expect("fits"),
        // 10^27 smallest units at 18 decimals.
        U256::from(10u64).pow(U256::from(27)),
    ];
    for raw in cases {
        let display = format_units(raw, 18);
        let back = parse_units(&display, 18).expect("round trip parse");
        assert_eq!(back, raw, "display form was {display}");
    }
}

#[test]
fn parse_accepts_plain_and_fractional_decimals() {
    assert_eq!(
        parse_units("2.5", 18).expect("parse"),
        U256::from(2_500_000_000_000_000_000u64)
    );
    assert_eq!(parse_units("0.5", 18).expect("parse"), U256::from(500_000_000_000_000_000u64));
    // Trailing zeros beyond the exponent are insignificant.
    assert_eq!(
        parse_units("0.1000000000000000000", 18).expect("parse"),
        U256::from(100_000_000_000_000_000u64)
    );
}

#[test]
fn parse_rejects_sub_unit_precision() {
    let err = parse_units("0.0000000000000000001", 18).expect_err("19 significant digits");
    assert!(matches!(err, UnitsError::PrecisionLoss { decimals: 18 }));
}

#[test]
fn parse_rejects_malformed_input() {
    for bad in ["", " ", "abc", "1.2.3", "-1", "1e18", ".5", "0x10"] {
        assert!(
            matches!(parse_units(bad, 18), Err(UnitsError::InvalidNumber(_))),
            "expected {bad:?} to be rejected"
        );
    }
}
