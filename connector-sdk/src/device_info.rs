//! Interpretation of hub-reported device fields: model names, display names
//! and battery charge.

/// Length of a hub MAC as a hex string
const HUB_MAC_LEN: usize = 12;

/// Characters between the hub MAC and the device number in a motor MAC
const DEVICE_NUM_OFFSET: usize = HUB_MAC_LEN + 2;

/// Charge at or below which a battery is reported as low
pub const LOW_BATTERY_PERCENT: u8 = 10;

const UNIDENTIFIED_DEVICE: &str = "Unidentified Device";

/// Model names keyed by `deviceType`, for devices without a sub-type
const DEVICE_TYPES: &[(&str, &str)] = &[
    ("02000001", "Wi-Fi Bridge"),
    ("10000000", "433Mhz Radio Motor"),
    ("22000000", "Wi-Fi Curtain"),
    ("22000002", "Wi-Fi Tubular Motor"),
    ("22000005", "Wi-Fi Receiver"),
];

/// Model names keyed by the `type` field of a device's state
const DEVICE_MODELS: &[(u8, &str)] = &[
    (1, "Roller Blinds"),
    (2, "Venetian Blinds"),
    (3, "Roman Blinds"),
    (4, "Honeycomb Blinds"),
    (5, "Shangri-La Blinds"),
    (6, "Roller Shutter"),
    (7, "Roller Gate"),
    (8, "Awning"),
    (9, "TDBU"),
    (10, "Day&night Blinds"),
    (11, "Dimming Blinds"),
    (12, "Curtain"),
    (13, "Curtain (Open Left)"),
    (14, "Curtain (Open Right)"),
];

/// Model name for a device.
///
/// RF motors behind a hub report a non-zero sub-type which identifies the
/// model; Wi-Fi devices do not, and are named after their device type.
pub fn device_model(device_type: &str, sub_type: u8) -> &'static str {
    let found = if sub_type != 0 {
        DEVICE_MODELS
            .iter()
            .find(|(code, _)| *code == sub_type)
            .map(|(_, name)| *name)
    } else {
        DEVICE_TYPES
            .iter()
            .find(|(code, _)| *code == device_type)
            .map(|(_, name)| *name)
    };
    found.unwrap_or(UNIDENTIFIED_DEVICE)
}

/// Display name of the form `[model] [device_num]:[hub_mac]`.
///
/// A motor MAC is the hub MAC followed by two filler characters and the
/// device number. Wi-Fi motors have no device number and get `01`.
pub fn make_device_name(mac: &str, device_type: &str, sub_type: u8) -> String {
    let hub_mac = mac.get(..HUB_MAC_LEN).unwrap_or(mac);
    let device_num = match mac.get(DEVICE_NUM_OFFSET..) {
        Some(num) if !num.is_empty() => num,
        _ => "01",
    };
    format!("{} {}:{}", device_model(device_type, sub_type), device_num, hub_mac)
}

/// Estimated charge of a battery reporting `battery_level` (hundredths of a
/// volt).
///
/// Thresholds cover 16.8 V, 12 V and 8.4 V packs and match those used by the
/// Connector app. Voltages outside every band read as full.
pub fn battery_percent(battery_level: u32) -> u8 {
    let volts = f64::from(battery_level) / 100.0;
    let within = |low: f64, high: f64| volts >= low && volts < high;

    if volts >= 15.9 || within(11.9, 13.2) || within(7.9, 8.8) {
        100
    } else if within(14.5, 15.9) || within(10.9, 11.9) || within(7.3, 7.9) {
        50
    } else if within(14.2, 14.5) || within(10.6, 10.9) || within(7.1, 7.3) {
        20
    } else if within(14.0, 14.2) || within(10.5, 10.6) || within(7.0, 7.1) {
        10
    } else if within(13.2, 14.0) || within(8.8, 10.5) || within(6.8, 7.0) {
        0
    } else {
        100
    }
}

pub fn is_low_battery(battery_level: u32) -> bool {
    battery_percent(battery_level) <= LOW_BATTERY_PERCENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("10000000", 1, "Roller Blinds")]
    #[case("10000000", 8, "Awning")]
    #[case("10000000", 0, "433Mhz Radio Motor")]
    #[case("22000000", 0, "Wi-Fi Curtain")]
    #[case("22000000", 99, "Unidentified Device")]
    #[case("99999999", 0, "Unidentified Device")]
    fn test_device_model(#[case] device_type: &str, #[case] sub_type: u8, #[case] expected: &str) {
        assert_eq!(device_model(device_type, sub_type), expected);
    }

    #[rstest]
    #[case("AABBCCDDEEFF0001", "10000000", 1, "Roller Blinds 01:AABBCCDDEEFF")]
    #[case("AABBCCDDEEFF0012", "10000000", 0, "433Mhz Radio Motor 12:AABBCCDDEEFF")]
    #[case("AABBCCDDEEFF", "22000000", 0, "Wi-Fi Curtain 01:AABBCCDDEEFF")]
    #[case("AABBCCDDEEFF00", "22000002", 0, "Wi-Fi Tubular Motor 01:AABBCCDDEEFF")]
    #[case("AABB", "22000002", 0, "Wi-Fi Tubular Motor 01:AABB")]
    fn test_make_device_name(
        #[case] mac: &str,
        #[case] device_type: &str,
        #[case] sub_type: u8,
        #[case] expected: &str,
    ) {
        assert_eq!(make_device_name(mac, device_type, sub_type), expected);
    }

    #[rstest]
    // 16.8 V pack
    #[case(1680, 100)]
    #[case(1500, 50)]
    #[case(1430, 20)]
    #[case(1410, 10)]
    #[case(1350, 0)]
    // 12 V pack
    #[case(1250, 100)]
    #[case(1100, 50)]
    #[case(1070, 20)]
    #[case(1055, 10)]
    #[case(950, 0)]
    // 8.4 V pack
    #[case(840, 100)]
    #[case(750, 50)]
    #[case(720, 20)]
    #[case(705, 10)]
    #[case(690, 0)]
    // out of every band
    #[case(0, 100)]
    fn test_battery_percent(#[case] level: u32, #[case] expected: u8) {
        assert_eq!(battery_percent(level), expected);
    }

    #[rstest]
    #[case(1410, true)]
    #[case(1350, true)]
    #[case(1430, false)]
    #[case(1250, false)]
    fn test_is_low_battery(#[case] level: u32, #[case] expected: bool) {
        assert_eq!(is_low_battery(level), expected);
    }

    proptest! {
        #[test]
        fn prop_battery_percent_is_a_known_band(level in any::<u32>()) {
            prop_assert!([0u8, 10, 20, 50, 100].contains(&battery_percent(level)));
        }

        #[test]
        fn prop_device_name_ends_with_hub_mac(
            hub in "[0-9A-F]{12}",
            num in "[0-9]{0,4}",
        ) {
            let mac = if num.is_empty() { hub.clone() } else { format!("{}00{}", hub, num) };
            let name = make_device_name(&mac, "10000000", 1);
            let expected_suffix = format!(":{}", hub);
            prop_assert!(name.ends_with(&expected_suffix));
        }
    }
}
