//! Device-class bitmask and its label decoder.

use bitflags::bitflags;
use smallvec::SmallVec;

bitflags! {
    /// Backend device-class bits (`cl_device_type`).
    ///
    /// Bits outside the named set are carried but never labelled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[repr(transparent)]
    pub struct DeviceClass: u64 {
        const DEFAULT     = 1 << 0;
        const CPU         = 1 << 1;
        const GPU         = 1 << 2;
        const ACCELERATOR = 1 << 3;
        const CUSTOM      = 1 << 4;
    }
}

/// Separator placed between labels.
pub const CLASS_SEPARATOR: &str = " | ";

/// Label order. Output concatenation follows this, not bit order.
const LABEL_ORDER: [(DeviceClass, &str); 5] = [
    (DeviceClass::CPU, "cpu"),
    (DeviceClass::GPU, "gpu"),
    (DeviceClass::ACCELERATOR, "accelerator"),
    (DeviceClass::DEFAULT, "default"),
    (DeviceClass::CUSTOM, "custom"),
];

impl DeviceClass {
    /// Labels for every known bit that is set, in label order.
    pub fn labels(self) -> SmallVec<[&'static str; 5]> {
        LABEL_ORDER
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, label)| *label)
            .collect()
    }
}

/// Decode a raw class mask into `"cpu | gpu"`-style text.
///
/// Total: unknown bits are ignored and an all-zero mask gives `""`.
pub fn decode_class_mask(raw: u64) -> String {
    DeviceClass::from_bits_retain(raw).labels().join(CLASS_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_bits() {
        assert_eq!(decode_class_mask(DeviceClass::CPU.bits()), "cpu");
        assert_eq!(decode_class_mask(DeviceClass::GPU.bits()), "gpu");
        assert_eq!(decode_class_mask(DeviceClass::ACCELERATOR.bits()), "accelerator");
        assert_eq!(decode_class_mask(DeviceClass::DEFAULT.bits()), "default");
        assert_eq!(decode_class_mask(DeviceClass::CUSTOM.bits()), "custom");
    }

    #[test]
    fn test_combined_bits_keep_label_order() {
        let mask = (DeviceClass::CPU | DeviceClass::GPU).bits();
        assert_eq!(decode_class_mask(mask), "cpu | gpu");

        // DEFAULT is bit 0 but sorts after ACCELERATOR
        let mask = (DeviceClass::DEFAULT | DeviceClass::GPU).bits();
        assert_eq!(decode_class_mask(mask), "gpu | default");
    }

    #[test]
    fn test_zero_and_unknown_bits() {
        assert_eq!(decode_class_mask(0), "");
        assert_eq!(decode_class_mask(1 << 40), "");
        assert_eq!(decode_class_mask((1 << 40) | DeviceClass::CPU.bits()), "cpu");
    }

    #[test]
    fn test_all_bits() {
        assert_eq!(
            decode_class_mask(DeviceClass::all().bits()),
            "cpu | gpu | accelerator | default | custom"
        );
    }

    proptest! {
        #[test]
        fn decode_is_total_and_never_dangles(raw in any::<u64>()) {
            let text = decode_class_mask(raw);
            prop_assert!(!text.ends_with(CLASS_SEPARATOR));
            prop_assert!(!text.starts_with(CLASS_SEPARATOR));
            prop_assert_eq!(&text, &decode_class_mask(raw));

            let known = (raw & DeviceClass::all().bits()).count_ones() as usize;
            let parts = if text.is_empty() { 0 } else { text.split(CLASS_SEPARATOR).count() };
            prop_assert_eq!(parts, known);
        }
    }
}
