//! Destination write masks and the source swizzle rewrite they drive.

use crate::ast::is_swizzle;

const COMPONENTS: [char; 4] = ['x', 'y', 'z', 'w'];

/// Which of `x`, `y`, `z`, `w` an assignment writes (bit 0 = `x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentMask(pub u8);

impl ComponentMask {
    pub const XYZW: Self = Self(0b1111);
    pub const X: Self = Self(0b0001);
    pub const Y: Self = Self(0b0010);
    pub const Z: Self = Self(0b0100);
    pub const W: Self = Self(0b1000);

    /// Mask written by a destination swizzle such as `xz`. Order and repeats do not matter.
    pub fn from_swizzle(swizzle: &str) -> Option<Self> {
        if !is_swizzle(swizzle) {
            return None;
        }
        let mut bits = 0u8;
        for c in swizzle.chars() {
            let idx = COMPONENTS.iter().position(|&k| k == c)?;
            bits |= 1 << idx;
        }
        Some(Self(bits))
    }

    pub fn contains(self, component: usize) -> bool {
        component < 4 && (self.0 & (1 << component)) != 0
    }

    pub fn count(self) -> usize {
        (self.0 & 0xF).count_ones() as usize
    }

    /// Canonical selector for this mask (`0b0101` -> `"xz"`).
    pub fn to_swizzle(self) -> String {
        (0..4)
            .filter(|&i| self.contains(i))
            .map(|i| COMPONENTS[i])
            .collect()
    }

    /// Narrow a source swizzle to the components this mask consumes.
    ///
    /// A swizzle no longer than the active count is returned unchanged. A longer one is replaced
    /// by the active components in `x, y, z, w` order, so narrowing twice is a no-op.
    pub fn narrow(self, swizzle: &str) -> String {
        if swizzle.len() <= self.count() {
            return swizzle.to_owned();
        }
        self.to_swizzle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_from_destination_swizzle() {
        assert_eq!(ComponentMask::from_swizzle("xyzw"), Some(ComponentMask::XYZW));
        assert_eq!(ComponentMask::from_swizzle("w"), Some(ComponentMask::W));
        assert_eq!(ComponentMask::from_swizzle("zx"), Some(ComponentMask(0b0101)));
        assert_eq!(ComponentMask::from_swizzle("light"), None);
        assert_eq!(ComponentMask(0b0101).count(), 2);
    }

    #[test]
    fn narrows_full_swizzle_in_canonical_order() {
        let xz = ComponentMask::from_swizzle("xz").unwrap();
        assert_eq!(xz.narrow("xyzw"), "xz");
        assert_eq!(xz.narrow(&xz.narrow("xyzw")), "xz");
    }

    #[test]
    fn narrow_ignores_source_selector_letters() {
        let xz = ComponentMask::from_swizzle("xz").unwrap();
        assert_eq!(xz.narrow("yxwz"), "xz");
        assert_eq!(xz.narrow("wwww"), "xz");
        assert_eq!(ComponentMask::W.narrow("xyzw"), "w");
        assert_eq!(ComponentMask::W.narrow("xxxy"), "w");
    }

    #[test]
    fn narrow_leaves_short_swizzles_alone() {
        assert_eq!(ComponentMask::W.narrow("x"), "x");
        assert_eq!(ComponentMask(0b0011).narrow("zw"), "zw");
        assert_eq!(ComponentMask::XYZW.narrow("xyzw"), "xyzw");
    }

    #[test]
    fn three_letter_selector_under_two_component_mask() {
        assert_eq!(ComponentMask(0b1001).narrow("xyz"), "xw");
        assert_eq!(ComponentMask(0b0110).narrow("xxx"), "yz");
    }

    #[test]
    fn canonical_swizzle_text() {
        assert_eq!(ComponentMask(0b1010).to_swizzle(), "yw");
        assert_eq!(ComponentMask::XYZW.to_swizzle(), "xyzw");
    }
}
