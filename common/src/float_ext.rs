pub trait FloatExt {
    fn approximately_eq(self, other: Self) -> bool;

    fn within(self, other: Self, tolerance: Self) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        self.within(other, crate::EPSILON as f32)
    }

    fn within(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() < tolerance
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        self.within(other, crate::EPSILON)
    }

    fn within(self, other: Self, tolerance: Self) -> bool {
        (self - other).abs() < tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32_approximately_eq() {
        assert!(1.0_f32.approximately_eq(1.0));
        assert!((0.1_f32 + 0.2_f32).approximately_eq(0.3));
        assert!(!1.0_f32.approximately_eq(1.001));
    }

    #[test]
    fn f64_within_tolerance() {
        assert!(0.2_f64.within(0.2005, 1e-3));
        assert!(!0.2_f64.within(0.202, 1e-3));
    }

    #[test]
    fn nan_is_never_equal() {
        assert!(!f32::NAN.approximately_eq(f32::NAN));
        assert!(!f64::NAN.within(0.0, 1.0));
    }
}
