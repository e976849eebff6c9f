//! Population representation
//!
//! Strategy tags, per-strategy rates, and the realized population.

pub mod rates;
pub mod state;
pub mod strategy;

pub use self::rates::PopulationRates;
pub use self::state::PopulationState;
pub use self::strategy::Strategy;

#[cfg(test)]
pub(crate) mod test_support {
    use super::Strategy;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Tri {
        A,
        B,
        C,
    }

    impl Strategy for Tri {
        const ALL: &'static [Self] = &[Tri::A, Tri::B, Tri::C];

        fn index(self) -> usize {
            self as usize
        }

        fn label(self) -> &'static str {
            match self {
                Tri::A => "a",
                Tri::B => "b",
                Tri::C => "c",
            }
        }
    }
}
