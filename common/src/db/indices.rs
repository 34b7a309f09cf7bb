use std::fmt::{Debug, Display};

macro_rules! define_index {
    ($name:ident, $prefix:literal) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(pub u32);

        impl $name {
            #[inline(always)]
            pub fn new(id: usize) -> Self {
                Self(id as u32)
            }
            #[inline(always)]
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        // Design files number objects from 1.
        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0 + 1)
            }
        }
    };
}

define_index!(CellId, "C");
define_index!(MasterCellId, "MC");
define_index!(NetId, "N");
define_index!(LayerId, "M");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_one_based() {
        assert_eq!(NetId::new(0).to_string(), "N1");
        assert_eq!(MasterCellId::new(11).to_string(), "MC12");
        assert_eq!(format!("{:?}", CellId::new(4)), "CellId(4)");
    }
}
