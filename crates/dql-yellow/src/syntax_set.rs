use crate::SyntaxKind;

const SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SyntaxSet {
    bits: [u64; SIZE],
}

impl SyntaxSet {
    pub const EMPTY: Self = Self { bits: [0; SIZE] };
    const BITS_PER_SLOT: u16 = u64::BITS as u16;

    pub const fn from_kind(kind: SyntaxKind) -> Self {
        let kind = kind as u16;

        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;

        assert!(
            slot_index < Self::EMPTY.bits.len(),
            "Index out of bounds. Increase the size of the bitset array."
        );

        let bit_index = kind % Self::BITS_PER_SLOT;
        let mask = 1 << bit_index;

        let mut bits = Self::EMPTY.bits;
        bits[slot_index] = mask;

        Self { bits }
    }

    pub const fn union(mut self, other: &Self) -> Self {
        let mut i = 0;

        while i < self.bits.len() {
            self.bits[i] |= other.bits[i];
            i += 1;
        }

        self
    }

    pub const fn difference(mut self, other: &Self) -> Self {
        let mut i = 0;

        while i < self.bits.len() {
            self.bits[i] &= !other.bits[i];
            i += 1;
        }

        self
    }

    pub const fn with(self, kind: SyntaxKind) -> Self {
        self.union(&Self::from_kind(kind))
    }

    pub const fn new<const N: usize>(kinds: [SyntaxKind; N]) -> Self {
        let mut set = Self::EMPTY;

        let mut i = 0;
        while i < kinds.len() {
            set = set.union(&Self::from_kind(kinds[i]));
            i += 1;
        }

        set
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        let slot_index = (kind / Self::BITS_PER_SLOT) as usize;
        let bit_index = kind % Self::BITS_PER_SLOT;
        let mask = 1 << bit_index;

        self.bits[slot_index] & mask != 0
    }

    pub const fn is_empty(&self) -> bool {
        let mut i = 0;

        while i < self.bits.len() {
            if self.bits[i] != 0 {
                return false;
            }
            i += 1;
        }

        true
    }

    pub fn iter(self) -> impl Iterator<Item = SyntaxKind> {
        SyntaxKind::ALL.iter().copied().filter(move |&kind| self.contains(kind))
    }
}

impl FromIterator<SyntaxKind> for SyntaxSet {
    fn from_iter<I: IntoIterator<Item = SyntaxKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

const _: () = assert!((SyntaxKind::TOMBSTONE as usize) < SIZE * u64::BITS as usize);

#[cfg(test)]
mod tests {
    use super::SyntaxSet;
    use crate::SyntaxKind::*;

    #[test]
    fn membership() {
        let set = SyntaxSet::new([SELECT_KW, TOMBSTONE, COMMA]);
        assert!(set.contains(SELECT_KW));
        assert!(set.contains(TOMBSTONE));
        assert!(set.contains(COMMA));
        assert!(!set.contains(FROM_KW));
        assert!(!set.is_empty());
        assert!(SyntaxSet::EMPTY.is_empty());
    }

    #[test]
    fn set_operations() {
        let left = SyntaxSet::new([SELECT_KW, FROM_KW]);
        let right = SyntaxSet::new([FROM_KW, WHERE_KW]);

        assert_eq!(left.union(&right).iter().collect::<Vec<_>>(), vec![SELECT_KW, FROM_KW, WHERE_KW]);
        assert_eq!(left.difference(&right).iter().collect::<Vec<_>>(), vec![SELECT_KW]);
        assert_eq!([EOF, IDENT].into_iter().collect::<SyntaxSet>(), SyntaxSet::new([IDENT, EOF]));
    }
}
