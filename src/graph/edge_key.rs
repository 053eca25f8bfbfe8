//! Canonical 64-bit encoding of vertex pairs

use crate::error::{Error, Result};

/// Encodes a pair `(a, b)` as `a * base + b`.
///
/// `base` is always strictly greater than the largest vertex id the codec
/// accepts, so distinct pairs never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeCodec {
    base: u64,
}

impl EdgeCodec {
    /// Codec for vertex ids in `0..node_count`
    pub fn for_node_count(node_count: usize) -> Self {
        Self {
            base: (node_count as u64).max(1),
        }
    }

    /// Codec for vertex ids up to and including `max_id`
    pub fn for_max_id(max_id: u32) -> Self {
        Self {
            base: u64::from(max_id) + 1,
        }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    /// Encode the ordered pair `(src, dst)`
    pub fn encode(&self, src: u32, dst: u32) -> Result<u64> {
        self.check(src)?;
        self.check(dst)?;
        Ok(self.encode_unchecked(src, dst))
    }

    /// Encode the unordered pair `{u, v}` as `(min, max)`
    pub fn canonical(&self, u: u32, v: u32) -> Result<u64> {
        self.encode(u.min(v), u.max(v))
    }

    /// Encode ids already known to be below `base`
    pub(crate) fn encode_unchecked(&self, src: u32, dst: u32) -> u64 {
        debug_assert!(u64::from(src) < self.base && u64::from(dst) < self.base);
        u64::from(src) * self.base + u64::from(dst)
    }

    pub fn decode(&self, key: u64) -> (u32, u32) {
        ((key / self.base) as u32, (key % self.base) as u32)
    }

    fn check(&self, id: u32) -> Result<()> {
        if u64::from(id) >= self.base {
            return Err(Error::InvalidArgument(format!(
                "vertex {} does not fit edge key base {}",
                id, self.base
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_ignores_orientation() {
        let codec = EdgeCodec::for_node_count(10);
        assert_eq!(codec.canonical(7, 2).unwrap(), codec.canonical(2, 7).unwrap());
        assert_eq!(codec.decode(codec.canonical(7, 2).unwrap()), (2, 7));
    }

    #[test]
    fn ordered_encoding_sorts_by_source_then_target() {
        let codec = EdgeCodec::for_max_id(u32::MAX);
        let a = codec.encode(1, u32::MAX).unwrap();
        let b = codec.encode(2, 0).unwrap();
        assert!(a < b);
        assert_eq!(codec.decode(a), (1, u32::MAX));
    }

    #[test]
    fn ids_at_or_above_base_are_rejected() {
        let codec = EdgeCodec::for_max_id(4);
        assert_eq!(codec.base(), 5);
        assert!(codec.encode(4, 0).is_ok());
        assert!(matches!(codec.encode(5, 0), Err(Error::InvalidArgument(_))));
    }
}
