//! Rolling checksum over emitted field text

/// Accumulates raw field bytes in emission order and computes a CRC-32
///
/// One engine per write; the basis is exposed so callers can recompute
/// the value independently.
#[derive(Debug, Default, Clone)]
pub struct ChecksumEngine {
    basis: Vec<u8>,
}

impl ChecksumEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the bytes of one field
    pub fn append(&mut self, field: &[u8]) {
        self.basis.extend_from_slice(field);
    }

    /// Everything appended so far
    pub fn basis(&self) -> &[u8] {
        &self.basis
    }

    /// CRC-32 (IEEE) of the basis
    pub fn compute(&self) -> u32 {
        crc32fast::hash(&self.basis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_basis() {
        let engine = ChecksumEngine::new();
        assert!(engine.basis().is_empty());
        assert_eq!(engine.compute(), 0);
    }

    #[test]
    fn test_known_value() {
        let mut engine = ChecksumEngine::new();
        engine.append(b"1234");
        engine.append(b"56789");
        assert_eq!(engine.basis(), b"123456789");
        assert_eq!(engine.compute(), 0xCBF4_3926);
    }

    #[test]
    fn test_order_matters() {
        let mut a = ChecksumEngine::new();
        a.append(b"#KONTO");
        a.append(b"1910");
        let mut b = ChecksumEngine::new();
        b.append(b"1910");
        b.append(b"#KONTO");
        assert_ne!(a.compute(), b.compute());
    }
}
