//! `vector`: picks the fixvec or dynvec layout from the element codec

use crate::codec::AnyCodec;
use crate::dynvec::dynvec;
use crate::error::ShapeError;
use crate::fixvec::fixvec;

/// Create `vector Name <Element>;`
///
/// Fixed-size elements use the fixvec layout, everything else the dynvec
/// layout. The choice is made here once; the returned codec has no extra
/// runtime behavior.
pub fn vector(name: impl Into<String>, element: impl Into<AnyCodec>) -> Result<AnyCodec, ShapeError> {
    match element.into() {
        fixed @ AnyCodec::Fixed(_) => Ok(fixvec(name, fixed)?.into()),
        dynamic @ AnyCodec::Dynamic(_) => Ok(dynvec(name, dynamic).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte::byte;
    use crate::codec::Codec;
    use crate::option::option;
    use crate::value::Value;

    #[test]
    fn test_fixed_element_uses_fixvec() {
        let bytes = vector("Bytes", byte()).unwrap();
        assert!(!bytes.is_fixed());
        assert_eq!(
            bytes.pack(&Value::list([1u8, 1])).unwrap().as_ref(),
            &[2, 0, 0, 0, 1, 1]
        );
    }

    #[test]
    fn test_dynamic_element_uses_dynvec() {
        let vec = vector("ByteOptVec", option("ByteOpt", byte())).unwrap();
        assert_eq!(
            vec.pack(&Value::list([1u8, 1])).unwrap().as_ref(),
            &[14, 0, 0, 0, 12, 0, 0, 0, 13, 0, 0, 0, 1, 1]
        );
        assert_eq!(vec.schema(), "vector ByteOptVec <ByteOpt>;");
    }
}
