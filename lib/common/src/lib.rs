use std::io;

use num_traits::{AsPrimitive, PrimInt, Unsigned};

pub mod macros;

/// Trait for unsigned integer types which can be stored as elements of an index buffer.
///
/// Elements are always stored little-endian, `WIDTH` bytes each.
pub trait IndexElement:
    PrimInt + Unsigned + AsPrimitive<u32> + AsPrimitive<usize> + std::fmt::Debug + 'static
{
    /// Size of one stored element, in bytes.
    const WIDTH: u8;

    /// Write `self` to `writer` as `WIDTH` little-endian bytes.
    fn write_le<W: io::Write + ?Sized>(self, writer: &mut W) -> io::Result<()>;

    /// Read one element from the front of `bytes`, or `None` if there are fewer than `WIDTH` of
    /// them.
    fn read_le(bytes: &[u8]) -> Option<Self>;
}

crate::item_with! {Idx: u16, u32 =>
    impl IndexElement for Idx {
        const WIDTH: u8 = std::mem::size_of::<Idx>() as u8;

        #[inline]
        fn write_le<W: io::Write + ?Sized>(self, writer: &mut W) -> io::Result<()> {
            writer.write_all(&self.to_le_bytes())
        }

        #[inline]
        fn read_le(bytes: &[u8]) -> Option<Self> {
            let raw = bytes.get(..std::mem::size_of::<Idx>())?;
            raw.try_into().ok().map(Idx::from_le_bytes)
        }
    }
}
