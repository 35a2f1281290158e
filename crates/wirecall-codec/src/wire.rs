use crate::cursor::WireCursor;
use crate::error::Result;
use crate::writer::WireWriter;

/// A value with a fixed wire width.
///
/// `WIDTH` is the exact number of bytes the value occupies on the
/// wire. Encoding emits exactly that many bytes; decoding consumes
/// exactly that many.
pub trait Wire: Sized {
    /// Encoded size in bytes.
    const WIDTH: usize;

    /// Append this value's encoding to the writer.
    fn put(&self, dst: &mut WireWriter<'_>);

    /// Decode one value, advancing the cursor by `WIDTH` bytes.
    fn take(src: &mut WireCursor<'_>) -> Result<Self>;
}

macro_rules! integral_wire {
    ($($ty:ty),* $(,)?) => {$(
        impl Wire for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();

            fn put(&self, dst: &mut WireWriter<'_>) {
                dst.extend(&self.to_le_bytes());
            }

            fn take(src: &mut WireCursor<'_>) -> Result<Self> {
                let bytes = src.take_bytes(std::mem::size_of::<$ty>())?;
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                Ok(<$ty>::from_le_bytes(raw))
            }
        }
    )*};
}

integral_wire!(u8, i8, u16, i16, u32, i32, u64, i64);

impl<T: Wire + Copy + Default, const N: usize> Wire for [T; N] {
    const WIDTH: usize = T::WIDTH * N;

    fn put(&self, dst: &mut WireWriter<'_>) {
        for element in self {
            element.put(dst);
        }
    }

    fn take(src: &mut WireCursor<'_>) -> Result<Self> {
        let mut out = [T::default(); N];
        for slot in &mut out {
            *slot = T::take(src)?;
        }
        Ok(out)
    }
}
