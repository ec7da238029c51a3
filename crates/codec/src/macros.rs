/// Copies the provided slice into $ty using $ty::from_be_bytes and advances the buffer. The caller
/// is responsible for checking the buffer holds at least $size bytes.
#[macro_export]
macro_rules! from_be_bytes_slice_and_advance_buf {
    ($ty: ty, $slice: expr) => {{ $crate::from_be_bytes_slice_and_advance_buf!($ty, ::std::mem::size_of::<$ty>(), $slice) }};
    ($ty:ty, $size: expr, $slice: expr) => {{
        let mut arr = [0u8; ::std::mem::size_of::<$ty>()];
        let size = $size;
        let size_of = ::std::mem::size_of::<$ty>();
        arr[size_of - size..].copy_from_slice(&$slice[0..size]);
        ::alloy_primitives::bytes::Buf::advance($slice, size);
        <$ty>::from_be_bytes(arr)
    }};
}

/// Writes the $value as a big-endian unsigned integer of $size bytes into $out, returning an
/// [`crate::EncodingError::FieldOverflow`] if the value does not fit.
macro_rules! put_uint_checked {
    ($out: expr, $field: literal, $value: expr, $size: expr) => {{
        let value: u64 = $value;
        let size: usize = $size;
        if size < 8 && value >> (size * 8) != 0 {
            return Err($crate::EncodingError::FieldOverflow { field: $field, value, size })
        }
        ::alloy_primitives::bytes::BufMut::put_uint(&mut *$out, value, size);
    }};
}

pub(crate) use put_uint_checked;
