//! Fixed-width field codec.
//!
//! Records are flat sequences of integers and byte arrays laid out exactly
//! as the driver's C structs, host-native endian, no implicit padding.

/// A value with a fixed on-wire width.
///
/// `put` and `get` are handed a slice of at least `SIZE` bytes; record-level
/// callers check the length once up front.
pub trait Wire: Sized {
    const SIZE: usize;

    fn put(&self, buf: &mut [u8]);

    fn get(buf: &[u8]) -> Self;
}

macro_rules! wire_int {
    ($($ty:ty),*) => {
        $(
            impl Wire for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                #[inline]
                fn put(&self, buf: &mut [u8]) {
                    buf[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
                }

                #[inline]
                fn get(buf: &[u8]) -> Self {
                    let mut b = [0u8; std::mem::size_of::<$ty>()];
                    b.copy_from_slice(&buf[..Self::SIZE]);
                    <$ty>::from_ne_bytes(b)
                }
            }
        )*
    };
}

wire_int!(u8, u16, u32, u64);

impl<const N: usize> Wire for [u8; N] {
    const SIZE: usize = N;

    #[inline]
    fn put(&self, buf: &mut [u8]) {
        buf[..N].copy_from_slice(self);
    }

    #[inline]
    fn get(buf: &[u8]) -> Self {
        let mut b = [0u8; N];
        b.copy_from_slice(&buf[..N]);
        b
    }
}

/// Declare a wire record: a plain struct whose fields are laid out in
/// declaration order with no gaps.
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty ),*
        }

        impl $crate::protocol::wire::Wire for $name {
            const SIZE: usize = 0 $( + <$ty as $crate::protocol::wire::Wire>::SIZE )*;

            #[allow(unused_assignments)]
            fn put(&self, buf: &mut [u8]) {
                let mut off = 0;
                $(
                    $crate::protocol::wire::Wire::put(&self.$field, &mut buf[off..]);
                    off += <$ty as $crate::protocol::wire::Wire>::SIZE;
                )*
            }

            #[allow(unused_assignments)]
            fn get(buf: &[u8]) -> Self {
                let mut off = 0;
                $(
                    let $field = <$ty as $crate::protocol::wire::Wire>::get(&buf[off..]);
                    off += <$ty as $crate::protocol::wire::Wire>::SIZE;
                )*
                Self { $( $field ),* }
            }
        }
    };
}

pub(crate) use wire_record;

/// Encode a record into a fresh zeroed buffer of exactly `R::SIZE` bytes.
pub fn encode_record<R: Wire>(record: &R) -> Vec<u8> {
    let mut buf = vec![0u8; R::SIZE];
    record.put(&mut buf);
    buf
}

/// Decode a record from the front of `buf`, or `None` if it is too short.
pub fn decode_record<R: Wire>(buf: &[u8]) -> Option<R> {
    (buf.len() >= R::SIZE).then(|| R::get(buf))
}
