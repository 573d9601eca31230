use std::{mem::size_of, slice};

/// Types that can be handed to the GPU as raw bytes.
///
/// # Safety
///
/// Implementors must be `#[repr(C)]` (or a primitive) with no padding, no pointers and no
/// interior mutability, so that every byte of the value is initialised.
pub unsafe trait Plain: Sized {
    fn as_bytes(&self) -> &[u8] {
        unsafe { slice::from_raw_parts((self as *const Self).cast::<u8>(), size_of::<Self>()) }
    }
}

unsafe impl Plain for f32 {}

unsafe impl<T: Plain, const N: usize> Plain for [T; N] {}
