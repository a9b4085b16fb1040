/*
 * Copyright 2024 the wasm-host-ext-rs authors
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! `malloc` / `free` / `realloc` over the Rust global allocator for the
//! freestanding target. Each allocation carries its size in one aligned
//! header slot in front of the returned pointer, because the C interface
//! does not hand the size back on free.

use std::alloc::Layout;
use std::mem::{align_of, size_of};
use std::ptr::null_mut;

const fn max(a: usize, b: usize) -> usize {
    [a, b][(a < b) as usize]
}

const ALIGN: usize = max(
    8, // wasm32 max_align_t
    max(size_of::<usize>(), align_of::<usize>()),
);

/// # Safety
///
/// C `malloc` contract; the returned pointer must be released with the
/// `free` / `realloc` below, never with another allocator.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn malloc(size: usize) -> *mut u8 {
    let layout = match Layout::from_size_align(size + ALIGN, ALIGN) {
        Ok(layout) => layout,
        Err(_) => return null_mut(),
    };

    let ptr = std::alloc::alloc(layout);
    if ptr.is_null() {
        return null_mut();
    }

    ptr.cast::<usize>().write(size);
    ptr.add(ALIGN)
}

/// # Safety
///
/// `ptr` must be null or a live pointer returned by `malloc` / `realloc`.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn free(ptr: *mut u8) {
    if ptr.is_null() {
        return;
    }

    let base = ptr.sub(ALIGN);
    let size = base.cast::<usize>().read();
    let layout = Layout::from_size_align_unchecked(size + ALIGN, ALIGN);

    std::alloc::dealloc(base, layout);
}

/// # Safety
///
/// `ptr` must be null or a live pointer returned by `malloc` / `realloc`.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn realloc(ptr: *mut u8, new_size: usize) -> *mut u8 {
    if ptr.is_null() {
        return malloc(new_size);
    }

    let base = ptr.sub(ALIGN);
    let size = base.cast::<usize>().read();
    let layout = Layout::from_size_align_unchecked(size + ALIGN, ALIGN);

    let base = std::alloc::realloc(base, layout, new_size + ALIGN);
    if base.is_null() {
        return null_mut();
    }

    base.cast::<usize>().write(new_size);
    base.add(ALIGN)
}
