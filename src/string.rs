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

//! The `<string.h>` subset the SQLite amalgamation references on
//! wasm32-unknown-unknown, where no libc exists.
//!
//! Every function keeps the traditional C contract byte for byte: inputs are
//! NUL-terminated, comparisons treat bytes as unsigned, and unterminated
//! input is a caller bug. The C symbol names are exported only on the
//! freestanding wasm target; everywhere else libc owns them.

use std::os::raw::{c_char, c_int};
use std::ptr::null_mut;

/// Count of bytes preceding the NUL terminator.
///
/// # Safety
///
/// `s` must point to a NUL-terminated byte sequence.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn strlen(s: *const c_char) -> usize {
    let mut p = s;
    while *p != 0 {
        p = p.add(1);
    }
    p.offset_from(s) as usize
}

/// Sign of the first differing byte, compared as unsigned; zero when both
/// strings match through the terminator.
///
/// # Safety
///
/// `s1` and `s2` must point to NUL-terminated byte sequences.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn strcmp(s1: *const c_char, s2: *const c_char) -> c_int {
    let mut p1 = s1;
    let mut p2 = s2;
    while *p1 == *p2 {
        if *p1 == 0 {
            return 0;
        }
        p1 = p1.add(1);
        p2 = p2.add(1);
    }
    *p1 as u8 as c_int - *p2 as u8 as c_int
}

/// `strcmp` capped at `n` bytes; `n == 0` compares equal.
///
/// # Safety
///
/// `s1` and `s2` must each point to at least `n` readable bytes or a
/// NUL-terminated sequence, whichever ends first.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn strncmp(s1: *const c_char, s2: *const c_char, n: usize) -> c_int {
    let mut p1 = s1;
    let mut p2 = s2;
    let mut n = n;
    while n != 0 {
        if *p1 != *p2 {
            return *p1 as u8 as c_int - *p2 as u8 as c_int;
        }
        if *p1 == 0 {
            break;
        }
        p1 = p1.add(1);
        p2 = p2.add(1);
        n -= 1;
    }
    0
}

/// Index of the first byte of `s1` that appears in `s2`, or `strlen(s1)`
/// when none does.
///
/// # Safety
///
/// `s1` and `s2` must point to NUL-terminated byte sequences.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn strcspn(s1: *const c_char, s2: *const c_char) -> usize {
    let mut p = s1;
    loop {
        let c = *p;
        // There must be a NUL in s2, so matching it stops the scan at the
        // end of s1 as well.
        let mut spanp = s2;
        loop {
            let sc = *spanp;
            if sc == c {
                return p.offset_from(s1) as usize;
            }
            spanp = spanp.add(1);
            if sc == 0 {
                break;
            }
        }
        p = p.add(1);
    }
}

/// Pointer to the first occurrence of the low 8 bits of `c`, or null.
/// Searching for 0 finds the terminator and returns its address.
///
/// # Safety
///
/// `s` must point to a NUL-terminated byte sequence.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn strchr(s: *const c_char, c: c_int) -> *mut c_char {
    let c = c as u8;
    let mut p = s;
    loop {
        if *p as u8 == c {
            return p.cast_mut();
        }
        if *p == 0 {
            return null_mut();
        }
        p = p.add(1);
    }
}

/// Pointer to the last occurrence of the low 8 bits of `c`, or null.
/// Searching for 0 returns the address of the terminator.
///
/// # Safety
///
/// `s` must point to a NUL-terminated byte sequence.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn strrchr(s: *const c_char, c: c_int) -> *mut c_char {
    if c as u8 == 0 {
        return strchr(s, 0);
    }
    // strchr is fast, so lean on it rather than the obvious loop.
    let mut found = null_mut();
    let mut cursor = s;
    loop {
        let p = strchr(cursor, c);
        if p.is_null() {
            return found;
        }
        found = p;
        cursor = p.cast_const().add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs(s: &'static [u8]) -> *const c_char {
        assert_eq!(s.last(), Some(&0), "test input must be NUL-terminated");
        s.as_ptr().cast()
    }

    #[test]
    fn strlen_counts_bytes_before_terminator() {
        unsafe {
            assert_eq!(strlen(cs(b"\0")), 0);
            assert_eq!(strlen(cs(b"hello\0")), 5);
            assert_eq!(strlen(cs(b"a\0trailing\0")), 1);
        }
    }

    #[test]
    fn strcmp_orders_by_first_differing_unsigned_byte() {
        unsafe {
            assert_eq!(strcmp(cs(b"abc\0"), cs(b"abc\0")), 0);
            assert!(strcmp(cs(b"abc\0"), cs(b"abd\0")) < 0);
            assert!(strcmp(cs(b"abd\0"), cs(b"abc\0")) > 0);
            // Stops at the terminator, not at equal length.
            assert_eq!(strcmp(cs(b"abc\0extra\0"), cs(b"abc\0")), 0);
            // 0xFF compares as 255, not -1.
            assert!(strcmp(cs(b"\xff\0"), cs(b"a\0")) > 0);
        }
    }

    #[test]
    fn strncmp_honors_the_byte_cap() {
        unsafe {
            assert_eq!(strncmp(cs(b"abc\0"), cs(b"xyz\0"), 0), 0);
            assert_eq!(strncmp(cs(b"abcde\0"), cs(b"abcxx\0"), 3), 0);
            assert!(strncmp(cs(b"abcde\0"), cs(b"abcxx\0"), 4) < 0);
            // The terminator ends the comparison inside the cap.
            assert_eq!(strncmp(cs(b"ab\0"), cs(b"ab\0"), 10), 0);
            assert!(strncmp(cs(b"ab\0"), cs(b"abc\0"), 10) < 0);
        }
    }

    #[test]
    fn strcspn_spans_until_a_rejected_byte() {
        unsafe {
            assert_eq!(strcspn(cs(b"hello world\0"), cs(b"aeiou\0")), 1);
            assert_eq!(strcspn(cs(b"hello\0"), cs(b"\0")), 5);
            assert_eq!(strcspn(cs(b"\0"), cs(b"abc\0")), 0);
            assert_eq!(strcspn(cs(b"rhythm\0"), cs(b"aeiou\0")), 6);
        }
    }

    #[test]
    fn strchr_finds_first_occurrence_or_terminator() {
        unsafe {
            let s = cs(b"a/b/c\0");
            assert_eq!(strchr(s, b'/' as c_int), s.add(1).cast_mut());
            assert!(strchr(s, b'x' as c_int).is_null());
            assert_eq!(strchr(s, 0), s.add(5).cast_mut());
            // Only the low 8 bits of the needle matter.
            assert_eq!(strchr(s, 0x100 + b'/' as c_int), s.add(1).cast_mut());
        }
    }

    #[test]
    fn strrchr_finds_last_occurrence() {
        unsafe {
            let s = cs(b"a/b/c\0");
            assert_eq!(strrchr(s, b'/' as c_int), s.add(3).cast_mut());
            assert_eq!(strrchr(s, b'a' as c_int), s.cast_mut());
            assert!(strrchr(s, b'x' as c_int).is_null());
            assert_eq!(strrchr(s, 0), s.add(5).cast_mut());
        }
    }
}
