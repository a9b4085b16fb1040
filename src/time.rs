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

//! Broken-down-time conversion for the freestanding target. Stub only.

use std::os::raw::c_int;

pub type time_t = i64;

/// Broken-down time as declared by `<time.h>`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct tm {
    pub tm_sec: c_int,
    pub tm_min: c_int,
    pub tm_hour: c_int,
    pub tm_mday: c_int,
    pub tm_mon: c_int,
    pub tm_year: c_int,
    pub tm_wday: c_int,
    pub tm_yday: c_int,
    pub tm_isdst: c_int,
}

/// Stub: returns `tmp` with whatever the caller put in it. `timep` is never
/// read, so callers that rely on the converted fields will only see their
/// own initialization.
///
/// # Safety
///
/// `tmp` must be a valid `tm` pointer; `timep` may be anything since it is
/// not dereferenced.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn localtime_r(_timep: *const time_t, tmp: *mut tm) -> *mut tm {
    // TODO: fix this tz conversion
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_returns_callers_struct_unmodified() {
        let mut out = tm {
            tm_sec: 1,
            tm_min: 2,
            tm_hour: 3,
            tm_mday: 4,
            tm_mon: 5,
            tm_year: 6,
            tm_wday: 0,
            tm_yday: 0,
            tm_isdst: -1,
        };
        let before = out;
        let t: time_t = 1_700_000_000;
        let ret = unsafe { localtime_r(&t, &mut out) };
        assert_eq!(ret, &mut out as *mut tm);
        assert_eq!(out, before);
    }

    #[test]
    fn stub_never_dereferences_the_time_value() {
        let mut out = tm {
            tm_sec: 0,
            tm_min: 0,
            tm_hour: 0,
            tm_mday: 0,
            tm_mon: 0,
            tm_year: 0,
            tm_wday: 0,
            tm_yday: 0,
            tm_isdst: 0,
        };
        let ret = unsafe { localtime_r(std::ptr::null(), &mut out) };
        assert_eq!(ret, &mut out as *mut tm);
    }
}
