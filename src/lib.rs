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

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]

pub mod alloc;
pub mod ffi;
pub mod qsort;
pub mod string;
pub mod time;

use ffi::{sqlite3, sqlite3_api_routines};
use std::os::raw::{c_char, c_int};
use tracing::debug;

/// Signature of the embedded extension's initializer.
///
/// This interface is private between the host shim and the embedded
/// extension linked into the same cdylib. It only has to carry the `sqlite3`
/// handle and the error-message out-pointer; by convention it returns sqlite
/// status codes so the shim can hand its result straight back to the engine.
pub type EmbeddedExtensionInit =
    unsafe extern "C" fn(db: *mut sqlite3, pzErrMsg: *mut *mut c_char) -> c_int;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
extern "C" {
    // Resolved at final link against the embedded extension.
    fn wasm_embedded_extension_init(db: *mut sqlite3, pzErrMsg: *mut *mut c_char) -> c_int;
}

/// An extension loading entry point.
///
/// https://www.sqlite.org/loadext.html#programming_loadable_extensions
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
#[no_mangle]
#[tracing::instrument(skip_all)]
pub unsafe extern "C" fn sqlite3_wasmhostextrs_init(
    db: *mut sqlite3,
    pzErrMsg: *mut *mut c_char,
    pApi: *const sqlite3_api_routines,
) -> c_int {
    #[cfg(feature = "tracing-subscriber")]
    tracing_subscriber::fmt::try_init().ok();

    tracing::info!("loading host extension");

    forward_init(db, pzErrMsg, pApi, wasm_embedded_extension_init)
}

/// Binds the host's api table, then hands the load off to `delegate` and
/// returns its status unchanged.
///
/// The entry point above is the only production caller; keeping the body
/// here lets the forwarding contract run on hosted targets, where the
/// embedded initializer symbol does not exist.
///
/// # Safety
///
/// `db`, `pzErrMsg` and `pApi` must be the pointers the engine passed to the
/// extension entry point, and `delegate` must uphold the embedded
/// initializer contract.
pub unsafe fn forward_init(
    db: *mut sqlite3,
    pzErrMsg: *mut *mut c_char,
    pApi: *const sqlite3_api_routines,
    delegate: EmbeddedExtensionInit,
) -> c_int {
    // SQLITE_EXTENSION_INIT2(pApi)
    ffi::sqlite3_api = pApi.cast_mut();

    debug!(?db, "delegating to the embedded extension");

    delegate(db, pzErrMsg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr::{null_mut, NonNull};

    unsafe extern "C" fn delegate_ok(_db: *mut sqlite3, _pz_err_msg: *mut *mut c_char) -> c_int {
        ffi::SQLITE_OK
    }

    static ERR_MSG: &[u8] = b"embedded init failed\0";

    unsafe extern "C" fn delegate_fail(_db: *mut sqlite3, pz_err_msg: *mut *mut c_char) -> c_int {
        *pz_err_msg = ERR_MSG.as_ptr() as *mut c_char;
        7
    }

    // One test covers both delegates: the bound api table is process-global
    // state, so the two calls must not race from parallel test threads.
    #[test]
    fn forwards_delegate_status_and_error_message() {
        let db = NonNull::<sqlite3>::dangling().as_ptr();
        let api = NonNull::<sqlite3_api_routines>::dangling().as_ptr();

        unsafe {
            let mut err: *mut c_char = null_mut();
            assert_eq!(forward_init(db, &mut err, api, delegate_ok), ffi::SQLITE_OK);
            assert!(err.is_null(), "success path must leave pzErrMsg untouched");
            let bound = std::ptr::addr_of!(ffi::sqlite3_api).read();
            assert_eq!(bound, api, "SQLITE_EXTENSION_INIT2 must run first");

            let mut err: *mut c_char = null_mut();
            assert_eq!(forward_init(db, &mut err, api, delegate_fail), 7);
            assert_eq!(err as *const u8, ERR_MSG.as_ptr());
        }
    }
}
