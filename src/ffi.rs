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

//! The subset of the SQLite C interface the host shim touches.
//!
//! The shim never calls through the api table, it only stores the pointer,
//! so both structs stay opaque and no generated bindings are needed.

use std::os::raw::c_int;
use std::ptr::null_mut;

/// Opaque database connection handle, owned by the host engine.
#[repr(C)]
pub struct sqlite3 {
    _unused: [u8; 0],
}

/// The host's function table of database API routines.
#[repr(C)]
pub struct sqlite3_api_routines {
    _unused: [u8; 0],
}

pub const SQLITE_OK: c_int = 0;
pub const SQLITE_ERROR: c_int = 1;

// https://www.sqlite.org/loadext.html#programming_loadable_extensions
// SQLITE_EXTENSION_INIT1
// https://github.com/rusqlite/rusqlite/issues/524
//
// Exported so the embedded extension linked into the same cdylib can route
// its own API calls through the table bound by the entry point.
#[no_mangle]
pub static mut sqlite3_api: *mut sqlite3_api_routines = null_mut();
