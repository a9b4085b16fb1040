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

//! Qsort routine from Bentley & McIlroy's "Engineering a Sort Function".
//!
//! In-place, not stable, O(n log n) comparisons on average. The larger of
//! the two partitions is retried at the top of the routine instead of
//! recursed into, so the stack stays O(log n) even on adversarial input.

use std::cmp::min;
use std::mem;
use std::os::raw::{c_int, c_void};
use std::ptr;

/// Caller-supplied ordering: negative / zero / positive for
/// less / equal / greater. Assumed total and deterministic for the call.
pub type Comparator = unsafe extern "C" fn(*const c_void, *const c_void) -> c_int;

const WORD: usize = mem::size_of::<usize>();

/// How elements get swapped for one invocation. Recomputed every time the
/// routine restarts because partitioning shifts the base address.
#[derive(Clone, Copy, PartialEq, Eq)]
enum SwapKind {
    /// es is exactly one word and the base is word-aligned.
    Word,
    /// es is a word multiple and the base is word-aligned.
    WordStride,
    /// Anything else goes byte by byte.
    Byte,
}

impl SwapKind {
    fn classify(base: *const u8, es: usize) -> Self {
        if base as usize % WORD != 0 || es % WORD != 0 {
            SwapKind::Byte
        } else if es == WORD {
            SwapKind::Word
        } else {
            SwapKind::WordStride
        }
    }
}

/// Swap `n` bytes between `a` and `b`. Word kinds require both pointers
/// word-aligned and `n` a word multiple, which `classify` guarantees for
/// every pointer derived from the base by element-size steps.
unsafe fn swap_region(a: *mut u8, b: *mut u8, n: usize, kind: SwapKind) {
    match kind {
        SwapKind::Byte => {
            for i in 0..n {
                ptr::swap(a.add(i), b.add(i));
            }
        }
        SwapKind::Word | SwapKind::WordStride => {
            let mut pa = a.cast::<usize>();
            let mut pb = b.cast::<usize>();
            for _ in 0..n / WORD {
                let t = pa.read();
                pa.write(pb.read());
                pb.write(t);
                pa = pa.add(1);
                pb = pb.add(1);
            }
        }
    }
}

/// Swap one element; the Word kind collapses to a single register move.
unsafe fn swap_one(a: *mut u8, b: *mut u8, es: usize, kind: SwapKind) {
    if kind == SwapKind::Word {
        let pa = a.cast::<usize>();
        let pb = b.cast::<usize>();
        let t = pa.read();
        pa.write(pb.read());
        pb.write(t);
    } else {
        swap_region(a, b, es, kind);
    }
}

unsafe fn med3(a: *mut u8, b: *mut u8, c: *mut u8, cmp: Comparator) -> *mut u8 {
    if cmp(a.cast(), b.cast()) < 0 {
        if cmp(b.cast(), c.cast()) < 0 {
            b
        } else if cmp(a.cast(), c.cast()) < 0 {
            c
        } else {
            a
        }
    } else if cmp(b.cast(), c.cast()) > 0 {
        b
    } else if cmp(a.cast(), c.cast()) < 0 {
        a
    } else {
        c
    }
}

unsafe fn insertion_sort(a: *mut u8, n: usize, es: usize, cmp: Comparator, kind: SwapKind) {
    if n < 2 {
        return;
    }
    let end = a.add(n * es);
    let mut pm = a.add(es);
    while pm < end {
        let mut pl = pm;
        while pl > a && cmp(pl.sub(es).cast(), pl.cast()) > 0 {
            swap_one(pl.sub(es), pl, es, kind);
            pl = pl.sub(es);
        }
        pm = pm.add(es);
    }
}

/// Sort `n` elements of `es` bytes starting at `aa`, in place, so that
/// `cmp` reports every adjacent pair as ordered. Historical `qsort`
/// signature and semantics; equal keys may be reordered.
///
/// # Safety
///
/// `aa` must be valid for reads and writes of `n * es` bytes, and `cmp` must
/// only be handed pointers inside that range. A comparator that is not a
/// total order may leave the range unsorted but nothing outside it is ever
/// touched.
#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), no_mangle)]
pub unsafe extern "C" fn qsort(aa: *mut c_void, n: usize, es: usize, cmp: Comparator) {
    let mut a = aa.cast::<u8>();
    let mut n = n;

    loop {
        let kind = SwapKind::classify(a, es);

        if n < 7 {
            insertion_sort(a, n, es, cmp, kind);
            return;
        }

        let mut pm = a.add((n / 2) * es);
        if n > 7 {
            let mut pl = a;
            let mut pn = a.add((n - 1) * es);
            if n > 40 {
                // Ninther: median of three medians over the low, middle and
                // high thirds, which holds up against sorted, reversed and
                // organ-pipe input.
                let d = (n / 8) * es;
                pl = med3(pl, pl.add(d), pl.add(2 * d), cmp);
                pm = med3(pm.sub(d), pm, pm.add(d), cmp);
                pn = med3(pn.sub(2 * d), pn.sub(d), pn, cmp);
            }
            pm = med3(pl, pm, pn, cmp);
        }
        swap_one(a, pm, es, kind);

        // Three-way partition around the pivot parked in slot 0: equal keys
        // collect at both ends and move to the middle afterwards.
        let mut pa = a.add(es);
        let mut pb = pa;
        let mut pc = a.add((n - 1) * es);
        let mut pd = pc;
        let mut swapped = false;
        loop {
            while pb <= pc {
                let r = cmp(pb.cast(), a.cast());
                if r > 0 {
                    break;
                }
                if r == 0 {
                    swapped = true;
                    swap_one(pa, pb, es, kind);
                    pa = pa.add(es);
                }
                pb = pb.add(es);
            }
            while pb <= pc {
                let r = cmp(pc.cast(), a.cast());
                if r < 0 {
                    break;
                }
                if r == 0 {
                    swapped = true;
                    swap_one(pc, pd, es, kind);
                    pd = pd.sub(es);
                }
                pc = pc.sub(es);
            }
            if pb > pc {
                break;
            }
            swap_one(pb, pc, es, kind);
            swapped = true;
            pb = pb.add(es);
            pc = pc.sub(es);
        }

        if !swapped {
            // The pass moved nothing, so the range is already nearly in
            // order; finish with insertion sort.
            insertion_sort(a, n, es, cmp, kind);
            return;
        }

        let pn = a.add(n * es);
        let r = min(pa.offset_from(a), pb.offset_from(pa));
        if r > 0 {
            swap_region(a, pb.sub(r as usize), r as usize, kind);
        }
        let r = min(pd.offset_from(pc), pn.offset_from(pd) - es as isize);
        if r > 0 {
            swap_region(pb, pn.sub(r as usize), r as usize, kind);
        }

        // Recurse into the smaller partition, restart on the larger one;
        // that caps the stack at O(log n) no matter the input.
        let left = pb.offset_from(pa) as usize;
        let right = pd.offset_from(pc) as usize;
        if left <= right {
            if left > es {
                qsort(a.cast(), left / es, es, cmp);
            }
            if right > es {
                a = pn.sub(right);
                n = right / es;
                continue;
            }
        } else {
            if right > es {
                qsort(pn.sub(right).cast(), right / es, es, cmp);
            }
            if left > es {
                n = left / es;
                continue;
            }
        }
        return;
    }
}
