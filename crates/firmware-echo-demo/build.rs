// BareWired - nRF51 Bare-Metal Runtime
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::copy("nrf51822.ld", out_dir.join("nrf51822.ld")).unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg=-Tnrf51822.ld");
    println!("cargo:rerun-if-changed=nrf51822.ld");
}
