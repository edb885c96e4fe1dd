// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![doc = include_str!("../README.md")]
#![no_std]

extern crate alloc;

mod codec;
mod error;
mod frame;
mod server;

pub mod checksum;
pub mod limits;
pub mod util;

pub use codec::Pdu;
pub use error::*;
pub use frame::*;
pub use server::*;
