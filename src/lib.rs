// SPDX-License-Identifier: MIT

pub mod channel;
pub mod condition;
pub mod error;
pub mod placeholder;
