// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod gate;
pub mod models;
pub mod normalize;
pub mod render;
pub mod server;
pub mod sheets;
pub mod utils;
