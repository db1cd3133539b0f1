// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// arXiv API 客户端与 Atom 解析
pub mod atom;
pub mod client;

pub use client::ArxivFeed;
