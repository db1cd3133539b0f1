// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供领域接口的具体实现：
/// - arXiv 论文源（arxiv）
/// - 本地产物存储（storage）
/// - HTML 报告渲染（report）
/// - SMTP 邮件通知（notify）
/// - 指标说明（metrics）
pub mod arxiv;
pub mod metrics;
pub mod notify;
pub mod report;
pub mod storage;
