// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 收集（collector）：按目标日期窗口拉取论文
/// - 排序（ranker）与启发式打分（quality_scorer）
/// - 单篇分析（paper_analyzer）
/// - 报告编排（reporter）及其渲染、投递接口（delivery）
pub mod collector;
pub mod delivery;
pub mod paper_analyzer;
pub mod quality_scorer;
pub mod ranker;
pub mod reporter;
